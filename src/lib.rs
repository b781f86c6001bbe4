//! Book review API: users, books and reviews over PostgreSQL.
//!
//! Each resource is a [`shelf_kernel::Module`] under [`modules`]; the
//! [`bootstrap`] functions wire them to a pool and the HTTP server.

pub mod bootstrap;
pub mod modules;
pub mod service;

pub use service::RecordService;
