//! Database layer: connection pool, record store contract and migrations.
//!
//! Stores receive the pool handle explicitly; each call acquires a pooled
//! connection and hands it back when the guard drops.

pub mod memory;
pub mod migrate;
pub mod pool;
pub mod store;

pub use memory::MemoryStore;
pub use migrate::migrate;
pub use pool::{create_pool, create_pool_with_options};
pub use store::{ensure_id, DbError, RecordStore};

pub use sqlx::PgPool;
