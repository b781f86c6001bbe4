//! Core traits, settings and the module registry for shelf.

pub mod module;
pub mod record;
pub mod registry;
pub mod settings;
pub mod validation;

pub use module::{InitCtx, Migration, Module};
pub use record::{merge, timestamp, Patch, Record};
pub use registry::ModuleRegistry;
pub use validation::{Validate, ValidationError};
