pub mod books;
pub mod reviews;
pub mod users;

use std::sync::Arc;

use serde::Serialize;
use shelf_db::{DbError, PgPool};
use shelf_http::AppError;
use shelf_kernel::ModuleRegistry;
use utoipa::ToSchema;

/// Register all resource modules backed by PostgreSQL.
///
/// Every store receives its own clone of the pool handle.
pub fn register_all(registry: &mut ModuleRegistry, pool: &PgPool) {
    registry.register(users::create_module(Arc::new(
        users::store::PgUserStore::new(pool.clone()),
    )));
    registry.register(books::create_module(Arc::new(
        books::store::PgBookStore::new(pool.clone()),
    )));
    registry.register(reviews::create_module(Arc::new(
        reviews::store::PgReviewStore::new(pool.clone()),
    )));
}

/// Plain acknowledgement body.
#[derive(Debug, Serialize, ToSchema)]
pub struct Detail {
    pub detail: String,
}

impl Detail {
    pub fn new(detail: impl Into<String>) -> Self {
        Self {
            detail: detail.into(),
        }
    }
}

/// Any store failure while creating is reported as a bad request.
pub(crate) fn create_failed(kind: &str, err: DbError) -> AppError {
    AppError::bad_request(format!("Error creating {kind}: {err}"))
}

/// Store failures outside of create are server errors.
pub(crate) fn store_failed(context: &'static str, err: DbError) -> AppError {
    AppError::Internal(anyhow::Error::new(err).context(context))
}
