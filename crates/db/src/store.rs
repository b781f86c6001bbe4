//! The persistence contract every resource store fulfils.

use async_trait::async_trait;
use shelf_kernel::Record;
use uuid::Uuid;

/// Persistence failure: constraint violation or connectivity.
#[derive(Debug, thiserror::Error)]
pub enum DbError {
    #[error(transparent)]
    Sqlx(#[from] sqlx::Error),

    #[error("{kind} '{id}' already exists")]
    Conflict { kind: &'static str, id: String },
}

impl DbError {
    /// True when the failure is a unique/primary key violation.
    pub fn is_conflict(&self) -> bool {
        match self {
            Self::Conflict { .. } => true,
            Self::Sqlx(sqlx::Error::Database(e)) => e.is_unique_violation(),
            Self::Sqlx(_) => false,
        }
    }
}

/// CRUD over one table.
///
/// Absence is never an error: `get_by_id` returns `None`, and updates or
/// deletes that match nothing succeed silently.
#[async_trait]
pub trait RecordStore<R: Record>: Send + Sync {
    /// Persist a new record, generating an id if it has none.
    /// Returns the stored projection.
    async fn create(&self, record: R) -> Result<R, DbError>;

    async fn get_by_id(&self, id: &str) -> Result<Option<R>, DbError>;

    async fn list_all(&self) -> Result<Vec<R>, DbError>;

    /// Overwrite every mutable column of `id` with `record`.
    async fn update_by_id(&self, id: &str, record: &R) -> Result<(), DbError>;

    async fn delete_by_id(&self, id: &str) -> Result<(), DbError>;

    async fn delete_all(&self) -> Result<(), DbError>;
}

/// Give `record` a fresh UUIDv4 identity if the caller left it blank.
pub fn ensure_id<R: Record>(mut record: R) -> R {
    if record.id().trim().is_empty() {
        record.assign_id(Uuid::new_v4().to_string());
    }
    record
}
