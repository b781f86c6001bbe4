//! In-process store with the same contract as the PostgreSQL stores.
//!
//! Rows keep insertion order, mirroring an unordered `SELECT *` on a freshly
//! populated table closely enough for tests.

use async_trait::async_trait;
use shelf_kernel::Record;
use tokio::sync::RwLock;

use crate::store::{ensure_id, DbError, RecordStore};

pub struct MemoryStore<R> {
    rows: RwLock<Vec<R>>,
}

impl<R: Record> MemoryStore<R> {
    pub fn new() -> Self {
        Self {
            rows: RwLock::new(Vec::new()),
        }
    }

    /// Number of stored rows.
    pub async fn len(&self) -> usize {
        self.rows.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.rows.read().await.is_empty()
    }
}

impl<R: Record> Default for MemoryStore<R> {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl<R: Record> RecordStore<R> for MemoryStore<R> {
    async fn create(&self, record: R) -> Result<R, DbError> {
        let record = ensure_id(record);
        let mut rows = self.rows.write().await;
        if rows.iter().any(|row| row.id() == record.id()) {
            return Err(DbError::Conflict {
                kind: R::KIND,
                id: record.id().to_string(),
            });
        }
        rows.push(record.clone());
        Ok(record)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<R>, DbError> {
        let rows = self.rows.read().await;
        Ok(rows.iter().find(|row| row.id() == id).cloned())
    }

    async fn list_all(&self) -> Result<Vec<R>, DbError> {
        Ok(self.rows.read().await.clone())
    }

    async fn update_by_id(&self, id: &str, record: &R) -> Result<(), DbError> {
        let mut rows = self.rows.write().await;
        if let Some(row) = rows.iter_mut().find(|row| row.id() == id) {
            *row = record.clone();
        }
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), DbError> {
        self.rows.write().await.retain(|row| row.id() != id);
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DbError> {
        self.rows.write().await.clear();
        Ok(())
    }
}
