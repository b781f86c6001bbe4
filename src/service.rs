//! Merge-and-persist service shared by every resource.

use std::sync::Arc;

use shelf_db::{DbError, RecordStore};
use shelf_kernel::{merge, timestamp, Patch, Record};

/// Thin layer over a [`RecordStore`]: logs each operation and owns the
/// read-merge-write sequence of partial updates.
///
/// Update and delete look the record up before acting. Nothing serialises
/// the two steps, so concurrent writers on one id are last-write-wins.
pub struct RecordService<R: Record> {
    store: Arc<dyn RecordStore<R>>,
}

impl<R: Record> Clone for RecordService<R> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<R: Record> RecordService<R> {
    pub fn new(store: Arc<dyn RecordStore<R>>) -> Self {
        tracing::debug!(kind = R::KIND, "record service initialized");
        Self { store }
    }

    pub async fn create(&self, record: R) -> Result<R, DbError> {
        tracing::info!(kind = R::KIND, "creating record");
        let created = self.store.create(record).await?;
        tracing::debug!(kind = R::KIND, id = %created.id(), "record created");
        Ok(created)
    }

    pub async fn get(&self, id: &str) -> Result<Option<R>, DbError> {
        let found = self.store.get_by_id(id).await?;
        match &found {
            Some(_) => tracing::debug!(kind = R::KIND, id, "found record"),
            None => tracing::warn!(kind = R::KIND, id, "record not found"),
        }
        Ok(found)
    }

    pub async fn list(&self) -> Result<Vec<R>, DbError> {
        let records = self.store.list_all().await?;
        if records.is_empty() {
            tracing::warn!(kind = R::KIND, "no records found");
        } else {
            tracing::debug!(kind = R::KIND, count = records.len(), "listed records");
        }
        Ok(records)
    }

    /// Apply `patch` to the record `id` and persist the result.
    ///
    /// Returns the merged record, or `None` when `id` does not exist.
    pub async fn update<P>(&self, id: &str, patch: P) -> Result<Option<R>, DbError>
    where
        P: Patch<R> + Send,
    {
        tracing::info!(kind = R::KIND, id, "updating record");
        let Some(existing) = self.store.get_by_id(id).await? else {
            tracing::warn!(kind = R::KIND, id, "record not found");
            return Ok(None);
        };

        if patch.is_empty() {
            tracing::debug!(kind = R::KIND, id, "empty patch, refreshing timestamps only");
        }

        let merged = merge(&existing, patch, timestamp());
        self.store.update_by_id(id, &merged).await?;
        tracing::debug!(kind = R::KIND, id, "record updated");

        Ok(Some(merged))
    }

    /// Delete `id`. Returns `false` when there was nothing to delete.
    pub async fn delete(&self, id: &str) -> Result<bool, DbError> {
        tracing::info!(kind = R::KIND, id, "deleting record");
        if self.store.get_by_id(id).await?.is_none() {
            tracing::warn!(kind = R::KIND, id, "record not found");
            return Ok(false);
        }

        self.store.delete_by_id(id).await?;
        tracing::debug!(kind = R::KIND, id, "record deleted");
        Ok(true)
    }

    pub async fn delete_all(&self) -> Result<(), DbError> {
        tracing::info!(kind = R::KIND, "deleting all records");
        self.store.delete_all().await
    }
}
