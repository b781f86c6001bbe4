//! PostgreSQL persistence for reviews.

use async_trait::async_trait;
use shelf_db::{ensure_id, DbError, MemoryStore, PgPool, RecordStore};
use sqlx::types::Json;

use super::models::Review;

const COLUMNS: &str = "id, user_id, book_id, rating, comment, created_at, updated_at";

/// Review persistence, with lookup by reviewed book on top of plain CRUD.
#[async_trait]
pub trait ReviewStore: RecordStore<Review> {
    /// Every review of `book_id`, oldest first.
    async fn list_for_book(&self, book_id: &str) -> Result<Vec<Review>, DbError>;
}

/// Review store over the `reviews` table.
#[derive(Clone)]
pub struct PgReviewStore {
    pool: PgPool,
}

impl PgReviewStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Review> for PgReviewStore {
    async fn create(&self, review: Review) -> Result<Review, DbError> {
        let review = ensure_id(review);
        let mut conn = self.pool.acquire().await?;

        let created = sqlx::query_as::<_, Review>(&format!(
            r#"
            INSERT INTO reviews (id, user_id, book_id, rating, comment, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&review.id)
        .bind(&review.user_id)
        .bind(&review.book_id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(Json(&review))
        .bind(review.created_at)
        .bind(review.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Review>, DbError> {
        let mut conn = self.pool.acquire().await?;
        let review =
            sqlx::query_as::<_, Review>(&format!("SELECT {COLUMNS} FROM reviews WHERE id = $1"))
                .bind(id)
                .fetch_optional(&mut *conn)
                .await?;
        Ok(review)
    }

    async fn list_all(&self) -> Result<Vec<Review>, DbError> {
        let mut conn = self.pool.acquire().await?;
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {COLUMNS} FROM reviews ORDER BY created_at, id"
        ))
        .fetch_all(&mut *conn)
        .await?;
        Ok(reviews)
    }

    async fn update_by_id(&self, id: &str, review: &Review) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            r#"
            UPDATE reviews
            SET rating = $2, comment = $3, data = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(review.rating)
        .bind(&review.comment)
        .bind(Json(review))
        .bind(review.updated_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("DELETE FROM reviews WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("DELETE FROM reviews").execute(&mut *conn).await?;
        Ok(())
    }
}

#[async_trait]
impl ReviewStore for PgReviewStore {
    async fn list_for_book(&self, book_id: &str) -> Result<Vec<Review>, DbError> {
        let mut conn = self.pool.acquire().await?;
        let reviews = sqlx::query_as::<_, Review>(&format!(
            "SELECT {COLUMNS} FROM reviews WHERE book_id = $1 ORDER BY created_at, id"
        ))
        .bind(book_id)
        .fetch_all(&mut *conn)
        .await?;
        Ok(reviews)
    }
}

#[async_trait]
impl ReviewStore for MemoryStore<Review> {
    async fn list_for_book(&self, book_id: &str) -> Result<Vec<Review>, DbError> {
        let mut reviews = self.list_all().await?;
        reviews.retain(|review| review.book_id == book_id);
        Ok(reviews)
    }
}
