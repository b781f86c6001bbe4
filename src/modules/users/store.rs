//! PostgreSQL persistence for users.

use async_trait::async_trait;
use shelf_db::{ensure_id, DbError, PgPool, RecordStore};
use sqlx::types::Json;

use super::models::User;

const COLUMNS: &str = "id, username, email, created_at, updated_at";

/// User store over the `users` table.
#[derive(Clone)]
pub struct PgUserStore {
    pool: PgPool,
}

impl PgUserStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<User> for PgUserStore {
    async fn create(&self, user: User) -> Result<User, DbError> {
        let user = ensure_id(user);
        let mut conn = self.pool.acquire().await?;

        let created = sqlx::query_as::<_, User>(&format!(
            r#"
            INSERT INTO users (id, username, email, data, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&user.id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(Json(&user))
        .bind(user.created_at)
        .bind(user.updated_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<User>, DbError> {
        let mut conn = self.pool.acquire().await?;
        let user = sqlx::query_as::<_, User>(&format!("SELECT {COLUMNS} FROM users WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(user)
    }

    async fn list_all(&self) -> Result<Vec<User>, DbError> {
        let mut conn = self.pool.acquire().await?;
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {COLUMNS} FROM users ORDER BY created_at, id"
        ))
        .fetch_all(&mut *conn)
        .await?;
        Ok(users)
    }

    async fn update_by_id(&self, id: &str, user: &User) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            r#"
            UPDATE users
            SET username = $2, email = $3, data = $4, updated_at = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&user.username)
        .bind(&user.email)
        .bind(Json(user))
        .bind(user.updated_at)
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("DELETE FROM users WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("DELETE FROM users").execute(&mut *conn).await?;
        Ok(())
    }
}
