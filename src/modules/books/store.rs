//! PostgreSQL persistence for books.

use async_trait::async_trait;
use shelf_db::{ensure_id, DbError, PgPool, RecordStore};
use sqlx::types::Json;

use super::models::Book;

const COLUMNS: &str = "id, title, author, isbn, created_at";

/// Book store over the `books` table.
#[derive(Clone)]
pub struct PgBookStore {
    pool: PgPool,
}

impl PgBookStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RecordStore<Book> for PgBookStore {
    async fn create(&self, book: Book) -> Result<Book, DbError> {
        let book = ensure_id(book);
        let mut conn = self.pool.acquire().await?;

        let created = sqlx::query_as::<_, Book>(&format!(
            r#"
            INSERT INTO books (id, title, author, isbn, data, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(&book.id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(Json(&book))
        .bind(book.created_at)
        .fetch_one(&mut *conn)
        .await?;

        Ok(created)
    }

    async fn get_by_id(&self, id: &str) -> Result<Option<Book>, DbError> {
        let mut conn = self.pool.acquire().await?;
        let book = sqlx::query_as::<_, Book>(&format!("SELECT {COLUMNS} FROM books WHERE id = $1"))
            .bind(id)
            .fetch_optional(&mut *conn)
            .await?;
        Ok(book)
    }

    async fn list_all(&self) -> Result<Vec<Book>, DbError> {
        let mut conn = self.pool.acquire().await?;
        let books = sqlx::query_as::<_, Book>(&format!(
            "SELECT {COLUMNS} FROM books ORDER BY created_at, id"
        ))
        .fetch_all(&mut *conn)
        .await?;
        Ok(books)
    }

    async fn update_by_id(&self, id: &str, book: &Book) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query(
            r#"
            UPDATE books
            SET title = $2, author = $3, isbn = $4, data = $5
            WHERE id = $1
            "#,
        )
        .bind(id)
        .bind(&book.title)
        .bind(&book.author)
        .bind(&book.isbn)
        .bind(Json(book))
        .execute(&mut *conn)
        .await?;
        Ok(())
    }

    async fn delete_by_id(&self, id: &str) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("DELETE FROM books WHERE id = $1")
            .bind(id)
            .execute(&mut *conn)
            .await?;
        Ok(())
    }

    async fn delete_all(&self) -> Result<(), DbError> {
        let mut conn = self.pool.acquire().await?;
        sqlx::query("DELETE FROM books").execute(&mut *conn).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::books::models::NewBook;
    use shelf_kernel::timestamp;

    // Run with: DATABASE_URL=postgres://... cargo test -- --ignored

    async fn store() -> PgBookStore {
        let url = std::env::var("DATABASE_URL").expect("DATABASE_URL required");
        let pool = shelf_db::create_pool(&url).await.expect("pool creation failed");
        let mut registry = shelf_kernel::ModuleRegistry::new();
        crate::modules::register_all(&mut registry, &pool);
        shelf_db::migrate(&pool, &registry.collect_migrations())
            .await
            .expect("migrations failed");
        PgBookStore::new(pool)
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn create_then_get_round_trips() {
        let store = store().await;
        let input = NewBook {
            title: "A Great Book".into(),
            author: "George Orwell".into(),
            isbn: Some("1234567890".into()),
        };
        let created = store.create(Book::from_new(input, timestamp())).await.unwrap();

        assert!(!created.id.is_empty());
        let fetched = store.get_by_id(&created.id).await.unwrap();
        assert_eq!(fetched, Some(created.clone()));

        store.delete_by_id(&created.id).await.unwrap();
        assert_eq!(store.get_by_id(&created.id).await.unwrap(), None);
    }

    #[tokio::test]
    #[ignore = "requires database"]
    async fn duplicate_id_is_a_conflict() {
        let store = store().await;
        let mut book = Book::from_new(
            NewBook {
                title: "Duplicate Identity".into(),
                author: "Anonymous Writer".into(),
                isbn: None,
            },
            timestamp(),
        );
        book.id = uuid::Uuid::new_v4().to_string();

        store.create(book.clone()).await.unwrap();
        let err = store.create(book.clone()).await.unwrap_err();
        assert!(err.is_conflict());

        store.delete_by_id(&book.id).await.unwrap();
    }
}
