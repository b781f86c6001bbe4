pub mod models;
mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use shelf_db::RecordStore;
use shelf_kernel::{InitCtx, Migration, Module};
use utoipa::OpenApi;

use crate::service::RecordService;
use models::{Book, BookCreated, BookList, BookPatch, NewBook};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::create_book,
        routes::get_book,
        routes::list_books,
        routes::update_book,
        routes::delete_book,
        routes::delete_books
    ),
    components(schemas(Book, NewBook, BookPatch, BookCreated, BookList)),
    tags((name = "books", description = "Book catalogue"))
)]
struct BooksDoc;

/// Books resource: catalogue entries reviews refer to.
pub struct BooksModule {
    service: RecordService<Book>,
}

impl BooksModule {
    pub fn new(store: Arc<dyn RecordStore<Book>>) -> Self {
        Self {
            service: RecordService::new(store),
        }
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(BooksDoc::openapi())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS books (
                    id TEXT PRIMARY KEY,
                    title TEXT NOT NULL,
                    author TEXT NOT NULL,
                    isbn TEXT,
                    data JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );
                "#,
        }]
    }
}

/// Create a new instance of the books module
pub fn create_module(store: Arc<dyn RecordStore<Book>>) -> Arc<dyn Module> {
    Arc::new(BooksModule::new(store))
}
