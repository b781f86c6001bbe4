pub mod models;
mod routes;
pub mod store;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use shelf_kernel::{InitCtx, Migration, Module};
use utoipa::OpenApi;

use crate::service::RecordService;
use models::{NewReview, Review, ReviewCreated, ReviewList, ReviewPatch};
use routes::ReviewsState;
use store::ReviewStore;

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::create_review,
        routes::list_book_reviews,
        routes::get_review,
        routes::update_review,
        routes::delete_review,
        routes::delete_reviews
    ),
    components(schemas(Review, NewReview, ReviewPatch, ReviewCreated, ReviewList)),
    tags((name = "reviews", description = "Ratings and comments on books"))
)]
struct ReviewsDoc;

/// Reviews resource. Reviews reference users and books by id only.
pub struct ReviewsModule {
    state: ReviewsState,
}

impl ReviewsModule {
    pub fn new<S>(store: Arc<S>) -> Self
    where
        S: ReviewStore + 'static,
    {
        Self {
            state: ReviewsState {
                service: RecordService::new(store.clone()),
                store,
            },
        }
    }
}

#[async_trait]
impl Module for ReviewsModule {
    fn name(&self) -> &'static str {
        "reviews"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "reviews module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.state.clone())
    }

    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(ReviewsDoc::openapi())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![
            Migration {
                id: "001_init",
                up: r#"
                    CREATE TABLE IF NOT EXISTS reviews (
                        id TEXT PRIMARY KEY,
                        user_id TEXT NOT NULL,
                        book_id TEXT NOT NULL,
                        rating DOUBLE PRECISION NOT NULL,
                        comment TEXT NOT NULL,
                        data JSONB NOT NULL,
                        created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                        updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                    );
                    "#,
            },
            Migration {
                id: "002_book_index",
                up: "CREATE INDEX IF NOT EXISTS reviews_book_id_idx ON reviews (book_id);",
            },
        ]
    }
}

/// Create a new instance of the reviews module
pub fn create_module<S>(store: Arc<S>) -> Arc<dyn Module>
where
    S: ReviewStore + 'static,
{
    Arc::new(ReviewsModule::new(store))
}
