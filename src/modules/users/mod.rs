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
use models::{NewUser, User, UserCreated, UserList, UserPatch};

#[derive(OpenApi)]
#[openapi(
    paths(
        routes::create_user,
        routes::get_user,
        routes::list_users,
        routes::update_user,
        routes::delete_user,
        routes::delete_users
    ),
    components(schemas(User, NewUser, UserPatch, UserCreated, UserList)),
    tags((name = "users", description = "Registered readers"))
)]
struct UsersDoc;

/// Users resource
pub struct UsersModule {
    service: RecordService<User>,
}

impl UsersModule {
    pub fn new(store: Arc<dyn RecordStore<User>>) -> Self {
        Self {
            service: RecordService::new(store),
        }
    }
}

#[async_trait]
impl Module for UsersModule {
    fn name(&self) -> &'static str {
        "users"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            "users module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone())
    }

    fn openapi(&self) -> Option<utoipa::openapi::OpenApi> {
        Some(UsersDoc::openapi())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_init",
            up: r#"
                CREATE TABLE IF NOT EXISTS users (
                    id TEXT PRIMARY KEY,
                    username TEXT NOT NULL,
                    email TEXT NOT NULL,
                    data JSONB NOT NULL,
                    created_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
                    updated_at TIMESTAMPTZ NOT NULL DEFAULT NOW()
                );
                "#,
        }]
    }
}

/// Create a new instance of the users module
pub fn create_module(store: Arc<dyn RecordStore<User>>) -> Arc<dyn Module> {
    Arc::new(UsersModule::new(store))
}
