//! Process startup shared by the `shelf-api` binary and the `shelf` CLI.

use anyhow::Context;
use shelf_db::PgPool;
use shelf_kernel::{settings::Settings, InitCtx, ModuleRegistry};

use crate::modules;

/// Load settings and install the global subscriber.
pub fn prepare() -> anyhow::Result<Settings> {
    let settings = Settings::load().context("failed to load shelf settings")?;
    shelf_telemetry::init(&settings.telemetry).context("failed to initialize telemetry")?;

    tracing::info!(
        env = ?settings.environment,
        db = ?settings.database.redacted_url(),
        "shelf bootstrap starting"
    );
    Ok(settings)
}

/// Connect to PostgreSQL. Fails when no URL is configured or it is unreachable.
pub async fn connect(settings: &Settings) -> anyhow::Result<PgPool> {
    let url = settings.database_url()?;
    shelf_db::create_pool_with_options(url, settings.database.max_connections)
        .await
        .context("failed to connect to the database")
}

/// Registry of every resource module over `pool`.
pub fn registry(pool: &PgPool) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool);
    registry
}

/// Apply pending migrations of every module and return how many ran.
pub async fn migrate(settings: &Settings) -> anyhow::Result<usize> {
    let pool = connect(settings).await?;
    let registry = registry(&pool);
    apply_migrations(&pool, &registry).await
}

async fn apply_migrations(pool: &PgPool, registry: &ModuleRegistry) -> anyhow::Result<usize> {
    let applied = shelf_db::migrate(pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "migrations complete");
    Ok(applied)
}

/// Migrate, start every module and serve HTTP until a shutdown signal.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let pool = connect(&settings).await?;
    let registry = registry(&pool);
    apply_migrations(&pool, &registry).await?;

    let ctx = InitCtx {
        settings: &settings,
    };
    registry.init_all(&ctx).await?;
    registry.start_all(&ctx).await?;

    let served = shelf_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    pool.close().await;
    tracing::info!("shelf shut down");
    served
}

/// Entry point of the `shelf-api` binary.
pub async fn run() -> anyhow::Result<()> {
    let settings = prepare()?;
    serve(settings).await
}
