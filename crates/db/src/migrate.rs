//! Applies module migrations once, in order, recording them in a ledger table.

use std::collections::HashSet;

use shelf_kernel::Migration;
use sqlx::PgPool;

use crate::store::DbError;

const LEDGER_DDL: &str = r#"
    CREATE TABLE IF NOT EXISTS shelf_migrations (
        module TEXT NOT NULL,
        id TEXT NOT NULL,
        applied_at TIMESTAMPTZ NOT NULL DEFAULT NOW(),
        PRIMARY KEY (module, id)
    )
"#;

/// Apply every migration not yet recorded in `shelf_migrations`.
///
/// Each migration runs in its own transaction together with its ledger row,
/// so a failing migration leaves no partial schema behind. Returns how many
/// migrations were applied.
pub async fn migrate(pool: &PgPool, migrations: &[(String, Migration)]) -> Result<usize, DbError> {
    sqlx::query(LEDGER_DDL).execute(pool).await?;

    let applied: HashSet<(String, String)> =
        sqlx::query_as::<_, (String, String)>("SELECT module, id FROM shelf_migrations")
            .fetch_all(pool)
            .await?
            .into_iter()
            .collect();

    let todo = pending(migrations, &applied);
    if todo.is_empty() {
        tracing::info!("database schema is up to date");
        return Ok(0);
    }

    for (module, migration) in &todo {
        tracing::info!(module = %module, migration = migration.id, "applying migration");

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up).execute(&mut *tx).await?;
        sqlx::query("INSERT INTO shelf_migrations (module, id) VALUES ($1, $2)")
            .bind(module.as_str())
            .bind(migration.id)
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;
    }

    tracing::info!(count = todo.len(), "migrations applied");
    Ok(todo.len())
}

fn pending<'a>(
    migrations: &'a [(String, Migration)],
    applied: &HashSet<(String, String)>,
) -> Vec<&'a (String, Migration)> {
    migrations
        .iter()
        .filter(|(module, migration)| !applied.contains(&(module.clone(), migration.id.to_string())))
        .collect()
}
