/// Embedded schema migrations
///
/// Files live in `callcenter-shared/migrations/` as reversible
/// `{timestamp}_{name}.up.sql` / `.down.sql` pairs and are compiled into the
/// binary by `sqlx::migrate!`.

use sqlx::postgres::PgPool;
use tracing::{debug, info, warn};

/// Applies every pending migration
///
/// Migrations run against the first schema on the connection's
/// `search_path`, including sqlx's own `_sqlx_migrations` bookkeeping table.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    match sqlx::migrate!("./migrations").run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}

/// Creates `schema` if it doesn't exist yet
///
/// The name is quoted as an identifier; it cannot be bound as a parameter.
pub async fn ensure_schema(pool: &PgPool, schema: &str) -> Result<(), sqlx::Error> {
    let quoted = format!("\"{}\"", schema.replace('"', "\"\""));
    debug!(schema, "Ensuring schema exists");

    sqlx::query(&format!("CREATE SCHEMA IF NOT EXISTS {}", quoted))
        .execute(pool)
        .await?;

    Ok(())
}

/// Drops `schema` and everything in it
pub async fn drop_schema(pool: &PgPool, schema: &str) -> Result<(), sqlx::Error> {
    let quoted = format!("\"{}\"", schema.replace('"', "\"\""));
    warn!(schema, "Dropping schema");

    sqlx::query(&format!("DROP SCHEMA IF EXISTS {} CASCADE", quoted))
        .execute(pool)
        .await?;

    Ok(())
}
