//! PostgreSQL pool setup and schema migrations.
//!
//! Every connection pins its session timezone to UTC: quota window
//! boundaries are computed in UTC on the Rust side and compared against
//! `timestamptz` columns, so the session setting must never drift.

use sqlx::postgres::{PgPool, PgPoolOptions};

use crate::config::DatabaseConfig;

pub type DbPool = PgPool;

/// Builds the connection pool from config, applying the UTC session setup
/// to each new connection.
pub async fn create_pool(config: &DatabaseConfig) -> Result<DbPool, sqlx::Error> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .min_connections(config.min_connections)
        .acquire_timeout(config.acquire_timeout)
        .idle_timeout(Some(config.idle_timeout))
        .max_lifetime(Some(config.max_lifetime))
        .after_connect(|conn, _meta| {
            Box::pin(async move {
                sqlx::query("SET timezone = 'UTC'").execute(conn).await?;
                Ok(())
            })
        })
        .connect(&config.url)
        .await?;

    log::info!(
        "Database pool ready ({}..{} connections)",
        config.min_connections,
        config.max_connections
    );

    Ok(pool)
}

/// Applies the migrations embedded from `./migrations` at compile time
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await?;

    log::info!("Database migrations up to date");
    Ok(())
}

/// Cheap connectivity probe used by the readiness endpoint
pub async fn health_check(pool: &DbPool) -> bool {
    sqlx::query("SELECT 1").execute(pool).await.is_ok()
}
