//! PostgreSQL pool bootstrap.

use anyhow::Context;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tracing::info;

use vigil_core::config::PostgresConfig;

/// Create the connection pool and apply migrations.
///
/// Unlike optional subsystems, this store holds the rule set — a connection
/// or migration failure here is a fatal startup error.
pub async fn init_pg_pool(config: &PostgresConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.connection_string())
        .await
        .with_context(|| format!("failed to connect to PostgreSQL at {}", config.host))?;

    info!("PostgreSQL connected: {}", config.host);

    sqlx::migrate!("../../migrations")
        .run(&pool)
        .await
        .context("failed to apply database migrations")?;

    info!("database migrations applied");
    Ok(pool)
}
