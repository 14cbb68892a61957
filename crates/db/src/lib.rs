//! Durable job log on PostgreSQL.
//!
//! [`PgJobLog`] is the production [`JobLog`](fibber_core::ports::JobLog);
//! [`MemoryJobLog`] serves the in-process development mode and tests.

use sqlx::postgres::{PgConnectOptions, PgPoolOptions};

use fibber_core::config::PostgresConfig;

pub mod memory;
pub mod models;
pub mod pg_log;
pub mod repositories;

pub use memory::MemoryJobLog;
pub use pg_log::PgJobLog;

pub type DbPool = sqlx::PgPool;

/// All database primary keys are PostgreSQL BIGSERIAL.
pub type DbId = i64;

/// Translate loaded settings into sqlx connect options.
pub fn connect_options(config: &PostgresConfig) -> PgConnectOptions {
    PgConnectOptions::new()
        .host(&config.host)
        .port(config.port)
        .username(&config.user)
        .password(&config.password)
        .database(&config.database)
}

/// Create a connection pool for the configured database.
pub async fn create_pool(config: &PostgresConfig) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(20)
        .connect_with(connect_options(config))
        .await
}

/// Round-trip a trivial query to confirm the database answers.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply the migrations under `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}
