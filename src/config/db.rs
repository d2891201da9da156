// src/config/db.rs
// DOCUMENTATION: Database connection pool initialization
// PURPOSE: Setup PostgreSQL connections and apply the schema

use crate::config::Config;
use sqlx::postgres::{PgPool, PgPoolOptions};
use std::time::Duration;

/// Initialize PostgreSQL connection pool
/// DOCUMENTATION: Each request borrows a connection and hands it back when
/// its statements finish, on success and on error alike
pub async fn init_db_pool(config: &Config) -> Result<PgPool, sqlx::Error> {
    log::info!("Initializing database pool");

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections)
        .acquire_timeout(Duration::from_secs(config.db_connection_timeout))
        // Idle connections are closed after 5 minutes
        .idle_timeout(Duration::from_secs(300))
        .connect(&config.database_url)
        .await?;

    // Verify connection works
    sqlx::query("SELECT 1").execute(&pool).await?;

    if config.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        log::info!("Database migrations applied");
    }

    log::info!("Database pool initialized successfully");
    Ok(pool)
}
