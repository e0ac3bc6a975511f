use crate::config::AppConfig;
use sqlx::{migrate::MigrateError, sqlite::SqlitePoolOptions, SqlitePool};

pub async fn create_pool(config: &AppConfig) -> Result<SqlitePool, sqlx::Error> {
    // Ensure the data directory exists
    let path = config
        .database_url
        .trim_start_matches("sqlite://")
        .split('?')
        .next()
        .unwrap_or_default();
    if let Some(parent) = std::path::Path::new(path).parent() {
        std::fs::create_dir_all(parent).ok();
    }

    let pool = SqlitePoolOptions::new()
        .max_connections(config.max_connections)
        .connect(&config.database_url)
        .await?;

    Ok(pool)
}

pub async fn run_migrations(pool: &SqlitePool) -> Result<(), MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
