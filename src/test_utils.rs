pub mod test_helpers {
    use crate::models::user::NewUser;
    use sqlx::{sqlite::SqlitePoolOptions, SqlitePool};
    use tempfile::NamedTempFile;

    /// Create a new in-memory SQLite database for testing
    pub async fn create_test_db() -> Result<SqlitePool, sqlx::Error> {
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect(":memory:")
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok(pool)
    }

    /// Create a temporary file-based SQLite database for testing
    /// Useful when several connections must see the same data
    pub async fn create_test_db_file() -> Result<(SqlitePool, NamedTempFile), sqlx::Error> {
        let temp_file = NamedTempFile::new().map_err(sqlx::Error::Io)?;
        let db_path = temp_file
            .path()
            .to_str()
            .ok_or_else(|| sqlx::Error::Configuration("Invalid database path".into()))?;
        let database_url = format!("sqlite://{}", db_path);

        let pool = SqlitePoolOptions::new()
            .max_connections(4)
            .connect(&database_url)
            .await?;

        // Run migrations
        sqlx::migrate!("./migrations").run(&pool).await?;

        Ok((pool, temp_file))
    }

    /// Build a complete user payload; `suffix` keeps rows distinguishable
    pub fn sample_user(suffix: &str) -> NewUser {
        NewUser {
            username: format!("user{}", suffix),
            document: format!("doc{}", suffix),
            phone_number: format!("555-{}", suffix),
            email: format!("user{}@example.com", suffix),
            password: "password".to_string(),
            state: "CA".to_string(),
        }
    }

    /// Insert a user row directly, bypassing the service
    pub async fn insert_test_user(pool: &SqlitePool, user: &NewUser) -> Result<i64, sqlx::Error> {
        let result = sqlx::query(
            r#"
            INSERT INTO users (username, document, phone_number, email, password, state)
            VALUES (?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(&user.username)
        .bind(&user.document)
        .bind(&user.phone_number)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.state)
        .execute(pool)
        .await?;

        Ok(result.last_insert_rowid())
    }
}

// Note: This is test-only code. Panic on error is acceptable in tests.
#[cfg(test)]
pub async fn create_test_pool() -> sqlx::SqlitePool {
    match test_helpers::create_test_db().await {
        Ok(pool) => pool,
        Err(e) => panic!("Failed to create test pool: {}", e),
    }
}
