use crate::models::user::{NewUser, User, UserPatch};
use async_trait::async_trait;
use sqlx::{Sqlite, SqliteConnection, SqlitePool, Transaction};

#[derive(Debug, thiserror::Error)]
pub enum RepositoryError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("User not found")]
    NotFound,
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;

const USER_COLUMNS: &str = "id, username, document, phone_number, email, password, state";

/// Persistence gateway for users.
///
/// Every method is one unit of work on its own session: writes run inside a
/// single transaction that is committed on success and rolled back otherwise.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn insert(&self, user: &NewUser) -> RepositoryResult<User>;
    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>>;
    /// First user (lowest id) whose document matches.
    async fn find_by_document(&self, document: &str) -> RepositoryResult<Option<User>>;
    async fn update_by_document(
        &self,
        document: &str,
        patch: &UserPatch,
    ) -> RepositoryResult<User>;
    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()>;
    async fn list_all(&self) -> RepositoryResult<Vec<User>>;
    async fn ping(&self) -> RepositoryResult<()>;
}

pub struct SqliteUserRepository {
    pool: SqlitePool,
}

impl SqliteUserRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    async fn select_by_id(conn: &mut SqliteConnection, id: i64) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    async fn select_by_document(
        conn: &mut SqliteConnection,
        document: &str,
    ) -> RepositoryResult<Option<User>> {
        let user = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users WHERE document = ? ORDER BY id ASC LIMIT 1"
        ))
        .bind(document)
        .fetch_optional(&mut *conn)
        .await?;

        Ok(user)
    }

    async fn insert_row(conn: &mut SqliteConnection, user: &NewUser) -> RepositoryResult<User> {
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
        .execute(&mut *conn)
        .await?;

        let id = result.last_insert_rowid();
        Self::select_by_id(conn, id)
            .await?
            .ok_or(RepositoryError::NotFound)
    }

    async fn patch_row(
        conn: &mut SqliteConnection,
        document: &str,
        patch: &UserPatch,
    ) -> RepositoryResult<User> {
        let mut user = Self::select_by_document(conn, document)
            .await?
            .ok_or(RepositoryError::NotFound)?;

        if !patch.apply_to(&mut user) {
            return Ok(user);
        }

        sqlx::query(
            r#"
            UPDATE users
            SET username = ?, phone_number = ?, email = ?, password = ?, state = ?
            WHERE id = ?
            "#,
        )
        .bind(&user.username)
        .bind(&user.phone_number)
        .bind(&user.email)
        .bind(&user.password)
        .bind(&user.state)
        .bind(user.id)
        .execute(&mut *conn)
        .await?;

        Ok(user)
    }

    async fn delete_row(conn: &mut SqliteConnection, id: i64) -> RepositoryResult<()> {
        if Self::select_by_id(conn, id).await?.is_none() {
            return Err(RepositoryError::NotFound);
        }

        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&mut *conn)
            .await?;

        if result.rows_affected() == 0 {
            return Err(RepositoryError::NotFound);
        }

        Ok(())
    }
}

/// Commits on success, rolls back on failure.
///
/// A failed commit leaves the transaction open; dropping it rolls back.
async fn finish<T>(
    tx: Transaction<'_, Sqlite>,
    outcome: RepositoryResult<T>,
) -> RepositoryResult<T> {
    match outcome {
        Ok(value) => {
            tx.commit().await?;
            Ok(value)
        }
        Err(e) => {
            if let Err(rollback_err) = tx.rollback().await {
                tracing::warn!("Rollback failed: {}", rollback_err);
            }
            Err(e)
        }
    }
}

#[async_trait]
impl UserRepository for SqliteUserRepository {
    async fn insert(&self, user: &NewUser) -> RepositoryResult<User> {
        let mut tx = self.pool.begin().await?;
        let outcome = Self::insert_row(&mut tx, user).await;
        finish(tx, outcome).await
    }

    async fn find_by_id(&self, id: i64) -> RepositoryResult<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        Self::select_by_id(&mut conn, id).await
    }

    async fn find_by_document(&self, document: &str) -> RepositoryResult<Option<User>> {
        let mut conn = self.pool.acquire().await?;
        Self::select_by_document(&mut conn, document).await
    }

    async fn update_by_document(
        &self,
        document: &str,
        patch: &UserPatch,
    ) -> RepositoryResult<User> {
        let mut tx = self.pool.begin().await?;
        let outcome = Self::patch_row(&mut tx, document, patch).await;
        finish(tx, outcome).await
    }

    async fn delete_by_id(&self, id: i64) -> RepositoryResult<()> {
        let mut tx = self.pool.begin().await?;
        let outcome = Self::delete_row(&mut tx, id).await;
        finish(tx, outcome).await
    }

    async fn list_all(&self) -> RepositoryResult<Vec<User>> {
        let users = sqlx::query_as::<_, User>(&format!(
            "SELECT {USER_COLUMNS} FROM users ORDER BY id ASC"
        ))
        .fetch_all(&self.pool)
        .await?;

        Ok(users)
    }

    async fn ping(&self) -> RepositoryResult<()> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
