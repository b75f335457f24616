// User accounts in SQLite. Passwords are only ever stored as Argon2 hashes.

pub mod password;

use crate::models::{Capabilities, NewUser, User};
use sqlx::Row;
use sqlx::sqlite::{SqlitePool, SqliteRow};
use tracing::instrument;

#[derive(Debug, thiserror::Error)]
pub enum UserRepoError {
    #[error("username {0:?} is already taken")]
    UsernameTaken(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<sqlx::Error> for UserRepoError {
    fn from(e: sqlx::Error) -> Self {
        UserRepoError::Other(e.into())
    }
}

pub struct UserRepo {
    pool: SqlitePool,
}

impl UserRepo {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    #[instrument(skip(self, new_user), fields(repo = "users", operation = "create", username = %new_user.username))]
    pub async fn create(&self, new_user: &NewUser) -> Result<User, UserRepoError> {
        let password = new_user.password.clone();
        let password_hash = tokio::task::spawn_blocking(move || password::hash_password(&password))
            .await
            .map_err(|e| anyhow::anyhow!("password hash task join: {}", e))??;

        let caps = new_user.capabilities;
        let result = sqlx::query(
            "INSERT INTO users (username, password_hash, is_admin, can_add_devices, can_send_wol) VALUES ($1, $2, $3, $4, $5)",
        )
        .bind(&new_user.username)
        .bind(&password_hash)
        .bind(caps.is_admin)
        .bind(caps.can_add_devices)
        .bind(caps.can_send_wol)
        .execute(&self.pool)
        .await;

        let result = match result {
            Ok(r) => r,
            Err(sqlx::Error::Database(db_err)) if db_err.is_unique_violation() => {
                return Err(UserRepoError::UsernameTaken(new_user.username.clone()));
            }
            Err(e) => return Err(e.into()),
        };

        Ok(User {
            id: result.last_insert_rowid(),
            username: new_user.username.clone(),
            password_hash,
            capabilities: caps,
        })
    }

    /// `Some(user)` only when the username exists and the password verifies.
    #[instrument(skip(self, password), fields(repo = "users", operation = "verify_credentials"))]
    pub async fn verify_credentials(
        &self,
        username: &str,
        password: &str,
    ) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, is_admin, can_add_devices, can_send_wol FROM users WHERE username = $1",
        )
        .bind(username)
        .fetch_optional(&self.pool)
        .await?;
        let user = row.as_ref().map(Self::parse_user_row).transpose()?;

        // Unknown users still pay for one Argon2 verification.
        let password = password.to_string();
        let hash = user.as_ref().map(|u| u.password_hash.clone());
        let ok = tokio::task::spawn_blocking(move || {
            password::verify_password(
                &password,
                hash.as_deref().unwrap_or_else(|| password::dummy_hash()),
            )
        })
        .await
        .map_err(|e| anyhow::anyhow!("password verify task join: {}", e))?;
        Ok(user.filter(|_| ok))
    }

    #[instrument(skip(self), fields(repo = "users", operation = "get"))]
    pub async fn get(&self, id: i64) -> anyhow::Result<Option<User>> {
        let row = sqlx::query(
            "SELECT id, username, password_hash, is_admin, can_add_devices, can_send_wol FROM users WHERE id = $1",
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        row.as_ref().map(Self::parse_user_row).transpose()
    }

    #[instrument(skip(self), fields(repo = "users", operation = "list"))]
    pub async fn list(&self) -> anyhow::Result<Vec<User>> {
        let rows = sqlx::query(
            "SELECT id, username, password_hash, is_admin, can_add_devices, can_send_wol FROM users ORDER BY id ASC",
        )
        .fetch_all(&self.pool)
        .await?;
        rows.iter().map(Self::parse_user_row).collect()
    }

    pub async fn count(&self) -> anyhow::Result<i64> {
        let n: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(n)
    }

    fn parse_user_row(row: &SqliteRow) -> anyhow::Result<User> {
        Ok(User {
            id: row.try_get("id")?,
            username: row.try_get("username")?,
            password_hash: row.try_get("password_hash")?,
            capabilities: Capabilities {
                is_admin: row.try_get("is_admin")?,
                can_add_devices: row.try_get("can_add_devices")?,
                can_send_wol: row.try_get("can_send_wol")?,
            },
        })
    }
}
