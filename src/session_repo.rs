// Server-side login sessions. The cookie only carries an opaque token; the
// user id, expiry and the pending flash notice live here.

use sqlx::Row;
use sqlx::sqlite::SqlitePool;
use tracing::instrument;

pub struct SessionRepo {
    pool: SqlitePool,
    ttl_secs: i64,
}

fn now_secs() -> i64 {
    chrono::Utc::now().timestamp()
}

impl SessionRepo {
    pub fn new(pool: SqlitePool, ttl_secs: u64) -> Self {
        let ttl_secs = i64::try_from(ttl_secs).unwrap_or(i64::MAX);
        Self { pool, ttl_secs }
    }

    /// Start a session for `user_id` and return its token.
    #[instrument(skip(self), fields(repo = "sessions", operation = "create"))]
    pub async fn create(&self, user_id: i64) -> anyhow::Result<String> {
        let token = uuid::Uuid::new_v4().simple().to_string();
        let expires_at = now_secs().saturating_add(self.ttl_secs);
        sqlx::query("INSERT INTO sessions (token, user_id, expires_at) VALUES ($1, $2, $3)")
            .bind(&token)
            .bind(user_id)
            .bind(expires_at)
            .execute(&self.pool)
            .await?;
        Ok(token)
    }

    /// User id of an unexpired session.
    pub async fn user_id_for(&self, token: &str) -> anyhow::Result<Option<i64>> {
        let row = sqlx::query("SELECT user_id FROM sessions WHERE token = $1 AND expires_at > $2")
            .bind(token)
            .bind(now_secs())
            .fetch_optional(&self.pool)
            .await?;
        let Some(row) = row else {
            return Ok(None);
        };
        Ok(Some(row.try_get("user_id")?))
    }

    #[instrument(skip(self, token), fields(repo = "sessions", operation = "delete"))]
    pub async fn delete(&self, token: &str) -> anyhow::Result<()> {
        sqlx::query("DELETE FROM sessions WHERE token = $1")
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Queue a one-shot notice for the next page render of this session.
    pub async fn set_flash(&self, token: &str, message: &str) -> anyhow::Result<()> {
        sqlx::query("UPDATE sessions SET flash = $1 WHERE token = $2")
            .bind(message)
            .bind(token)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Read and clear the pending notice.
    pub async fn take_flash(&self, token: &str) -> anyhow::Result<Option<String>> {
        let mut tx = self.pool.begin().await?;
        let flash: Option<String> =
            sqlx::query_scalar::<_, Option<String>>("SELECT flash FROM sessions WHERE token = $1")
                .bind(token)
                .fetch_optional(&mut *tx)
                .await?
                .flatten();
        if flash.is_some() {
            sqlx::query("UPDATE sessions SET flash = NULL WHERE token = $1")
                .bind(token)
                .execute(&mut *tx)
                .await?;
        }
        tx.commit().await?;
        Ok(flash)
    }

    /// Remove expired sessions. Returns the number removed.
    #[instrument(skip(self), fields(repo = "sessions", operation = "purge_expired"))]
    pub async fn purge_expired(&self) -> anyhow::Result<u64> {
        let result = sqlx::query("DELETE FROM sessions WHERE expires_at <= $1")
            .bind(now_secs())
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }
}
