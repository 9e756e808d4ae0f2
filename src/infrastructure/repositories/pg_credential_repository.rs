use super::credential_repository::{CredentialStore, USAGE_OUT_OF_RANGE};
use crate::domain::credential::Credential;
use crate::error::{AppError, AppResult};
use crate::infrastructure::db::{check_connection, DbPool};
use async_trait::async_trait;
use chrono::Utc;
use std::sync::Arc;
use uuid::Uuid;

const COLUMNS: &str = "id, secret, usage_count, quota_limit, active, last_used_at, created_at";

// SQLSTATE numeric_value_out_of_range
const NUMERIC_VALUE_OUT_OF_RANGE: &str = "22003";

fn is_out_of_range(err: &sqlx::Error) -> bool {
    matches!(
        err,
        sqlx::Error::Database(db) if db.code().as_deref() == Some(NUMERIC_VALUE_OUT_OF_RANGE)
    )
}

/// Postgres-backed key pool (`api_keys` table)
pub struct PgCredentialRepository {
    pool: Arc<DbPool>,
}

impl PgCredentialRepository {
    pub fn new(pool: Arc<DbPool>) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl CredentialStore for PgCredentialRepository {
    async fn find_least_used_eligible(&self) -> AppResult<Option<Credential>> {
        let pool = self.pool.as_ref();
        let credential = sqlx::query_as::<_, Credential>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM api_keys
            WHERE active = TRUE AND usage_count < quota_limit
            ORDER BY usage_count ASC, created_at ASC, id ASC
            LIMIT 1
            "#
        ))
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }

    async fn find_any_active(&self) -> AppResult<Option<Credential>> {
        let pool = self.pool.as_ref();
        let credential = sqlx::query_as::<_, Credential>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM api_keys
            WHERE active = TRUE
            ORDER BY created_at ASC, id ASC
            LIMIT 1
            "#
        ))
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }

    async fn increment_usage(&self, id: Uuid, amount: i64) -> AppResult<Option<Credential>> {
        let pool = self.pool.as_ref();
        let now = Utc::now();

        // Single statement: the delta is applied by the database, not read-modify-write.
        let credential = sqlx::query_as::<_, Credential>(&format!(
            r#"
            UPDATE api_keys
            SET usage_count = usage_count + $2,
                last_used_at = $3
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(amount)
        .bind(now)
        .fetch_optional(pool)
        .await
        .map_err(|e| {
            if is_out_of_range(&e) {
                AppError::BadRequest(USAGE_OUT_OF_RANGE.to_string())
            } else {
                AppError::from(e)
            }
        })?;

        Ok(credential)
    }

    async fn find_all(&self) -> AppResult<Vec<Credential>> {
        let pool = self.pool.as_ref();
        let credentials = sqlx::query_as::<_, Credential>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM api_keys
            ORDER BY last_used_at DESC NULLS LAST, created_at DESC, id ASC
            "#
        ))
        .fetch_all(pool)
        .await?;

        Ok(credentials)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>> {
        let pool = self.pool.as_ref();
        let credential = sqlx::query_as::<_, Credential>(&format!(
            r#"
            SELECT {COLUMNS}
            FROM api_keys
            WHERE id = $1
            "#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }

    async fn create(&self, secret: &str, quota_limit: i64) -> AppResult<Credential> {
        let pool = self.pool.as_ref();
        let credential = sqlx::query_as::<_, Credential>(&format!(
            r#"
            INSERT INTO api_keys (id, secret, usage_count, quota_limit, active, last_used_at, created_at)
            VALUES ($1, $2, 0, $3, TRUE, NULL, $4)
            RETURNING {COLUMNS}
            "#
        ))
        .bind(Uuid::new_v4())
        .bind(secret)
        .bind(quota_limit)
        .bind(Utc::now())
        .fetch_one(pool)
        .await?;

        Ok(credential)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        let pool = self.pool.as_ref();
        let result = sqlx::query("DELETE FROM api_keys WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn update_settings(
        &self,
        id: Uuid,
        active: Option<bool>,
        quota_limit: Option<i64>,
    ) -> AppResult<Option<Credential>> {
        let pool = self.pool.as_ref();
        let credential = sqlx::query_as::<_, Credential>(&format!(
            r#"
            UPDATE api_keys
            SET active = COALESCE($2, active),
                quota_limit = COALESCE($3, quota_limit)
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .bind(active)
        .bind(quota_limit)
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }

    async fn reset_usage(&self, id: Uuid) -> AppResult<Option<Credential>> {
        let pool = self.pool.as_ref();
        let credential = sqlx::query_as::<_, Credential>(&format!(
            r#"
            UPDATE api_keys
            SET usage_count = 0
            WHERE id = $1
            RETURNING {COLUMNS}
            "#
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(credential)
    }

    async fn ping(&self) -> AppResult<()> {
        check_connection(&self.pool).await?;
        Ok(())
    }
}
