use crate::domain::credential::Credential;
use crate::error::AppResult;
use async_trait::async_trait;
use uuid::Uuid;

/// Returned as `AppError::BadRequest` when an increment would overflow the counter.
pub const USAGE_OUT_OF_RANGE: &str = "usage counter out of range";

/// Storage for the provider key pool.
///
/// The pool is shared mutable state owned by the store. Callers never cache it:
/// every selection reads the current rows.
///
/// Implementations must apply `increment_usage` as a single atomic delta so that
/// concurrent increments against the same key never lose an update.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Active key with `usage_count < quota_limit` and the lowest usage.
    /// Ties are broken by `created_at`, then `id`.
    async fn find_least_used_eligible(&self) -> AppResult<Option<Credential>>;

    /// Any active key, ignoring quota.
    async fn find_any_active(&self) -> AppResult<Option<Credential>>;

    /// Add `amount` to the usage counter and stamp `last_used_at`.
    /// Returns `None` when no key has this id. An increment past `i64::MAX`
    /// fails with `USAGE_OUT_OF_RANGE` and leaves the key untouched.
    async fn increment_usage(&self, id: Uuid, amount: i64) -> AppResult<Option<Credential>>;

    /// Every key, ordered by most recently used (never used last).
    async fn find_all(&self) -> AppResult<Vec<Credential>>;

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>>;

    async fn create(&self, secret: &str, quota_limit: i64) -> AppResult<Credential>;

    /// Returns `false` when no key has this id.
    async fn delete(&self, id: Uuid) -> AppResult<bool>;

    async fn update_settings(
        &self,
        id: Uuid,
        active: Option<bool>,
        quota_limit: Option<i64>,
    ) -> AppResult<Option<Credential>>;

    async fn reset_usage(&self, id: Uuid) -> AppResult<Option<Credential>>;

    /// Cheap round-trip used by the readiness probe.
    async fn ping(&self) -> AppResult<()>;
}
