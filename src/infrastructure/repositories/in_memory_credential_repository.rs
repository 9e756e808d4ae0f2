use super::credential_repository::{CredentialStore, USAGE_OUT_OF_RANGE};
use crate::domain::credential::Credential;
use crate::error::{AppError, AppResult};
use async_trait::async_trait;
use chrono::Utc;
use parking_lot::RwLock;
use std::cmp::Reverse;
use std::collections::HashMap;
use uuid::Uuid;

/// Process-local key pool.
///
/// Every mutation happens under the write lock, which makes `increment_usage`
/// atomic with respect to concurrent callers. Nothing survives a restart.
#[derive(Default)]
pub struct InMemoryCredentialRepository {
    keys: RwLock<HashMap<Uuid, Credential>>,
}

impl InMemoryCredentialRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed the pool with existing rows, keeping their ids and counters.
    pub fn with_credentials(credentials: impl IntoIterator<Item = Credential>) -> Self {
        let keys = credentials.into_iter().map(|c| (c.id, c)).collect();
        Self {
            keys: RwLock::new(keys),
        }
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialRepository {
    async fn find_least_used_eligible(&self) -> AppResult<Option<Credential>> {
        let keys = self.keys.read();
        Ok(keys
            .values()
            .filter(|c| c.is_eligible())
            .min_by_key(|c| (c.usage_count, c.created_at, c.id))
            .cloned())
    }

    async fn find_any_active(&self) -> AppResult<Option<Credential>> {
        let keys = self.keys.read();
        Ok(keys
            .values()
            .filter(|c| c.active)
            .min_by_key(|c| (c.created_at, c.id))
            .cloned())
    }

    async fn increment_usage(&self, id: Uuid, amount: i64) -> AppResult<Option<Credential>> {
        let mut keys = self.keys.write();
        let Some(c) = keys.get_mut(&id) else {
            return Ok(None);
        };

        c.usage_count = c
            .usage_count
            .checked_add(amount)
            .ok_or_else(|| AppError::BadRequest(USAGE_OUT_OF_RANGE.to_string()))?;
        c.last_used_at = Some(Utc::now());
        Ok(Some(c.clone()))
    }

    async fn find_all(&self) -> AppResult<Vec<Credential>> {
        let keys = self.keys.read();
        let mut all: Vec<Credential> = keys.values().cloned().collect();
        // `Some` sorts after `None`, so reversing puts the latest use first and never-used last.
        all.sort_by_key(|c| (Reverse(c.last_used_at), Reverse(c.created_at), c.id));
        Ok(all)
    }

    async fn find_by_id(&self, id: Uuid) -> AppResult<Option<Credential>> {
        Ok(self.keys.read().get(&id).cloned())
    }

    async fn create(&self, secret: &str, quota_limit: i64) -> AppResult<Credential> {
        let credential = Credential {
            id: Uuid::new_v4(),
            secret: secret.to_string(),
            usage_count: 0,
            quota_limit,
            active: true,
            last_used_at: None,
            created_at: Utc::now(),
        };
        self.keys.write().insert(credential.id, credential.clone());
        Ok(credential)
    }

    async fn delete(&self, id: Uuid) -> AppResult<bool> {
        Ok(self.keys.write().remove(&id).is_some())
    }

    async fn update_settings(
        &self,
        id: Uuid,
        active: Option<bool>,
        quota_limit: Option<i64>,
    ) -> AppResult<Option<Credential>> {
        let mut keys = self.keys.write();
        Ok(keys.get_mut(&id).map(|c| {
            if let Some(active) = active {
                c.active = active;
            }
            if let Some(quota_limit) = quota_limit {
                c.quota_limit = quota_limit;
            }
            c.clone()
        }))
    }

    async fn reset_usage(&self, id: Uuid) -> AppResult<Option<Credential>> {
        let mut keys = self.keys.write();
        Ok(keys.get_mut(&id).map(|c| {
            c.usage_count = 0;
            c.clone()
        }))
    }

    async fn ping(&self) -> AppResult<()> {
        Ok(())
    }
}
