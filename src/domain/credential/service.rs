use super::error::CredentialServiceError;
use super::model::Credential;
use crate::infrastructure::repositories::CredentialStore;
use async_trait::async_trait;
use std::sync::Arc;
use uuid::Uuid;

/// Picks provider keys for outgoing requests and attributes consumption to them.
///
/// The quota is a soft ceiling: it gates selection only. Two callers may select
/// the same key before either records usage, and a recording may push a key past
/// its limit, after which it is no longer selected.
pub struct KeyQuotaManager {
    store: Arc<dyn CredentialStore>,
}

impl KeyQuotaManager {
    pub fn new(store: Arc<dyn CredentialStore>) -> Self {
        Self { store }
    }
}

#[async_trait]
pub trait KeyQuotaManagerApi: Send + Sync {
    /// Least-loaded key that is active and under its quota.
    ///
    /// Fails with `NoCapacity` when no key qualifies. Reserves nothing.
    async fn select(&self) -> Result<Credential, CredentialServiceError>;

    /// Add `amount` units to a key's usage and stamp its last use.
    ///
    /// Call once per successful provider request, never before it and never
    /// on retry: this is not idempotent.
    async fn record(&self, key_id: Uuid, amount: i64) -> Result<Credential, CredentialServiceError>;

    /// Point-in-time view of the whole pool, inactive and exhausted keys included.
    async fn list_stats(&self) -> Result<Vec<Credential>, CredentialServiceError>;

    /// Any active key, regardless of remaining quota.
    async fn any_active(&self) -> Result<Credential, CredentialServiceError>;
}

#[async_trait]
impl KeyQuotaManagerApi for KeyQuotaManager {
    async fn select(&self) -> Result<Credential, CredentialServiceError> {
        let credential = self.store.find_least_used_eligible().await?;

        match credential {
            Some(credential) => {
                tracing::info!(
                    key_id = %credential.id,
                    usage = credential.usage_count,
                    limit = credential.quota_limit,
                    "Selected API key"
                );
                Ok(credential)
            }
            None => {
                tracing::warn!("No API key with remaining quota");
                Err(CredentialServiceError::NoCapacity)
            }
        }
    }

    async fn record(&self, key_id: Uuid, amount: i64) -> Result<Credential, CredentialServiceError> {
        if amount <= 0 {
            return Err(CredentialServiceError::Invalid(format!(
                "usage amount must be positive, got {}",
                amount
            )));
        }

        let updated = self
            .store
            .increment_usage(key_id, amount)
            .await?
            .ok_or(CredentialServiceError::NotFound)?;

        tracing::info!(
            key_id = %key_id,
            amount = amount,
            usage = updated.usage_count,
            limit = updated.quota_limit,
            "Recorded API key usage"
        );

        if !updated.is_eligible() && updated.active {
            tracing::warn!(
                key_id = %key_id,
                usage = updated.usage_count,
                limit = updated.quota_limit,
                "API key reached its quota"
            );
        }

        Ok(updated)
    }

    async fn list_stats(&self) -> Result<Vec<Credential>, CredentialServiceError> {
        Ok(self.store.find_all().await?)
    }

    async fn any_active(&self) -> Result<Credential, CredentialServiceError> {
        self.store
            .find_any_active()
            .await?
            .ok_or(CredentialServiceError::NoCapacity)
    }
}
