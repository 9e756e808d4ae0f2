use super::error::CredentialServiceError;
use super::model::Credential;
use super::{CreateKeyRequest, UpdateKeyRequest};
use crate::infrastructure::repositories::CredentialStore;
use std::sync::Arc;
use uuid::Uuid;

const KEY_PREFIX: &str = "sk_";

/// Operator actions on the key pool: provisioning, removal, toggling and resets.
pub struct CredentialAdminService {
    store: Arc<dyn CredentialStore>,
    default_quota_limit: i64,
}

impl CredentialAdminService {
    pub fn new(store: Arc<dyn CredentialStore>, default_quota_limit: i64) -> Self {
        Self {
            store,
            default_quota_limit,
        }
    }

    /// Provision a new key with zero usage
    pub async fn add_key(
        &self,
        request: CreateKeyRequest,
    ) -> Result<Credential, CredentialServiceError> {
        let secret = request.key.trim();
        if secret.is_empty() {
            return Err(CredentialServiceError::Invalid(
                "API key is required".to_string(),
            ));
        }
        if !secret.starts_with(KEY_PREFIX) {
            return Err(CredentialServiceError::Invalid(format!(
                "Invalid API key format. Must start with \"{}\"",
                KEY_PREFIX
            )));
        }

        let quota_limit = request.quota_limit.unwrap_or(self.default_quota_limit);
        Self::validate_quota(quota_limit)?;

        let credential = self
            .store
            .create(secret, quota_limit)
            .await?;

        tracing::info!(
            key_id = %credential.id,
            limit = credential.quota_limit,
            "API key added"
        );

        Ok(credential)
    }

    pub async fn delete_key(&self, key_id: Uuid) -> Result<(), CredentialServiceError> {
        let deleted = self
            .store
            .delete(key_id)
            .await?;

        if !deleted {
            return Err(CredentialServiceError::NotFound);
        }

        tracing::info!(key_id = %key_id, "API key deleted");
        Ok(())
    }

    /// Toggle `active` and/or change the quota ceiling. Usage is left as is.
    pub async fn update_key(
        &self,
        key_id: Uuid,
        request: UpdateKeyRequest,
    ) -> Result<Credential, CredentialServiceError> {
        if request.active.is_none() && request.quota_limit.is_none() {
            return Err(CredentialServiceError::Invalid(
                "Nothing to update: provide active or quotaLimit".to_string(),
            ));
        }
        if let Some(quota_limit) = request.quota_limit {
            Self::validate_quota(quota_limit)?;
        }

        let credential = self
            .store
            .update_settings(key_id, request.active, request.quota_limit)
            .await?
            .ok_or(CredentialServiceError::NotFound)?;

        tracing::info!(
            key_id = %key_id,
            active = credential.active,
            limit = credential.quota_limit,
            "API key updated"
        );

        Ok(credential)
    }

    /// Zero the usage counter, e.g. when the provider's quota window rolls over
    pub async fn reset_usage(&self, key_id: Uuid) -> Result<Credential, CredentialServiceError> {
        let credential = self
            .store
            .reset_usage(key_id)
            .await?
            .ok_or(CredentialServiceError::NotFound)?;

        tracing::info!(key_id = %key_id, "API key usage reset");
        Ok(credential)
    }

    fn validate_quota(quota_limit: i64) -> Result<(), CredentialServiceError> {
        if quota_limit <= 0 {
            return Err(CredentialServiceError::Invalid(
                "quotaLimit must be a positive integer".to_string(),
            ));
        }
        Ok(())
    }
}
