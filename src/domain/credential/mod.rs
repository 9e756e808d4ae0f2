pub mod admin;
pub mod error;
pub mod model;
pub mod service;

pub use admin::CredentialAdminService;
pub use error::CredentialServiceError;
pub use model::{mask_secret, Credential};
pub use service::{KeyQuotaManager, KeyQuotaManagerApi};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// One entry of GET /api/usage-stats
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct KeyStats {
    pub id: Uuid,
    pub usage: i64,
    pub limit: i64,
    pub active: bool,
    pub last_used: Option<DateTime<Utc>>,
    pub masked_key: String,
}

impl From<Credential> for KeyStats {
    fn from(credential: Credential) -> Self {
        Self {
            masked_key: credential.masked_secret(),
            id: credential.id,
            usage: credential.usage_count,
            limit: credential.quota_limit,
            active: credential.active,
            last_used: credential.last_used_at,
        }
    }
}

/// Request for POST /api/keys
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateKeyRequest {
    pub key: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_limit: Option<i64>,
}

/// Request for PATCH /api/keys/{keyId}
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateKeyRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub quota_limit: Option<i64>,
}
