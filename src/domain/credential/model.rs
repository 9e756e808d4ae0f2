use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// A provisioned provider API key with its usage counter and quota ceiling.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Credential {
    pub id: Uuid,
    #[serde(skip_serializing)]
    pub secret: String,
    pub usage_count: i64,
    pub quota_limit: i64,
    pub active: bool,
    pub last_used_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl Credential {
    /// Active and still under its quota ceiling.
    pub fn is_eligible(&self) -> bool {
        self.active && self.usage_count < self.quota_limit
    }

    pub fn masked_secret(&self) -> String {
        mask_secret(&self.secret)
    }
}

/// Show at most the last 4 characters of a key. Keys of 8 characters or
/// fewer reveal nothing.
pub fn mask_secret(secret: &str) -> String {
    let chars: Vec<char> = secret.chars().collect();
    if chars.len() <= 8 {
        return "sk_...".to_string();
    }
    let tail: String = chars[chars.len() - 4..].iter().collect();
    format!("sk_...{}", tail)
}
