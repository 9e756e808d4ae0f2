use serde::Deserialize;
use std::env;
use std::time::Duration;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub storage_backend: StorageBackend,
    pub database_url: Option<String>,
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub log_format: LogFormat,
    /// Bearer token for the key administration routes. Unset disables them.
    pub admin_token: Option<String>,
    pub default_quota_limit: i64,
    pub max_text_length: usize,
    // TTS provider
    pub tts_base_url: String,
    pub tts_model_id: String,
    pub tts_timeout_secs: u64,
    pub voices_cache_enabled: bool,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    Postgres,
    Memory,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    Development,
    Production,
}

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    Pretty,
    Json,
}

impl Config {
    pub fn from_env() -> Result<Self, Box<dyn std::error::Error>> {
        dotenvy::dotenv().ok();

        let storage_backend = match env::var("STORAGE_BACKEND")
            .unwrap_or_else(|_| "postgres".to_string())
            .to_lowercase()
            .as_str()
        {
            "memory" => StorageBackend::Memory,
            "postgres" => StorageBackend::Postgres,
            other => return Err(format!("Unknown STORAGE_BACKEND: {}", other).into()),
        };

        let database_url = env::var("DATABASE_URL").ok();
        if storage_backend == StorageBackend::Postgres && database_url.is_none() {
            return Err("DATABASE_URL is required when STORAGE_BACKEND=postgres".into());
        }

        let config = Config {
            storage_backend,
            database_url,
            host: env::var("HOST").unwrap_or_else(|_| "0.0.0.0".to_string()),
            port: env::var("PORT")
                .unwrap_or_else(|_| "8080".to_string())
                .parse()?,
            environment: match env::var("ENVIRONMENT")
                .unwrap_or_else(|_| "development".to_string())
                .as_str()
            {
                "production" => Environment::Production,
                _ => Environment::Development,
            },
            log_format: match env::var("LOG_FORMAT")
                .unwrap_or_else(|_| "pretty".to_string())
                .as_str()
            {
                "json" => LogFormat::Json,
                _ => LogFormat::Pretty,
            },
            admin_token: env::var("ADMIN_TOKEN").ok().filter(|t| !t.trim().is_empty()),
            default_quota_limit: env::var("DEFAULT_QUOTA_LIMIT")
                .unwrap_or_else(|_| "10000".to_string())
                .parse()?,
            max_text_length: env::var("MAX_TEXT_LENGTH")
                .unwrap_or_else(|_| "5000".to_string())
                .parse()?,
            tts_base_url: env::var("TTS_BASE_URL")
                .unwrap_or_else(|_| "https://api.elevenlabs.io".to_string()),
            tts_model_id: env::var("TTS_MODEL_ID")
                .unwrap_or_else(|_| "eleven_multilingual_v2".to_string()),
            tts_timeout_secs: env::var("TTS_TIMEOUT_SECS")
                .unwrap_or_else(|_| "30".to_string())
                .parse()?,
            voices_cache_enabled: env::var("VOICES_CACHE_ENABLED")
                .map(|s| s.to_lowercase() != "false")
                .unwrap_or(true),
        };

        if config.default_quota_limit <= 0 {
            return Err("DEFAULT_QUOTA_LIMIT must be positive".into());
        }

        Ok(config)
    }

    pub fn is_development(&self) -> bool {
        self.environment == Environment::Development
    }

    pub fn tts_timeout(&self) -> Duration {
        Duration::from_secs(self.tts_timeout_secs)
    }
}
