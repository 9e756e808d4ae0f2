use super::dto::GenerateTtsRequest;
use super::error::TtsServiceError;
use crate::domain::credential::{CredentialServiceError, KeyQuotaManager, KeyQuotaManagerApi};
use crate::infrastructure::repositories::{TtsRepository, Voice, VoiceSettings};
use async_trait::async_trait;
use moka::future::Cache;
use std::sync::Arc;
use std::time::Duration;

const VOICES_CACHE_KEY: &str = "voices";

#[derive(Debug, Clone)]
pub struct TtsGenerationResult {
    pub audio_data: Vec<u8>,
    pub characters_used: i64,
}

pub struct TtsService {
    key_manager: Arc<KeyQuotaManager>,
    tts_repo: Arc<dyn TtsRepository>,
    max_text_length: usize,
    voices_cache: Option<Cache<&'static str, Vec<Voice>>>,
}

impl TtsService {
    pub fn new(
        key_manager: Arc<KeyQuotaManager>,
        tts_repo: Arc<dyn TtsRepository>,
        max_text_length: usize,
        voices_cache_enabled: bool,
    ) -> Self {
        let voices_cache = if voices_cache_enabled {
            Some(
                Cache::builder()
                    .max_capacity(1)
                    .time_to_live(Duration::from_secs(10 * 60))
                    .build(),
            )
        } else {
            None
        };

        Self {
            key_manager,
            tts_repo,
            max_text_length,
            voices_cache,
        }
    }
}

#[async_trait]
pub trait TtsServiceApi: Send + Sync {
    /// Synthesize text with a pooled provider key
    ///
    /// This operation:
    /// - Validates the request (required fields, text length)
    /// - Selects the least-used key with remaining quota
    /// - Calls the TTS provider with that key
    /// - Records the consumed characters against the key, only after the provider succeeded
    async fn generate(
        &self,
        request: GenerateTtsRequest,
    ) -> Result<TtsGenerationResult, TtsServiceError>;

    /// Voice catalogue, fetched with any active key
    async fn list_voices(&self) -> Result<Vec<Voice>, TtsServiceError>;
}

#[async_trait]
impl TtsServiceApi for TtsService {
    async fn generate(
        &self,
        request: GenerateTtsRequest,
    ) -> Result<TtsGenerationResult, TtsServiceError> {
        let (text, voice_id, user_id) = Self::required_fields(&request)?;
        let characters_used = text.chars().count();

        tracing::info!(
            user_id = %user_id,
            voice_id = %voice_id,
            text_length = characters_used,
            "TTS generation request"
        );

        if characters_used > self.max_text_length {
            return Err(TtsServiceError::Invalid(format!(
                "Text too long (max {} characters)",
                self.max_text_length
            )));
        }
        let characters_used = characters_used as i64;

        // 1. Pick a key
        let key = self.key_manager.select().await?;

        // 2. Synthesize. A failure here must not be charged to the key.
        let default_settings = VoiceSettings::default();
        let settings = request.settings.as_ref().unwrap_or(&default_settings);
        let audio_data = self
            .tts_repo
            .synthesize(&key.secret, voice_id, text, settings)
            .await
            .map_err(|e| {
                tracing::error!(key_id = %key.id, error = %e, "TTS provider call failed");
                TtsServiceError::Dependency(e)
            })?;

        // 3. Attribute the work that was actually performed
        match self.key_manager.record(key.id, characters_used).await {
            Ok(_) => {}
            Err(CredentialServiceError::NotFound) => {
                tracing::warn!(
                    key_id = %key.id,
                    amount = characters_used,
                    "API key deleted before usage could be recorded"
                );
            }
            Err(e) => return Err(e.into()),
        }

        Ok(TtsGenerationResult {
            audio_data,
            characters_used,
        })
    }

    async fn list_voices(&self) -> Result<Vec<Voice>, TtsServiceError> {
        if let Some(cache) = &self.voices_cache {
            if let Some(voices) = cache.get(VOICES_CACHE_KEY).await {
                tracing::debug!(count = voices.len(), "Voice list cache hit");
                return Ok(voices);
            }
        }

        let key = self.key_manager.any_active().await?;
        let voices = self
            .tts_repo
            .list_voices(&key.secret)
            .await
            .map_err(TtsServiceError::Dependency)?;

        if let Some(cache) = &self.voices_cache {
            cache.insert(VOICES_CACHE_KEY, voices.clone()).await;
        }

        Ok(voices)
    }
}

impl TtsService {
    fn required_fields(
        request: &GenerateTtsRequest,
    ) -> Result<(&str, &str, &str), TtsServiceError> {
        fn non_blank(field: &Option<String>) -> Option<&str> {
            field.as_deref().filter(|value| !value.trim().is_empty())
        }

        match (
            non_blank(&request.text),
            non_blank(&request.voice_id),
            non_blank(&request.user_id),
        ) {
            (Some(text), Some(voice_id), Some(user_id)) => Ok((text, voice_id, user_id)),
            _ => Err(TtsServiceError::Invalid(
                "Missing required fields".to_string(),
            )),
        }
    }
}
