use super::tts_repository::{TtsRepository, Voice, VoiceSettings};
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;

const API_KEY_HEADER: &str = "xi-api-key";

#[derive(Debug, Serialize)]
struct SpeechRequest<'a> {
    text: &'a str,
    model_id: &'a str,
    voice_settings: &'a VoiceSettings,
}

#[derive(Debug, Deserialize)]
struct VoicesResponse {
    voices: Vec<Voice>,
}

/// ElevenLabs implementation of TTS repository
pub struct ElevenLabsTtsRepository {
    base_url: String,
    model_id: String,
    http_client: reqwest::Client,
}

impl ElevenLabsTtsRepository {
    pub fn new(base_url: String, model_id: String, timeout: Duration) -> Result<Self, String> {
        let http_client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| format!("Failed to build HTTP client: {}", e))?;

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model_id,
            http_client,
        })
    }

    fn speech_url(&self, voice_id: &str) -> String {
        format!(
            "{}/v1/text-to-speech/{}",
            self.base_url,
            urlencoding::encode(voice_id)
        )
    }

    async fn error_body(response: reqwest::Response) -> String {
        let status = response.status();
        let body = response
            .text()
            .await
            .unwrap_or_else(|_| "Unknown error".to_string());
        format!("provider responded with {}: {}", status, body)
    }
}

#[async_trait]
impl TtsRepository for ElevenLabsTtsRepository {
    async fn synthesize(
        &self,
        api_key: &str,
        voice_id: &str,
        text: &str,
        settings: &VoiceSettings,
    ) -> Result<Vec<u8>, String> {
        tracing::debug!(
            voice_id = %voice_id,
            model_id = %self.model_id,
            text_length = text.chars().count(),
            "Calling TTS provider"
        );

        let response = self
            .http_client
            .post(self.speech_url(voice_id))
            .header(API_KEY_HEADER, api_key)
            .json(&SpeechRequest {
                text,
                model_id: &self.model_id,
                voice_settings: settings,
            })
            .send()
            .await
            .map_err(|e| format!("TTS request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(Self::error_body(response).await);
        }

        let audio = response
            .bytes()
            .await
            .map_err(|e| format!("Failed to read audio stream: {}", e))?;

        tracing::debug!(audio_size = audio.len(), "TTS provider returned audio");

        Ok(audio.to_vec())
    }

    async fn list_voices(&self, api_key: &str) -> Result<Vec<Voice>, String> {
        let response = self
            .http_client
            .get(format!("{}/v1/voices", self.base_url))
            .header(API_KEY_HEADER, api_key)
            .send()
            .await
            .map_err(|e| format!("Voice listing failed: {}", e))?;

        if !response.status().is_success() {
            return Err(Self::error_body(response).await);
        }

        let body: VoicesResponse = response
            .json()
            .await
            .map_err(|e| format!("Invalid voice listing: {}", e))?;

        Ok(body.voices)
    }
}
