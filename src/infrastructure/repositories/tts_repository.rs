use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Voice settings forwarded to the provider. Missing fields take the defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub use_speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        Self {
            stability: 0.5,
            similarity_boost: 0.75,
            style: 0.0,
            use_speaker_boost: true,
        }
    }
}

/// Voice entry from the provider catalogue. Unknown fields are kept verbatim.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Voice {
    pub voice_id: String,
    pub name: String,
    #[serde(flatten)]
    pub extra: serde_json::Map<String, serde_json::Value>,
}

/// Repository for TTS synthesis operations.
/// Abstracts the underlying TTS provider (ElevenLabs or any API-compatible service).
///
/// The API key is passed per call: the caller picks it from the rotating pool.
#[async_trait]
pub trait TtsRepository: Send + Sync {
    /// Synthesize text with the given voice.
    ///
    /// Returns the audio bytes (MP3).
    ///
    /// # Errors
    /// Returns error if synthesis fails or provider is unavailable
    async fn synthesize(
        &self,
        api_key: &str,
        voice_id: &str,
        text: &str,
        settings: &VoiceSettings,
    ) -> Result<Vec<u8>, String>;

    /// Fetch the voice catalogue visible to this API key.
    async fn list_voices(&self, api_key: &str) -> Result<Vec<Voice>, String>;
}
