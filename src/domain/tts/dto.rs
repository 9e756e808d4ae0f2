use crate::infrastructure::repositories::{Voice, VoiceSettings};
use serde::{Deserialize, Serialize};

/// Request for POST /api/generate-tts
#[derive(Debug, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTtsRequest {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<VoiceSettings>,
    #[serde(default)]
    pub user_id: Option<String>,
}

/// Response for POST /api/generate-tts
#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateTtsResponse {
    pub success: bool,
    pub audio_base64: String,
    pub characters_used: i64,
}

/// Response for GET /api/voices
#[derive(Debug, Serialize, Deserialize)]
pub struct VoicesResponse {
    pub success: bool,
    pub voices: Vec<Voice>,
}
