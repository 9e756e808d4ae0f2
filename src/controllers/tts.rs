use axum::{extract::State, Json};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::sync::Arc;

use crate::{
    domain::tts::{
        GenerateTtsRequest, GenerateTtsResponse, TtsService, TtsServiceApi, VoicesResponse,
    },
    error::AppResult,
};

pub struct TtsController {
    tts_service: Arc<TtsService>,
}

impl TtsController {
    pub fn new(tts_service: Arc<TtsService>) -> Self {
        Self { tts_service }
    }

    /// POST /api/generate-tts - Convert text to speech with a pooled key
    pub async fn generate(
        State(controller): State<Arc<TtsController>>,
        Json(request): Json<GenerateTtsRequest>,
    ) -> AppResult<Json<GenerateTtsResponse>> {
        let result = controller.tts_service.generate(request).await?;

        Ok(Json(GenerateTtsResponse {
            success: true,
            audio_base64: STANDARD.encode(&result.audio_data),
            characters_used: result.characters_used,
        }))
    }

    /// GET /api/voices - List provider voices
    pub async fn list_voices(
        State(controller): State<Arc<TtsController>>,
    ) -> AppResult<Json<VoicesResponse>> {
        let voices = controller.tts_service.list_voices().await?;
        Ok(Json(VoicesResponse {
            success: true,
            voices,
        }))
    }
}
