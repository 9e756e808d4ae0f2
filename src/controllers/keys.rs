use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use uuid::Uuid;

use crate::{
    domain::credential::{
        CreateKeyRequest, CredentialAdminService, KeyQuotaManager, KeyQuotaManagerApi, KeyStats,
        UpdateKeyRequest,
    },
    error::AppResult,
};

/// Response for GET /api/usage-stats
#[derive(Debug, Serialize, Deserialize)]
pub struct UsageStatsResponse {
    pub success: bool,
    pub stats: Vec<KeyStats>,
}

pub struct KeysController {
    key_manager: Arc<KeyQuotaManager>,
    admin_service: Arc<CredentialAdminService>,
}

impl KeysController {
    pub fn new(
        key_manager: Arc<KeyQuotaManager>,
        admin_service: Arc<CredentialAdminService>,
    ) -> Self {
        Self {
            key_manager,
            admin_service,
        }
    }

    /// GET /api/usage-stats - Usage of every key in the pool
    pub async fn usage_stats(
        State(controller): State<Arc<KeysController>>,
    ) -> AppResult<Json<UsageStatsResponse>> {
        let keys = controller.key_manager.list_stats().await?;
        Ok(Json(UsageStatsResponse {
            success: true,
            stats: keys.into_iter().map(KeyStats::from).collect(),
        }))
    }

    /// POST /api/keys - Add a provider key
    pub async fn create_key(
        State(controller): State<Arc<KeysController>>,
        Json(request): Json<CreateKeyRequest>,
    ) -> AppResult<(StatusCode, Json<KeyStats>)> {
        let key = controller.admin_service.add_key(request).await?;
        Ok((StatusCode::CREATED, Json(KeyStats::from(key))))
    }

    /// PATCH /api/keys/{keyId} - Toggle a key or change its quota
    pub async fn update_key(
        State(controller): State<Arc<KeysController>>,
        Path(key_id): Path<Uuid>,
        Json(request): Json<UpdateKeyRequest>,
    ) -> AppResult<Json<KeyStats>> {
        let key = controller.admin_service.update_key(key_id, request).await?;
        Ok(Json(KeyStats::from(key)))
    }

    /// POST /api/keys/{keyId}/reset - Zero a key's usage
    pub async fn reset_key(
        State(controller): State<Arc<KeysController>>,
        Path(key_id): Path<Uuid>,
    ) -> AppResult<Json<KeyStats>> {
        let key = controller.admin_service.reset_usage(key_id).await?;
        Ok(Json(KeyStats::from(key)))
    }

    /// DELETE /api/keys/{keyId} - Remove a key
    pub async fn delete_key(
        State(controller): State<Arc<KeysController>>,
        Path(key_id): Path<Uuid>,
    ) -> AppResult<StatusCode> {
        controller.admin_service.delete_key(key_id).await?;
        Ok(StatusCode::NO_CONTENT)
    }
}
