use axum::{
    middleware,
    routing::{get, patch, post},
    Router,
};
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

use crate::controllers::{health, keys::KeysController, tts::TtsController};
use crate::infrastructure::auth::{admin_middleware, request_id_middleware};
use crate::infrastructure::config::Config;
use crate::infrastructure::repositories::CredentialStore;

/// Build the application router with every route and layer
pub fn create_router(
    config: Arc<Config>,
    store: Arc<dyn CredentialStore>,
    tts_controller: Arc<TtsController>,
    keys_controller: Arc<KeysController>,
) -> Router {
    // TTS routes (public, like the original serverless handlers)
    let tts_routes = Router::new()
        .route("/api/generate-tts", post(TtsController::generate))
        .route("/api/voices", get(TtsController::list_voices))
        .with_state(tts_controller);

    // Usage stats (public, read-only, secrets are masked)
    let stats_routes = Router::new()
        .route("/api/usage-stats", get(KeysController::usage_stats))
        .with_state(keys_controller.clone());

    // Key administration (admin token required)
    let admin_routes = Router::new()
        .route("/api/keys", post(KeysController::create_key))
        .route(
            "/api/keys/:keyId",
            patch(KeysController::update_key).delete(KeysController::delete_key),
        )
        .route("/api/keys/:keyId/reset", post(KeysController::reset_key))
        .with_state(keys_controller)
        .layer(middleware::from_fn_with_state(config, admin_middleware));

    Router::new()
        .route("/health", get(health::health))
        .route("/health/ready", get(health::health_ready))
        .with_state(store)
        .merge(tts_routes)
        .merge(stats_routes)
        .merge(admin_routes)
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Start the HTTP server with all routes configured
pub async fn start_http_server(
    config: Arc<Config>,
    app: Router,
) -> Result<(), Box<dyn std::error::Error>> {
    let listener =
        tokio::net::TcpListener::bind(format!("{}:{}", config.host, config.port)).await?;

    tracing::info!("Server listening on {}", listener.local_addr()?);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
