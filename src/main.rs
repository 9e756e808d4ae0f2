use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use ttsrelay_backend::controllers::{keys::KeysController, tts::TtsController};
use ttsrelay_backend::domain::credential::{CredentialAdminService, KeyQuotaManager};
use ttsrelay_backend::domain::tts::TtsService;
use ttsrelay_backend::infrastructure::config::{Config, LogFormat, StorageBackend};
use ttsrelay_backend::infrastructure::db::{check_connection, create_pool, run_migrations};
use ttsrelay_backend::infrastructure::http::{create_router, start_http_server};
use ttsrelay_backend::infrastructure::repositories::{
    CredentialStore, ElevenLabsTtsRepository, InMemoryCredentialRepository,
    PgCredentialRepository,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    init_logging(&config);

    tracing::info!(
        environment = ?config.environment,
        "Starting TTS relay backend on {}:{}",
        config.host,
        config.port
    );

    // === DEPENDENCY INJECTION SETUP ===
    // 1. Key pool storage
    let store: Arc<dyn CredentialStore> = match (config.storage_backend, &config.database_url) {
        (StorageBackend::Postgres, Some(database_url)) => {
            let pool = create_pool(database_url).await?;
            tracing::info!("Database connection pool created");

            check_connection(&pool).await?;
            tracing::info!("Database connection verified");

            run_migrations(&pool).await?;
            tracing::info!("Database migrations applied");

            Arc::new(PgCredentialRepository::new(Arc::new(pool)))
        }
        (StorageBackend::Postgres, None) => {
            return Err("DATABASE_URL is required when STORAGE_BACKEND=postgres".into());
        }
        (StorageBackend::Memory, _) => {
            tracing::warn!("Using in-memory key pool; keys and usage are lost on restart");
            Arc::new(InMemoryCredentialRepository::new())
        }
    };

    // 2. TTS provider client
    tracing::info!(
        base_url = %config.tts_base_url,
        model_id = %config.tts_model_id,
        timeout_secs = config.tts_timeout_secs,
        "Initializing TTS provider client"
    );
    let tts_repo = Arc::new(ElevenLabsTtsRepository::new(
        config.tts_base_url.clone(),
        config.tts_model_id.clone(),
        config.tts_timeout(),
    )?);

    // 3. Services
    tracing::info!("Instantiating services...");
    let key_manager = Arc::new(KeyQuotaManager::new(store.clone()));
    let admin_service = Arc::new(CredentialAdminService::new(
        store.clone(),
        config.default_quota_limit,
    ));
    let tts_service = Arc::new(TtsService::new(
        key_manager.clone(),
        tts_repo,
        config.max_text_length,
        config.voices_cache_enabled,
    ));

    if config.admin_token.is_none() {
        tracing::warn!("ADMIN_TOKEN not set: key administration routes will reject every request");
    }

    // 4. Controllers
    tracing::info!("Instantiating controllers...");
    let tts_controller = Arc::new(TtsController::new(tts_service));
    let keys_controller = Arc::new(KeysController::new(key_manager, admin_service));

    let config = Arc::new(config);
    let app = create_router(config.clone(), store, tts_controller, keys_controller);

    start_http_server(config, app).await?;

    Ok(())
}

fn init_logging(config: &Config) {
    let default_filter = if config.is_development() {
        "ttsrelay_backend=debug,tower_http=debug"
    } else {
        "ttsrelay_backend=info,tower_http=info"
    };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    if config.log_format == LogFormat::Json {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
}
