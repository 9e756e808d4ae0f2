pub mod credential_repository;
pub mod elevenlabs_tts_repository;
pub mod in_memory_credential_repository;
pub mod pg_credential_repository;
pub mod tts_repository;

pub use credential_repository::{CredentialStore, USAGE_OUT_OF_RANGE};
pub use elevenlabs_tts_repository::ElevenLabsTtsRepository;
pub use in_memory_credential_repository::InMemoryCredentialRepository;
pub use pg_credential_repository::PgCredentialRepository;
pub use tts_repository::{TtsRepository, Voice, VoiceSettings};
