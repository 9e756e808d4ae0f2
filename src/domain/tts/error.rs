use crate::domain::credential::CredentialServiceError;
use crate::domain::credential::error::EXHAUSTED_MESSAGE;
use crate::error::AppError;

#[derive(Debug, thiserror::Error)]
pub enum TtsServiceError {
    #[error("dependency error: {0}")]
    Dependency(String),
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("all API keys exhausted")]
    Exhausted,
    #[error("persistence unavailable: {0}")]
    Persistence(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<CredentialServiceError> for TtsServiceError {
    fn from(err: CredentialServiceError) -> Self {
        match err {
            CredentialServiceError::NoCapacity => TtsServiceError::Exhausted,
            CredentialServiceError::Invalid(msg) => TtsServiceError::Invalid(msg),
            CredentialServiceError::PersistenceUnavailable(msg) => {
                TtsServiceError::Persistence(msg)
            }
            CredentialServiceError::NotFound => {
                TtsServiceError::Persistence("API key vanished before usage was recorded".to_string())
            }
            CredentialServiceError::Other(e) => TtsServiceError::Other(e),
        }
    }
}

impl From<TtsServiceError> for AppError {
    fn from(err: TtsServiceError) -> Self {
        match err {
            TtsServiceError::Invalid(msg) => AppError::BadRequest(msg),
            TtsServiceError::Exhausted => AppError::KeysExhausted(EXHAUSTED_MESSAGE.to_string()),
            TtsServiceError::Persistence(msg) => AppError::PersistenceUnavailable(msg),
            TtsServiceError::Dependency(msg) => AppError::ExternalService(msg),
            TtsServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
