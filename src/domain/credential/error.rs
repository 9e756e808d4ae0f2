use crate::error::AppError;

pub const EXHAUSTED_MESSAGE: &str =
    "All API keys exhausted. Add more keys or wait for quota reset.";

#[derive(Debug, thiserror::Error)]
pub enum CredentialServiceError {
    #[error("no API key with remaining quota")]
    NoCapacity,
    #[error("API key not found")]
    NotFound,
    #[error("invalid input: {0}")]
    Invalid(String),
    #[error("persistence unavailable: {0}")]
    PersistenceUnavailable(String),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl From<AppError> for CredentialServiceError {
    fn from(err: AppError) -> Self {
        match err {
            AppError::BadRequest(msg) => CredentialServiceError::Invalid(msg),
            AppError::NotFound(_) => CredentialServiceError::NotFound,
            AppError::KeysExhausted(_) => CredentialServiceError::NoCapacity,
            AppError::PersistenceUnavailable(msg) => {
                CredentialServiceError::PersistenceUnavailable(msg)
            }
            _ => CredentialServiceError::PersistenceUnavailable(err.to_string()),
        }
    }
}

impl From<CredentialServiceError> for AppError {
    fn from(err: CredentialServiceError) -> Self {
        match err {
            CredentialServiceError::NoCapacity => {
                AppError::KeysExhausted(EXHAUSTED_MESSAGE.to_string())
            }
            CredentialServiceError::NotFound => AppError::NotFound("API key not found".to_string()),
            CredentialServiceError::Invalid(msg) => AppError::BadRequest(msg),
            CredentialServiceError::PersistenceUnavailable(msg) => {
                AppError::PersistenceUnavailable(msg)
            }
            CredentialServiceError::Other(e) => AppError::Internal(e.to_string()),
        }
    }
}
