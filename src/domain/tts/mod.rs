pub mod dto;
pub mod error;
pub mod service;

pub use dto::{GenerateTtsRequest, GenerateTtsResponse, VoicesResponse};
pub use error::TtsServiceError;
pub use service::{TtsGenerationResult, TtsService, TtsServiceApi};
