pub mod credential;
pub mod tts;
