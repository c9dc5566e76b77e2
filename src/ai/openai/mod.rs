pub mod client;
pub mod types;
pub mod vision;

pub use client::OpenAiHttpClient;
pub use vision::OpenAiVisionClient;
