//! Vision-model integration for place identification
//!
//! The vision capability is opaque to the rest of the crate: image bytes go
//! in, the model's free-text reply comes out. Turning that reply into a
//! [`crate::models::PlaceGuess`] is the analyzer's job.

pub mod mock;
pub mod openai;

pub use mock::MockVisionClient;
pub use openai::OpenAiVisionClient;

use crate::Result;
use async_trait::async_trait;

#[async_trait]
pub trait VisionService: Send + Sync {
    /// Ask the model what business, place or product the photo shows.
    async fn identify_place(&self, image: &[u8]) -> Result<String>;
}
