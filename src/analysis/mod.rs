//! Place identification pipeline: vision model call plus reply sanitizing.

pub mod sanitize;

pub use sanitize::{fallback_guess, sanitize_reply, strip_code_fence};

use crate::ai::VisionService;
use crate::models::PlaceGuess;
use std::sync::Arc;
use tracing::{info, warn};

pub struct PlaceAnalyzer {
    vision: Arc<dyn VisionService>,
}

impl PlaceAnalyzer {
    pub fn new(vision: Arc<dyn VisionService>) -> Self {
        Self { vision }
    }

    /// Identify the place shown in `image`.
    ///
    /// Provider failures are folded into [`fallback_guess`], so callers
    /// always get a complete record.
    pub async fn analyze(&self, image: &[u8]) -> PlaceGuess {
        match self.vision.identify_place(image).await {
            Ok(reply) => {
                let guess = sanitize_reply(&reply);
                info!(
                    "Identified '{}' ({}) with confidence {:.2}",
                    guess.business_name, guess.business_type, guess.confidence
                );
                guess
            }
            Err(e) => {
                warn!("Vision analysis failed, returning fallback guess: {}", e);
                fallback_guess(e.to_string())
            }
        }
    }
}
