use super::VisionService;
use crate::{Error, Result};
use async_trait::async_trait;
use std::sync::{Arc, Mutex};

#[derive(Clone)]
pub struct MockVisionClient {
    replies: Arc<Mutex<Vec<String>>>,
    should_fail: Arc<Mutex<bool>>,
    call_count: Arc<Mutex<usize>>,
}

impl MockVisionClient {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(Vec::new())),
            should_fail: Arc::new(Mutex::new(false)),
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    pub fn with_reply(self, reply: String) -> Self {
        self.replies.lock().unwrap().push(reply);
        self
    }

    pub fn with_failure(self, should_fail: bool) -> Self {
        *self.should_fail.lock().unwrap() = should_fail;
        self
    }

    pub fn get_call_count(&self) -> usize {
        *self.call_count.lock().unwrap()
    }
}

impl Default for MockVisionClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl VisionService for MockVisionClient {
    async fn identify_place(&self, _image: &[u8]) -> Result<String> {
        let mut count = self.call_count.lock().unwrap();
        *count += 1;

        if *self.should_fail.lock().unwrap() {
            return Err(Error::AiProvider("Mock vision failure".to_string()));
        }

        let replies = self.replies.lock().unwrap();
        if replies.is_empty() {
            // Default mock response
            Ok(r#"{"businessName": "Café de Flore", "businessType": "Café", "icon": "☕", "suggestedRating": 4, "confidence": 0.9}"#.to_string())
        } else {
            let index = (*count - 1) % replies.len();
            Ok(replies[index].clone())
        }
    }
}
