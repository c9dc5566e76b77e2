use super::client::OpenAiHttpClient;
use super::types::{
    ChatCompletionRequest, ChatMessage, ChatMessageContent, ImageUrl, MessagePart,
};
use crate::ai::VisionService;
use crate::{prompts, Error, Result};
use async_trait::async_trait;
use base64::Engine as _;
use std::time::Duration;

const MAX_COMPLETION_TOKENS: u32 = 500;
const TEMPERATURE: f32 = 0.3;

pub struct OpenAiVisionClient {
    http: OpenAiHttpClient,
    model: String,
}

impl OpenAiVisionClient {
    pub fn new(api_key: String, base_url: String, model: String, timeout: Duration) -> Result<Self> {
        Ok(Self {
            http: OpenAiHttpClient::new(api_key, base_url, timeout)?,
            model,
        })
    }
}

#[async_trait]
impl VisionService for OpenAiVisionClient {
    async fn identify_place(&self, image: &[u8]) -> Result<String> {
        tracing::debug!("Identifying place in image ({} bytes)", image.len());

        let base64_image = base64::engine::general_purpose::STANDARD.encode(image);
        let mime = crate::mime::detect_image_mime(image);
        let data_url = format!("data:{};base64,{}", mime, base64_image);

        let user_message = ChatMessage {
            role: "user".to_string(),
            content: Some(ChatMessageContent::ImageContent(vec![
                MessagePart {
                    part_type: "text".to_string(),
                    text: Some(prompts::PLACE_GUESS.to_string()),
                    image_url: None,
                },
                MessagePart {
                    part_type: "image_url".to_string(),
                    text: None,
                    image_url: Some(ImageUrl { url: data_url }),
                },
            ])),
        };

        let request = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![user_message],
            max_completion_tokens: MAX_COMPLETION_TOKENS,
            temperature: Some(TEMPERATURE),
        };

        let response = self.http.chat_completion(&request).await?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| Error::AiProvider("No response from vision model".to_string()))?;

        if let Some(reason) = choice.finish_reason.as_deref() {
            if reason != "stop" {
                tracing::warn!("Vision model stopped early: {}", reason);
            }
        }

        match &choice.message.content {
            Some(ChatMessageContent::Text(text)) => Ok(text.trim().to_string()),
            _ => Err(Error::AiProvider(
                "Vision model reply had no text content".to_string(),
            )),
        }
    }
}
