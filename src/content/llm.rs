//! Language-model client for curated content, packing tips and day visuals

use std::time::{Duration, Instant};

use anyhow::{Context, Result, anyhow};
use reqwest_middleware::ClientWithMiddleware;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use crate::PlannerError;
use crate::config::PlannerConfig;
use crate::http::Timeouts;

/// Longest prompt accepted by the image endpoint
const MAX_IMAGE_PROMPT_CHARS: usize = 1000;

#[derive(Clone)]
pub struct LanguageModel {
    client: ClientWithMiddleware,
    base_url: String,
    api_key: Option<String>,
    chat_model: String,
    image_model: String,
    timeout: Duration,
}

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: [ChatMessage<'a>; 1],
    temperature: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct ChatMessage<'a> {
    role: &'a str,
    content: &'a str,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatReply,
}

#[derive(Deserialize)]
struct ChatReply {
    content: Option<String>,
}

#[derive(Serialize)]
struct ImageRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    size: &'a str,
    quality: &'a str,
    n: u8,
}

#[derive(Deserialize)]
struct ImageResponse {
    data: Vec<GeneratedImage>,
}

#[derive(Deserialize)]
struct GeneratedImage {
    url: Option<String>,
}

impl LanguageModel {
    #[must_use]
    pub fn new(client: ClientWithMiddleware, config: &PlannerConfig) -> Self {
        Self {
            client,
            base_url: config.providers.openai.base_url.clone(),
            api_key: config.providers.openai.key().map(str::to_string),
            chat_model: config.providers.chat_model.clone(),
            image_model: config.providers.image_model.clone(),
            timeout: Timeouts::from(&config.http).llm,
        }
    }

    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or_else(|| PlannerError::config("OPENAI_API_KEY is not configured").into())
    }

    /// Single-turn chat completion at temperature 0.7
    #[instrument(skip(self, prompt))]
    pub async fn complete(&self, prompt: &str, max_tokens: Option<u32>) -> Result<String> {
        let api_key = self.api_key()?;
        let start_time = Instant::now();

        let request = ChatRequest {
            model: &self.chat_model,
            messages: [ChatMessage {
                role: "user",
                content: prompt,
            }],
            temperature: 0.7,
            max_tokens,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.base_url))
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let chat: ChatResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse chat completion response")?;

        let content = chat
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| anyhow!("Chat completion returned no content"))?;

        debug!(
            "Chat completion of {} chars in {:.3}s",
            content.len(),
            start_time.elapsed().as_secs_f64()
        );
        Ok(content)
    }

    /// Generate one 1024x1024 image and return its URL
    #[instrument(skip(self, prompt))]
    pub async fn generate_image(&self, prompt: &str) -> Result<String> {
        let api_key = self.api_key()?;
        let prompt: String = prompt.chars().take(MAX_IMAGE_PROMPT_CHARS).collect();

        let request = ImageRequest {
            model: &self.image_model,
            prompt: &prompt,
            size: "1024x1024",
            quality: "standard",
            n: 1,
        };

        let response = self
            .client
            .post(format!("{}/images/generations", self.base_url))
            .bearer_auth(api_key)
            .timeout(self.timeout)
            .json(&request)
            .send()
            .await?
            .error_for_status()?;

        let images: ImageResponse = response
            .json()
            .await
            .with_context(|| "Failed to parse image generation response")?;

        let url = images
            .data
            .into_iter()
            .find_map(|image| image.url)
            .ok_or_else(|| anyhow!("Image generation returned no URL"))?;
        info!("Generated image");
        Ok(url)
    }
}

/// Strip the markdown code fence a model sometimes wraps JSON in
#[must_use]
pub fn strip_code_fence(content: &str) -> &str {
    let content = content.trim();
    let content = content
        .strip_prefix("```json")
        .or_else(|| content.strip_prefix("```"))
        .unwrap_or(content);
    content.strip_suffix("```").unwrap_or(content).trim()
}

/// Prompt for the per-day travel visual
#[must_use]
pub fn day_visual_prompt(location: &str, highlight: &str) -> String {
    format!(
        "A hyper-realistic, exciting travel photography shot of {location}. The scene features {highlight}. Sunny lighting, vibrant colors, cinematic composition, 4k resolution."
    )
}
