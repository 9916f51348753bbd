// src/core/summarize.rs

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, info};

const DEFAULT_API_BASE: &str = "https://api.openai.com/v1";
const DEFAULT_MODEL: &str = "gpt-4o-mini";
const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// An external capability that turns a prompt into a short text.
///
/// The pipeline treats it as a black box: any failure is an `Err` the caller
/// reports and moves on from, never a reason to stop the batch.
#[async_trait]
pub trait Summarizer: Send + Sync {
    async fn summarize(&self, prompt: &str) -> Result<String, String>;
}

/// Builds the description prompt for a landing page.
pub fn build_prompt(url: &str) -> String {
    format!(
        "Summarize the content on the home page of the website {}.",
        url
    )
}

// --- Chat-Completions Client ---

#[derive(Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    max_tokens: u32,
    temperature: f32,
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
    content: String,
}

/// `Summarizer` backed by an OpenAI-compatible chat-completions endpoint.
pub struct OpenAiSummarizer {
    client: Client,
    api_key: String,
    api_base: String,
    model: String,
}

impl OpenAiSummarizer {
    pub fn new(api_key: String) -> Result<Self, reqwest::Error> {
        let client = Client::builder().timeout(REQUEST_TIMEOUT).build()?;

        Ok(Self {
            client,
            api_key,
            api_base: DEFAULT_API_BASE.to_string(),
            model: DEFAULT_MODEL.to_string(),
        })
    }

    /// Points the client at a different endpoint, e.g. a proxy or a mock
    /// server.
    pub fn with_api_base(mut self, api_base: &str) -> Self {
        self.api_base = api_base.trim_end_matches('/').to_string();
        self
    }
}

#[async_trait]
impl Summarizer for OpenAiSummarizer {
    async fn summarize(&self, prompt: &str) -> Result<String, String> {
        debug!(model = %self.model, "Requesting page summary.");

        let request = ChatRequest {
            model: &self.model,
            messages: vec![ChatMessage {
                role: "user",
                content: prompt,
            }],
            max_tokens: 100,
            temperature: 0.7,
        };

        let response = self
            .client
            .post(format!("{}/chat/completions", self.api_base))
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Summarization request failed: {}", e))?;

        if !response.status().is_success() {
            return Err(format!(
                "Summarization API returned {}",
                response.status()
            ));
        }

        let parsed: ChatResponse = response
            .json()
            .await
            .map_err(|e| format!("Malformed summarization response: {}", e))?;

        let text = parsed
            .choices
            .into_iter()
            .next()
            .map(|choice| choice.message.content)
            .unwrap_or_default()
            .trim()
            .to_string();

        if text.is_empty() {
            return Err("Summarization returned an empty completion".to_string());
        }

        info!("Received page summary.");
        Ok(text)
    }
}
