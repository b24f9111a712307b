//! Generative-text collaborator

use crate::config::GenerativeTextConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum GenerativeError {
    #[error("request failed: {0}")]
    Request(String),

    #[error("service returned status {0}")]
    Status(u16),

    #[error("malformed response: {0}")]
    Malformed(String),

    #[error("empty response")]
    Empty,
}

/// Turns a prompt into text
#[async_trait]
pub trait GenerativeText: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String, GenerativeError>;
}

/// Gemini `generateContent` client
#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    model: String,
    api_key: String,
    timeout: Duration,
}

impl GeminiClient {
    pub fn new(client: Client, config: &GenerativeTextConfig, api_key: String) -> Self {
        Self {
            client,
            endpoint: config.endpoint.trim_end_matches('/').to_string(),
            model: config.model.clone(),
            api_key,
            timeout: Duration::from_secs(config.timeout_secs),
        }
    }

    fn request_url(&self) -> String {
        format!("{}/models/{}:generateContent", self.endpoint, self.model)
    }
}

impl std::fmt::Debug for GeminiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("GeminiClient")
            .field("endpoint", &self.endpoint)
            .field("model", &self.model)
            .finish()
    }
}

#[async_trait]
impl GenerativeText for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String, GenerativeError> {
        let payload = json!({
            "contents": [{"role": "user", "parts": [{"text": prompt}]}]
        });

        let response = self
            .client
            .post(self.request_url())
            .query(&[("key", self.api_key.as_str())])
            .json(&payload)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| GenerativeError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(GenerativeError::Status(status.as_u16()));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| GenerativeError::Malformed(e.to_string()))?;

        candidate_text(&body)
    }
}

/// Text of the first part of the first candidate
fn candidate_text(body: &Value) -> Result<String, GenerativeError> {
    let text = body["candidates"][0]["content"]["parts"][0]["text"]
        .as_str()
        .ok_or_else(|| GenerativeError::Malformed("no candidate text".to_string()))?;

    let text = text.trim();
    if text.is_empty() {
        return Err(GenerativeError::Empty);
    }
    Ok(text.to_string())
}
