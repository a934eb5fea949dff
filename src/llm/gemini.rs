//! HTTP client for the Gemini `generateContent` endpoint

use crate::config::Config;
use crate::error::{Result, ScreenerError};
use crate::llm::generator::TextGenerator;
use log::debug;
use reqwest::Client;
use serde::Serialize;
use serde_json::Value;
use std::time::{Duration, Instant};

const TEXT_POINTER: &str = "/candidates/0/content/parts/0/text";

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<RequestContent<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestContent<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

impl<'a> GenerateRequest<'a> {
    fn new(prompt: &'a str) -> Self {
        Self {
            contents: vec![RequestContent {
                parts: vec![RequestPart { text: prompt }],
            }],
        }
    }
}

#[derive(Clone)]
pub struct GeminiClient {
    client: Client,
    endpoint: String,
    api_key: String,
}

impl GeminiClient {
    pub fn new(endpoint: impl Into<String>, api_key: impl Into<String>, timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ScreenerError::Configuration(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            endpoint: endpoint.into(),
            api_key: api_key.into(),
        })
    }

    pub fn from_config(config: &Config) -> Result<Self> {
        let api_key = config
            .remote
            .api_key
            .clone()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| {
                ScreenerError::Configuration(format!(
                    "No API key configured. Set {} or run `resume-screener config set remote.api_key <key>`",
                    crate::config::API_KEY_ENV
                ))
            })?;

        Self::new(config.remote.endpoint.clone(), api_key, config.request_timeout())
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }
}

/// Generated text of a `generateContent` response body.
pub fn response_text(body: &Value) -> Result<String> {
    body.pointer(TEXT_POINTER)
        .and_then(Value::as_str)
        .map(str::to_string)
        .ok_or_else(|| {
            ScreenerError::ResponseShape(format!("missing candidates[0].content.parts[0].text in {}", body))
        })
}

impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let start = Instant::now();

        let response = self
            .client
            .post(&self.endpoint)
            .query(&[("key", self.api_key.as_str())])
            .header("Content-Type", "application/json")
            .json(&GenerateRequest::new(prompt))
            .send()
            .await
            .map_err(|e| ScreenerError::RemoteTransport(format!("Request failed: {}", e.without_url())))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ScreenerError::RemoteTransport(format!(
                "Remote service returned {}: {}",
                status, body
            )));
        }

        let body = response
            .text()
            .await
            .map_err(|e| ScreenerError::RemoteTransport(format!("Failed to read response: {}", e.without_url())))?;

        let value: Value = serde_json::from_str(&body)
            .map_err(|e| ScreenerError::ResponseShape(format!("response is not JSON: {}", e)))?;
        let text = response_text(&value)?;

        debug!(
            "Generation complete: prompt_len={}, response_len={}, duration_ms={}",
            prompt.len(),
            text.len(),
            start.elapsed().as_millis()
        );
        Ok(text)
    }

    fn name(&self) -> &str {
        "gemini"
    }
}
