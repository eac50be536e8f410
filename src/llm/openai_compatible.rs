use super::{ChatCompletion, CompletionRequest};
use crate::config::LlmConfig;
use crate::errors::LlmError;
use crate::insights::validator::strip_code_fences;
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, warn};

/// Lower-cased marker some gateways put in a 200 response instead of an answer
const UNEXPECTED_MARKER: &str = "unexpected error";

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
    #[serde(default)]
    error: Option<serde_json::Value>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ResponseMessage>,
}

#[derive(Debug, Deserialize)]
struct ResponseMessage {
    content: Option<String>,
}

/// Client for any OpenAI-compatible `/chat/completions` endpoint
pub struct OpenAiCompatibleClient {
    client: Client,
    config: LlmConfig,
}

impl OpenAiCompatibleClient {
    pub fn new(config: LlmConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!(
            "{}/chat/completions",
            self.config.base_url.trim_end_matches('/')
        )
    }
}

#[async_trait]
impl ChatCompletion for OpenAiCompatibleClient {
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
        debug!("Requesting completion from {}", request.model);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            warn!("Model {} returned status: {}", request.model, status);
            return Err(LlmError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: CompletionResponse = response.json().await?;
        if let Some(error) = payload.error {
            return Err(LlmError::Unexpected(error.to_string()));
        }

        let content = payload
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content)
            .map(|content| content.trim().to_string())
            .filter(|content| !content.is_empty())
            .ok_or(LlmError::EmptyResponse)?;

        if is_unexpected(&content) {
            return Err(LlmError::Unexpected(content));
        }
        Ok(content)
    }
}

/// Only prose can carry the marker; a JSON answer is never treated as a failure
fn is_unexpected(content: &str) -> bool {
    if serde_json::from_str::<serde_json::Value>(strip_code_fences(content)).is_ok() {
        return false;
    }
    let lowered = content.to_lowercase();
    lowered.starts_with("unexpected") || lowered.contains(UNEXPECTED_MARKER)
}
