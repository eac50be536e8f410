//! Hosted chat-completion access.
//!
//! [`ChatCompletion`] is the seam the insight pipeline talks to;
//! [`OpenAiCompatibleClient`] is the production implementation and
//! [`complete_with_fallback`] walks an ordered list of model attempts.

pub mod fallback;
pub mod openai_compatible;

pub use fallback::{complete_with_fallback, ModelAttempt, AI_UNAVAILABLE_PAYLOAD};
pub use openai_compatible::OpenAiCompatibleClient;

use crate::errors::LlmError;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }
}

/// One chat-completion call, fully specified
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CompletionRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f32,
    pub max_tokens: u32,
}

#[async_trait]
pub trait ChatCompletion: Send + Sync {
    /// Run a completion and return the assistant's text
    async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError>;
}
