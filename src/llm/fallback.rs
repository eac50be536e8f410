use super::{ChatCompletion, ChatMessage, CompletionRequest};
use tracing::{info, warn};

/// Returned verbatim when every model attempt has failed
pub const AI_UNAVAILABLE_PAYLOAD: &str =
    r#"{"error":"AI service is temporarily unavailable. Please try again later."}"#;

/// A model to try, with the sampling parameters to try it with
#[derive(Debug, Clone, PartialEq)]
pub struct ModelAttempt {
    pub model: String,
    pub temperature: f32,
    pub max_tokens: u32,
}

impl ModelAttempt {
    pub fn new(model: impl Into<String>, temperature: f32, max_tokens: u32) -> Self {
        Self {
            model: model.into(),
            temperature,
            max_tokens,
        }
    }
}

/// Try each attempt in order and return the first successful completion.
/// Falls through to [`AI_UNAVAILABLE_PAYLOAD`] when all of them fail.
pub async fn complete_with_fallback(
    llm: &dyn ChatCompletion,
    attempts: &[ModelAttempt],
    messages: &[ChatMessage],
) -> String {
    for attempt in attempts {
        let request = CompletionRequest {
            model: attempt.model.clone(),
            messages: messages.to_vec(),
            temperature: attempt.temperature,
            max_tokens: attempt.max_tokens,
        };

        match llm.complete(&request).await {
            Ok(content) => {
                info!("Completion served by {}", attempt.model);
                return content;
            }
            Err(e) => warn!("Model {} failed: {}", attempt.model, e),
        }
    }

    warn!("All {} model attempts failed", attempts.len());
    AI_UNAVAILABLE_PAYLOAD.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LlmError;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Fails for every model in `failing`, echoes the model name otherwise
    struct Scripted {
        failing: Vec<&'static str>,
        calls: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl ChatCompletion for Scripted {
        async fn complete(&self, request: &CompletionRequest) -> Result<String, LlmError> {
            self.calls.lock().unwrap().push(request.model.clone());
            if self.failing.contains(&request.model.as_str()) {
                Err(LlmError::EmptyResponse)
            } else {
                Ok(format!("answer from {}", request.model))
            }
        }
    }

    fn attempts() -> Vec<ModelAttempt> {
        vec![
            ModelAttempt::new("primary", 0.3, 1500),
            ModelAttempt::new("fallback", 0.3, 1000),
        ]
    }

    #[tokio::test]
    async fn primary_success_skips_fallback() {
        let llm = Scripted {
            failing: vec![],
            calls: Mutex::new(vec![]),
        };
        let out = complete_with_fallback(&llm, &attempts(), &[ChatMessage::user("hi")]).await;

        assert_eq!(out, "answer from primary");
        assert_eq!(*llm.calls.lock().unwrap(), vec!["primary"]);
    }

    #[tokio::test]
    async fn falls_back_once_in_order() {
        let llm = Scripted {
            failing: vec!["primary"],
            calls: Mutex::new(vec![]),
        };
        let out = complete_with_fallback(&llm, &attempts(), &[ChatMessage::user("hi")]).await;

        assert_eq!(out, "answer from fallback");
        assert_eq!(*llm.calls.lock().unwrap(), vec!["primary", "fallback"]);
    }

    #[tokio::test]
    async fn exhausted_chain_returns_sentinel() {
        let llm = Scripted {
            failing: vec!["primary", "fallback"],
            calls: Mutex::new(vec![]),
        };
        let out = complete_with_fallback(&llm, &attempts(), &[ChatMessage::user("hi")]).await;

        assert_eq!(
            out,
            r#"{"error":"AI service is temporarily unavailable. Please try again later."}"#
        );
    }
}
