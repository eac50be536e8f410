use thiserror::Error;

/// Failures while acquiring listings from the scraping provider.
///
/// These are surfaced to the caller; the pipeline does not retry them.
#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("scraping provider request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("scraping provider returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("scraping provider rejected the request: {0}")]
    Rejected(String),
}

/// Failures of a single chat-completion attempt. Absorbed by the fallback chain.
#[derive(Debug, Error)]
pub enum LlmError {
    #[error("model endpoint request failed: {0}")]
    Transport(#[from] reqwest::Error),
    #[error("model endpoint returned status {status}: {body}")]
    Status { status: u16, body: String },
    #[error("model returned no content")]
    EmptyResponse,
    #[error("model reported an unexpected error: {0}")]
    Unexpected(String),
}
