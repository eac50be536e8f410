use anyhow::{Context, Result};
use std::env;
use std::net::SocketAddr;
use std::time::Duration;

const DEFAULT_FIRECRAWL_BASE_URL: &str = "https://api.firecrawl.dev";
const DEFAULT_LLM_BASE_URL: &str = "https://openrouter.ai/api/v1";
const DEFAULT_PRIMARY_MODEL: &str = "meta-llama/llama-3.3-70b-instruct";
const DEFAULT_FALLBACK_MODEL: &str = "meta-llama/llama-3.1-8b-instruct";
const DEFAULT_LISTINGS_URL_TEMPLATE: &str = "https://www.99acres.com/property-in-{city}-ffid";
const DEFAULT_TRENDS_URL_TEMPLATE: &str =
    "https://www.99acres.com/property-rates-and-price-trends-in-{city}-prffid";
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;
const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

/// Settings for the scraping provider
#[derive(Debug, Clone)]
pub struct ScraperConfig {
    pub api_key: String,
    pub base_url: String,
    /// Listings page, `{city}` is replaced with the city slug
    pub listings_url_template: String,
    /// Price-trends page, `{city}` is replaced with the city slug
    pub trends_url_template: String,
    pub timeout: Duration,
}

/// Settings for the chat-completion endpoint
#[derive(Debug, Clone)]
pub struct LlmConfig {
    pub api_key: String,
    pub base_url: String,
    pub primary_model: String,
    pub fallback_model: String,
    pub timeout: Duration,
}

/// Service configuration, built once at startup and handed to each component
#[derive(Debug, Clone)]
pub struct Config {
    pub bind_addr: SocketAddr,
    pub scraper: ScraperConfig,
    pub llm: LlmConfig,
}

impl Config {
    /// Load configuration from the process environment
    pub fn from_env() -> Result<Self> {
        let timeout = Duration::from_secs(
            optional("HTTP_TIMEOUT_SECS")
                .map(|raw| raw.parse::<u64>())
                .transpose()
                .context("HTTP_TIMEOUT_SECS must be a whole number of seconds")?
                .unwrap_or(DEFAULT_HTTP_TIMEOUT_SECS),
        );

        let bind_addr = optional("BIND_ADDR")
            .unwrap_or_else(|| DEFAULT_BIND_ADDR.to_string())
            .parse()
            .context("BIND_ADDR must be a socket address such as 0.0.0.0:8080")?;

        Ok(Self {
            bind_addr,
            scraper: ScraperConfig {
                api_key: required("FIRECRAWL_API_KEY")?,
                base_url: optional("FIRECRAWL_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_FIRECRAWL_BASE_URL.to_string()),
                listings_url_template: optional("LISTINGS_URL_TEMPLATE")
                    .unwrap_or_else(|| DEFAULT_LISTINGS_URL_TEMPLATE.to_string()),
                trends_url_template: optional("TRENDS_URL_TEMPLATE")
                    .unwrap_or_else(|| DEFAULT_TRENDS_URL_TEMPLATE.to_string()),
                timeout,
            },
            llm: LlmConfig {
                api_key: required("LLM_API_KEY")?,
                base_url: optional("LLM_BASE_URL")
                    .unwrap_or_else(|| DEFAULT_LLM_BASE_URL.to_string()),
                primary_model: optional("LLM_PRIMARY_MODEL")
                    .unwrap_or_else(|| DEFAULT_PRIMARY_MODEL.to_string()),
                fallback_model: optional("LLM_FALLBACK_MODEL")
                    .unwrap_or_else(|| DEFAULT_FALLBACK_MODEL.to_string()),
                timeout,
            },
        })
    }
}

impl ScraperConfig {
    /// Scraper settings pointed at `base_url`, defaults elsewhere
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            listings_url_template: DEFAULT_LISTINGS_URL_TEMPLATE.to_string(),
            trends_url_template: DEFAULT_TRENDS_URL_TEMPLATE.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

impl LlmConfig {
    /// LLM settings pointed at `base_url`, default models
    pub fn with_base_url(api_key: impl Into<String>, base_url: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: base_url.into(),
            primary_model: DEFAULT_PRIMARY_MODEL.to_string(),
            fallback_model: DEFAULT_FALLBACK_MODEL.to_string(),
            timeout: Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS),
        }
    }
}

fn required(key: &str) -> Result<String> {
    optional(key).with_context(|| format!("{key} is not set"))
}

fn optional(key: &str) -> Option<String> {
    env::var(key).ok().filter(|value| !value.trim().is_empty())
}
