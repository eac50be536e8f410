use crate::config::ScraperConfig;
use crate::errors::ScrapeError;
use crate::models::{ScrapedLocality, ScrapedProperty, SearchCriteria};
use crate::scrapers::traits::PropertyScraper;
use crate::scrapers::types::{
    build_url, extracted_rows, listings_prompt, listings_schema, localities_prompt,
    localities_schema, ScrapeRequest, ScrapeResponse,
};
use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value;
use tracing::{debug, info, warn};

/// Scraper backed by Firecrawl's structured JSON extraction
pub struct FirecrawlScraper {
    client: Client,
    config: ScraperConfig,
}

impl FirecrawlScraper {
    /// Create a new Firecrawl scraper
    pub fn new(config: ScraperConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .user_agent(concat!("property-insights/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self { client, config })
    }

    fn endpoint(&self) -> String {
        format!("{}/v1/scrape", self.config.base_url.trim_end_matches('/'))
    }

    /// Run one extraction and return the provider's JSON payload
    async fn extract(&self, request: &ScrapeRequest) -> Result<Value, ScrapeError> {
        debug!("Extracting from URL: {}", request.url);

        let response = self
            .client
            .post(self.endpoint())
            .bearer_auth(&self.config.api_key)
            .json(request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            warn!("Firecrawl returned status: {}", status);
            let body = response.text().await.unwrap_or_default();
            return Err(ScrapeError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let payload: ScrapeResponse = response.json().await?;
        if !payload.success {
            let reason = payload
                .error
                .unwrap_or_else(|| "extraction unsuccessful".to_string());
            warn!("Firecrawl rejected extraction: {}", reason);
            return Err(ScrapeError::Rejected(reason));
        }

        Ok(payload.data.and_then(|data| data.json).unwrap_or(Value::Null))
    }
}

#[async_trait]
impl PropertyScraper for FirecrawlScraper {
    async fn scrape_listings(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<ScrapedProperty>, ScrapeError> {
        info!("Starting Firecrawl listings scrape for {}", criteria.city);

        let request = ScrapeRequest::json_extraction(
            build_url(&self.config.listings_url_template, &criteria.city),
            listings_prompt(criteria),
            listings_schema(),
        );
        let extracted = self.extract(&request).await?;

        let properties: Vec<ScrapedProperty> = extracted_rows(&extracted, "properties")
            .iter()
            .filter_map(ScrapedProperty::from_row)
            .collect();

        if properties.is_empty() {
            warn!("No listings extracted for {}", criteria.city);
        } else {
            info!("Extracted {} listings for {}", properties.len(), criteria.city);
        }
        Ok(properties)
    }

    async fn scrape_localities(&self, city: &str) -> Result<Vec<ScrapedLocality>, ScrapeError> {
        info!("Starting Firecrawl price-trends scrape for {}", city);

        let request = ScrapeRequest::json_extraction(
            build_url(&self.config.trends_url_template, city),
            localities_prompt(city),
            localities_schema(),
        );
        let extracted = self.extract(&request).await?;

        let localities: Vec<ScrapedLocality> = extracted_rows(&extracted, "localities")
            .iter()
            .filter_map(ScrapedLocality::from_row)
            .collect();

        info!("Extracted {} localities for {}", localities.len(), city);
        Ok(localities)
    }

    fn source_name(&self) -> &'static str {
        "Firecrawl"
    }
}
