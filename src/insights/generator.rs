use crate::config::Config;
use crate::errors::ScrapeError;
use crate::insights::prompts::{analysis_prompt, trends_prompt, SYSTEM_PROMPT};
use crate::insights::validator::{validate_analysis, validate_trends, RawOutput};
use crate::llm::{
    complete_with_fallback, ChatCompletion, ChatMessage, ModelAttempt, OpenAiCompatibleClient,
};
use crate::models::{
    AnalysisResult, LocationTrendResult, ScrapedLocality, ScrapedProperty, SearchCriteria,
};
use crate::scrapers::{FirecrawlScraper, PropertyScraper};
use anyhow::Result;
use serde::Serialize;
use std::sync::Arc;
use tracing::{debug, info};

/// Listings plus the model's analysis of them
#[derive(Debug, Clone, Serialize)]
pub struct PropertyInsights {
    pub properties: Vec<ScrapedProperty>,
    pub analysis: AnalysisResult,
}

/// Locality rates plus the model's trend analysis
#[derive(Debug, Clone, Serialize)]
pub struct LocationInsights {
    pub localities: Vec<ScrapedLocality>,
    pub analysis: LocationTrendResult,
}

/// Scrape, ask the model, validate. Holds no per-request state.
pub struct InsightGenerator {
    scraper: Arc<dyn PropertyScraper>,
    llm: Arc<dyn ChatCompletion>,
    analysis_attempts: Vec<ModelAttempt>,
    trend_attempts: Vec<ModelAttempt>,
}

impl InsightGenerator {
    pub fn new(
        scraper: Arc<dyn PropertyScraper>,
        llm: Arc<dyn ChatCompletion>,
        primary_model: &str,
        fallback_model: &str,
    ) -> Self {
        Self {
            scraper,
            llm,
            analysis_attempts: vec![
                ModelAttempt::new(primary_model, 0.3, 1500),
                ModelAttempt::new(fallback_model, 0.3, 1000),
            ],
            trend_attempts: vec![
                ModelAttempt::new(primary_model, 0.2, 1200),
                ModelAttempt::new(fallback_model, 0.2, 800),
            ],
        }
    }

    /// Build the production pipeline: Firecrawl plus an OpenAI-compatible endpoint
    pub fn from_config(config: &Config) -> Result<Self> {
        let scraper = FirecrawlScraper::new(config.scraper.clone())?;
        let llm = OpenAiCompatibleClient::new(config.llm.clone())?;
        info!(
            "Insight pipeline using {} with models {} -> {}",
            scraper.source_name(),
            config.llm.primary_model,
            config.llm.fallback_model
        );

        Ok(Self::new(
            Arc::new(scraper),
            Arc::new(llm),
            &config.llm.primary_model,
            &config.llm.fallback_model,
        ))
    }

    /// Scrape listings for `criteria` and analyse them.
    ///
    /// Scrape failures are returned to the caller; model failures never are.
    pub async fn search(&self, criteria: &SearchCriteria) -> Result<PropertyInsights, ScrapeError> {
        let mut properties = self.scraper.scrape_listings(criteria).await?;
        let limit = criteria.effective_limit();
        if properties.len() > limit {
            debug!(
                "Provider returned {} listings, keeping first {}",
                properties.len(),
                limit
            );
            properties.truncate(limit);
        }

        let raw = self.generate_analysis(criteria, &properties).await;
        let analysis = validate_analysis(&RawOutput::from(raw), &properties);

        Ok(PropertyInsights {
            properties,
            analysis,
        })
    }

    /// Scrape locality rates for `city` and analyse the trends
    pub async fn location_trends(&self, city: &str) -> Result<LocationInsights, ScrapeError> {
        let localities = self.scraper.scrape_localities(city).await?;

        let raw = self.generate_trends(city, &localities).await;
        let analysis = validate_trends(&RawOutput::from(raw), &localities);

        Ok(LocationInsights {
            localities,
            analysis,
        })
    }

    /// Raw model output for a listings analysis, or the unavailable sentinel
    pub async fn generate_analysis(
        &self,
        criteria: &SearchCriteria,
        properties: &[ScrapedProperty],
    ) -> String {
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(analysis_prompt(criteria, properties)),
        ];
        complete_with_fallback(self.llm.as_ref(), &self.analysis_attempts, &messages).await
    }

    /// Raw model output for a trends analysis, or the unavailable sentinel
    pub async fn generate_trends(&self, city: &str, localities: &[ScrapedLocality]) -> String {
        let messages = [
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(trends_prompt(city, localities)),
        ];
        complete_with_fallback(self.llm.as_ref(), &self.trend_attempts, &messages).await
    }
}
