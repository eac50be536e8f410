use crate::errors::ScrapeError;
use crate::models::{ScrapedLocality, ScrapedProperty, SearchCriteria};
use async_trait::async_trait;

/// Source of listing and locality data.
/// A new extraction provider only needs to implement this trait.
#[async_trait]
pub trait PropertyScraper: Send + Sync {
    /// Scrape listings matching `criteria`. Implementations may return more
    /// rows than `criteria.limit`; callers must cap the result.
    async fn scrape_listings(
        &self,
        criteria: &SearchCriteria,
    ) -> Result<Vec<ScrapedProperty>, ScrapeError>;

    /// Scrape per-locality price trends for `city`
    async fn scrape_localities(&self, city: &str) -> Result<Vec<ScrapedLocality>, ScrapeError>;

    /// Get the name of the scraper source
    fn source_name(&self) -> &'static str;
}
