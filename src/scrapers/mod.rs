pub mod firecrawl;
pub mod traits;
pub mod types;

pub use firecrawl::FirecrawlScraper;
pub use traits::PropertyScraper;
