use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

/// Hard ceiling on how many listings a single search may return
pub const DEFAULT_RESULT_LIMIT: usize = 6;

/// Price range as sent by the browsing client (absolute INR)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct PriceRange {
    #[serde(default, deserialize_with = "lenient_number")]
    pub min: Option<f64>,
    #[serde(default, deserialize_with = "lenient_number")]
    pub max: Option<f64>,
}

/// External-facing search request accepted by `POST /ai/search`.
///
/// Every field is optional and wrong-typed values decode as absent, so a
/// sloppy client degrades to defaults instead of a rejected request.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SearchRequest {
    #[serde(default, deserialize_with = "lenient_string")]
    pub city: Option<String>,
    #[serde(default, deserialize_with = "lenient_price")]
    pub price: Option<PriceRange>,
    #[serde(default, rename = "type", deserialize_with = "lenient_string")]
    pub property_type: Option<String>,
    #[serde(default, deserialize_with = "lenient_string")]
    pub category: Option<String>,
}

/// Internal search shape accepted by `POST /properties/search`.
///
/// Decoded as leniently as [`SearchRequest`]: a missing city is blank,
/// `maxPrice` may be a number, and unusable values fall back to defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchCriteria {
    #[serde(default, deserialize_with = "lenient_city")]
    pub city: String,
    /// Price ceiling in Crores, formatted with one decimal
    #[serde(default = "default_max_price", deserialize_with = "lenient_max_price")]
    pub max_price: String,
    #[serde(default = "default_property_type", deserialize_with = "lenient_property_type")]
    pub property_type: String,
    #[serde(
        default = "default_property_category",
        deserialize_with = "lenient_property_category"
    )]
    pub property_category: String,
    #[serde(default = "default_limit", deserialize_with = "lenient_limit")]
    pub limit: usize,
}

impl SearchCriteria {
    /// Limit actually applied to scraped results, whatever the caller asked for
    pub fn effective_limit(&self) -> usize {
        self.limit.min(DEFAULT_RESULT_LIMIT)
    }
}

pub fn default_max_price() -> String {
    "5".to_string()
}

pub fn default_property_type() -> String {
    "Flat".to_string()
}

pub fn default_property_category() -> String {
    "Residential".to_string()
}

fn default_limit() -> usize {
    DEFAULT_RESULT_LIMIT
}

/// A listing as extracted by the scraping provider
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedProperty {
    pub building_name: String,
    pub property_type: String,
    pub location_address: String,
    pub price: String,
    pub description: String,
    pub amenities: Vec<String>,
    pub area_sqft: String,
}

/// Per-locality rates as extracted from a city's price-trends page
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ScrapedLocality {
    pub location: String,
    pub price_per_sqft: String,
    pub yearly_change: String,
    pub rental_yield: String,
}

/// One summarized listing in an analysis
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyOverview {
    pub name: String,
    pub price: String,
    pub area_sqft: String,
    pub location: String,
    pub price_per_sqft: f64,
    pub highlights: Vec<String>,
}

/// The single best-value pick
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BestValue {
    pub name: String,
    pub price: String,
    pub reason: String,
}

/// Analysis of a listings search, always returned with the full key set
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    pub overview: Vec<PropertyOverview>,
    pub best_value: Option<BestValue>,
    pub recommendations: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Metrics for one locality
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationTrend {
    pub location: String,
    pub price_per_sqft: f64,
    pub yearly_change_pct: f64,
    pub rental_yield_pct: f64,
    pub outlook: String,
}

/// Locality trend analysis for a city
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationTrendResult {
    pub trends: Vec<LocationTrend>,
    pub top_appreciation: String,
    pub best_rental_yield: String,
    pub investment_tips: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Decodes a string, treating any other JSON type as absent
fn lenient_string<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::String(s) => Some(s),
        _ => None,
    })
}

/// Decodes a number or a numeric string; anything else is absent
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().replace(',', "").parse::<f64>().ok(),
        _ => None,
    })
}

fn lenient_city<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_string(deserializer)?
        .map(|city| city.trim().to_string())
        .unwrap_or_default())
}

/// Crores as a string or a number; blank, non-positive or non-numeric is `"5"`
fn lenient_max_price<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    let usable = |crores: f64| crores.is_finite() && crores > 0.0;
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n
            .as_f64()
            .filter(|crores| usable(*crores))
            .map(|crores| format!("{crores}")),
        Value::String(s) => s
            .trim()
            .parse::<f64>()
            .ok()
            .filter(|crores| usable(*crores))
            .map(|_| s.trim().to_string()),
        _ => None,
    }
    .unwrap_or_else(default_max_price))
}

fn lenient_property_type<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(lenient_string(deserializer)?).unwrap_or_else(default_property_type))
}

fn lenient_property_category<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(non_blank(lenient_string(deserializer)?).unwrap_or_else(default_property_category))
}

/// A positive whole number, possibly quoted; anything else is the default
fn lenient_limit<'de, D>(deserializer: D) -> Result<usize, D::Error>
where
    D: Deserializer<'de>,
{
    let limit = match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_u64(),
        Value::String(s) => s.trim().parse::<u64>().ok(),
        _ => None,
    };
    Ok(limit
        .filter(|limit| *limit > 0)
        .and_then(|limit| usize::try_from(limit).ok())
        .unwrap_or(DEFAULT_RESULT_LIMIT))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn lenient_price<'de, D>(deserializer: D) -> Result<Option<PriceRange>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    if !value.is_object() {
        return Ok(None);
    }
    Ok(serde_json::from_value(value).ok())
}
