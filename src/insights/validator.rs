//! Turns raw model output into schema-stable results.
//!
//! Whatever the model sends back, callers get an [`AnalysisResult`] or
//! [`LocationTrendResult`] with every key present. Missing or wrong-typed
//! fields are coerced one by one; unparseable output falls back to content
//! derived from the scraped data, tagged with an `error` marker.

use crate::coerce::{coerce_number, coerce_string, coerce_string_list, parse_leading_number};
use crate::models::{
    AnalysisResult, BestValue, LocationTrend, LocationTrendResult, PropertyOverview,
    ScrapedLocality, ScrapedProperty,
};
use serde_json::{Map, Value};
use tracing::warn;

/// Marker attached to results rebuilt from scraped data
pub const FORMAT_ISSUE: &str = "Analysis format issue";

/// Items summarized in an overview or fallback trend list
pub const MAX_OVERVIEW_ITEMS: usize = 3;

const DEFAULT_RECOMMENDATIONS: [&str; 3] = [
    "Visit shortlisted properties in person before committing.",
    "Verify RERA registration and title documents for every listing.",
    "Compare quoted prices with recent transactions in the same locality.",
];

const DEFAULT_INVESTMENT_TIPS: [&str; 3] = [
    "Prefer localities with upcoming metro or highway connectivity.",
    "Weigh rental yield against expected appreciation for your holding period.",
    "Check circle rates and registration costs before negotiating.",
];

/// Model output as handed to the validator
#[derive(Debug, Clone, PartialEq)]
pub enum RawOutput {
    Structured(Value),
    Text(String),
}

impl From<Value> for RawOutput {
    fn from(value: Value) -> Self {
        RawOutput::Structured(value)
    }
}

impl From<String> for RawOutput {
    fn from(text: String) -> Self {
        RawOutput::Text(text)
    }
}

impl From<&str> for RawOutput {
    fn from(text: &str) -> Self {
        RawOutput::Text(text.to_string())
    }
}

/// Remove a leading ```` ``` ```` / ```` ```json ```` fence and a trailing ```` ``` ````
pub fn strip_code_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let body = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```JSON"))
        .or_else(|| trimmed.strip_prefix("```"))
        .unwrap_or(trimmed)
        .trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Parse raw output into a JSON object. Anything that is not an object, or
/// an object reporting an upstream `error`, counts as a total failure.
fn parse_object(raw: &RawOutput) -> Option<Map<String, Value>> {
    let value = match raw {
        RawOutput::Structured(value) => value.clone(),
        RawOutput::Text(text) => match serde_json::from_str(strip_code_fences(text)) {
            Ok(value) => value,
            Err(e) => {
                warn!("Model output is not valid JSON: {}", e);
                return None;
            }
        },
    };

    match value {
        Value::Object(map) if map.get("error").is_some_and(|e| !e.is_null()) => {
            warn!("Model output carries an upstream error: {}", map["error"]);
            None
        }
        Value::Object(map) => Some(map),
        other => {
            warn!("Model output is JSON but not an object: {}", other);
            None
        }
    }
}

pub fn validate_analysis(raw: &RawOutput, scraped: &[ScrapedProperty]) -> AnalysisResult {
    let Some(map) = parse_object(raw) else {
        return AnalysisResult {
            overview: fallback_overview(scraped),
            best_value: None,
            recommendations: default_list(&DEFAULT_RECOMMENDATIONS),
            error: Some(FORMAT_ISSUE.to_string()),
        };
    };

    AnalysisResult {
        overview: match map.get("overview") {
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(coerce_overview)
                .take(MAX_OVERVIEW_ITEMS)
                .collect(),
            _ => fallback_overview(scraped),
        },
        best_value: map.get("best_value").and_then(coerce_best_value),
        recommendations: match map.get("recommendations") {
            Some(list @ Value::Array(_)) => coerce_string_list(Some(list)),
            _ => default_list(&DEFAULT_RECOMMENDATIONS),
        },
        error: None,
    }
}

pub fn validate_trends(raw: &RawOutput, scraped: &[ScrapedLocality]) -> LocationTrendResult {
    let Some(map) = parse_object(raw) else {
        return LocationTrendResult {
            trends: fallback_trends(scraped),
            top_appreciation: leading_locality(scraped, |l| &l.yearly_change),
            best_rental_yield: leading_locality(scraped, |l| &l.rental_yield),
            investment_tips: default_list(&DEFAULT_INVESTMENT_TIPS),
            error: Some(FORMAT_ISSUE.to_string()),
        };
    };

    LocationTrendResult {
        trends: match map.get("trends") {
            Some(Value::Array(items)) => items.iter().filter_map(coerce_trend).collect(),
            _ => fallback_trends(scraped),
        },
        top_appreciation: coerce_string(map.get("top_appreciation")),
        best_rental_yield: coerce_string(map.get("best_rental_yield")),
        investment_tips: match map.get("investment_tips") {
            Some(list @ Value::Array(_)) => coerce_string_list(Some(list)),
            _ => default_list(&DEFAULT_INVESTMENT_TIPS),
        },
        error: None,
    }
}

fn coerce_overview(item: &Value) -> Option<PropertyOverview> {
    let item = item.as_object()?;
    Some(PropertyOverview {
        name: coerce_string(item.get("name")),
        price: coerce_string(item.get("price")),
        area_sqft: coerce_string(item.get("area_sqft")),
        location: coerce_string(item.get("location")),
        price_per_sqft: coerce_number(item.get("price_per_sqft")),
        highlights: coerce_string_list(item.get("highlights")),
    })
}

fn coerce_best_value(value: &Value) -> Option<BestValue> {
    let value = value.as_object()?;
    Some(BestValue {
        name: coerce_string(value.get("name")),
        price: coerce_string(value.get("price")),
        reason: coerce_string(value.get("reason")),
    })
}

fn coerce_trend(item: &Value) -> Option<LocationTrend> {
    let item = item.as_object()?;
    Some(LocationTrend {
        location: coerce_string(item.get("location")),
        price_per_sqft: coerce_number(item.get("price_per_sqft")),
        yearly_change_pct: coerce_number(item.get("yearly_change_pct")),
        rental_yield_pct: coerce_number(item.get("rental_yield_pct")),
        outlook: coerce_string(item.get("outlook")),
    })
}

fn or_placeholder(value: &str, placeholder: &str) -> String {
    if value.trim().is_empty() {
        placeholder.to_string()
    } else {
        value.to_string()
    }
}

fn fallback_overview(scraped: &[ScrapedProperty]) -> Vec<PropertyOverview> {
    scraped
        .iter()
        .take(MAX_OVERVIEW_ITEMS)
        .map(|p| PropertyOverview {
            name: or_placeholder(&p.building_name, "Unknown"),
            price: or_placeholder(&p.price, "Contact for price"),
            area_sqft: or_placeholder(&p.area_sqft, "N/A"),
            location: or_placeholder(&p.location_address, "Unknown"),
            price_per_sqft: 0.0,
            highlights: p.amenities.iter().take(3).cloned().collect(),
        })
        .collect()
}

fn fallback_trends(scraped: &[ScrapedLocality]) -> Vec<LocationTrend> {
    scraped
        .iter()
        .take(MAX_OVERVIEW_ITEMS)
        .map(|l| LocationTrend {
            location: or_placeholder(&l.location, "Unknown"),
            price_per_sqft: parse_leading_number(&l.price_per_sqft),
            yearly_change_pct: parse_leading_number(&l.yearly_change),
            rental_yield_pct: parse_leading_number(&l.rental_yield),
            outlook: "N/A".to_string(),
        })
        .collect()
}

/// Locality with the highest value of `metric`, or `""` if none is numeric
fn leading_locality<F>(scraped: &[ScrapedLocality], metric: F) -> String
where
    F: Fn(&ScrapedLocality) -> &String,
{
    scraped
        .iter()
        .filter(|l| !l.location.is_empty())
        .map(|l| (l, parse_leading_number(metric(l))))
        .filter(|(_, value)| *value > 0.0)
        .max_by(|a, b| a.1.total_cmp(&b.1))
        .map(|(l, _)| l.location.clone())
        .unwrap_or_default()
}

fn default_list(items: &[&str]) -> Vec<String> {
    items.iter().map(|s| s.to_string()).collect()
}
