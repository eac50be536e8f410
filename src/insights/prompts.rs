use crate::models::{ScrapedLocality, ScrapedProperty, SearchCriteria};
use crate::scrapers::types::MAX_AMENITIES;
use serde::Serialize;

/// Listings forwarded to the model
pub const MAX_PROMPT_PROPERTIES: usize = 3;
/// Characters of each description forwarded to the model
pub const MAX_DESCRIPTION_CHARS: usize = 150;
/// Localities forwarded to the model
pub const MAX_PROMPT_LOCALITIES: usize = 10;

pub const SYSTEM_PROMPT: &str = "You are a real estate analyst for the Indian property market. \
Quote every price in INR using Lakhs or Crores. Respond with a single valid JSON object that \
matches the requested schema exactly. Do not use markdown, code fences or any text outside the JSON.";

const ANALYSIS_SCHEMA: &str = r#"{
  "overview": [
    {
      "name": "string",
      "price": "string",
      "area_sqft": "string",
      "location": "string",
      "price_per_sqft": number,
      "highlights": ["string"]
    }
  ],
  "best_value": { "name": "string", "price": "string", "reason": "string" },
  "recommendations": ["string"]
}"#;

const TRENDS_SCHEMA: &str = r#"{
  "trends": [
    {
      "location": "string",
      "price_per_sqft": number,
      "yearly_change_pct": number,
      "rental_yield_pct": number,
      "outlook": "string"
    }
  ],
  "top_appreciation": "string",
  "best_rental_yield": "string",
  "investment_tips": ["string"]
}"#;

/// The subset of a listing the model gets to see
#[derive(Debug, Serialize)]
struct PromptProperty<'a> {
    building_name: &'a str,
    property_type: &'a str,
    location_address: &'a str,
    price: &'a str,
    description: String,
    amenities: &'a [String],
    area_sqft: &'a str,
}

impl<'a> From<&'a ScrapedProperty> for PromptProperty<'a> {
    fn from(property: &'a ScrapedProperty) -> Self {
        let amenities = &property.amenities[..property.amenities.len().min(MAX_AMENITIES)];
        Self {
            building_name: &property.building_name,
            property_type: &property.property_type,
            location_address: &property.location_address,
            price: &property.price,
            description: truncate_chars(&property.description, MAX_DESCRIPTION_CHARS),
            amenities,
            area_sqft: &property.area_sqft,
        }
    }
}

/// Truncate on a char boundary
pub fn truncate_chars(text: &str, max: usize) -> String {
    text.chars().take(max).collect()
}

fn to_json<T: Serialize>(value: &T) -> String {
    serde_json::to_string_pretty(value).unwrap_or_else(|_| "[]".to_string())
}

pub fn analysis_prompt(criteria: &SearchCriteria, properties: &[ScrapedProperty]) -> String {
    let projection: Vec<PromptProperty<'_>> = properties
        .iter()
        .take(MAX_PROMPT_PROPERTIES)
        .map(PromptProperty::from)
        .collect();

    format!(
        "A buyer is looking for a {category} {kind} in {city} with a budget of up to {max} Crores.\n\
         Here are the listings found:\n{listings}\n\n\
         Summarize each listing, pick the single best value for money with a reason, and give \
         practical recommendations for this buyer.\n\
         Respond with JSON in exactly this schema:\n{schema}",
        category = criteria.property_category,
        kind = criteria.property_type,
        city = criteria.city,
        max = criteria.max_price,
        listings = to_json(&projection),
        schema = ANALYSIS_SCHEMA,
    )
}

pub fn trends_prompt(city: &str, localities: &[ScrapedLocality]) -> String {
    let projection = &localities[..localities.len().min(MAX_PROMPT_LOCALITIES)];

    format!(
        "Here are current locality rates for {city}:\n{localities}\n\n\
         For each locality report the price per sqft in INR, the yearly price change and rental \
         yield as percentages, and a one-line outlook. Name the locality with the strongest \
         appreciation, the one with the best rental yield, and give investment tips.\n\
         Respond with JSON in exactly this schema:\n{schema}",
        localities = to_json(&projection),
        schema = TRENDS_SCHEMA,
    )
}
