use crate::coerce::{coerce_string, coerce_string_list};
use crate::models::{ScrapedLocality, ScrapedProperty, SearchCriteria};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};

/// Amenities kept per scraped listing
pub const MAX_AMENITIES: usize = 5;

/// Body of a Firecrawl `/v1/scrape` call asking for structured JSON output
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScrapeRequest {
    pub url: String,
    pub formats: Vec<String>,
    pub json_options: JsonOptions,
}

#[derive(Debug, Clone, Serialize)]
pub struct JsonOptions {
    pub prompt: String,
    pub schema: Value,
}

impl ScrapeRequest {
    pub fn json_extraction(url: String, prompt: String, schema: Value) -> Self {
        Self {
            url,
            formats: vec!["json".to_string()],
            json_options: JsonOptions { prompt, schema },
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeResponse {
    #[serde(default)]
    pub success: bool,
    #[serde(default)]
    pub data: Option<ScrapeData>,
    #[serde(default)]
    pub error: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ScrapeData {
    #[serde(default)]
    pub json: Option<Value>,
}

/// Lower-case and hyphenate a city name for use in a listing URL
pub fn city_slug(city: &str) -> String {
    city.split_whitespace()
        .map(|part| part.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
}

/// Substitute the city slug into a `{city}` URL template
pub fn build_url(template: &str, city: &str) -> String {
    template.replace("{city}", &city_slug(city))
}

pub fn listings_prompt(criteria: &SearchCriteria) -> String {
    format!(
        "Extract up to {limit} {category} property listings of type {kind} in {city} \
         priced at or below {max} Crores. For each listing capture the building or project \
         name, property type, full location address, listed price exactly as shown, a short \
         description, up to {amenities} amenities and the carpet or built-up area in sqft.",
        limit = criteria.effective_limit(),
        category = criteria.property_category,
        kind = criteria.property_type,
        city = criteria.city,
        max = criteria.max_price,
        amenities = MAX_AMENITIES,
    )
}

pub fn localities_prompt(city: &str) -> String {
    format!(
        "Extract the localities listed for {city} with their average price per sqft, \
         the yearly price change percentage and the rental yield percentage, exactly as shown."
    )
}

pub fn listings_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "properties": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "building_name": { "type": "string" },
                        "property_type": { "type": "string" },
                        "location_address": { "type": "string" },
                        "price": { "type": "string" },
                        "description": { "type": "string" },
                        "amenities": { "type": "array", "items": { "type": "string" } },
                        "area_sqft": { "type": "string" }
                    },
                    "required": ["building_name", "location_address", "price"]
                }
            }
        },
        "required": ["properties"]
    })
}

pub fn localities_schema() -> Value {
    json!({
        "type": "object",
        "properties": {
            "localities": {
                "type": "array",
                "items": {
                    "type": "object",
                    "properties": {
                        "location": { "type": "string" },
                        "price_per_sqft": { "type": "string" },
                        "yearly_change": { "type": "string" },
                        "rental_yield": { "type": "string" }
                    },
                    "required": ["location"]
                }
            }
        },
        "required": ["localities"]
    })
}

/// Pull the array stored under `key` out of an extraction result. A bare
/// array is accepted as-is; any other shape yields no rows.
pub fn extracted_rows<'a>(extracted: &'a Value, key: &str) -> &'a [Value] {
    match extracted {
        Value::Array(rows) => rows,
        Value::Object(map) => map
            .get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[]),
        _ => &[],
    }
}

impl ScrapedProperty {
    /// Shape-coerce one extracted row. Non-object rows yield `None`.
    pub fn from_row(row: &Value) -> Option<Self> {
        let row = row.as_object()?;
        let mut amenities = coerce_string_list(row.get("amenities"));
        amenities.truncate(MAX_AMENITIES);

        Some(Self {
            building_name: coerce_string(row.get("building_name")),
            property_type: coerce_string(row.get("property_type")),
            location_address: coerce_string(row.get("location_address")),
            price: coerce_string(row.get("price")),
            description: coerce_string(row.get("description")),
            amenities,
            area_sqft: coerce_string(row.get("area_sqft")),
        })
    }
}

impl ScrapedLocality {
    pub fn from_row(row: &Value) -> Option<Self> {
        let row = row.as_object()?;
        Some(Self {
            location: coerce_string(row.get("location")),
            price_per_sqft: coerce_string(row.get("price_per_sqft")),
            yearly_change: coerce_string(row.get("yearly_change")),
            rental_yield: coerce_string(row.get("rental_yield")),
        })
    }
}
