//! Rewrites the browsing client's search shape into [`SearchCriteria`].

use crate::models::{
    default_max_price, default_property_category, default_property_type, SearchCriteria,
    SearchRequest, DEFAULT_RESULT_LIMIT,
};

/// Absolute INR in one Crore
pub const CRORE: f64 = 10_000_000.0;

/// Marketing labels used by the listing UI, mapped to canonical property types
const PROPERTY_TYPE_LABELS: &[(&str, &str)] = &[
    ("modern", "Flat"),
    ("apartment", "Flat"),
    ("studio", "Flat"),
    ("penthouse", "Flat"),
    ("villa", "House"),
    ("independent", "House"),
    ("bungalow", "House"),
    ("duplex", "House"),
    ("row house", "House"),
    ("office", "Commercial"),
    ("shop", "Commercial"),
    ("showroom", "Commercial"),
    ("plot", "Land"),
];

/// Never fails: absent or malformed fields fall back to defaults
pub fn normalize(request: &SearchRequest) -> SearchCriteria {
    SearchCriteria {
        city: request
            .city
            .as_deref()
            .map(str::trim)
            .unwrap_or_default()
            .to_string(),
        max_price: max_price_crores(request.price.as_ref().and_then(|p| p.max)),
        property_type: canonical_property_type(request.property_type.as_deref()),
        property_category: non_blank(request.category.as_deref())
            .map(str::to_string)
            .unwrap_or_else(default_property_category),
        limit: DEFAULT_RESULT_LIMIT,
    }
}

/// Price ceiling in Crores with one decimal, `"5"` when there is none.
/// Halves round away from zero (₹25 lakh is "0.3").
pub fn max_price_crores(max: Option<f64>) -> String {
    match max {
        Some(max) if max.is_finite() && max > 0.0 => {
            format!("{:.1}", (max / CRORE * 10.0).round() / 10.0)
        }
        _ => default_max_price(),
    }
}

/// Map a marketing label to a canonical type; unknown labels pass through
pub fn canonical_property_type(label: Option<&str>) -> String {
    let Some(label) = non_blank(label) else {
        return default_property_type();
    };

    PROPERTY_TYPE_LABELS
        .iter()
        .find(|(marketing, _)| marketing.eq_ignore_ascii_case(label))
        .map(|(_, canonical)| canonical.to_string())
        .unwrap_or_else(|| label.to_string())
}

fn non_blank(value: Option<&str>) -> Option<&str> {
    value.map(str::trim).filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::PriceRange;
    use serde_json::json;

    fn request(value: serde_json::Value) -> SearchRequest {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn villa_maps_to_house() {
        let criteria = normalize(&request(json!({ "type": "Villa" })));
        assert_eq!(criteria.property_type, "House");
    }

    #[test]
    fn labels_are_case_insensitive_and_unknown_pass_through() {
        assert_eq!(canonical_property_type(Some("modern")), "Flat");
        assert_eq!(canonical_property_type(Some(" INDEPENDENT ")), "House");
        assert_eq!(canonical_property_type(Some("Commercial")), "Commercial");
        assert_eq!(canonical_property_type(Some("Farmhouse")), "Farmhouse");
        assert_eq!(canonical_property_type(Some("  ")), "Flat");
        assert_eq!(canonical_property_type(None), "Flat");
    }

    #[test]
    fn missing_ceiling_uses_default() {
        for body in [
            json!({}),
            json!({ "price": {} }),
            json!({ "price": { "min": 2000000 } }),
            json!({ "price": { "max": "lots" } }),
            json!({ "price": { "max": 0 } }),
            json!({ "price": null }),
        ] {
            assert_eq!(normalize(&request(body)).max_price, "5");
        }
    }

    #[test]
    fn ceiling_is_converted_to_crores() {
        assert_eq!(max_price_crores(Some(25_000_000.0)), "2.5");
        assert_eq!(max_price_crores(Some(12_000_000.0)), "1.2");
        assert_eq!(max_price_crores(Some(100_000_000.0)), "10.0");
    }

    #[test]
    fn halves_round_up() {
        assert_eq!(max_price_crores(Some(2_500_000.0)), "0.3");
        assert_eq!(max_price_crores(Some(12_500_000.0)), "1.3");
        assert_eq!(max_price_crores(Some(32_500_000.0)), "3.3");
    }

    #[test]
    fn full_request_normalizes() {
        let criteria = normalize(&SearchRequest {
            city: Some("  Hyderabad ".to_string()),
            price: Some(PriceRange {
                min: Some(5_000_000.0),
                max: Some(15_000_000.0),
            }),
            property_type: Some("Modern".to_string()),
            category: Some("Residential".to_string()),
        });

        assert_eq!(
            criteria,
            SearchCriteria {
                city: "Hyderabad".to_string(),
                max_price: "1.5".to_string(),
                property_type: "Flat".to_string(),
                property_category: "Residential".to_string(),
                limit: 6,
            }
        );
    }

    #[test]
    fn limit_is_always_fixed() {
        let criteria = normalize(&request(json!({ "city": "Chennai", "limit": 50 })));
        assert_eq!(criteria.limit, DEFAULT_RESULT_LIMIT);
        assert_eq!(criteria.property_category, "Residential");
    }
}
