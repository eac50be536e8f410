//! AI property insights for a real-estate marketplace.
//!
//! A search request is normalized, listings are scraped through an
//! extraction provider, a hosted model analyses them (with a fallback model),
//! and the model's answer is coerced into a stable result shape.

pub mod api;
pub mod coerce;
pub mod config;
pub mod errors;
pub mod insights;
pub mod llm;
pub mod models;
pub mod normalizer;
pub mod scrapers;
