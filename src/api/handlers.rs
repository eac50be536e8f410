use super::error::ApiError;
use super::AppState;
use crate::models::{
    AnalysisResult, LocationTrendResult, ScrapedLocality, ScrapedProperty, SearchCriteria,
    SearchRequest,
};
use crate::normalizer::normalize;
use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;
use serde_json::{json, Value};
use tracing::info;

#[derive(Debug, Serialize)]
pub struct SearchResponse {
    pub criteria: SearchCriteria,
    pub properties: Vec<ScrapedProperty>,
    pub analysis: AnalysisResult,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Serialize)]
pub struct TrendsResponse {
    pub city: String,
    pub locations: Vec<ScrapedLocality>,
    pub analysis: LocationTrendResult,
    pub generated_at: DateTime<Utc>,
}

pub async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "service": env!("CARGO_PKG_NAME"),
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

/// `POST /ai/search`: the browsing client's shape, normalized and delegated
#[tracing::instrument(skip(state, payload))]
pub async fn ai_search(
    State(state): State<AppState>,
    payload: Result<Json<SearchRequest>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(request) = payload?;
    let criteria = normalize(&request);
    info!(
        "AI search in {:?}: {} {} up to {} Cr",
        criteria.city, criteria.property_category, criteria.property_type, criteria.max_price
    );
    run_search(&state, criteria).await.map(Json)
}

/// `POST /properties/search`: the internal search shape
#[tracing::instrument(skip(state, payload))]
pub async fn search_properties(
    State(state): State<AppState>,
    payload: Result<Json<SearchCriteria>, JsonRejection>,
) -> Result<Json<SearchResponse>, ApiError> {
    let Json(criteria) = payload?;
    run_search(&state, criteria).await.map(Json)
}

/// `GET /locations/:city/trends`
#[tracing::instrument(skip(state))]
pub async fn location_trends(
    State(state): State<AppState>,
    Path(city): Path<String>,
) -> Result<Json<TrendsResponse>, ApiError> {
    let city = city.trim().to_string();
    if city.is_empty() {
        return Err(ApiError::BadRequest("City is required".to_string()));
    }

    let insights = state.generator.location_trends(&city).await?;
    Ok(Json(TrendsResponse {
        city,
        locations: insights.localities,
        analysis: insights.analysis,
        generated_at: Utc::now(),
    }))
}

async fn run_search(state: &AppState, criteria: SearchCriteria) -> Result<SearchResponse, ApiError> {
    if criteria.city.trim().is_empty() {
        return Err(ApiError::BadRequest("City is required".to_string()));
    }

    let insights = state.generator.search(&criteria).await?;
    info!(
        "Returning {} properties for {}",
        insights.properties.len(),
        criteria.city
    );

    Ok(SearchResponse {
        criteria,
        properties: insights.properties,
        analysis: insights.analysis,
        generated_at: Utc::now(),
    })
}
