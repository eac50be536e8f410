pub mod error;
pub mod handlers;

pub use error::ApiError;

use crate::insights::InsightGenerator;
use axum::routing::{get, post};
use axum::Router;
use std::sync::Arc;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub generator: Arc<InsightGenerator>,
}

impl AppState {
    pub fn new(generator: InsightGenerator) -> Self {
        Self {
            generator: Arc::new(generator),
        }
    }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(handlers::health))
        .route("/ai/search", post(handlers::ai_search))
        .route("/properties/search", post(handlers::search_properties))
        .route("/locations/:city/trends", get(handlers::location_trends))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
