use axum::body::Body;
use axum::http::{header, Method, Request, StatusCode};
use axum::Router;
use property_insights::api::{self, AppState};
use property_insights::config::{LlmConfig, ScraperConfig};
use property_insights::insights::InsightGenerator;
use property_insights::llm::OpenAiCompatibleClient;
use property_insights::scrapers::FirecrawlScraper;
use serde_json::{json, Value};
use std::sync::Arc;
use tower::ServiceExt;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

/// Router wired to real clients pointed at `server`
fn app(server: &MockServer) -> Router {
    let scraper = FirecrawlScraper::new(ScraperConfig::with_base_url("fc", server.uri())).unwrap();
    let llm = OpenAiCompatibleClient::new(LlmConfig::with_base_url("llm", server.uri())).unwrap();
    let generator = InsightGenerator::new(Arc::new(scraper), Arc::new(llm), "primary", "fallback");
    api::router(AppState::new(generator))
}

async fn send(app: Router, method: Method, uri: &str, body: Option<Value>) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    let body = match body {
        Some(json) => {
            builder = builder.header(header::CONTENT_TYPE, "application/json");
            Body::from(json.to_string())
        }
        None => Body::empty(),
    };

    let response = app.oneshot(builder.body(body).unwrap()).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

async fn mount_listings(server: &MockServer, count: usize) {
    let rows: Vec<Value> = (1..=count)
        .map(|i| {
            json!({
                "building_name": format!("Project {i}"),
                "location_address": format!("Gachibowli Phase {i}"),
                "price": format!("₹{i} Cr"),
                "amenities": ["Clubhouse"]
            })
        })
        .collect();

    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "json": { "properties": rows } }
        })))
        .mount(server)
        .await;
}

async fn mount_completion(server: &MockServer, status: u16, content: &str) {
    let template = if status == 200 {
        ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{ "message": { "role": "assistant", "content": content } }]
        }))
    } else {
        ResponseTemplate::new(status).set_body_string(content)
    };

    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(template)
        .mount(server)
        .await;
}

#[tokio::test]
async fn health_reports_ok() {
    let server = MockServer::start().await;
    let (status, body) = send(app(&server), Method::GET, "/health", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
}

#[tokio::test]
async fn ai_search_normalizes_and_caps_results() {
    let server = MockServer::start().await;
    mount_listings(&server, 12).await;
    mount_completion(
        &server,
        200,
        r#"```json
{"overview":[{"name":"Project 2","price":"₹2 Cr"}],"best_value":{"name":"Project 2","price":"₹2 Cr","reason":"Largest carpet area"},"recommendations":["Check the OC status"]}
```"#,
    )
    .await;

    let (status, body) = send(
        app(&server),
        Method::POST,
        "/ai/search",
        Some(json!({
            "city": "Hyderabad",
            "price": { "min": 5000000, "max": 30000000 },
            "type": "Villa",
            "category": "Residential"
        })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["criteria"]["maxPrice"], "3.0");
    assert_eq!(body["criteria"]["propertyType"], "House");
    assert_eq!(body["criteria"]["limit"], 6);
    assert_eq!(body["properties"].as_array().unwrap().len(), 6);
    assert_eq!(body["properties"][5]["building_name"], "Project 6");
    assert_eq!(body["analysis"]["best_value"]["reason"], "Largest carpet area");
    assert!(body["analysis"].get("error").is_none());
}

#[tokio::test]
async fn model_outage_still_returns_properties() {
    let server = MockServer::start().await;
    mount_listings(&server, 4).await;
    mount_completion(&server, 503, "upstream unavailable").await;

    let (status, body) = send(
        app(&server),
        Method::POST,
        "/properties/search",
        Some(json!({ "city": "Hyderabad", "maxPrice": "2.0", "propertyType": "Flat" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["properties"].as_array().unwrap().len(), 4);
    assert_eq!(body["analysis"]["error"], "Analysis format issue");
    assert_eq!(body["analysis"]["overview"].as_array().unwrap().len(), 3);
    assert_eq!(body["analysis"]["overview"][0]["name"], "Project 1");
    assert!(body["analysis"]["best_value"].is_null());
}

#[tokio::test]
async fn scrape_failure_is_a_server_error() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let (status, body) = send(
        app(&server),
        Method::POST,
        "/ai/search",
        Some(json!({ "city": "Kolkata" })),
    )
    .await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Failed to fetch property data"));
}

#[tokio::test]
async fn blank_city_is_rejected() {
    let server = MockServer::start().await;
    let (status, body) = send(
        app(&server),
        Method::POST,
        "/ai/search",
        Some(json!({ "type": "Villa" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "City is required");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn location_trends_round_trip() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/scrape"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "json": { "localities": [
                { "location": "Salt Lake", "price_per_sqft": "₹8,200", "yearly_change": "5.5%", "rental_yield": "3%" },
                { "location": "New Town", "price_per_sqft": "₹6,100", "yearly_change": "9.1%", "rental_yield": "3.4%" }
            ] } }
        })))
        .mount(&server)
        .await;
    mount_completion(&server, 200, "Sorry, I cannot answer that").await;

    let (status, body) = send(app(&server), Method::GET, "/locations/Kolkata/trends", None).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["city"], "Kolkata");
    assert_eq!(body["locations"].as_array().unwrap().len(), 2);
    assert_eq!(body["analysis"]["error"], "Analysis format issue");
    assert_eq!(body["analysis"]["trends"][1]["price_per_sqft"], 6100.0);
    assert_eq!(body["analysis"]["top_appreciation"], "New Town");
    assert_eq!(body["analysis"]["best_rental_yield"], "New Town");
}

#[tokio::test]
async fn properties_search_without_city_is_a_json_bad_request() {
    let server = MockServer::start().await;
    let (status, body) = send(
        app(&server),
        Method::POST,
        "/properties/search",
        Some(json!({ "maxPrice": "2.0" })),
    )
    .await;

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["error"], "City is required");
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test]
async fn properties_search_accepts_numeric_price_and_quoted_limit() {
    let server = MockServer::start().await;
    mount_listings(&server, 8).await;
    mount_completion(&server, 200, "{}").await;

    let (status, body) = send(
        app(&server),
        Method::POST,
        "/properties/search",
        Some(json!({ "city": "Pune", "maxPrice": 2.5, "limit": "4" })),
    )
    .await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["criteria"]["maxPrice"], "2.5");
    assert_eq!(body["criteria"]["limit"], 4);
    assert_eq!(body["properties"].as_array().unwrap().len(), 4);
}

#[tokio::test]
async fn malformed_body_is_a_json_bad_request() {
    let server = MockServer::start().await;
    let request = Request::builder()
        .method(Method::POST)
        .uri("/properties/search")
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from("{ not json"))
        .unwrap();

    let response = app(&server).oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let body: Value = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert!(body["error"]
        .as_str()
        .unwrap()
        .starts_with("Invalid request body"));
}
