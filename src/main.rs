use anyhow::Context;
use property_insights::api::{self, AppState};
use property_insights::config::Config;
use property_insights::insights::InsightGenerator;
use tracing::info;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🏠 Property Insights API");

    let config = Config::from_env().context("Failed to load configuration")?;
    let generator = InsightGenerator::from_config(&config)?;
    let app = api::router(AppState::new(generator));

    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;
    info!("Listening on {}", config.bind_addr);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
