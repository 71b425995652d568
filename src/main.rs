use std::sync::Arc;

use docsearch::api;
use docsearch::config::Config;
use docsearch::search::SearchClient;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing subscriber (handles both tracing and log crate)
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .with_target(true)
        .init();

    let config = Config::from_env()?;
    if config.api_key.is_empty() {
        tracing::warn!("no search API key configured, searches will fail");
    }

    let client = Arc::new(SearchClient::new(&config)?);
    let router = api::create_router(client);

    let addr = format!("0.0.0.0:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("listening on {addr}");
    axum::serve(listener, router).await?;
    Ok(())
}
