//! Review sentiment HTTP service binary.
//!
//! Loads configuration, wires the catalog client, classifier, and history
//! store into the analysis service, and serves the JSON API.

use review_sentiment::utils::{init_logging, load_config, AppConfig};
use review_sentiment::{
    api, AnalysisHistoryStore, AnalysisService, OpenAiBackend, PlayCatalogClient, ReviewFetcher,
    SentimentClassifier,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tracing::info;

/// Environment variable naming the config file to load
const CONFIG_ENV: &str = "REVIEW_SENTIMENT_CONFIG";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let mut config = match std::env::var(CONFIG_ENV) {
        Ok(path) => load_config(&path)?,
        Err(_) => AppConfig::default(),
    };

    // PORT overrides the configured port for platform deployments
    if let Some(port) = std::env::var("PORT").ok().and_then(|p| p.parse().ok()) {
        config.server.port = port;
    }

    init_logging(&config.logging);

    let catalog = Arc::new(PlayCatalogClient::with_base_url(
        &config.catalog.base_url,
        config.catalog.timeout_ms,
    )?);
    let fetcher = ReviewFetcher::new(catalog).with_review_count(config.catalog.review_count);

    let classifier = match config.llm.get_api_key() {
        Some(api_key) => {
            let backend = OpenAiBackend::new(&api_key, &config.llm.model, config.llm.timeout_ms)?;
            let classifier = SentimentClassifier::new(Box::new(backend));
            if config.llm.enable_cache {
                classifier
            } else {
                classifier.without_cache()
            }
        }
        None => SentimentClassifier::fallback_only(),
    };

    let history = Arc::new(AnalysisHistoryStore::new());
    let service = AnalysisService::new(fetcher, Arc::new(classifier), history);

    let app = api::router(Arc::new(service));

    let addr: SocketAddr = config.server.bind_addr().parse()?;
    info!("review sentiment service listening on {addr}");

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    Ok(())
}

async fn shutdown_signal() {
    tokio::signal::ctrl_c().await.ok();
    info!("shutdown signal received");
}
