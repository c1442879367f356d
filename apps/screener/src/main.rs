mod config;
mod errors;
mod extraction;
mod routes;
mod screening;
mod state;

use anyhow::{Context, Result};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::extraction::ner::{BertTokenClassifier, DisabledClassifier, TokenClassifier};
use crate::routes::build_router;
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on malformed values)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!("{}={}", env!("CARGO_PKG_NAME"), &config.rust_log))
        }))
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting resume screener v{}", env!("CARGO_PKG_VERSION"));

    // Initialize the token classifier (regex fallbacks only when no model is configured)
    let classifier = build_classifier(&config).await?;
    info!("NER backend: {}", classifier.backend());

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .with_context(|| format!("Cannot create {}", config.upload_dir.display()))?;
    tokio::fs::create_dir_all(&config.report_dir)
        .await
        .with_context(|| format!("Cannot create {}", config.report_dir.display()))?;
    info!(
        "Uploads in {}, reports in {}",
        config.upload_dir.display(),
        config.report_dir.display()
    );

    let state = AppState {
        config: config.clone(),
        classifier,
    };

    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive());

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Loads the BERT checkpoint when `NER_MODEL_DIR` is set. Model loading is
/// CPU- and IO-heavy, so it runs on a blocking thread.
async fn build_classifier(config: &Config) -> Result<Arc<dyn TokenClassifier>> {
    let Some(model_dir) = config.ner_model_dir.clone() else {
        warn!("NER_MODEL_DIR not set; names come from the rule-based extractor only");
        return Ok(Arc::new(DisabledClassifier));
    };

    let max_tokens = config.ner_max_tokens;
    let classifier =
        tokio::task::spawn_blocking(move || BertTokenClassifier::load(&model_dir, max_tokens))
            .await
            .context("NER model loader panicked")?
            .context("Failed to load NER model")?;

    Ok(Arc::new(classifier))
}
