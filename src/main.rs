use std::sync::Arc;

use folio_chat::config::ChatConfig;
use folio_chat::services::http::{self, AppState};
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize logging/tracing
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = ChatConfig::from_env()?;
    tracing::info!(
        language = %config.default_language,
        processing_delay_ms = config.processing_delay_ms,
        "folio chat endpoint booting"
    );

    let state = Arc::new(AppState::from_config(&config));
    let listener = tokio::net::TcpListener::bind(config.bind).await?;
    http::serve(listener, state).await?;
    Ok(())
}
