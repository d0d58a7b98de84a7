//! STUDYSync - document Q&A front end.
//!
//! Serves the single page and relays its upload, ask and summary download
//! actions to the document backend.

use anyhow::Context;
use std::sync::Arc;

use studysync::{config::Config, router, AppState};

// ============================================================================
// Main
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Config::from_env().context("Invalid configuration")?;
    let bind = config.bind;

    match &config.backend_url {
        Some(url) => log::info!("Backend: {}", url),
        None => log::info!(
            "Backend: page host on port {} (set STUDYSYNC_BACKEND_URL to pin it)",
            config.backend_port
        ),
    }

    let state = Arc::new(AppState::new(config));
    let app = router(state);

    let listener = tokio::net::TcpListener::bind(bind)
        .await
        .with_context(|| format!("Failed to bind to {}", bind))?;

    log::info!("STUDYSync running at http://{}", bind);

    axum::serve(listener, app).await.context("Server error")?;
    Ok(())
}
