// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! LeetPush companion service
//!
//! Runs the background push worker and exposes the loopback API the
//! browser extension's page script and popup talk to.

use leetpush::{
    config::Config,
    db::LocalStore,
    services::{spawn_worker, AccountService, GitHubClient, Notifier, PushOrchestrator},
    AppState,
};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    init_logging()?;

    // Load configuration from environment
    let config = Config::from_env()?;
    tracing::info!(port = config.port, "Starting LeetPush service");

    // Open the local key-value store
    let store = LocalStore::open(&config.store_path).await?;
    tracing::info!(path = %config.store_path.display(), "Local store opened");

    let github = GitHubClient::with_base_url(config.github_api_url.clone());

    // Background worker and its completion fan-out
    let notifier = Notifier::default();
    let orchestrator = PushOrchestrator::new(
        store.clone(),
        github.clone(),
        config.repo_name.clone(),
        config.github_web_url.clone(),
    );
    let background = spawn_worker(orchestrator, notifier.clone());
    tracing::info!(repo = %config.repo_name, "Background worker started");

    if config.api_key.is_none() {
        tracing::warn!("LEETPUSH_API_KEY not set; local API accepts any caller");
    }

    // Build shared state
    let state = Arc::new(AppState {
        config: config.clone(),
        account: AccountService::new(store.clone(), github),
        store,
        background,
        notifier,
    });

    // Build router
    let app = leetpush::routes::create_router(state);

    // Loopback only
    let addr = format!("127.0.0.1:{}", config.port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!(address = %addr, "Server listening");

    axum::serve(listener, app).await?;
    Ok(())
}

/// Initialize structured JSON logging.
fn init_logging() -> Result<(), Box<dyn std::error::Error>> {
    let format = tracing_subscriber::fmt::layer()
        .json()
        .with_target(false)
        .with_current_span(true)
        .flatten_event(true);

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("leetpush=debug".parse()?)
                .add_directive("info".parse()?),
        )
        .with(format)
        .init();
    Ok(())
}
