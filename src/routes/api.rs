// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Extension message, stats and preference routes.

use crate::error::{AppError, Result};
use crate::models::{ExtensionMessage, StatsSummary, Theme};
use crate::AppState;
use axum::{
    extract::State,
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/api/messages", post(post_message))
        .route("/api/notifications", get(get_notifications))
        .route("/api/stats", get(get_stats))
        .route("/api/theme", get(get_theme).put(put_theme))
}

// ─── Messages ────────────────────────────────────────────────

#[derive(Serialize)]
pub struct QueuedResponse {
    pub queued: bool,
}

/// Accept a `pushToGitHub` message and hand it to the background worker.
///
/// One-way: the response only says the message was queued. The outcome is
/// published later as a `pushSuccess` or `pushError` notification.
async fn post_message(
    State(state): State<Arc<AppState>>,
    Json(message): Json<ExtensionMessage>,
) -> Result<(StatusCode, Json<QueuedResponse>)> {
    let ExtensionMessage::PushToGitHub(event) = message else {
        return Err(AppError::BadRequest(
            "only pushToGitHub messages are accepted".to_string(),
        ));
    };

    event
        .validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    tracing::info!(problem = %event.problem_title, "Queued push request");

    if !state.background.send(ExtensionMessage::PushToGitHub(event)) {
        return Err(AppError::Internal(anyhow::anyhow!(
            "Background worker is not running"
        )));
    }

    Ok((StatusCode::ACCEPTED, Json(QueuedResponse { queued: true })))
}

/// Drain completion messages published since the last poll.
async fn get_notifications(State(state): State<Arc<AppState>>) -> Json<Vec<ExtensionMessage>> {
    Json(state.notifier.drain())
}

// ─── Stats ───────────────────────────────────────────────────

/// Popup counters for the signed-in user.
async fn get_stats(State(state): State<Arc<AppState>>) -> Result<Json<StatsSummary>> {
    let username = state
        .store
        .get_username()
        .await?
        .ok_or(AppError::NotAuthenticated)?;

    let stats = state
        .store
        .get_user_stats(&username)
        .await?
        .unwrap_or_default();

    Ok(Json(stats.summarize(&username, chrono::Utc::now())))
}

// ─── Theme ───────────────────────────────────────────────────

#[derive(Serialize, Deserialize)]
pub struct ThemeBody {
    pub theme: Theme,
}

async fn get_theme(State(state): State<Arc<AppState>>) -> Result<Json<ThemeBody>> {
    let theme = state.store.get_theme().await?;
    Ok(Json(ThemeBody { theme }))
}

async fn put_theme(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ThemeBody>,
) -> Result<Json<ThemeBody>> {
    state.store.set_theme(body.theme).await?;
    Ok(Json(body))
}
