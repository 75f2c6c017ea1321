// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub token sign-in routes.

use axum::{
    extract::State,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use validator::Validate;

use crate::error::{AppError, Result};
use crate::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new()
        .route("/auth/status", get(status))
        .route("/auth/token", post(save_token))
        .route("/auth/logout", post(logout))
}

#[derive(Deserialize, Validate)]
pub struct SaveTokenRequest {
    #[validate(length(min = 1, max = 512))]
    token: String,
}

#[derive(Serialize)]
pub struct SignInResponse {
    pub username: String,
}

#[derive(Serialize)]
pub struct StatusResponse {
    pub signed_in: bool,
    pub username: Option<String>,
}

#[derive(Serialize)]
pub struct LogoutResponse {
    pub success: bool,
}

/// Verify a personal access token and store it encrypted.
async fn save_token(
    State(state): State<Arc<AppState>>,
    Json(body): Json<SaveTokenRequest>,
) -> Result<Json<SignInResponse>> {
    body.validate()
        .map_err(|e| AppError::BadRequest(e.to_string()))?;

    let username = state.account.sign_in(&body.token).await?;
    Ok(Json(SignInResponse { username }))
}

async fn status(State(state): State<Arc<AppState>>) -> Result<Json<StatusResponse>> {
    let username = state.account.current_user().await?;
    Ok(Json(StatusResponse {
        signed_in: username.is_some(),
        username,
    }))
}

async fn logout(State(state): State<Arc<AppState>>) -> Result<Json<LogoutResponse>> {
    state.account.logout().await?;
    Ok(Json(LogoutResponse { success: true }))
}
