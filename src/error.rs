// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Application error types with consistent API responses.
//!
//! The display strings double as the messages shown to the user in the
//! extension's alerts, so keep them short and human-readable.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;

/// Application error type that converts to HTTP responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    #[error("Please sign in with your GitHub token in the extension popup.")]
    NotAuthenticated,

    #[error("Error decrypting token: {0}")]
    Decryption(String),

    #[error("Code is too short or empty. Please check the editor.")]
    ContentTooShort,

    #[error("Failed to access or create repository: {0}")]
    RepoAccess(String),

    #[error("Failed to push code: {0}")]
    PushFailed(String),

    #[error("Failed to extract code. Please try submitting again.")]
    ExtractionFailed,

    #[error("Invalid token. Please try again.")]
    InvalidToken,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("GitHub API error: {0}")]
    GitHubApi(String),

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

/// Fallback for GitHub responses that carry no `message` field.
pub const UNKNOWN_ERROR: &str = "Unknown error";

/// JSON error response body
#[derive(Serialize)]
struct ErrorResponse {
    error: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<String>,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let details = Some(self.to_string());
        let (status, error, details) = match &self {
            AppError::NotAuthenticated => (StatusCode::UNAUTHORIZED, "not_authenticated", details),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "invalid_token", details),
            AppError::Decryption(msg) => {
                tracing::error!(error = %msg, "Token decryption failed");
                (StatusCode::INTERNAL_SERVER_ERROR, "decryption_error", details)
            }
            AppError::ContentTooShort => {
                (StatusCode::UNPROCESSABLE_ENTITY, "content_too_short", details)
            }
            AppError::ExtractionFailed => {
                (StatusCode::UNPROCESSABLE_ENTITY, "extraction_failed", details)
            }
            AppError::RepoAccess(_) => (StatusCode::BAD_GATEWAY, "repo_access_error", details),
            AppError::PushFailed(_) => (StatusCode::BAD_GATEWAY, "push_failed", details),
            AppError::GitHubApi(_) => (StatusCode::BAD_GATEWAY, "github_error", details),
            AppError::BadRequest(msg) => {
                (StatusCode::BAD_REQUEST, "bad_request", Some(msg.clone()))
            }
            AppError::Storage(msg) => {
                tracing::error!(error = %msg, "Storage error");
                (StatusCode::INTERNAL_SERVER_ERROR, "storage_error", None)
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "Internal server error");
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error", None)
            }
        };

        let body = ErrorResponse {
            error: error.to_string(),
            details,
        };

        (status, Json(body)).into_response()
    }
}

/// Result type alias for handlers
pub type Result<T> = std::result::Result<T, AppError>;
