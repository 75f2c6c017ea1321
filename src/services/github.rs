// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub REST API client.
//!
//! Handles:
//! - Token verification (`GET /user`)
//! - Repository lookup and creation
//! - File upsert via the contents API
//!
//! GitHub signals success through the presence of fields (`login`, `id`,
//! `content`) rather than status codes; the only status we branch on is the
//! 404 from the repository lookup. Callers decide what a missing field means.

use crate::error::AppError;
use serde::{Deserialize, Serialize};

const USER_AGENT: &str = concat!("leetpush/", env!("CARGO_PKG_VERSION"));
const ACCEPT: &str = "application/vnd.github.v3+json";

/// GitHub API client.
#[derive(Clone)]
pub struct GitHubClient {
    http: reqwest::Client,
    base_url: String,
}

impl Default for GitHubClient {
    fn default() -> Self {
        Self::with_base_url("https://api.github.com")
    }
}

impl GitHubClient {
    /// Create a client against a specific API root (GHES or a test server).
    ///
    /// No request timeout is set: a hung call keeps the caller waiting.
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        let http = reqwest::Client::builder()
            .user_agent(USER_AGENT)
            .build()
            .unwrap_or_else(|e| {
                tracing::warn!(error = %e, "Falling back to default HTTP client");
                reqwest::Client::new()
            });

        Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Identity behind a token.
    pub async fn get_authenticated_user(&self, token: &str) -> Result<GitHubUser, AppError> {
        let url = format!("{}/user", self.base_url);
        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(e.to_string()))?;

        parse_json(response).await
    }

    /// Look up `owner/name`. A 404 is reported as [`RepoLookup::NotFound`];
    /// any other response body is returned for the caller to inspect.
    pub async fn get_repo(
        &self,
        token: &str,
        owner: &str,
        name: &str,
    ) -> Result<RepoLookup, AppError> {
        let url = format!(
            "{}/repos/{}/{}",
            self.base_url,
            urlencoding::encode(owner),
            urlencoding::encode(name)
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(RepoLookup::NotFound);
        }

        Ok(RepoLookup::Found(parse_json(response).await?))
    }

    /// Create a repository for the authenticated user with an initial commit
    /// on the default branch.
    pub async fn create_repo(
        &self,
        token: &str,
        name: &str,
        description: &str,
    ) -> Result<RepoResponse, AppError> {
        let url = format!("{}/user/repos", self.base_url);

        let body = serde_json::json!({
            "name": name,
            "description": description,
            "auto_init": true
        });

        let response = self
            .http
            .post(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(e.to_string()))?;

        parse_json(response).await
    }

    /// Create or overwrite a file through the contents API.
    ///
    /// Returns the HTTP status alongside the body so the caller can spot the
    /// 422 GitHub sends when overwriting without a `sha`.
    pub async fn put_file(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        path: &str,
        request: &PutFileRequest,
    ) -> Result<(u16, PutFileResponse), AppError> {
        let url = self.contents_url(owner, repo, path);

        let response = self
            .http
            .put(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .json(request)
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(e.to_string()))?;

        let status = response.status().as_u16();
        Ok((status, parse_json(response).await?))
    }

    /// Blob sha of an existing file on `branch`, if there is one.
    pub async fn get_file_sha(
        &self,
        token: &str,
        owner: &str,
        repo: &str,
        path: &str,
        branch: &str,
    ) -> Result<Option<String>, AppError> {
        let url = self.contents_url(owner, repo, path);

        let response = self
            .http
            .get(&url)
            .bearer_auth(token)
            .header(reqwest::header::ACCEPT, ACCEPT)
            .query(&[("ref", branch)])
            .send()
            .await
            .map_err(|e| AppError::GitHubApi(e.to_string()))?;

        if response.status() == reqwest::StatusCode::NOT_FOUND {
            return Ok(None);
        }

        let body: FileResponse = parse_json(response).await?;
        Ok(body.sha)
    }

    /// `path` is built from `[a-z0-9-]`, `/` and `.` only, so it is used as-is.
    fn contents_url(&self, owner: &str, repo: &str, path: &str) -> String {
        format!(
            "{}/repos/{}/{}/contents/{}",
            self.base_url,
            urlencoding::encode(owner),
            urlencoding::encode(repo),
            path
        )
    }
}

/// Decode a JSON body regardless of status.
async fn parse_json<T: for<'de> Deserialize<'de>>(
    response: reqwest::Response,
) -> Result<T, AppError> {
    let status = response.status();
    response.json().await.map_err(|e| {
        tracing::warn!(status = %status, error = %e, "Unparseable GitHub response");
        AppError::GitHubApi(format!("HTTP {}: JSON parse error: {}", status, e))
    })
}

/// `GET /user` response. `login` is absent for bad tokens.
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubUser {
    pub login: Option<String>,
    pub message: Option<String>,
}

/// Result of a repository lookup.
#[derive(Debug, Clone)]
pub enum RepoLookup {
    Found(RepoResponse),
    NotFound,
}

/// Repository response. `id` is absent on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct RepoResponse {
    pub id: Option<u64>,
    pub html_url: Option<String>,
    pub message: Option<String>,
}

/// Contents API write body.
#[derive(Debug, Clone, Serialize)]
pub struct PutFileRequest {
    pub message: String,
    /// Base64 file body
    pub content: String,
    pub branch: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sha: Option<String>,
}

/// Contents API write response. `content` is absent on failure.
#[derive(Debug, Clone, Deserialize)]
pub struct PutFileResponse {
    pub content: Option<serde_json::Value>,
    pub message: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct FileResponse {
    sha: Option<String>,
}
