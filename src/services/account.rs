// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! GitHub sign-in and logout.
//!
//! Single-account model: signing in replaces whatever credential was stored,
//! logging out drops token, IV and username but keeps the encryption key
//! (reused on the next sign-in) and all stats.

use crate::db::LocalStore;
use crate::error::{AppError, Result};
use crate::services::cipher::{generate_key, TokenCipher};
use crate::services::github::GitHubClient;

#[derive(Clone)]
pub struct AccountService {
    store: LocalStore,
    github: GitHubClient,
}

impl AccountService {
    pub fn new(store: LocalStore, github: GitHubClient) -> Self {
        Self { store, github }
    }

    /// Verify a personal access token and store it encrypted.
    ///
    /// Returns the GitHub login the token belongs to.
    pub async fn sign_in(&self, token: &str) -> Result<String> {
        let token = token.trim();
        if token.is_empty() {
            return Err(AppError::BadRequest(
                "Please enter a valid GitHub token.".to_string(),
            ));
        }

        let user = self.github.get_authenticated_user(token).await?;
        let login = match user.login.filter(|l| !l.is_empty()) {
            Some(login) => login,
            None => {
                tracing::warn!(message = ?user.message, "Token rejected by GitHub");
                return Err(AppError::InvalidToken);
            }
        };

        let key = match self.store.get_encryption_key().await? {
            Some(key) => key,
            None => {
                let key = generate_key()?;
                self.store.set_encryption_key(&key).await?;
                tracing::info!("Generated new token encryption key");
                key
            }
        };

        let sealed = TokenCipher::from_base64_key(&key)?.encrypt(token)?;

        self.store.ensure_user_stats(&login).await?;
        self.store
            .save_credentials(&sealed.ciphertext, &sealed.iv, &login)
            .await?;

        tracing::info!(user = %login, "Signed in");
        Ok(login)
    }

    /// Forget the stored credential.
    pub async fn logout(&self) -> Result<()> {
        self.store.clear_credentials().await?;
        tracing::info!("Logged out");
        Ok(())
    }

    /// Signed-in username, if a complete credential is stored.
    pub async fn current_user(&self) -> Result<Option<String>> {
        Ok(self.store.get_credentials().await?.map(|c| c.username))
    }
}
