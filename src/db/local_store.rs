// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! JSON-file key-value store with typed operations.
//!
//! Provides high-level operations for:
//! - Credentials (encrypted token, IV, key, username)
//! - User stats (keyed by GitHub username)
//! - Theme preference
//!
//! Every write is a single-key (or single-batch) replacement followed by a
//! full snapshot flush. There is no optimistic concurrency: two writers of
//! `userStats` race and the last one wins.

use crate::db::keys;
use crate::error::AppError;
use crate::models::{CredentialRecord, Theme, UserStats};
use dashmap::DashMap;
use serde::{de::DeserializeOwned, Serialize};
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;

/// Local key-value store.
#[derive(Clone)]
pub struct LocalStore {
    entries: Arc<DashMap<String, Value>>,
    /// Backing file; `None` keeps everything in memory.
    path: Option<PathBuf>,
    /// Serializes snapshot flushes so a stale snapshot never lands last.
    flush_lock: Arc<Mutex<()>>,
}

impl LocalStore {
    /// Open (or create on first write) a store backed by a JSON file.
    pub async fn open(path: impl AsRef<Path>) -> Result<Self, AppError> {
        let path = path.as_ref().to_path_buf();
        let entries = DashMap::new();

        match tokio::fs::read_to_string(&path).await {
            Ok(raw) if raw.trim().is_empty() => {}
            Ok(raw) => {
                let map: Map<String, Value> = serde_json::from_str(&raw).map_err(|e| {
                    AppError::Storage(format!("Corrupt store file {}: {}", path.display(), e))
                })?;
                for (key, value) in map {
                    entries.insert(key, value);
                }
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(AppError::Storage(format!(
                    "Failed to read {}: {}",
                    path.display(),
                    e
                )))
            }
        }

        tracing::info!(path = %path.display(), keys = entries.len(), "Opened local store");

        Ok(Self {
            entries: Arc::new(entries),
            path: Some(path),
            flush_lock: Arc::new(Mutex::new(())),
        })
    }

    /// Create a purely in-memory store (tests, ephemeral runs).
    pub fn in_memory() -> Self {
        Self {
            entries: Arc::new(DashMap::new()),
            path: None,
            flush_lock: Arc::new(Mutex::new(())),
        }
    }

    // ─── Raw Key Operations ──────────────────────────────────────

    /// Read and decode a key.
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, AppError> {
        let Some(value) = self.entries.get(key).map(|v| v.value().clone()) else {
            return Ok(None);
        };
        serde_json::from_value(value)
            .map(Some)
            .map_err(|e| AppError::Storage(format!("Failed to decode key {}: {}", key, e)))
    }

    /// Encode and write a key.
    pub async fn set<T: Serialize>(&self, key: &str, value: &T) -> Result<(), AppError> {
        let value = encode(key, value)?;
        self.entries.insert(key.to_string(), value);
        self.flush().await
    }

    /// Write several keys as one batch with a single flush.
    pub async fn set_many(&self, batch: Vec<(&str, Value)>) -> Result<(), AppError> {
        for (key, value) in batch {
            self.entries.insert(key.to_string(), value);
        }
        self.flush().await
    }

    /// Remove keys; missing keys are ignored.
    pub async fn remove(&self, keys: &[&str]) -> Result<(), AppError> {
        for key in keys {
            self.entries.remove(*key);
        }
        self.flush().await
    }

    /// Write the current snapshot to disk (temp file + rename).
    async fn flush(&self) -> Result<(), AppError> {
        let Some(path) = &self.path else {
            return Ok(());
        };

        let _guard = self.flush_lock.lock().await;

        let snapshot: Map<String, Value> = self
            .entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect();
        let body = serde_json::to_vec_pretty(&snapshot)
            .map_err(|e| AppError::Storage(format!("Failed to encode store: {}", e)))?;

        let tmp = path.with_extension("json.tmp");
        tokio::fs::write(&tmp, body)
            .await
            .map_err(|e| AppError::Storage(format!("Failed to write {}: {}", tmp.display(), e)))?;
        tokio::fs::rename(&tmp, path).await.map_err(|e| {
            AppError::Storage(format!("Failed to replace {}: {}", path.display(), e))
        })?;

        tracing::debug!(path = %path.display(), keys = snapshot.len(), "Store flushed");
        Ok(())
    }

    // ─── Credential Operations ───────────────────────────────────

    /// Full credential record, or `None` if any of its four parts is missing.
    pub async fn get_credentials(&self) -> Result<Option<CredentialRecord>, AppError> {
        let encrypted_token = self.get_non_empty(keys::ENCRYPTED_TOKEN).await?;
        let iv = self.get_non_empty(keys::IV).await?;
        let encryption_key = self.get_non_empty(keys::ENCRYPTION_KEY).await?;
        let username = self.get_non_empty(keys::GITHUB_USERNAME).await?;

        Ok(match (encrypted_token, iv, encryption_key, username) {
            (Some(encrypted_token), Some(iv), Some(encryption_key), Some(username)) => {
                Some(CredentialRecord {
                    encrypted_token,
                    iv,
                    encryption_key,
                    username,
                })
            }
            _ => None,
        })
    }

    /// Store token, IV and username in one batch. The key is stored
    /// separately via [`Self::set_encryption_key`].
    pub async fn save_credentials(
        &self,
        encrypted_token: &str,
        iv: &str,
        username: &str,
    ) -> Result<(), AppError> {
        self.set_many(vec![
            (keys::ENCRYPTED_TOKEN, Value::from(encrypted_token)),
            (keys::IV, Value::from(iv)),
            (keys::GITHUB_USERNAME, Value::from(username)),
        ])
        .await
    }

    /// Forget the signed-in account. The encryption key is kept for reuse.
    pub async fn clear_credentials(&self) -> Result<(), AppError> {
        self.remove(&[keys::ENCRYPTED_TOKEN, keys::IV, keys::GITHUB_USERNAME])
            .await
    }

    pub async fn get_encryption_key(&self) -> Result<Option<String>, AppError> {
        self.get_non_empty(keys::ENCRYPTION_KEY).await
    }

    pub async fn set_encryption_key(&self, key_b64: &str) -> Result<(), AppError> {
        self.set(keys::ENCRYPTION_KEY, &key_b64).await
    }

    pub async fn get_username(&self) -> Result<Option<String>, AppError> {
        self.get_non_empty(keys::GITHUB_USERNAME).await
    }

    async fn get_non_empty(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self
            .get::<String>(key)
            .await?
            .filter(|value| !value.is_empty()))
    }

    // ─── Stats Operations ────────────────────────────────────────

    /// All users' stats.
    pub async fn get_all_user_stats(&self) -> Result<HashMap<String, UserStats>, AppError> {
        Ok(self.get(keys::USER_STATS).await?.unwrap_or_default())
    }

    /// Stats for one user (`None` if never initialized).
    pub async fn get_user_stats(&self, username: &str) -> Result<Option<UserStats>, AppError> {
        Ok(self.get_all_user_stats().await?.remove(username))
    }

    /// Replace one user's stats, leaving other users untouched.
    pub async fn put_user_stats(&self, username: &str, stats: &UserStats) -> Result<(), AppError> {
        let mut all = self.get_all_user_stats().await?;
        all.insert(username.to_string(), stats.clone());
        self.set(keys::USER_STATS, &all).await
    }

    /// Create an empty stats entry for `username` if none exists.
    pub async fn ensure_user_stats(&self, username: &str) -> Result<(), AppError> {
        let mut all = self.get_all_user_stats().await?;
        if all.contains_key(username) {
            return Ok(());
        }
        all.insert(username.to_string(), UserStats::default());
        self.set(keys::USER_STATS, &all).await
    }

    // ─── Theme ───────────────────────────────────────────────────

    pub async fn get_theme(&self) -> Result<Theme, AppError> {
        Ok(self.get(keys::THEME).await?.unwrap_or_default())
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<(), AppError> {
        self.set(keys::THEME, &theme).await
    }
}

fn encode<T: Serialize>(key: &str, value: &T) -> Result<Value, AppError> {
    serde_json::to_value(value)
        .map_err(|e| AppError::Storage(format!("Failed to encode key {}: {}", key, e)))
}
