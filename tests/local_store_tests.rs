// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! File-backed store persistence tests.

use leetpush::db::{keys, LocalStore};
use leetpush::error::AppError;
use leetpush::models::{Theme, UserStats};
use tempfile::TempDir;

#[tokio::test]
async fn test_values_survive_reopen() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");

    let store = LocalStore::open(&path).await.unwrap();
    store.save_credentials("ct", "iv", "octocat").await.unwrap();
    store.set_encryption_key("a2V5").await.unwrap();
    store.set_theme(Theme::Dark).await.unwrap();
    let stats = UserStats {
        push_count: 2,
        medium_count: 2,
        streak: 1,
        last_solve_date: "2026-10-18".to_string(),
        ..Default::default()
    };
    store.put_user_stats("octocat", &stats).await.unwrap();
    drop(store);

    let reopened = LocalStore::open(&path).await.unwrap();
    let creds = reopened.get_credentials().await.unwrap().unwrap();
    assert_eq!(creds.username, "octocat");
    assert_eq!(creds.encryption_key, "a2V5");
    assert_eq!(reopened.get_theme().await.unwrap(), Theme::Dark);
    assert_eq!(
        reopened.get_user_stats("octocat").await.unwrap(),
        Some(stats)
    );

    // Stored under the extension's key names
    let raw: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(raw[keys::GITHUB_USERNAME], "octocat");
    assert_eq!(raw[keys::USER_STATS]["octocat"]["pushCount"], 2);
}

#[tokio::test]
async fn test_missing_file_opens_empty() {
    let dir = TempDir::new().unwrap();
    let store = LocalStore::open(dir.path().join("absent.json")).await.unwrap();

    assert!(store.get_credentials().await.unwrap().is_none());
    assert!(store.get_all_user_stats().await.unwrap().is_empty());
}

#[tokio::test]
async fn test_corrupt_file_is_storage_error() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("store.json");
    std::fs::write(&path, "{not json").unwrap();

    let err = LocalStore::open(&path).await.err().unwrap();
    assert!(matches!(err, AppError::Storage(_)));
}
