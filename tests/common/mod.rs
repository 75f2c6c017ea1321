// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use leetpush::config::Config;
use leetpush::db::LocalStore;
use leetpush::models::SubmissionEvent;
use leetpush::routes::create_router;
use leetpush::services::cipher::generate_key;
use leetpush::services::{
    spawn_worker, AccountService, GitHubClient, Notifier, PushOrchestrator, TokenCipher,
};
use leetpush::AppState;
use std::sync::Arc;
use wiremock::MockServer;

pub const TEST_USER: &str = "octocat";
pub const TEST_TOKEN: &str = "ghp_testtoken0123456789";

/// A solution long enough to pass the push length check.
#[allow(dead_code)]
pub const SOLUTION: &str = "class Solution:\n    def twoSum(self, nums, target):\n        seen = {}\n        for i, n in enumerate(nums):\n            if target - n in seen:\n                return [seen[target - n], i]\n            seen[n] = i\n";

/// Store a credential for `TEST_USER` the same way sign-in does.
#[allow(dead_code)]
pub async fn store_credentials(store: &LocalStore) {
    let key = generate_key().unwrap();
    store.set_encryption_key(&key).await.unwrap();

    let sealed = TokenCipher::from_base64_key(&key)
        .unwrap()
        .encrypt(TEST_TOKEN)
        .unwrap();
    store.ensure_user_stats(TEST_USER).await.unwrap();
    store
        .save_credentials(&sealed.ciphertext, &sealed.iv, TEST_USER)
        .await
        .unwrap();
}

#[allow(dead_code)]
pub fn submission(difficulty: &str) -> SubmissionEvent {
    SubmissionEvent {
        problem_title: "Two Sum".to_string(),
        code: SOLUTION.to_string(),
        language: "python3".to_string(),
        difficulty: difficulty.to_string(),
    }
}

#[allow(dead_code)]
pub fn test_config(server: &MockServer) -> Config {
    Config {
        github_api_url: server.uri(),
        ..Config::default()
    }
}

/// Orchestrator against the mock server, with an in-memory store.
#[allow(dead_code)]
pub fn test_orchestrator(server: &MockServer) -> (PushOrchestrator, LocalStore) {
    let config = test_config(server);
    let store = LocalStore::in_memory();
    let orchestrator = PushOrchestrator::new(
        store.clone(),
        GitHubClient::with_base_url(config.github_api_url),
        config.repo_name,
        config.github_web_url,
    );
    (orchestrator, store)
}

/// Create a test app wired to the mock server.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(config: Config) -> (axum::Router, Arc<AppState>) {
    let store = LocalStore::in_memory();
    let github = GitHubClient::with_base_url(config.github_api_url.clone());
    let notifier = Notifier::default();

    let orchestrator = PushOrchestrator::new(
        store.clone(),
        github.clone(),
        config.repo_name.clone(),
        config.github_web_url.clone(),
    );
    let background = spawn_worker(orchestrator, notifier.clone());

    let state = Arc::new(AppState {
        config,
        account: AccountService::new(store.clone(), github),
        store,
        background,
        notifier,
    });

    (create_router(state.clone()), state)
}
