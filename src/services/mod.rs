// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Services module - business logic layer.

pub mod account;
pub mod background;
pub mod cipher;
pub mod github;
pub mod push;

pub use account::AccountService;
pub use background::{spawn_worker, BackgroundHandle, Notifier};
pub use cipher::TokenCipher;
pub use github::GitHubClient;
pub use push::{PushOrchestrator, PushOutcome};
