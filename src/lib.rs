// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! LeetPush: push accepted judge submissions to GitHub
//!
//! This crate provides the page observer that detects accepted submissions
//! and scrapes their code, the push workflow that commits them to the user's
//! solutions repository, and a small local API the browser extension talks to.

pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod observer;
pub mod routes;
pub mod services;
pub mod time_utils;

use config::Config;
use db::LocalStore;
use services::{AccountService, BackgroundHandle, Notifier};

/// Shared application state.
pub struct AppState {
    pub config: Config,
    pub store: LocalStore,
    pub account: AccountService,
    pub background: BackgroundHandle,
    pub notifier: Notifier,
}
