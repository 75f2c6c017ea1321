// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Data models for the application.

pub mod credential;
pub mod message;
pub mod stats;
pub mod submission;
pub mod theme;

pub use credential::CredentialRecord;
pub use message::{ExtensionMessage, PushSuccess};
pub use stats::{StatsSummary, UserStats};
pub use submission::SubmissionEvent;
pub use theme::Theme;
