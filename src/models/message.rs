// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Messages exchanged between the page and the background worker.

use serde::{Deserialize, Serialize};

use crate::models::SubmissionEvent;

/// Extension message, tagged by `action` on the wire.
///
/// `pushToGitHub` flows page → background and is never answered directly;
/// the outcome arrives later as a separate `pushSuccess` or `pushError`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum ExtensionMessage {
    PushToGitHub(SubmissionEvent),
    PushSuccess(PushSuccess),
    PushError { error: String },
}

/// Completion notice for a confirmed push.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PushSuccess {
    /// Deep link to the solutions folder
    pub repo_url: String,
    pub problem_title: String,
}

impl ExtensionMessage {
    /// True for the two messages that end a push round-trip.
    pub fn is_completion(&self) -> bool {
        matches!(
            self,
            ExtensionMessage::PushSuccess(_) | ExtensionMessage::PushError { .. }
        )
    }
}
