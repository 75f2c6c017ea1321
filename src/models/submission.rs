// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Accepted-submission payload handed from the page observer to the pusher.

use serde::{Deserialize, Serialize};
use validator::Validate;

/// Default title when no heading on the page matches.
pub const DEFAULT_TITLE: &str = "leetcode-problem";
/// Default language when no language control matches.
pub const DEFAULT_LANGUAGE: &str = "unknown";
/// Default difficulty when no difficulty badge matches.
pub const DEFAULT_DIFFICULTY: &str = "Unknown";

/// One accepted submission, scraped from the judge page.
///
/// Transient: produced once per accepted verdict and consumed immediately
/// by the push orchestrator. Never persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct SubmissionEvent {
    /// Problem title as displayed on the page
    #[validate(length(min = 1, max = 300))]
    pub problem_title: String,
    /// Normalized source code
    pub code: String,
    /// Lower-cased language name (`python3`, `cpp`, ...)
    #[validate(length(max = 64))]
    pub language: String,
    /// Difficulty label (`Easy`, `Medium`, `Hard`, or `Unknown`)
    #[validate(length(max = 32))]
    pub difficulty: String,
}
