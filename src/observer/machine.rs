// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Submission detection state machine.
//!
//! The verdict region re-renders several times per verdict, so a detection
//! needs three things at once: the success marker in the text, text that
//! differs from the last handled verdict, and the cooldown elapsed since the
//! previous accepted detection. Once a detection starts, the gate stays
//! closed until the user declines, the push completes, or the page navigates.

use std::time::{Duration, Instant};

use crate::models::SubmissionEvent;
use crate::observer::dom::PageDom;
use crate::observer::extract::{extract_submission, result_text};

/// Minimum spacing between two accepted detections.
pub const SUBMISSION_COOLDOWN: Duration = Duration::from_secs(10);

/// Verdict text that marks a successful submission.
pub const ACCEPTED_MARKER: &str = "Accepted";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverState {
    /// Not watching the page.
    Idle,
    /// Watching mutations and polling.
    Armed,
    Detected,
    Extracting,
    /// Prompt shown; watcher disconnected.
    AwaitingConfirmation,
    /// User said yes; waiting for the background's completion message.
    AwaitingPushResult,
}

/// Per-page detection bookkeeping. Reset wholesale on navigation.
#[derive(Debug, Clone, Default)]
pub struct SessionState {
    /// When the last accepted verdict was handled
    pub last_accepted_at: Option<Instant>,
    /// Verdict text handled last
    pub last_result_text: String,
    /// Re-entrancy gate
    pub processing: bool,
}

/// Outcome of one detection attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Detection {
    /// Watcher disconnected (prompt open or declined earlier).
    NotWatching,
    /// A previous detection is still being handled.
    Busy,
    /// No new accepted verdict on the page.
    NoVerdict,
    /// New accepted verdict inside the cooldown window.
    CoolingDown,
    /// Every extraction strategy came up empty; gate released.
    ExtractionFailed,
    /// Submission extracted; ask the user about `problem_title`.
    Prompt { problem_title: String },
}

/// The page observer for one tab.
#[derive(Debug)]
pub struct PageObserver {
    state: ObserverState,
    session: SessionState,
    pending: Option<SubmissionEvent>,
    cooldown: Duration,
}

impl Default for PageObserver {
    fn default() -> Self {
        Self::new(SUBMISSION_COOLDOWN)
    }
}

impl PageObserver {
    pub fn new(cooldown: Duration) -> Self {
        Self {
            state: ObserverState::Idle,
            session: SessionState::default(),
            pending: None,
            cooldown,
        }
    }

    pub fn state(&self) -> ObserverState {
        self.state
    }

    pub fn session(&self) -> &SessionState {
        &self.session
    }

    /// The submission waiting on the prompt, if any.
    pub fn pending(&self) -> Option<&SubmissionEvent> {
        self.pending.as_ref()
    }

    pub fn is_watching(&self) -> bool {
        self.state == ObserverState::Armed
    }

    /// Start watching (content script injected).
    pub fn arm(&mut self) {
        if self.state == ObserverState::Idle {
            self.state = ObserverState::Armed;
        }
    }

    /// One detection attempt, from a mutation callback or a poll tick.
    pub fn check(&mut self, dom: &dyn PageDom, now: Instant) -> Detection {
        if self.session.processing {
            return Detection::Busy;
        }
        if self.state != ObserverState::Armed {
            return Detection::NotWatching;
        }

        let text = result_text(dom);
        if !text.contains(ACCEPTED_MARKER) || text == self.session.last_result_text {
            return Detection::NoVerdict;
        }
        if let Some(prev) = self.session.last_accepted_at {
            if now.saturating_duration_since(prev) < self.cooldown {
                return Detection::CoolingDown;
            }
        }

        self.session.last_accepted_at = Some(now);
        self.session.last_result_text = text;
        self.session.processing = true;
        self.state = ObserverState::Detected;
        tracing::info!("Accepted submission detected");

        self.state = ObserverState::Extracting;
        match extract_submission(dom) {
            Ok(event) => {
                let problem_title = event.problem_title.clone();
                tracing::info!(
                    problem = %problem_title,
                    language = %event.language,
                    difficulty = %event.difficulty,
                    len = event.code.len(),
                    "Submission extracted"
                );
                self.pending = Some(event);
                self.state = ObserverState::AwaitingConfirmation;
                Detection::Prompt { problem_title }
            }
            Err(e) => {
                tracing::warn!(error = %e, "Code extraction failed");
                self.session.processing = false;
                self.state = ObserverState::Armed;
                Detection::ExtractionFailed
            }
        }
    }

    /// Apply the user's answer. Returns the submission to hand to the
    /// background when the answer is yes.
    pub fn answer(&mut self, push: bool) -> Option<SubmissionEvent> {
        if self.state != ObserverState::AwaitingConfirmation {
            return None;
        }
        let event = self.pending.take();
        if push && event.is_some() {
            self.state = ObserverState::AwaitingPushResult;
            event
        } else {
            self.session.processing = false;
            self.state = ObserverState::Idle;
            None
        }
    }

    /// Background reported success or failure. Only a push this page is
    /// waiting on releases the gate; returns whether it did.
    pub fn push_finished(&mut self) -> bool {
        if self.state != ObserverState::AwaitingPushResult {
            return false;
        }
        self.session.processing = false;
        self.state = ObserverState::Idle;
        true
    }

    /// A new page invalidates every prior detection; watching restarts.
    pub fn navigated(&mut self) {
        self.session = SessionState::default();
        self.pending = None;
        self.state = ObserverState::Armed;
        tracing::debug!("Navigation: observer state reset");
    }
}
