// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Event loop that owns a [`PageObserver`] for one tab.
//!
//! Mutation notifications, poll ticks, prompt answers and background
//! completions all funnel through this single task, so the observer's
//! session state never sees two callbacks at once.

use std::time::{Duration, Instant};
use tokio::sync::mpsc;

use crate::models::ExtensionMessage;
use crate::observer::dom::PageDom;
use crate::observer::machine::{Detection, PageObserver};
use crate::services::BackgroundHandle;

/// Fallback polling period for when mutation events are missed.
pub const POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Something happened on the page.
#[derive(Debug, Clone)]
pub enum PageEvent {
    /// The watched DOM region changed.
    Mutated,
    /// The tab moved to another page.
    Navigated,
    /// The user answered the push prompt.
    PromptAnswered(bool),
    /// Completion message from the background worker.
    Completed(ExtensionMessage),
}

/// UI collaborator: prompt, alerts and the success notice.
pub trait PageUi {
    fn confirm_push(&self, problem_title: &str);
    fn show_error(&self, message: &str);
    fn show_success(&self, repo_url: &str, problem_title: &str);
}

/// Run until the event channel closes.
pub async fn run<D, U>(
    dom: &D,
    ui: &U,
    background: BackgroundHandle,
    mut events: mpsc::UnboundedReceiver<PageEvent>,
) where
    D: PageDom,
    U: PageUi,
{
    let mut observer = PageObserver::default();
    observer.arm();

    let mut ticker = tokio::time::interval(POLL_INTERVAL);
    ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);

    loop {
        tokio::select! {
            _ = ticker.tick(), if observer.is_watching() => {
                check(&mut observer, dom, ui);
            }
            event = events.recv() => {
                let Some(event) = event else { break };
                match event {
                    PageEvent::Mutated => check(&mut observer, dom, ui),
                    PageEvent::Navigated => observer.navigated(),
                    PageEvent::PromptAnswered(push) => {
                        if let Some(submission) = observer.answer(push) {
                            if !background.send(ExtensionMessage::PushToGitHub(submission)) {
                                tracing::error!("Background worker is gone; push dropped");
                                ui.show_error("Background service unavailable.");
                                observer.push_finished();
                            }
                        }
                    }
                    PageEvent::Completed(message) => {
                        if !message.is_completion() || !observer.push_finished() {
                            tracing::debug!(message = ?message, "Ignoring completion not meant for this page");
                            continue;
                        }
                        match &message {
                            ExtensionMessage::PushSuccess(ok) => {
                                ui.show_success(&ok.repo_url, &ok.problem_title);
                            }
                            ExtensionMessage::PushError { error } => ui.show_error(error),
                            ExtensionMessage::PushToGitHub(_) => {}
                        }
                    }
                }
            }
        }
    }

    tracing::debug!("Page observer stopped");
}

fn check<D: PageDom, U: PageUi>(observer: &mut PageObserver, dom: &D, ui: &U) {
    match observer.check(dom, Instant::now()) {
        Detection::Prompt { problem_title } => ui.confirm_push(&problem_title),
        Detection::ExtractionFailed => {
            ui.show_error(&crate::error::AppError::ExtractionFailed.to_string())
        }
        _ => {}
    }
}
