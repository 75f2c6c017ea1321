// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

//! Background push worker.
//!
//! The page hands a `pushToGitHub` message to the worker and moves on; it
//! never waits for an answer. The worker runs pushes one at a time and
//! announces each outcome as a separate `pushSuccess` / `pushError` message
//! through the [`Notifier`].

use crate::models::{ExtensionMessage, PushSuccess};
use crate::services::PushOrchestrator;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use tokio::sync::{broadcast, mpsc};

/// Completion messages kept for HTTP polling before the oldest are dropped.
const MAX_PENDING_NOTIFICATIONS: usize = 64;

/// Sending half of the worker's inbox. Sending never blocks.
#[derive(Clone)]
pub struct BackgroundHandle {
    tx: mpsc::UnboundedSender<ExtensionMessage>,
}

impl BackgroundHandle {
    /// One-way send. Returns `false` only if the worker has shut down.
    pub fn send(&self, message: ExtensionMessage) -> bool {
        self.tx.send(message).is_ok()
    }
}

/// Fan-out for completion messages: live subscribers (page observers in
/// the same process) plus a bounded queue drained by HTTP pollers.
#[derive(Clone)]
pub struct Notifier {
    live: broadcast::Sender<ExtensionMessage>,
    pending: Arc<Mutex<VecDeque<ExtensionMessage>>>,
}

impl Default for Notifier {
    fn default() -> Self {
        let (live, _) = broadcast::channel(MAX_PENDING_NOTIFICATIONS);
        Self {
            live,
            pending: Arc::new(Mutex::new(VecDeque::new())),
        }
    }
}

impl Notifier {
    pub fn publish(&self, message: ExtensionMessage) {
        // No live subscribers is normal when only HTTP pollers are attached.
        let _ = self.live.send(message.clone());

        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        if pending.len() == MAX_PENDING_NOTIFICATIONS {
            pending.pop_front();
        }
        pending.push_back(message);
    }

    pub fn subscribe(&self) -> broadcast::Receiver<ExtensionMessage> {
        self.live.subscribe()
    }

    /// Take every queued message, oldest first.
    pub fn drain(&self) -> Vec<ExtensionMessage> {
        let mut pending = self.pending.lock().unwrap_or_else(|e| e.into_inner());
        pending.drain(..).collect()
    }
}

/// Start the worker task.
pub fn spawn_worker(orchestrator: PushOrchestrator, notifier: Notifier) -> BackgroundHandle {
    let (tx, mut rx) = mpsc::unbounded_channel();

    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            let event = match message {
                ExtensionMessage::PushToGitHub(event) => event,
                other => {
                    tracing::warn!(message = ?other, "Ignoring non-push message sent to background");
                    continue;
                }
            };

            let reply = match orchestrator.push(&event).await {
                Ok(outcome) => ExtensionMessage::PushSuccess(PushSuccess {
                    repo_url: outcome.repo_url,
                    problem_title: event.problem_title.clone(),
                }),
                Err(e) => {
                    tracing::warn!(
                        problem = %event.problem_title,
                        error = %e,
                        "Push failed"
                    );
                    ExtensionMessage::PushError {
                        error: e.to_string(),
                    }
                }
            };
            notifier.publish(reply);
        }
        tracing::info!("Background worker stopped");
    });

    BackgroundHandle { tx }
}
