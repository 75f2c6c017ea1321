// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! End-to-end page observer tests: detection, prompt, background push and
//! the completion notice, against a mock GitHub API.

use leetpush::models::{ExtensionMessage, PushSuccess};
use leetpush::observer::dom::{ElementSnapshot, LivePage, PageSnapshot};
use leetpush::observer::driver::{run, PageEvent, PageUi};
use leetpush::observer::extract::RESULT_SELECTOR;
use leetpush::services::{spawn_worker, Notifier};
use serde_json::json;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::mpsc;
use wiremock::matchers::{method, path, path_regex};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;
use common::{store_credentials, test_orchestrator, SOLUTION, TEST_USER};

#[derive(Debug, Clone, PartialEq)]
enum Shown {
    Prompt(String),
    Error(String),
    Success(String, String),
}

#[derive(Default)]
struct RecordingUi {
    shown: Mutex<Vec<Shown>>,
}

impl RecordingUi {
    fn shown(&self) -> Vec<Shown> {
        self.shown.lock().unwrap().clone()
    }

    async fn wait_for(&self, count: usize) {
        tokio::time::timeout(Duration::from_secs(5), async {
            while self.shown.lock().unwrap().len() < count {
                tokio::time::sleep(Duration::from_millis(10)).await;
            }
        })
        .await
        .expect("UI was not updated in time");
    }
}

impl PageUi for RecordingUi {
    fn confirm_push(&self, problem_title: &str) {
        self.shown
            .lock()
            .unwrap()
            .push(Shown::Prompt(problem_title.to_string()));
    }

    fn show_error(&self, message: &str) {
        self.shown
            .lock()
            .unwrap()
            .push(Shown::Error(message.to_string()));
    }

    fn show_success(&self, repo_url: &str, problem_title: &str) {
        self.shown.lock().unwrap().push(Shown::Success(
            repo_url.to_string(),
            problem_title.to_string(),
        ));
    }
}

fn accepted_page() -> PageSnapshot {
    PageSnapshot::at("/problems/two-sum/")
        .with(RESULT_SELECTOR, ElementSnapshot::text("Accepted"))
        .with("h1", ElementSnapshot::text("Two Sum"))
        .with(
            r#"div[class*="difficulty"]"#,
            ElementSnapshot::text("Easy"),
        )
        .with_editor_value(SOLUTION)
}

async fn mount_github(server: &MockServer) {
    Mock::given(method("GET"))
        .and(path("/repos/octocat/Leetcode-Problems"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "id": 1 })))
        .mount(server)
        .await;
    Mock::given(method("PUT"))
        .and(path_regex(r"^/repos/octocat/Leetcode-Problems/contents/solutions/.+$"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "content": { "sha": "abc" }
        })))
        .expect(1)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_accepted_submission_is_pushed_after_confirmation() {
    let server = MockServer::start().await;
    mount_github(&server).await;

    let (orchestrator, store) = test_orchestrator(&server);
    store_credentials(&store).await;

    let notifier = Notifier::default();
    let mut completions = notifier.subscribe();
    let background = spawn_worker(orchestrator, notifier);

    let page = LivePage::new(PageSnapshot::at("/problems/two-sum/"));
    let ui = RecordingUi::default();
    let (events, rx) = mpsc::unbounded_channel();

    let script = async {
        page.replace(accepted_page());
        events.send(PageEvent::Mutated).unwrap();
        ui.wait_for(1).await;
        assert_eq!(ui.shown(), vec![Shown::Prompt("Two Sum".to_string())]);

        // Further mutations while the prompt is open do nothing
        events.send(PageEvent::Mutated).unwrap();

        events.send(PageEvent::PromptAnswered(true)).unwrap();
        let completion = completions.recv().await.unwrap();
        events.send(PageEvent::Completed(completion)).unwrap();

        ui.wait_for(2).await;
        drop(events);
    };

    tokio::join!(run(&page, &ui, background, rx), script);

    assert_eq!(
        ui.shown(),
        vec![
            Shown::Prompt("Two Sum".to_string()),
            Shown::Success(
                "https://github.com/octocat/Leetcode-Problems/tree/main/solutions".to_string(),
                "Two Sum".to_string()
            ),
        ]
    );

    let stats = store.get_user_stats(TEST_USER).await.unwrap().unwrap();
    assert_eq!(stats.push_count, 1);
    assert_eq!(stats.easy_count, 1);
}

#[tokio::test]
async fn test_declined_prompt_sends_nothing() {
    let server = MockServer::start().await;
    Mock::given(method("PUT"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let (orchestrator, store) = test_orchestrator(&server);
    store_credentials(&store).await;
    let background = spawn_worker(orchestrator, Notifier::default());

    let page = LivePage::new(accepted_page());
    let ui = RecordingUi::default();
    let (events, rx) = mpsc::unbounded_channel();

    let script = async {
        events.send(PageEvent::Mutated).unwrap();
        ui.wait_for(1).await;
        events.send(PageEvent::PromptAnswered(false)).unwrap();

        // Same verdict after declining: no second prompt
        events.send(PageEvent::Mutated).unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        drop(events);
    };

    tokio::join!(run(&page, &ui, background, rx), script);

    assert_eq!(ui.shown(), vec![Shown::Prompt("Two Sum".to_string())]);
    assert_eq!(
        store.get_user_stats(TEST_USER).await.unwrap().unwrap().push_count,
        0
    );
}

#[tokio::test]
async fn test_push_error_is_shown() {
    let server = MockServer::start().await;

    // Signed out: the push fails before any request
    let (orchestrator, _store) = test_orchestrator(&server);
    let notifier = Notifier::default();
    let mut completions = notifier.subscribe();
    let background = spawn_worker(orchestrator, notifier);

    let page = LivePage::new(accepted_page());
    let ui = RecordingUi::default();
    let (events, rx) = mpsc::unbounded_channel();

    let script = async {
        events.send(PageEvent::Mutated).unwrap();
        ui.wait_for(1).await;
        events.send(PageEvent::PromptAnswered(true)).unwrap();
        let completion = completions.recv().await.unwrap();
        events.send(PageEvent::Completed(completion)).unwrap();
        ui.wait_for(2).await;
        drop(events);
    };

    tokio::join!(run(&page, &ui, background, rx), script);

    assert_eq!(
        ui.shown()[1],
        Shown::Error("Please sign in with your GitHub token in the extension popup.".to_string())
    );
}

#[tokio::test]
async fn test_extraction_failure_is_reported() {
    let server = MockServer::start().await;
    let (orchestrator, _store) = test_orchestrator(&server);
    let background = spawn_worker(orchestrator, Notifier::default());

    // Verdict present but no editor content anywhere
    let page = LivePage::new(
        PageSnapshot::at("/problems/two-sum/")
            .with(RESULT_SELECTOR, ElementSnapshot::text("Accepted")),
    );
    let ui = RecordingUi::default();
    let (events, rx) = mpsc::unbounded_channel();

    let script = async {
        events.send(PageEvent::Mutated).unwrap();
        ui.wait_for(1).await;
        drop(events);
    };

    tokio::join!(run(&page, &ui, background, rx), script);

    assert_eq!(
        ui.shown(),
        vec![Shown::Error(
            "Failed to extract code. Please try submitting again.".to_string()
        )]
    );
}

#[tokio::test]
async fn test_completion_from_another_tab_is_ignored() {
    let server = MockServer::start().await;
    mount_github(&server).await;

    let (orchestrator, store) = test_orchestrator(&server);
    store_credentials(&store).await;
    let notifier = Notifier::default();
    let mut completions = notifier.subscribe();
    let background = spawn_worker(orchestrator, notifier);

    let page = LivePage::new(accepted_page());
    let ui = RecordingUi::default();
    let (events, rx) = mpsc::unbounded_channel();

    let script = async {
        events.send(PageEvent::Mutated).unwrap();
        ui.wait_for(1).await;

        // Prompt is open here; another tab's push completes
        events
            .send(PageEvent::Completed(ExtensionMessage::PushSuccess(PushSuccess {
                repo_url: "https://github.com/octocat/Leetcode-Problems/tree/main/solutions"
                    .to_string(),
                problem_title: "Valid Parentheses".to_string(),
            })))
            .unwrap();
        events
            .send(PageEvent::Completed(ExtensionMessage::PushError {
                error: "elsewhere".to_string(),
            }))
            .unwrap();
        tokio::time::sleep(Duration::from_millis(50)).await;
        assert_eq!(ui.shown().len(), 1);

        // This page's prompt still works
        events.send(PageEvent::PromptAnswered(true)).unwrap();
        let completion = completions.recv().await.unwrap();
        events.send(PageEvent::Completed(completion)).unwrap();
        ui.wait_for(2).await;
        drop(events);
    };

    tokio::join!(run(&page, &ui, background, rx), script);

    assert_eq!(
        ui.shown(),
        vec![
            Shown::Prompt("Two Sum".to_string()),
            Shown::Success(
                "https://github.com/octocat/Leetcode-Problems/tree/main/solutions".to_string(),
                "Two Sum".to_string()
            ),
        ]
    );
}
