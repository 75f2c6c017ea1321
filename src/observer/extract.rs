// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@kernel.org>

//! Code and metadata extraction from the judge page.
//!
//! Code is tried through an ordered list of strategies, most reliable first;
//! the first one producing plausible text wins. Title, language and
//! difficulty come from the first matching selector candidate and degrade
//! to sentinel defaults when nothing matches.

use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

use crate::error::AppError;
use crate::models::submission::{DEFAULT_DIFFICULTY, DEFAULT_LANGUAGE, DEFAULT_TITLE};
use crate::models::SubmissionEvent;
use crate::observer::dom::PageDom;

/// Extracted code needs at least this much non-whitespace to count.
pub const MIN_EXTRACTED_CHARS: usize = 10;

/// Verdict region watched for the success marker.
pub const RESULT_SELECTOR: &str = r#"span[data-e2e-locator="submission-result"]"#;

const TITLE_SELECTORS: &[&str] = &[
    r#"a[class*="title"]"#,
    "h1",
    "h2",
    "h3",
    "h4",
    r#"div[class*="title"]"#,
    r#"div[class*="problem-title"]"#,
    "a.h5",
];

const LANGUAGE_SELECTORS: &[&str] = &[
    r#"select[data-cy="lang-select"]"#,
    r#"select[name="lang"]"#,
    r#"div[class*="language"]"#,
];

const DIFFICULTY_SELECTORS: &[&str] = &[
    r#"div[class*="difficulty"]"#,
    r#"span[class*="difficulty"]"#,
];

const EDITOR_CONTAINER_SELECTORS: &[&str] = &[
    ".monaco-editor",
    r#"[class*="editor"]"#,
    r#"[class*="code-editor"]"#,
];

const PRIMARY_LINE_SELECTOR: &str = ".view-line";

const FALLBACK_LINE_SELECTORS: &[&str] = &[
    r#"[class*="view-line"]"#,
    r#"[class*="line"]"#,
    r#"[class*="code-line"]"#,
];

/// Hidden textarea the editor types into.
const INPUT_BUFFER_SELECTOR: &str = "textarea.inputarea";

static UI_CHROME: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)^(Submit|Premium|Settings|Sign Out|Topics|Companies|Hint|Editorial|Solution|Case \d+)",
    )
    .expect("valid UI chrome pattern")
});

static WHITESPACE_RUN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+").expect("valid whitespace pattern"));

static LINE_NUMBER_PREFIX: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?m)^\d+\s*").expect("valid line number pattern"));

/// A code source: returns `None` when it has nothing to offer.
pub type Strategy = fn(&dyn PageDom) -> Option<String>;

/// Code strategies in the order they are tried.
pub const STRATEGIES: &[(&str, Strategy)] = &[
    ("editor_instance", from_editor_instance),
    ("app_store", from_app_store),
    ("local_draft", from_local_draft),
    ("input_buffer", from_input_buffer),
    ("view_lines", from_view_lines),
];

fn from_editor_instance(dom: &dyn PageDom) -> Option<String> {
    dom.editor_value()
}

fn from_app_store(dom: &dyn PageDom) -> Option<String> {
    dom.store_code()
}

fn from_local_draft(dom: &dyn PageDom) -> Option<String> {
    let slug = problem_slug(&dom.location_path())?;
    dom.local_draft(&slug)
}

fn from_input_buffer(dom: &dyn PageDom) -> Option<String> {
    dom.query(INPUT_BUFFER_SELECTOR).and_then(|el| el.value)
}

/// Rebuild code from the rendered editor lines of the first editor container.
fn from_view_lines(dom: &dyn PageDom) -> Option<String> {
    let container = EDITOR_CONTAINER_SELECTORS
        .iter()
        .find(|sel| dom.query(sel).is_some())?;

    let mut lines = dom.query_all(&format!("{} {}", container, PRIMARY_LINE_SELECTOR));
    if lines.is_empty() {
        lines = FALLBACK_LINE_SELECTORS
            .iter()
            .map(|sel| dom.query_all(&format!("{} {}", container, sel)))
            .find(|found| !found.is_empty())?;
    }

    let code = rebuild_from_lines(lines.iter().map(|el| el.text.as_str()));
    (!code.trim().is_empty()).then_some(code)
}

/// Collapse whitespace per line, drop empty and UI-chrome lines, keep the
/// first of any lines that are equal ignoring whitespace, join with `\n`.
pub fn rebuild_from_lines<'a>(lines: impl IntoIterator<Item = &'a str>) -> String {
    let mut seen = HashSet::new();
    let mut kept = Vec::new();

    for raw in lines {
        let line = WHITESPACE_RUN.replace_all(raw.trim(), " ").into_owned();
        if line.is_empty() || UI_CHROME.is_match(&line) {
            continue;
        }
        let key: String = line.chars().filter(|c| !c.is_whitespace()).collect();
        if seen.insert(key) {
            kept.push(line);
        }
    }

    kept.join("\n")
}

/// `/problems/two-sum/description/` → `two-sum`
pub fn problem_slug(path: &str) -> Option<String> {
    let mut parts = path.split('/').filter(|p| !p.is_empty());
    while let Some(part) = parts.next() {
        if part == "problems" {
            return parts.next().map(str::to_string);
        }
    }
    None
}

fn is_plausible(code: &str) -> bool {
    code.chars().filter(|c| !c.is_whitespace()).count() >= MIN_EXTRACTED_CHARS
}

/// Run the strategies in order and return the first result that is still
/// plausible once normalized.
pub fn extract_code(dom: &dyn PageDom) -> Option<String> {
    for (name, strategy) in STRATEGIES {
        match strategy(dom).map(|raw| normalize_code(&raw)) {
            Some(code) if is_plausible(&code) => {
                tracing::debug!(strategy = name, len = code.len(), "Code extracted");
                return Some(code);
            }
            Some(_) => tracing::debug!(strategy = name, "Strategy result too short"),
            None => tracing::trace!(strategy = name, "Strategy found nothing"),
        }
    }
    None
}

/// Line endings to `\n`, leading line numbers stripped per line, trimmed.
pub fn normalize_code(code: &str) -> String {
    let unified = code.replace("\r\n", "\n").replace('\r', "\n");
    LINE_NUMBER_PREFIX
        .replace_all(&unified, "")
        .trim()
        .to_string()
}

fn first_text(dom: &dyn PageDom, selectors: &[&str]) -> Option<String> {
    selectors
        .iter()
        .filter_map(|sel| dom.query(sel))
        .map(|el| el.text.trim().to_string())
        .find(|text| !text.is_empty())
}

pub fn extract_title(dom: &dyn PageDom) -> String {
    first_text(dom, TITLE_SELECTORS).unwrap_or_else(|| DEFAULT_TITLE.to_string())
}

/// A select control's value wins over label text; lower-cased.
pub fn extract_language(dom: &dyn PageDom) -> String {
    LANGUAGE_SELECTORS
        .iter()
        .filter_map(|sel| dom.query(sel))
        .find_map(|el| {
            el.value
                .filter(|v| !v.trim().is_empty())
                .or_else(|| Some(el.text).filter(|t| !t.trim().is_empty()))
        })
        .map(|lang| lang.trim().to_lowercase())
        .unwrap_or_else(|| DEFAULT_LANGUAGE.to_string())
}

pub fn extract_difficulty(dom: &dyn PageDom) -> String {
    first_text(dom, DIFFICULTY_SELECTORS).unwrap_or_else(|| DEFAULT_DIFFICULTY.to_string())
}

/// Text of the verdict region, empty if absent.
pub fn result_text(dom: &dyn PageDom) -> String {
    dom.query(RESULT_SELECTOR).map(|el| el.text).unwrap_or_default()
}

/// Scrape a full submission, failing only when no code can be found.
pub fn extract_submission(dom: &dyn PageDom) -> Result<SubmissionEvent, AppError> {
    let code = extract_code(dom).ok_or(AppError::ExtractionFailed)?;
    Ok(SubmissionEvent {
        problem_title: extract_title(dom),
        code,
        language: extract_language(dom),
        difficulty: extract_difficulty(dom),
    })
}
