//! Read-only view of the judge page.
//!
//! The observer never touches a browser directly. Everything it needs goes
//! through [`PageDom`]: selector lookups plus the handful of page-owned code
//! sources (editor instance, app store, saved drafts). [`PageSnapshot`] is a
//! plain serializable implementation, used both as a test fixture and as the
//! payload a content-script shim posts.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::RwLock;

/// One matched element.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ElementSnapshot {
    /// `textContent`
    #[serde(default)]
    pub text: String,
    /// `value` for form controls
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub value: Option<String>,
}

impl ElementSnapshot {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: None,
        }
    }

    pub fn control(value: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            value: Some(value.into()),
        }
    }
}

/// Page access used by detection and extraction.
///
/// Selectors are CSS selector strings; descendant selectors (`"a b"`) are
/// how scoped lookups are expressed.
pub trait PageDom {
    /// Every element matching `selector`, in document order.
    fn query_all(&self, selector: &str) -> Vec<ElementSnapshot>;

    /// First element matching `selector`.
    fn query(&self, selector: &str) -> Option<ElementSnapshot> {
        self.query_all(selector).into_iter().next()
    }

    /// Current value of the page's in-memory editor instance.
    fn editor_value(&self) -> Option<String>;

    /// Code held in the page's state-management store.
    fn store_code(&self) -> Option<String>;

    /// Locally persisted draft for a problem slug.
    fn local_draft(&self, slug: &str) -> Option<String>;

    /// `location.pathname`
    fn location_path(&self) -> String;
}

/// Serializable page state.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageSnapshot {
    #[serde(default)]
    pub location_path: String,
    /// Selector → matches
    #[serde(default)]
    pub elements: HashMap<String, Vec<ElementSnapshot>>,
    #[serde(default)]
    pub editor_value: Option<String>,
    #[serde(default)]
    pub store_code: Option<String>,
    /// Slug → draft
    #[serde(default)]
    pub drafts: HashMap<String, String>,
}

impl PageSnapshot {
    pub fn at(location_path: impl Into<String>) -> Self {
        Self {
            location_path: location_path.into(),
            ..Default::default()
        }
    }

    /// Append an element matching `selector`.
    pub fn with(mut self, selector: &str, element: ElementSnapshot) -> Self {
        self.elements
            .entry(selector.to_string())
            .or_default()
            .push(element);
        self
    }

    /// Append one text element per line under `selector`.
    pub fn with_lines(mut self, selector: &str, lines: &[&str]) -> Self {
        for line in lines {
            self = self.with(selector, ElementSnapshot::text(*line));
        }
        self
    }

    pub fn with_editor_value(mut self, code: impl Into<String>) -> Self {
        self.editor_value = Some(code.into());
        self
    }

    pub fn with_store_code(mut self, code: impl Into<String>) -> Self {
        self.store_code = Some(code.into());
        self
    }

    pub fn with_draft(mut self, slug: &str, code: impl Into<String>) -> Self {
        self.drafts.insert(slug.to_string(), code.into());
        self
    }
}

impl PageDom for PageSnapshot {
    fn query_all(&self, selector: &str) -> Vec<ElementSnapshot> {
        self.elements.get(selector).cloned().unwrap_or_default()
    }

    fn editor_value(&self) -> Option<String> {
        self.editor_value.clone()
    }

    fn store_code(&self) -> Option<String> {
        self.store_code.clone()
    }

    fn local_draft(&self, slug: &str) -> Option<String> {
        self.drafts.get(slug).cloned()
    }

    fn location_path(&self) -> String {
        self.location_path.clone()
    }
}

/// A page whose snapshot is replaced as the real page mutates.
#[derive(Debug, Default)]
pub struct LivePage {
    current: RwLock<PageSnapshot>,
}

impl LivePage {
    pub fn new(snapshot: PageSnapshot) -> Self {
        Self {
            current: RwLock::new(snapshot),
        }
    }

    pub fn replace(&self, snapshot: PageSnapshot) {
        *self.current.write().unwrap_or_else(|e| e.into_inner()) = snapshot;
    }

    fn read<T>(&self, f: impl FnOnce(&PageSnapshot) -> T) -> T {
        f(&self.current.read().unwrap_or_else(|e| e.into_inner()))
    }
}

impl PageDom for LivePage {
    fn query_all(&self, selector: &str) -> Vec<ElementSnapshot> {
        self.read(|s| s.query_all(selector))
    }

    fn editor_value(&self) -> Option<String> {
        self.read(|s| s.editor_value())
    }

    fn store_code(&self) -> Option<String> {
        self.read(|s| s.store_code())
    }

    fn local_draft(&self, slug: &str) -> Option<String> {
        self.read(|s| s.local_draft(slug))
    }

    fn location_path(&self) -> String {
        self.read(|s| s.location_path())
    }
}
