// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Renderer abstraction for browser-driven page sessions.
//!
//! Defines the `Renderer`, `RenderContext` and `PageElement` traits that
//! abstract over the browser engine (currently Chromium via chromiumoxide).
//! A `RenderContext` is the page session every engine component borrows for
//! the duration of one extraction call.

pub mod chromium;
pub mod mock;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

/// Result of navigating to a URL.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NavigationResult {
    /// The final URL after any redirects.
    pub final_url: String,
    /// Time taken to load the page in milliseconds.
    pub load_time_ms: u64,
}

/// Coarse classification of a [`PageError`], used by retry policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PageErrorKind {
    NoSuchElement,
    ClickIntercepted,
    Navigation,
    Script,
    Session,
}

/// Errors raised by a page session.
#[derive(thiserror::Error, Debug, Clone)]
pub enum PageError {
    #[error("no element matches selector `{selector}`")]
    NoSuchElement { selector: String },

    /// The native click could not land on the element (covered, zero-size
    /// or off-screen); a scripted click may still reach it.
    #[error("click was intercepted: {0}")]
    ClickIntercepted(String),

    #[error("navigation failed: {0}")]
    Navigation(String),

    #[error("script evaluation failed: {0}")]
    Script(String),

    #[error("browser session error: {0}")]
    Session(String),
}

impl PageError {
    /// Convenience constructor for a missing element.
    pub fn no_such_element(selector: &str) -> Self {
        PageError::NoSuchElement {
            selector: selector.to_string(),
        }
    }

    pub fn kind(&self) -> PageErrorKind {
        match self {
            PageError::NoSuchElement { .. } => PageErrorKind::NoSuchElement,
            PageError::ClickIntercepted(_) => PageErrorKind::ClickIntercepted,
            PageError::Navigation(_) => PageErrorKind::Navigation,
            PageError::Script(_) => PageErrorKind::Script,
            PageError::Session(_) => PageErrorKind::Session,
        }
    }
}

/// A browser engine that can create page sessions.
#[async_trait]
pub trait Renderer: Send + Sync {
    /// Create a new browser context (tab).
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, PageError>;
    /// Shut down the browser engine.
    async fn shutdown(&self) -> Result<(), PageError>;
    /// Number of currently active contexts.
    fn active_contexts(&self) -> usize;
}

/// A single browser context (tab) that can be navigated and queried.
#[async_trait]
pub trait RenderContext: Send + Sync {
    /// Navigate to a URL with a timeout.
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult, PageError>;
    /// Execute JavaScript in the page context and return the result.
    async fn execute_js(&self, script: &str) -> Result<serde_json::Value, PageError>;
    /// Get the current URL.
    async fn get_url(&self) -> Result<String, PageError>;
    /// Find the first element matching a CSS selector.
    ///
    /// Fails with [`PageError::NoSuchElement`] when nothing matches.
    async fn find_element(&self, selector: &str) -> Result<Box<dyn PageElement>, PageError>;
    /// Find every element matching a CSS selector, in document order.
    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>, PageError>;
    /// Close this context.
    async fn close(self: Box<Self>) -> Result<(), PageError>;
}

/// A handle to one element of a rendered page.
#[async_trait]
pub trait PageElement: Send + Sync {
    /// Click the element with synthesized mouse input.
    async fn click(&self) -> Result<(), PageError>;
    /// Click the element from script, bypassing overlays.
    async fn js_click(&self) -> Result<(), PageError>;
    /// Read an attribute value.
    async fn attribute(&self, name: &str) -> Result<Option<String>, PageError>;
    /// Rendered text content.
    async fn text(&self) -> Result<Option<String>, PageError>;
    /// Clear the element's value and type `text` into it.
    async fn fill(&self, text: &str) -> Result<(), PageError>;
    /// Find the first descendant matching a CSS selector.
    async fn find_element(&self, selector: &str) -> Result<Box<dyn PageElement>, PageError>;
}

/// A no-op renderer used when Chromium is unavailable.
///
/// Every extraction fails with a session error, but the process (CLI
/// diagnostics, the HTTP health endpoint) still functions.
pub struct NoopRenderer;

#[async_trait]
impl Renderer for NoopRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, PageError> {
        Err(PageError::Session("browser not available".to_string()))
    }
    async fn shutdown(&self) -> Result<(), PageError> {
        Ok(())
    }
    fn active_contexts(&self) -> usize {
        0
    }
}
