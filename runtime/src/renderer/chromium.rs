// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Chromium-based renderer using chromiumoxide.

use super::{NavigationResult, PageElement, PageError, RenderContext, Renderer};
use async_trait::async_trait;
use chromiumoxide::browser::{Browser, BrowserConfig};
use chromiumoxide::element::Element;
use chromiumoxide::page::Page;
use futures::StreamExt;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Instant;

/// Find the Chromium binary path.
///
/// An explicit path (from `FEEDLENS_CHROMIUM_PATH`) wins when it exists.
pub fn find_chromium(explicit: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = explicit {
        if path.exists() {
            return Some(path.to_path_buf());
        }
    }

    if let Some(home) = dirs::home_dir() {
        let candidates = if cfg!(target_os = "macos") {
            vec![
                home.join(".feedlens/chromium/chrome-mac-arm64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".feedlens/chromium/chrome-mac-x64/Google Chrome for Testing.app/Contents/MacOS/Google Chrome for Testing"),
                home.join(".feedlens/chromium/chrome"),
            ]
        } else {
            vec![
                home.join(".feedlens/chromium/chrome-linux64/chrome"),
                home.join(".feedlens/chromium/chrome"),
            ]
        };
        for c in candidates {
            if c.exists() {
                return Some(c);
            }
        }
    }

    for name in ["google-chrome", "chromium", "chromium-browser"] {
        if let Ok(path) = which::which(name) {
            return Some(path);
        }
    }

    if cfg!(target_os = "macos") {
        let common =
            PathBuf::from("/Applications/Google Chrome.app/Contents/MacOS/Google Chrome");
        if common.exists() {
            return Some(common);
        }
    }

    None
}

/// Chromium-based renderer. One headless browser, one tab per context.
pub struct ChromiumRenderer {
    browser: Browser,
    active_count: Arc<AtomicUsize>,
}

impl ChromiumRenderer {
    /// Launch a headless Chromium instance.
    ///
    /// Images are not loaded; only their URLs matter.
    pub async fn new(explicit_path: Option<&Path>) -> Result<Self, PageError> {
        let chrome_path = find_chromium(explicit_path).ok_or_else(|| {
            PageError::Session(
                "Chromium not found. Set FEEDLENS_CHROMIUM_PATH or install Chrome.".to_string(),
            )
        })?;

        let config = BrowserConfig::builder()
            .chrome_executable(chrome_path)
            .arg("--headless=new")
            .arg("--disable-gpu")
            .arg("--no-sandbox")
            .arg("--disable-dev-shm-usage")
            .arg("--disable-extensions")
            .arg("--blink-settings=imagesEnabled=false")
            .build()
            .map_err(|e| PageError::Session(format!("failed to build browser config: {e}")))?;

        let (browser, mut handler) = Browser::launch(config)
            .await
            .map_err(|e| PageError::Session(format!("failed to launch Chromium: {e}")))?;

        tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                let _ = event;
            }
        });

        Ok(Self {
            browser,
            active_count: Arc::new(AtomicUsize::new(0)),
        })
    }
}

#[async_trait]
impl Renderer for ChromiumRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, PageError> {
        let page = self
            .browser
            .new_page("about:blank")
            .await
            .map_err(|e| PageError::Session(format!("failed to create new page: {e}")))?;

        self.active_count.fetch_add(1, Ordering::Relaxed);

        Ok(Box::new(ChromiumContext {
            page,
            active_count: Arc::clone(&self.active_count),
        }))
    }

    async fn shutdown(&self) -> Result<(), PageError> {
        // Browser is dropped when ChromiumRenderer is dropped
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        self.active_count.load(Ordering::Relaxed)
    }
}

/// A single Chromium page context.
pub struct ChromiumContext {
    page: Page,
    active_count: Arc<AtomicUsize>,
}

#[async_trait]
impl RenderContext for ChromiumContext {
    async fn navigate(&mut self, url: &str, timeout_ms: u64) -> Result<NavigationResult, PageError> {
        let start = Instant::now();

        let result = tokio::time::timeout(
            std::time::Duration::from_millis(timeout_ms),
            self.page.goto(url),
        )
        .await;

        let load_time_ms = start.elapsed().as_millis() as u64;

        match result {
            Ok(Ok(_)) => {
                let _ = self.page.wait_for_navigation().await;
                let final_url = self
                    .page
                    .url()
                    .await
                    .unwrap_or_default()
                    .map(|u| u.to_string())
                    .unwrap_or_else(|| url.to_string());
                Ok(NavigationResult {
                    final_url,
                    load_time_ms,
                })
            }
            Ok(Err(e)) => Err(PageError::Navigation(format!("{url}: {e}"))),
            Err(_) => Err(PageError::Navigation(format!(
                "{url}: timed out after {timeout_ms}ms"
            ))),
        }
    }

    async fn execute_js(&self, script: &str) -> Result<serde_json::Value, PageError> {
        let result = self
            .page
            .evaluate(script)
            .await
            .map_err(|e| PageError::Script(e.to_string()))?;

        result
            .into_value()
            .map_err(|e| PageError::Script(format!("failed to convert JS result: {e:?}")))
    }

    async fn get_url(&self) -> Result<String, PageError> {
        let url = self
            .page
            .url()
            .await
            .map_err(|e| PageError::Session(format!("failed to get URL: {e}")))?
            .map(|u| u.to_string())
            .unwrap_or_default();
        Ok(url)
    }

    async fn find_element(&self, selector: &str) -> Result<Box<dyn PageElement>, PageError> {
        // DOM.querySelector reports absence as a protocol error, so every
        // lookup failure is surfaced as a missing element.
        match self.page.find_element(selector).await {
            Ok(element) => Ok(Box::new(ChromiumElement { element })),
            Err(e) => {
                tracing::trace!("lookup of `{selector}` failed: {e}");
                Err(PageError::no_such_element(selector))
            }
        }
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>, PageError> {
        let elements = self
            .page
            .find_elements(selector)
            .await
            .map_err(|_| PageError::no_such_element(selector))?;
        Ok(elements
            .into_iter()
            .map(|element| Box::new(ChromiumElement { element }) as Box<dyn PageElement>)
            .collect())
    }

    async fn close(self: Box<Self>) -> Result<(), PageError> {
        self.active_count.fetch_sub(1, Ordering::Relaxed);
        let _ = self.page.close().await;
        Ok(())
    }
}

/// A DOM element inside a [`ChromiumContext`].
pub struct ChromiumElement {
    element: Element,
}

#[async_trait]
impl PageElement for ChromiumElement {
    async fn click(&self) -> Result<(), PageError> {
        self.element.click().await.map(|_| ()).map_err(click_error)
    }

    async fn js_click(&self) -> Result<(), PageError> {
        self.element
            .call_js_fn("function() { this.click(); }", false)
            .await
            .map(|_| ())
            .map_err(|e| PageError::Script(e.to_string()))
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, PageError> {
        self.element
            .attribute(name)
            .await
            .map_err(|e| PageError::Session(e.to_string()))
    }

    async fn text(&self) -> Result<Option<String>, PageError> {
        self.element
            .inner_text()
            .await
            .map_err(|e| PageError::Session(e.to_string()))
    }

    async fn fill(&self, text: &str) -> Result<(), PageError> {
        self.element
            .call_js_fn("function() { this.value = ''; }", false)
            .await
            .map_err(|e| PageError::Script(e.to_string()))?;
        self.element.click().await.map_err(click_error)?;
        self.element
            .type_str(text)
            .await
            .map(|_| ())
            .map_err(|e| PageError::Session(e.to_string()))
    }

    async fn find_element(&self, selector: &str) -> Result<Box<dyn PageElement>, PageError> {
        match self.element.find_element(selector).await {
            Ok(element) => Ok(Box::new(ChromiumElement { element })),
            Err(_) => Err(PageError::no_such_element(selector)),
        }
    }
}

/// Native click failures where the element has no point to hit (zero-size,
/// off-screen or not laid out). A scripted click can still reach those.
const HIT_TEST_FAILURES: [&str; 4] = ["box model", "clickable point", "scroll", "layout object"];

fn is_hit_test_failure(message: &str) -> bool {
    let message = message.to_ascii_lowercase();
    HIT_TEST_FAILURES.iter().any(|marker| message.contains(marker))
}

fn click_error(e: impl std::fmt::Display) -> PageError {
    let message = e.to_string();
    if is_hit_test_failure(&message) {
        PageError::ClickIntercepted(message)
    } else {
        PageError::Session(message)
    }
}
