// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scripted in-memory page sessions for tests.
//!
//! A [`MockContext`] holds a set of pages keyed by URL. Each page is a flat
//! list of [`MockNode`]s matched by their literal selector string; nodes can
//! carry text, attributes, nested children and a click target (the URL the
//! session switches to when the node is clicked). Nodes can be hidden until a
//! number of lookups have happened (render delay) or a number of scripts have
//! run (infinite-scroll reveal). Clones share state, so a test keeps one
//! handle for assertions while the engine drives another.

use super::{NavigationResult, PageElement, PageError, RenderContext, Renderer};
use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::{Arc, Mutex, MutexGuard};

/// One element of a scripted page.
#[derive(Debug, Clone, Default)]
pub struct MockNode {
    pub selector: String,
    pub text: Option<String>,
    pub attributes: HashMap<String, String>,
    pub children: Vec<MockNode>,
    pub click_target: Option<String>,
    pub intercepts_click: bool,
    pub click_failure: Option<PageError>,
    pub visible_after_lookups: u32,
    pub visible_after_scripts: u32,
}

impl MockNode {
    pub fn new(selector: &str) -> Self {
        Self {
            selector: selector.to_string(),
            ..Default::default()
        }
    }

    pub fn text(mut self, text: &str) -> Self {
        self.text = Some(text.to_string());
        self
    }

    pub fn attr(mut self, name: &str, value: &str) -> Self {
        self.attributes.insert(name.to_string(), value.to_string());
        self
    }

    pub fn child(mut self, node: MockNode) -> Self {
        self.children.push(node);
        self
    }

    /// Clicking this node moves the session to `url`.
    pub fn on_click(mut self, url: &str) -> Self {
        self.click_target = Some(url.to_string());
        self
    }

    /// Native clicks fail as if an overlay covered the node.
    pub fn intercepted(mut self) -> Self {
        self.intercepts_click = true;
        self
    }

    /// Every click, native or scripted, fails with `error`.
    pub fn failing(mut self, error: PageError) -> Self {
        self.click_failure = Some(error);
        self
    }

    /// Hidden for the first `lookups` lookups of its selector.
    pub fn delayed(mut self, lookups: u32) -> Self {
        self.visible_after_lookups = lookups;
        self
    }

    /// Hidden until `scripts` scripts have run in the session.
    pub fn revealed_after(mut self, scripts: u32) -> Self {
        self.visible_after_scripts = scripts;
        self
    }
}

#[derive(Default)]
struct MockState {
    current_url: String,
    pages: HashMap<String, Vec<MockNode>>,
    navigations: Vec<String>,
    clicks: Vec<String>,
    fills: Vec<(String, String)>,
    lookups: HashMap<String, u32>,
    scripts: u32,
    heights: VecDeque<u64>,
    last_height: u64,
    closed: usize,
}

fn page_key(url: &str) -> String {
    url.trim_end_matches('/').to_string()
}

/// A scripted page session.
#[derive(Clone, Default)]
pub struct MockContext {
    state: Arc<Mutex<MockState>>,
}

impl MockContext {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register the nodes rendered at `url`.
    pub fn page(self, url: &str, nodes: Vec<MockNode>) -> Self {
        self.lock().pages.insert(page_key(url), nodes);
        self
    }

    /// Heights returned by successive scripts. Once drained, the last
    /// height repeats.
    pub fn scroll_heights(self, heights: &[u64]) -> Self {
        self.lock().heights.extend(heights.iter().copied());
        self
    }

    /// Start the session on `url` without recording a navigation.
    pub fn at(self, url: &str) -> Self {
        self.lock().current_url = url.to_string();
        self
    }

    pub fn navigations(&self) -> Vec<String> {
        self.lock().navigations.clone()
    }

    /// Selectors of every clicked node, in click order.
    pub fn clicks(&self) -> Vec<String> {
        self.lock().clicks.clone()
    }

    pub fn clicks_on(&self, selector: &str) -> usize {
        self.lock().clicks.iter().filter(|s| *s == selector).count()
    }

    /// `(selector, text)` for every filled input.
    pub fn fills(&self) -> Vec<(String, String)> {
        self.lock().fills.clone()
    }

    pub fn scripts_run(&self) -> u32 {
        self.lock().scripts
    }

    pub fn lookups_of(&self, selector: &str) -> u32 {
        self.lock().lookups.get(selector).copied().unwrap_or(0)
    }

    pub fn closed(&self) -> usize {
        self.lock().closed
    }

    pub fn current_url(&self) -> String {
        self.lock().current_url.clone()
    }

    fn lock(&self) -> MutexGuard<'_, MockState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn visible_matches(&self, selector: &str) -> Vec<MockNode> {
        let mut state = self.lock();
        let seen = {
            let count = state.lookups.entry(selector.to_string()).or_insert(0);
            *count += 1;
            *count
        };
        let scripts = state.scripts;
        let key = page_key(&state.current_url);
        state
            .pages
            .get(&key)
            .map(|nodes| {
                nodes
                    .iter()
                    .filter(|n| n.selector == selector)
                    .filter(|n| seen > n.visible_after_lookups && scripts >= n.visible_after_scripts)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }

    fn element(&self, node: MockNode) -> Box<dyn PageElement> {
        Box::new(MockElement {
            node,
            ctx: self.clone(),
        })
    }
}

#[async_trait]
impl RenderContext for MockContext {
    async fn navigate(&mut self, url: &str, _timeout_ms: u64) -> Result<NavigationResult, PageError> {
        let mut state = self.lock();
        state.navigations.push(url.to_string());
        state.current_url = url.to_string();
        Ok(NavigationResult {
            final_url: url.to_string(),
            load_time_ms: 0,
        })
    }

    async fn execute_js(&self, _script: &str) -> Result<serde_json::Value, PageError> {
        let mut state = self.lock();
        state.scripts += 1;
        if let Some(height) = state.heights.pop_front() {
            state.last_height = height;
        }
        Ok(serde_json::json!(state.last_height))
    }

    async fn get_url(&self) -> Result<String, PageError> {
        Ok(self.lock().current_url.clone())
    }

    async fn find_element(&self, selector: &str) -> Result<Box<dyn PageElement>, PageError> {
        self.visible_matches(selector)
            .into_iter()
            .next()
            .map(|node| self.element(node))
            .ok_or_else(|| PageError::no_such_element(selector))
    }

    async fn find_elements(&self, selector: &str) -> Result<Vec<Box<dyn PageElement>>, PageError> {
        Ok(self
            .visible_matches(selector)
            .into_iter()
            .map(|node| self.element(node))
            .collect())
    }

    async fn close(self: Box<Self>) -> Result<(), PageError> {
        self.lock().closed += 1;
        Ok(())
    }
}

struct MockElement {
    node: MockNode,
    ctx: MockContext,
}

impl MockElement {
    fn activate(&self) {
        let mut state = self.ctx.lock();
        state.clicks.push(self.node.selector.clone());
        if let Some(target) = &self.node.click_target {
            state.current_url = target.clone();
        }
    }
}

#[async_trait]
impl PageElement for MockElement {
    async fn click(&self) -> Result<(), PageError> {
        if let Some(error) = &self.node.click_failure {
            return Err(error.clone());
        }
        if self.node.intercepts_click {
            return Err(PageError::ClickIntercepted(format!(
                "`{}` is covered by another element",
                self.node.selector
            )));
        }
        self.activate();
        Ok(())
    }

    async fn js_click(&self) -> Result<(), PageError> {
        if let Some(error) = &self.node.click_failure {
            return Err(error.clone());
        }
        self.activate();
        Ok(())
    }

    async fn attribute(&self, name: &str) -> Result<Option<String>, PageError> {
        Ok(self.node.attributes.get(name).cloned())
    }

    async fn text(&self) -> Result<Option<String>, PageError> {
        Ok(self.node.text.clone())
    }

    async fn fill(&self, text: &str) -> Result<(), PageError> {
        self.ctx
            .lock()
            .fills
            .push((self.node.selector.clone(), text.to_string()));
        Ok(())
    }

    async fn find_element(&self, selector: &str) -> Result<Box<dyn PageElement>, PageError> {
        self.node
            .children
            .iter()
            .find(|n| n.selector == selector)
            .cloned()
            .map(|node| self.ctx.element(node))
            .ok_or_else(|| PageError::no_such_element(selector))
    }
}

/// Renderer handing out sessions that share one [`MockContext`].
pub struct MockRenderer {
    ctx: MockContext,
}

impl MockRenderer {
    pub fn new(ctx: MockContext) -> Self {
        Self { ctx }
    }
}

#[async_trait]
impl Renderer for MockRenderer {
    async fn new_context(&self) -> Result<Box<dyn RenderContext>, PageError> {
        Ok(Box::new(self.ctx.clone()))
    }

    async fn shutdown(&self) -> Result<(), PageError> {
        Ok(())
    }

    fn active_contexts(&self) -> usize {
        0
    }
}
