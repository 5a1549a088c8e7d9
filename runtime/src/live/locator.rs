// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Element lookup that rides out render delays.
//!
//! Pages render asynchronously, so a lookup is retried under a
//! [`RetryPolicy`]. If the element is still missing once the policy gives up,
//! that is reported as absence (`None` or an empty list), not as an error.

use super::retry::{retry, RetryPolicy};
use crate::renderer::{PageElement, PageError, RenderContext};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct ElementLocator {
    policy: RetryPolicy,
}

impl ElementLocator {
    pub fn new(policy: RetryPolicy) -> Self {
        Self { policy }
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    /// First element matching `selector`, or `None` if it never renders.
    pub async fn find_one(
        &self,
        ctx: &dyn RenderContext,
        selector: &str,
    ) -> Result<Option<Box<dyn PageElement>>, PageError> {
        self.find_one_with(ctx, selector, &self.policy).await
    }

    /// [`find_one`](Self::find_one) under a caller-supplied policy.
    pub async fn find_one_with(
        &self,
        ctx: &dyn RenderContext,
        selector: &str,
        policy: &RetryPolicy,
    ) -> Result<Option<Box<dyn PageElement>>, PageError> {
        absent_as_none(retry(policy, || ctx.find_element(selector)).await)
    }

    /// Every element matching `selector`; empty if none ever render.
    pub async fn find_many(
        &self,
        ctx: &dyn RenderContext,
        selector: &str,
    ) -> Result<Vec<Box<dyn PageElement>>, PageError> {
        let found = retry(&self.policy, || async move {
            let elements = ctx.find_elements(selector).await?;
            if elements.is_empty() {
                Err(PageError::no_such_element(selector))
            } else {
                Ok(elements)
            }
        })
        .await;
        Ok(absent_as_none(found)?.unwrap_or_default())
    }

    /// First element matching `selector` whose text contains `needle`.
    pub async fn find_by_text(
        &self,
        ctx: &dyn RenderContext,
        selector: &str,
        needle: &str,
    ) -> Result<Option<Box<dyn PageElement>>, PageError> {
        let found = retry(&self.policy, || async move {
            for element in ctx.find_elements(selector).await? {
                let text = element.text().await?.unwrap_or_default();
                if text.contains(needle) {
                    return Ok(element);
                }
            }
            Err(PageError::no_such_element(&format!("{selector} containing `{needle}`")))
        })
        .await;
        absent_as_none(found)
    }
}

/// Click `element`, falling back to a scripted click when an overlay
/// intercepts the native one.
pub async fn click_through(element: &dyn PageElement) -> Result<(), PageError> {
    match element.click().await {
        Ok(()) => Ok(()),
        Err(PageError::ClickIntercepted(reason)) => {
            debug!("native click intercepted ({reason}), clicking from script");
            element.js_click().await
        }
        Err(e) => Err(e),
    }
}

fn absent_as_none<T>(result: Result<T, PageError>) -> Result<Option<T>, PageError> {
    match result {
        Ok(value) => Ok(Some(value)),
        Err(PageError::NoSuchElement { selector }) => {
            debug!("`{selector}` absent after retries");
            Ok(None)
        }
        Err(e) => Err(e),
    }
}
