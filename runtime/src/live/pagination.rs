// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Moving to the next unit of content.
//!
//! Two strategies, each terminal once it reports end:
//!
//! - [`ScrollPager`] scrolls the profile grid to the bottom and compares the
//!   document height with the previous step. A repeated height is the end.
//!   The first observation only primes the state.
//! - [`ButtonPager`] clicks a "next" control. A control that never renders
//!   is the end.
//!
//! Pagers are per page. Build a new one after every navigation.

use super::locator::{click_through, ElementLocator};
use super::retry::RetryPolicy;
use crate::extraction::types::NextButton;
use crate::renderer::{PageError, RenderContext};
use std::time::Duration;
use tracing::debug;

/// Scrolls to the bottom and reports the resulting document height.
pub const SCROLL_SCRIPT: &str = "(() => { window.scrollTo(0, document.body.scrollHeight); \
                                 return document.body.scrollHeight; })()";

/// Infinite-scroll state machine.
#[derive(Debug, Clone)]
pub struct ScrollPager {
    last_height: Option<u64>,
    settle: Duration,
    ended: bool,
}

impl ScrollPager {
    pub fn new(settle: Duration) -> Self {
        Self {
            last_height: None,
            settle,
            ended: false,
        }
    }

    /// Pure transition: fold `height` into `state`, returning the new state
    /// and whether the end was reached.
    pub fn step(state: Option<u64>, height: u64) -> (Option<u64>, bool) {
        let is_end = state == Some(height);
        (Some(height), is_end)
    }

    pub fn is_ended(&self) -> bool {
        self.ended
    }

    /// Scroll once. Returns `true` at the end of the page; otherwise waits
    /// for the newly loaded rows to settle and returns `false`.
    pub async fn advance(&mut self, ctx: &dyn RenderContext) -> Result<bool, PageError> {
        if self.ended {
            return Ok(true);
        }
        let value = ctx.execute_js(SCROLL_SCRIPT).await?;
        let height = value
            .as_u64()
            .or_else(|| value.as_f64().map(|h| h.max(0.0) as u64))
            .ok_or_else(|| PageError::Script(format!("scroll height is not a number: {value}")))?;

        let (state, is_end) = Self::step(self.last_height, height);
        self.last_height = state;
        self.ended = is_end;
        debug!(height, is_end, "scrolled");

        if !is_end {
            tokio::time::sleep(self.settle).await;
        }
        Ok(is_end)
    }
}

/// Next-control state machine.
#[derive(Debug, Clone)]
pub struct ButtonPager {
    button: NextButton,
    locator: ElementLocator,
}

impl ButtonPager {
    pub fn new(button: NextButton, policy: RetryPolicy) -> Self {
        Self {
            button,
            locator: ElementLocator::new(policy),
        }
    }

    /// Click the control. Returns `true` when it is absent (end reached).
    pub async fn advance(&self, ctx: &dyn RenderContext) -> Result<bool, PageError> {
        let selector = self.button.selector();
        match self.locator.find_one(ctx, selector).await? {
            Some(next) => {
                click_through(next.as_ref()).await?;
                Ok(false)
            }
            None => {
                debug!(button = ?self.button, "no next control, end reached");
                Ok(true)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::mock::{MockContext, MockNode};
    use tokio::time::Instant;

    fn drive(heights: &[u64]) -> Vec<bool> {
        let mut state = None;
        heights
            .iter()
            .map(|&h| {
                let (next, is_end) = ScrollPager::step(state, h);
                state = next;
                is_end
            })
            .collect()
    }

    #[test]
    fn test_repeated_height_ends() {
        assert_eq!(drive(&[100, 200, 200]), vec![false, false, true]);
    }

    #[test]
    fn test_growing_page_never_ends() {
        assert_eq!(drive(&[100, 200, 300]), vec![false, false, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_scroll_pager_settles_between_steps() {
        let ctx = MockContext::new().scroll_heights(&[100, 200, 200]);
        let mut pager = ScrollPager::new(Duration::from_secs(5));
        let start = Instant::now();

        assert!(!pager.advance(&ctx).await.unwrap());
        assert!(!pager.advance(&ctx).await.unwrap());
        assert!(pager.advance(&ctx).await.unwrap());

        assert_eq!(start.elapsed(), Duration::from_secs(10));
        assert!(pager.is_ended());
        // Terminal: no further scripts once ended.
        assert!(pager.advance(&ctx).await.unwrap());
        assert_eq!(ctx.scripts_run(), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_button_pager_clicks_until_control_disappears() {
        let first = "https://site.test/p/1/";
        let second = "https://site.test/p/2/";
        let next = NextButton::PostNext.selector();
        let ctx = MockContext::new()
            .page(first, vec![MockNode::new(next).intercepted().on_click(second)])
            .page(second, vec![])
            .at(first);
        let pager = ButtonPager::new(NextButton::PostNext, RetryPolicy::new(3, Duration::from_secs(1)));

        assert!(!pager.advance(&ctx).await.unwrap());
        assert_eq!(ctx.current_url(), second);
        assert!(pager.advance(&ctx).await.unwrap());
        assert_eq!(ctx.lookups_of(next), 4);
    }
}
