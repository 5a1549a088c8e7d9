// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Walks the slides of an open carousel post.

use super::locator::ElementLocator;
use super::pagination::ButtonPager;
use super::retry::RetryPolicy;
use crate::error::{ExtractError, ExtractResult};
use crate::extraction::types::{resolve_link, LinkCollection, MediaType, NextButton, SLIDE_SELECTOR};
use crate::renderer::{PageError, RenderContext};
use tracing::debug;

#[derive(Debug, Clone)]
pub struct CarouselWalker {
    locator: ElementLocator,
    slide_policy: RetryPolicy,
}

impl CarouselWalker {
    /// `slide_tries` bounds the wait for the slide control; it is already
    /// rendered when a carousel is open, so a few attempts suffice.
    pub fn new(locator: ElementLocator, slide_tries: u32) -> Self {
        let slide_policy = locator.policy().with_attempts(slide_tries);
        Self {
            locator,
            slide_policy,
        }
    }

    /// Collect up to `max_count` `media_type` URLs from successive slides.
    ///
    /// Each slide is read from the last rendered slide container, then the
    /// carousel advances. A slide without matching media still costs one
    /// step.
    pub async fn walk(
        &self,
        ctx: &dyn RenderContext,
        media_type: MediaType,
        max_count: usize,
    ) -> ExtractResult<LinkCollection> {
        let mut links = LinkCollection::new();
        let Some(selector) = media_type.selector() else {
            return Ok(links);
        };
        if max_count == 0 {
            return Ok(links);
        }

        let pager = ButtonPager::new(NextButton::SlideNext, self.slide_policy.clone());
        let mut slides = 0usize;
        loop {
            slides += 1;
            if let Some(src) = self.current_slide_src(ctx, selector).await? {
                let page = ctx.get_url().await?;
                let url = resolve_link(&page, &src)
                    .map_err(|source| ExtractError::InvalidUrl { url: src, source })?;
                links.push(url);
            }
            let ended = pager.advance(ctx).await?;
            if ended || links.len() >= max_count {
                break;
            }
        }
        debug!(slides, found = links.len(), %media_type, "carousel walked");
        Ok(links)
    }

    async fn current_slide_src(
        &self,
        ctx: &dyn RenderContext,
        selector: &str,
    ) -> Result<Option<String>, PageError> {
        let slides = self.locator.find_many(ctx, SLIDE_SELECTOR).await?;
        let Some(current) = slides.last() else {
            return Ok(None);
        };
        match current.find_element(selector).await {
            Ok(media) => media.attribute("src").await,
            Err(PageError::NoSuchElement { .. }) => Ok(None),
            Err(e) => Err(e),
        }
    }
}
