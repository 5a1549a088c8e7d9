// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Decides what kind of post is open in the single-post view.

use super::locator::ElementLocator;
use crate::extraction::types::{MediaType, CAROUSEL_MARKER};
use crate::renderer::{PageError, RenderContext};
use tracing::debug;

#[derive(Debug, Clone, Default)]
pub struct PostTypeClassifier {
    locator: ElementLocator,
}

impl PostTypeClassifier {
    pub fn new(locator: ElementLocator) -> Self {
        Self { locator }
    }

    /// Carousel when the URL carries the slide marker, Photo when a photo
    /// renders, Clip otherwise.
    pub async fn classify(&self, ctx: &dyn RenderContext) -> Result<MediaType, PageError> {
        let url = ctx.get_url().await?;
        let kind = if url.contains(CAROUSEL_MARKER) {
            MediaType::Carousel
        } else if let Some(selector) = MediaType::Photo.selector() {
            match self.locator.find_one(ctx, selector).await? {
                Some(_) => MediaType::Photo,
                None => MediaType::Clip,
            }
        } else {
            MediaType::Clip
        };
        debug!(%url, %kind, "classified post");
        Ok(kind)
    }
}
