// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Profile media extraction.
//!
//! [`ProfileMediaExtractor`] is the single entry point used by the CLI and the
//! HTTP layer. It validates the profile, opens the first post of the feed and
//! steps through posts with the post "next" control, classifying each one in
//! place. Carousels contribute the first matching slide. Results are cached
//! per call and per post.

pub mod types;

use crate::config::Settings;
use crate::error::{ExtractError, ExtractResult};
use crate::intelligence::cache::{CacheKey, MediaCache};
use crate::live::carousel::CarouselWalker;
use crate::live::classify::PostTypeClassifier;
use crate::live::locator::{click_through, ElementLocator};
use crate::live::navigator::SessionNavigator;
use crate::live::pagination::{ButtonPager, ScrollPager};
use crate::live::profile::ProfileValidator;
use crate::live::retry::RetryPolicy;
use crate::renderer::RenderContext;
use std::collections::HashSet;
use std::time::Duration;
use tracing::{debug, info};
use types::{permalink, resolve_link, LinkCollection, MediaType, NextButton, POST_LINK_SELECTOR};
use url::Url;

pub struct ProfileMediaExtractor {
    site_url: Url,
    locator: ElementLocator,
    validator: ProfileValidator,
    classifier: PostTypeClassifier,
    walker: CarouselWalker,
    post_pager: ButtonPager,
    scroll_settle: Duration,
    cache: MediaCache,
}

impl ProfileMediaExtractor {
    pub fn new(settings: &Settings, cache: MediaCache) -> Self {
        let policy = RetryPolicy::new(settings.retry_attempts, settings.retry_delay);
        let locator = ElementLocator::new(policy.clone());
        let navigator = SessionNavigator::new(settings.navigation_timeout_ms);
        Self {
            site_url: settings.site_url.clone(),
            validator: ProfileValidator::new(
                settings.site_url.clone(),
                settings.credentials.clone(),
                locator.clone(),
                navigator,
            ),
            classifier: PostTypeClassifier::new(locator.clone()),
            walker: CarouselWalker::new(locator.clone(), settings.slide_tries),
            post_pager: ButtonPager::new(NextButton::PostNext, policy),
            scroll_settle: settings.scroll_settle,
            locator,
            cache,
        }
    }

    pub fn cache(&self) -> &MediaCache {
        &self.cache
    }

    /// Up to `max_count` URLs of `media_type` media from `username`'s feed,
    /// in feed order.
    pub async fn extract(
        &self,
        ctx: &mut dyn RenderContext,
        username: &str,
        media_type: MediaType,
        max_count: usize,
    ) -> ExtractResult<LinkCollection> {
        if max_count == 0 {
            return Ok(LinkCollection::new());
        }
        let key = CacheKey::Profile {
            username: username.to_string(),
            media_type,
            max_count,
        };
        if let Some(hit) = self.cache.get(&key).await {
            info!(username, %media_type, "served from cache");
            return Ok(hit);
        }

        self.validator.validate(ctx, username).await?;
        let links = self.walk_feed(ctx, media_type, max_count).await?;

        info!(username, %media_type, found = links.len(), "extraction finished");
        self.cache.set(&key, &links).await;
        Ok(links)
    }

    /// Up to `max_count` post permalinks from `username`'s grid, scrolling
    /// until enough are collected or the grid stops growing.
    pub async fn post_urls(
        &self,
        ctx: &mut dyn RenderContext,
        username: &str,
        max_count: usize,
    ) -> ExtractResult<LinkCollection> {
        if max_count == 0 {
            return Ok(LinkCollection::new());
        }
        let key = CacheKey::Posts {
            username: username.to_string(),
            max_count,
        };
        if let Some(hit) = self.cache.get(&key).await {
            info!(username, "posts served from cache");
            return Ok(hit);
        }

        self.validator.validate(ctx, username).await?;

        let mut pager = ScrollPager::new(self.scroll_settle);
        let mut links = LinkCollection::new();
        'grid: loop {
            for anchor in self.locator.find_many(ctx, POST_LINK_SELECTOR).await? {
                let Some(href) = anchor.attribute("href").await? else {
                    continue;
                };
                if !href.contains("/p/") {
                    continue;
                }
                let url = resolve(self.site_url.as_str(), &href)?;
                if !links.contains(&url) {
                    links.push(url);
                }
                if links.len() >= max_count {
                    break 'grid;
                }
            }
            if pager.advance(ctx).await? {
                break;
            }
        }

        info!(username, found = links.len(), "post listing finished");
        self.cache.set(&key, &links).await;
        Ok(links)
    }

    async fn walk_feed(
        &self,
        ctx: &dyn RenderContext,
        media_type: MediaType,
        max_count: usize,
    ) -> ExtractResult<LinkCollection> {
        let mut links = LinkCollection::new();
        let Some(first) = self.locator.find_one(ctx, POST_LINK_SELECTOR).await? else {
            debug!("profile has no posts");
            return Ok(links);
        };
        click_through(first.as_ref()).await?;

        let mut visited = HashSet::new();
        loop {
            let page = ctx.get_url().await?;
            let post = permalink(&page).map_err(|source| ExtractError::InvalidUrl {
                url: page.clone(),
                source,
            })?;
            if !visited.insert(post.clone()) {
                debug!(%post, "next control led back to a visited post, end reached");
                break;
            }
            links.extend(self.post_media(ctx, &page, post, media_type).await?);
            if links.len() >= max_count || self.post_pager.advance(ctx).await? {
                break;
            }
        }
        debug!(posts = visited.len(), found = links.len(), "feed walked");
        links.truncate(max_count);
        Ok(links)
    }

    /// Matching media of the open post at `page`, through the per-post cache.
    async fn post_media(
        &self,
        ctx: &dyn RenderContext,
        page: &str,
        post: Url,
        media_type: MediaType,
    ) -> ExtractResult<LinkCollection> {
        let key = CacheKey::Post {
            permalink: post.clone(),
            media_type,
        };
        if let Some(hit) = self.cache.get(&key).await {
            return Ok(hit);
        }

        let kind = self.classifier.classify(ctx).await?;
        let found = match (kind, media_type) {
            (MediaType::Carousel, MediaType::Carousel) => {
                let mut links = LinkCollection::new();
                links.push(post);
                links
            }
            (MediaType::Carousel, wanted) => self.walker.walk(ctx, wanted, 1).await?,
            (kind, wanted) if kind == wanted => self.media_src(ctx, page, wanted).await?,
            _ => LinkCollection::new(),
        };

        self.cache.set(&key, &found).await;
        Ok(found)
    }

    async fn media_src(
        &self,
        ctx: &dyn RenderContext,
        page: &str,
        media_type: MediaType,
    ) -> ExtractResult<LinkCollection> {
        let mut links = LinkCollection::new();
        let Some(selector) = media_type.selector() else {
            return Ok(links);
        };
        if let Some(media) = self.locator.find_one(ctx, selector).await? {
            if let Some(src) = media.attribute("src").await? {
                links.push(resolve(page, &src)?);
            }
        }
        Ok(links)
    }
}

fn resolve(base: &str, raw: &str) -> ExtractResult<Url> {
    resolve_link(base, raw).map_err(|source| ExtractError::InvalidUrl {
        url: raw.to_string(),
        source,
    })
}
