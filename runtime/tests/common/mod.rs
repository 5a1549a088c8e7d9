// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scripted stand-in for the target site.

#![allow(dead_code)]

use feedlens_runtime::config::Settings;
use feedlens_runtime::extraction::types::{MediaType, NextButton, POST_LINK_SELECTOR, SLIDE_SELECTOR};
use feedlens_runtime::extraction::ProfileMediaExtractor;
use feedlens_runtime::intelligence::cache::MediaCache;
use feedlens_runtime::renderer::mock::{MockContext, MockNode};
use std::time::Duration;
use url::Url;

pub const SITE: &str = "https://www.instagram.com";

/// One feed entry.
#[derive(Debug, Clone)]
pub enum Post {
    Photo(&'static str),
    Clip(&'static str),
    /// Slides in order; `true` is a photo slide, `false` a clip slide.
    Carousel(&'static str, Vec<bool>),
}

impl Post {
    pub fn id(&self) -> &'static str {
        match self {
            Post::Photo(id) | Post::Clip(id) | Post::Carousel(id, _) => id,
        }
    }

    pub fn permalink(&self) -> String {
        format!("{SITE}/p/{}/", self.id())
    }

    /// URL the post opens at.
    pub fn entry_url(&self) -> String {
        match self {
            Post::Carousel(..) => slide_url(self.id(), 1),
            _ => self.permalink(),
        }
    }
}

pub fn slide_url(id: &str, index: usize) -> String {
    format!("{SITE}/p/{id}/?img_index={index}")
}

pub fn photo_src(id: &str) -> String {
    format!("https://cdn.test/{id}.jpg")
}

pub fn clip_src(id: &str) -> String {
    format!("https://cdn.test/{id}.mp4")
}

fn media(is_photo: bool, src_id: &str) -> MockNode {
    let selector = if is_photo {
        MediaType::Photo.selector()
    } else {
        MediaType::Clip.selector()
    };
    let src = if is_photo { photo_src(src_id) } else { clip_src(src_id) };
    MockNode::new(selector.unwrap_or_default()).attr("src", &src)
}

/// A profile page for `username` with `posts` in its grid, every post
/// opening in the single-post view and linked to the next one.
pub fn fake_site(username: &str, posts: &[Post]) -> MockContext {
    let mut profile = vec![MockNode::new("span").text(&format!("{} Posts", posts.len()))];
    for post in posts {
        profile.push(
            MockNode::new(POST_LINK_SELECTOR)
                .attr("href", &format!("/p/{}/", post.id()))
                .on_click(&post.entry_url()),
        );
    }
    let mut ctx = MockContext::new().page(&format!("{SITE}/{username}/"), profile);

    for (i, post) in posts.iter().enumerate() {
        let next_post = posts
            .get(i + 1)
            .map(|next| MockNode::new(NextButton::PostNext.selector()).on_click(&next.entry_url()));

        match post {
            Post::Photo(id) | Post::Clip(id) => {
                let mut nodes = vec![media(matches!(post, Post::Photo(_)), id)];
                nodes.extend(next_post);
                ctx = ctx.page(&post.permalink(), nodes);
            }
            Post::Carousel(id, slides) => {
                let mut rendered = Vec::new();
                for (s, &is_photo) in slides.iter().enumerate() {
                    let index = s + 1;
                    let slide_id = format!("{id}-{index}");
                    rendered.push(MockNode::new(SLIDE_SELECTOR).child(media(is_photo, &slide_id)));

                    let mut nodes = rendered.clone();
                    if index < slides.len() {
                        nodes.push(
                            MockNode::new(NextButton::SlideNext.selector())
                                .on_click(&slide_url(id, index + 1)),
                        );
                    }
                    nodes.extend(next_post.clone());
                    ctx = ctx.page(&slide_url(id, index), nodes);
                }
            }
        }
    }
    ctx
}

/// Settings with a short lookup budget; tests run on a paused clock.
pub fn settings() -> Settings {
    Settings {
        retry_attempts: 3,
        ..Settings::for_site(Url::parse(SITE).unwrap())
    }
}

pub fn extractor() -> ProfileMediaExtractor {
    let settings = settings();
    ProfileMediaExtractor::new(
        &settings,
        MediaCache::in_memory(Duration::from_secs(15), 64),
    )
}
