// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Media kinds, pagination controls, and the validated link collection.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use url::Url;

/// Query marker present in the URL of an open carousel post.
pub const CAROUSEL_MARKER: &str = "img_index";

/// Grid thumbnails linking to individual posts.
pub const POST_LINK_SELECTOR: &str = "a[href*='/p/']";

/// Slide containers of an open carousel; the last one is the current slide.
pub const SLIDE_SELECTOR: &str = "article ul > li";

/// Kind of content being searched for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaType {
    Photo,
    Clip,
    Carousel,
}

impl MediaType {
    /// CSS selector of this media on a rendered post.
    ///
    /// Carousel is a container state and has none.
    pub fn selector(&self) -> Option<&'static str> {
        match self {
            MediaType::Photo => Some("img[style='object-fit: cover;']"),
            MediaType::Clip => Some("video[type='video/mp4']"),
            MediaType::Carousel => None,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            MediaType::Photo => "photo",
            MediaType::Clip => "clip",
            MediaType::Carousel => "carousel",
        }
    }
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for MediaType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "photo" | "photos" => Ok(MediaType::Photo),
            "clip" | "clips" | "video" => Ok(MediaType::Clip),
            "carousel" => Ok(MediaType::Carousel),
            other => Err(format!("unknown media type: {other}")),
        }
    }
}

/// "Advance" controls, one per view.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NextButton {
    /// Moves the open post dialog to the next post of the feed.
    PostNext,
    /// Moves an open carousel to its next slide.
    SlideNext,
}

impl NextButton {
    pub fn selector(&self) -> &'static str {
        match self {
            NextButton::PostNext => "div._aaqg button",
            NextButton::SlideNext => "button[aria-label='Next']",
        }
    }
}

/// Ordered list of validated URLs, in discovery order. Duplicates are kept.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LinkCollection {
    urls: Vec<Url>,
}

impl LinkCollection {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and append one URL.
    pub fn push_str(&mut self, raw: &str) -> Result<(), url::ParseError> {
        self.urls.push(Url::parse(raw)?);
        Ok(())
    }

    pub fn push(&mut self, url: Url) {
        self.urls.push(url);
    }

    pub fn extend(&mut self, other: LinkCollection) {
        self.urls.extend(other.urls);
    }

    pub fn truncate(&mut self, len: usize) {
        self.urls.truncate(len);
    }

    pub fn contains(&self, url: &Url) -> bool {
        self.urls.contains(url)
    }

    pub fn len(&self) -> usize {
        self.urls.len()
    }

    pub fn is_empty(&self) -> bool {
        self.urls.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Url> {
        self.urls.iter()
    }

    pub fn to_strings(&self) -> Vec<String> {
        self.urls.iter().map(Url::to_string).collect()
    }
}

impl TryFrom<Vec<String>> for LinkCollection {
    type Error = url::ParseError;

    /// Fails on the first entry that is not a well-formed URL.
    fn try_from(raw: Vec<String>) -> Result<Self, Self::Error> {
        let urls = raw
            .iter()
            .map(|s| Url::parse(s))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { urls })
    }
}

impl IntoIterator for LinkCollection {
    type Item = Url;
    type IntoIter = std::vec::IntoIter<Url>;

    fn into_iter(self) -> Self::IntoIter {
        self.urls.into_iter()
    }
}

/// The post URL without query or fragment.
pub fn permalink(raw: &str) -> Result<Url, url::ParseError> {
    let mut url = Url::parse(raw)?;
    url.set_query(None);
    url.set_fragment(None);
    Ok(url)
}

/// Resolve a possibly relative `raw` link against the page it was found on.
pub fn resolve_link(base: &str, raw: &str) -> Result<Url, url::ParseError> {
    match Url::parse(raw) {
        Ok(url) => Ok(url),
        Err(url::ParseError::RelativeUrlWithoutBase) => Url::parse(base)?.join(raw),
        Err(e) => Err(e),
    }
}
