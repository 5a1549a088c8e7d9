// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Errors surfaced by the extraction engine.
//!
//! Missing elements never appear here: below profile validation an absent
//! element is data (an empty result or the end of pagination), not failure.

use crate::renderer::PageError;

/// All errors an extraction call can return.
#[derive(thiserror::Error, Debug)]
pub enum ExtractError {
    /// The profile page has no posts marker.
    #[error("User not found {username}")]
    ProfileNotFound { username: String },

    /// The page session failed in a way no retry policy covers.
    #[error(transparent)]
    Page(#[from] PageError),

    /// A discovered link could not be parsed as a URL.
    #[error("invalid media url `{url}`: {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },
}

impl ExtractError {
    /// The username carried by a not-found error.
    pub fn missing_username(&self) -> Option<&str> {
        match self {
            ExtractError::ProfileNotFound { username } => Some(username),
            _ => None,
        }
    }
}

pub type ExtractResult<T> = Result<T, ExtractError>;
