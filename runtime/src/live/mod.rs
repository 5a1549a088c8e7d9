// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Live page-session components of the extraction engine.
//!
//! Data flows downward: the extractor drives pagers, the classifier and the
//! carousel walker, which use the locator and navigator, which run under
//! retry policies against a borrowed [`RenderContext`](crate::renderer::RenderContext).

pub mod auth;
pub mod carousel;
pub mod classify;
pub mod locator;
pub mod navigator;
pub mod pagination;
pub mod profile;
pub mod retry;
pub mod session;
