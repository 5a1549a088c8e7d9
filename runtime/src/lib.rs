// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Feedlens runtime library: profile media extraction through a headless
//! browser.
//!
//! [`extraction::ProfileMediaExtractor`] is the engine entry point; the
//! [`renderer`] traits abstract the browser so the engine runs equally
//! against Chromium and the scripted [`renderer::mock`] pages used in tests.

pub mod cli;
pub mod config;
pub mod error;
pub mod extraction;
pub mod intelligence;
pub mod live;
pub mod renderer;
pub mod rest;
pub mod trust;
