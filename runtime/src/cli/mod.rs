// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! CLI subcommand implementations for the Feedlens binary.

pub mod doctor;
pub mod extract_cmd;
pub mod output;
pub mod posts_cmd;
pub mod serve;

use crate::config::Settings;
use crate::extraction::ProfileMediaExtractor;
use crate::intelligence::cache::MediaCache;
use crate::renderer::chromium::ChromiumRenderer;
use anyhow::{Context, Result};

/// Launch Chromium for a one-shot command.
pub async fn launch_chromium(settings: &Settings) -> Result<ChromiumRenderer> {
    ChromiumRenderer::new(settings.chromium_path.as_deref())
        .await
        .context("failed to launch Chromium (run `feedlens doctor`)")
}

/// Extractor with a fresh in-memory cache sized from `settings`.
pub fn build_extractor(settings: &Settings) -> ProfileMediaExtractor {
    let cache = MediaCache::in_memory(settings.cache_ttl, settings.cache_max_entries);
    ProfileMediaExtractor::new(settings, cache)
}

/// Print collected links as JSON or one per line.
pub fn print_links(links: &crate::extraction::types::LinkCollection) -> Result<()> {
    if output::is_json() {
        output::print_json(&serde_json::to_value(links)?);
    } else {
        for url in links.iter() {
            println!("{url}");
        }
        if links.is_empty() && !output::is_quiet() {
            eprintln!("  No matching media found.");
        }
    }
    Ok(())
}
