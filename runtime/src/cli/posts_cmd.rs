// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! `feedlens posts`: post permalinks from a profile grid.

use super::{build_extractor, launch_chromium, print_links};
use crate::config::Settings;
use crate::live::session::with_context;
use crate::renderer::Renderer;
use anyhow::Result;
use tracing::warn;

pub async fn run(username: &str, max_count: usize) -> Result<()> {
    let settings = Settings::from_env()?;
    let renderer = launch_chromium(&settings).await?;
    let extractor = build_extractor(&settings);

    let username = username.to_string();
    let result = with_context(&renderer, move |ctx| {
        Box::pin(async move { extractor.post_urls(ctx, &username, max_count).await })
    })
    .await;

    if let Err(e) = renderer.shutdown().await {
        warn!("browser shutdown failed: {e}");
    }
    print_links(&result?)
}
