// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! `feedlens extract`: media URLs of one profile.

use super::{build_extractor, launch_chromium, print_links};
use crate::config::Settings;
use crate::extraction::types::MediaType;
use crate::live::session::with_context;
use crate::renderer::Renderer;
use anyhow::Result;
use tracing::warn;

pub async fn run(username: &str, media_type: MediaType, max_count: usize) -> Result<()> {
    let settings = Settings::from_env()?;
    let renderer = launch_chromium(&settings).await?;
    let extractor = build_extractor(&settings);

    let username = username.to_string();
    let result = with_context(&renderer, move |ctx| {
        Box::pin(async move { extractor.extract(ctx, &username, media_type, max_count).await })
    })
    .await;

    if let Err(e) = renderer.shutdown().await {
        warn!("browser shutdown failed: {e}");
    }
    print_links(&result?)
}
