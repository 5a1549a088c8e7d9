// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! `feedlens serve`: run the HTTP API.

use super::build_extractor;
use super::output::{self, Styled};
use crate::config::Settings;
use crate::renderer::chromium::ChromiumRenderer;
use crate::renderer::{NoopRenderer, Renderer};
use crate::rest::{self, AppState};
use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};

/// Serve until Ctrl-C. `port` overrides `FEEDLENS_HTTP_PORT`.
pub async fn run(port: Option<u16>) -> Result<()> {
    let s = Styled::new();
    let settings = Settings::from_env()?;
    let port = port.unwrap_or(settings.http_port);

    info!("starting Feedlens v{}", env!("CARGO_PKG_VERSION"));

    let renderer: Arc<dyn Renderer> = match ChromiumRenderer::new(settings.chromium_path.as_deref()).await {
        Ok(renderer) => {
            info!("Chromium renderer initialized");
            Arc::new(renderer)
        }
        Err(e) => {
            warn!("Failed to initialize Chromium: {e}");
            warn!("Serving health checks only; extraction requests will fail");
            Arc::new(NoopRenderer)
        }
    };
    if settings.credentials.is_none() {
        warn!("FEEDLENS_USERNAME/FEEDLENS_PASSWORD not set, browsing anonymously");
    }

    let state = Arc::new(AppState::new(
        Arc::clone(&renderer),
        Arc::new(build_extractor(&settings)),
    ));

    if !output::is_quiet() {
        eprintln!(
            "  {} Feedlens v{} listening on http://127.0.0.1:{port}",
            s.ok_sym(),
            env!("CARGO_PKG_VERSION"),
        );
    }

    let result = tokio::select! {
        served = rest::start(port, state) => served,
        _ = tokio::signal::ctrl_c() => {
            info!("received shutdown signal");
            Ok(())
        }
    };

    if let Err(e) = renderer.shutdown().await {
        warn!("browser shutdown failed: {e}");
    }
    if !output::is_quiet() {
        eprintln!("  {} Feedlens stopped.", s.ok_sym());
    }
    result
}
