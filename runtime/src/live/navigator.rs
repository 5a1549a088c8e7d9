// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Opens URLs in a page session. Navigation is never retried; a failure
//! here means the environment is broken.

use crate::renderer::{PageError, RenderContext};
use tracing::debug;

#[derive(Debug, Clone, Copy)]
pub struct SessionNavigator {
    timeout_ms: u64,
}

impl Default for SessionNavigator {
    fn default() -> Self {
        Self { timeout_ms: 30_000 }
    }
}

impl SessionNavigator {
    pub fn new(timeout_ms: u64) -> Self {
        Self { timeout_ms }
    }

    pub async fn open(&self, ctx: &mut dyn RenderContext, url: &str) -> Result<(), PageError> {
        let nav = ctx.navigate(url, self.timeout_ms).await?;
        debug!(url, final_url = %nav.final_url, load_time_ms = nav.load_time_ms, "opened");
        Ok(())
    }
}
