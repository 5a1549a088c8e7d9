// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Scoped page sessions.
//!
//! Every extraction request gets a fresh browser context that lives exactly
//! as long as the request. The context is closed whether the work succeeds
//! or fails, and a close failure never replaces the work's own result.

use crate::error::ExtractResult;
use crate::renderer::{RenderContext, Renderer};
use futures::future::BoxFuture;
use tracing::{debug, info_span, warn, Instrument};
use uuid::Uuid;

/// Acquire a context from `renderer`, run `f` on it, and release it.
///
/// ```ignore
/// let urls = with_context(renderer.as_ref(), move |ctx| {
///     Box::pin(async move { extractor.extract(ctx, &username, MediaType::Photo, 3).await })
/// })
/// .await?;
/// ```
pub async fn with_context<T, F>(renderer: &dyn Renderer, f: F) -> ExtractResult<T>
where
    T: Send,
    F: for<'a> FnOnce(&'a mut dyn RenderContext) -> BoxFuture<'a, ExtractResult<T>> + Send,
{
    let id = Uuid::new_v4();
    let span = info_span!("session", %id);

    let mut ctx = renderer.new_context().instrument(span.clone()).await?;
    debug!(parent: &span, active = renderer.active_contexts(), "context acquired");

    let result = f(ctx.as_mut()).instrument(span.clone()).await;

    if let Err(e) = ctx.close().await {
        warn!(parent: &span, "failed to close context: {e}");
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ExtractError;
    use crate::renderer::mock::{MockContext, MockRenderer};
    use crate::renderer::NoopRenderer;

    #[tokio::test]
    async fn test_context_closed_after_success() {
        let ctx = MockContext::new();
        let renderer = MockRenderer::new(ctx.clone());

        let url = with_context(&renderer, |page| {
            Box::pin(async move {
                page.navigate("https://site.test/a", 1_000).await?;
                Ok(page.get_url().await?)
            })
        })
        .await
        .unwrap();

        assert_eq!(url, "https://site.test/a");
        assert_eq!(ctx.closed(), 1);
    }

    #[tokio::test]
    async fn test_context_closed_after_failure() {
        let ctx = MockContext::new();
        let renderer = MockRenderer::new(ctx.clone());

        let result: ExtractResult<()> = with_context(&renderer, |_| {
            Box::pin(async move {
                Err(ExtractError::ProfileNotFound {
                    username: "ghostuser".into(),
                })
            })
        })
        .await;

        assert_eq!(result.unwrap_err().missing_username(), Some("ghostuser"));
        assert_eq!(ctx.closed(), 1);
    }

    #[tokio::test]
    async fn test_acquisition_failure_propagates() {
        let result = with_context(&NoopRenderer, |_| Box::pin(async { Ok(()) })).await;
        assert!(matches!(result, Err(ExtractError::Page(_))));
    }
}
