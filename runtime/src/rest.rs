// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! HTTP API over the extraction engine.
//!
//! Each request runs in its own browser context, acquired and released by
//! [`with_context`]. Responses carry `{"urls": [...]}`; a missing profile is
//! a 400 with `{"detail": "User not found <username>"}`.

use crate::error::ExtractError;
use crate::extraction::types::{LinkCollection, MediaType};
use crate::extraction::ProfileMediaExtractor;
use crate::live::session::with_context;
use crate::renderer::Renderer;
use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::get;
use axum::{Json, Router};
use serde::Deserialize;
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

/// State shared by all handlers.
pub struct AppState {
    pub renderer: Arc<dyn Renderer>,
    pub extractor: Arc<ProfileMediaExtractor>,
    pub started_at: Instant,
}

impl AppState {
    pub fn new(renderer: Arc<dyn Renderer>, extractor: Arc<ProfileMediaExtractor>) -> Self {
        Self {
            renderer,
            extractor,
            started_at: Instant::now(),
        }
    }
}

/// Build the axum Router with all endpoints.
pub fn router(state: Arc<AppState>) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health))
        .route("/getPhotos", get(get_photos))
        .route("/api/v1/media", get(get_media))
        .route("/api/v1/posts", get(get_posts))
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}

/// Serve the API on the given port until the process stops.
pub async fn start(port: u16, state: Arc<AppState>) -> anyhow::Result<()> {
    let app = router(state);
    let addr = std::net::SocketAddr::from(([127, 0, 0, 1], port));
    tracing::info!("REST API listening on http://{addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;
    Ok(())
}

// ── Errors ──────────────────────────────────────────────────────

/// Engine error rendered as an HTTP response.
#[derive(Debug)]
pub struct ApiError(pub ExtractError);

impl From<ExtractError> for ApiError {
    fn from(e: ExtractError) -> Self {
        Self(e)
    }
}

/// Status and body for an engine error.
pub fn error_response(err: &ExtractError) -> (StatusCode, Json<Value>) {
    let status = match err {
        ExtractError::ProfileNotFound { .. } => StatusCode::BAD_REQUEST,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    (status, Json(json!({ "detail": err.to_string() })))
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        if !matches!(self.0, ExtractError::ProfileNotFound { .. }) {
            tracing::error!("request failed: {}", self.0);
        }
        error_response(&self.0).into_response()
    }
}

// ── Handlers ────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
struct PhotosParams {
    username: String,
    max_count: usize,
}

#[derive(Debug, Deserialize)]
struct MediaParams {
    username: String,
    #[serde(default = "default_media_type")]
    media_type: MediaType,
    max_count: usize,
}

fn default_media_type() -> MediaType {
    MediaType::Photo
}

async fn health(State(state): State<Arc<AppState>>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
        "uptime_seconds": state.started_at.elapsed().as_secs_f64(),
        "active_contexts": state.renderer.active_contexts(),
    }))
}

async fn get_photos(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PhotosParams>,
) -> Result<Json<LinkCollection>, ApiError> {
    extract_media(state, params.username, MediaType::Photo, params.max_count).await
}

async fn get_media(
    State(state): State<Arc<AppState>>,
    Query(params): Query<MediaParams>,
) -> Result<Json<LinkCollection>, ApiError> {
    extract_media(state, params.username, params.media_type, params.max_count).await
}

async fn get_posts(
    State(state): State<Arc<AppState>>,
    Query(params): Query<PhotosParams>,
) -> Result<Json<LinkCollection>, ApiError> {
    let extractor = Arc::clone(&state.extractor);
    let PhotosParams {
        username,
        max_count,
    } = params;
    let links = with_context(state.renderer.as_ref(), move |ctx| {
        Box::pin(async move { extractor.post_urls(ctx, &username, max_count).await })
    })
    .await?;
    Ok(Json(links))
}

async fn extract_media(
    state: Arc<AppState>,
    username: String,
    media_type: MediaType,
    max_count: usize,
) -> Result<Json<LinkCollection>, ApiError> {
    let extractor = Arc::clone(&state.extractor);
    let links = with_context(state.renderer.as_ref(), move |ctx| {
        Box::pin(async move { extractor.extract(ctx, &username, media_type, max_count).await })
    })
    .await?;
    Ok(Json(links))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Settings;
    use crate::intelligence::cache::MediaCache;
    use crate::renderer::mock::{MockContext, MockNode, MockRenderer};
    use crate::renderer::{NoopRenderer, PageError};
    use std::time::Duration;

    fn state(renderer: Arc<dyn Renderer>) -> Arc<AppState> {
        let settings = Settings {
            retry_attempts: 2,
            ..Settings::from_lookup(|_| None).unwrap()
        };
        let cache = MediaCache::in_memory(Duration::from_secs(15), 16);
        Arc::new(AppState::new(
            renderer,
            Arc::new(ProfileMediaExtractor::new(&settings, cache)),
        ))
    }

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[tokio::test]
    async fn test_not_found_is_bad_request_with_detail() {
        let err = ApiError(ExtractError::ProfileNotFound {
            username: "ghostuser".into(),
        });
        let response = err.into_response();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await,
            json!({ "detail": "User not found ghostuser" })
        );
    }

    #[test]
    fn test_page_errors_are_internal() {
        let (status, _) = error_response(&PageError::Navigation("offline".into()).into());
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_photos_for_missing_profile() {
        let ctx = MockContext::new().page("https://www.instagram.com/ghostuser/", vec![]);
        let state = state(Arc::new(MockRenderer::new(ctx.clone())));

        let err = get_photos(
            State(state),
            Query(PhotosParams {
                username: "ghostuser".into(),
                max_count: 3,
            }),
        )
        .await
        .unwrap_err();

        assert_eq!(err.0.missing_username(), Some("ghostuser"));
        assert_eq!(ctx.closed(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_get_media_serializes_urls() {
        let post = "https://www.instagram.com/p/abc/";
        let ctx = MockContext::new()
            .page(
                "https://www.instagram.com/realuser/",
                vec![
                    MockNode::new("span").text("Posts"),
                    MockNode::new("a[href*='/p/']").attr("href", "/p/abc/").on_click(post),
                ],
            )
            .page(
                post,
                vec![MockNode::new("video[type='video/mp4']").attr("src", "https://cdn.test/abc.mp4")],
            );
        let state = state(Arc::new(MockRenderer::new(ctx)));

        let Json(links) = get_media(
            State(state),
            Query(MediaParams {
                username: "realuser".into(),
                media_type: MediaType::Clip,
                max_count: 1,
            }),
        )
        .await
        .unwrap();

        assert_eq!(
            serde_json::to_value(&links).unwrap(),
            json!({ "urls": ["https://cdn.test/abc.mp4"] })
        );
    }

    #[tokio::test]
    async fn test_health_reports_ok_without_browser() {
        let Json(body) = health(State(state(Arc::new(NoopRenderer)))).await;
        assert_eq!(body["status"], "ok");
        assert_eq!(body["active_contexts"], 0);
    }
}
