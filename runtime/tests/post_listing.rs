// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Grid listing driven by infinite scroll.

mod common;

use common::{extractor, fake_site, Post, SITE};
use feedlens_runtime::extraction::types::POST_LINK_SELECTOR;
use feedlens_runtime::renderer::mock::{MockContext, MockNode};
use std::time::Duration;
use tokio::time::Instant;

/// Profile grid showing two posts, with two more loaded by the first
/// scroll and a repeated link among them.
fn scrolling_grid() -> MockContext {
    let link = |id: &str| MockNode::new(POST_LINK_SELECTOR).attr("href", &format!("/p/{id}/"));
    MockContext::new()
        .page(
            &format!("{SITE}/scrolluser/"),
            vec![
                MockNode::new("span").text("Posts"),
                link("a"),
                link("b"),
                link("b").revealed_after(1),
                link("c").revealed_after(1),
                link("d").revealed_after(1),
            ],
        )
        .scroll_heights(&[1000, 2000, 2000])
}

#[tokio::test(start_paused = true)]
async fn test_scrolls_until_height_stops_growing() {
    let ctx = scrolling_grid();
    let start = Instant::now();

    let links = extractor()
        .post_urls(&mut ctx.clone(), "scrolluser", 10)
        .await
        .unwrap();

    assert_eq!(
        links.to_strings(),
        vec![
            format!("{SITE}/p/a/"),
            format!("{SITE}/p/b/"),
            format!("{SITE}/p/c/"),
            format!("{SITE}/p/d/"),
        ]
    );
    assert_eq!(ctx.scripts_run(), 3);
    // Two growing steps settle for 5s each; the terminal step does not.
    assert!(start.elapsed() >= Duration::from_secs(10));
}

#[tokio::test(start_paused = true)]
async fn test_stops_scrolling_once_bound_reached() {
    let ctx = scrolling_grid();

    let links = extractor()
        .post_urls(&mut ctx.clone(), "scrolluser", 3)
        .await
        .unwrap();

    assert_eq!(links.len(), 3);
    assert_eq!(ctx.scripts_run(), 1);
}

#[tokio::test(start_paused = true)]
async fn test_listing_ignores_non_post_links() {
    let ctx = fake_site("realuser", &[Post::Photo("p1"), Post::Clip("c1")]).page(
        &format!("{SITE}/realuser/"),
        vec![
            MockNode::new("span").text("Posts"),
            MockNode::new(POST_LINK_SELECTOR).attr("href", "/p/p1/"),
            MockNode::new(POST_LINK_SELECTOR).attr("href", "/explore/"),
            MockNode::new(POST_LINK_SELECTOR),
        ],
    );

    let links = extractor()
        .post_urls(&mut ctx.clone(), "realuser", 5)
        .await
        .unwrap();

    assert_eq!(links.to_strings(), vec![format!("{SITE}/p/p1/")]);
}

#[tokio::test]
async fn test_zero_count_listing_never_navigates() {
    let ctx = scrolling_grid();
    let links = extractor().post_urls(&mut ctx.clone(), "scrolluser", 0).await.unwrap();
    assert!(links.is_empty());
    assert!(ctx.navigations().is_empty());
}
