// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Runtime settings, resolved once at startup and passed into components.

use crate::trust::credentials::Credentials;
use anyhow::{Context, Result};
use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;
use url::Url;

/// Default target site.
pub const DEFAULT_SITE_URL: &str = "https://www.instagram.com";

/// Engine configuration.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Root URL of the target site.
    pub site_url: Url,
    /// Login credentials; login is skipped when absent.
    pub credentials: Option<Credentials>,
    /// Attempts per element lookup.
    pub retry_attempts: u32,
    /// Pause between lookup attempts.
    pub retry_delay: Duration,
    /// Attempts to find the slide "next" control inside a carousel.
    pub slide_tries: u32,
    /// Pause after each grid scroll before the next height check.
    pub scroll_settle: Duration,
    /// Page load timeout.
    pub navigation_timeout_ms: u64,
    /// TTL of cached extraction results.
    pub cache_ttl: Duration,
    /// Bound on cached results.
    pub cache_max_entries: usize,
    /// Port for `feedlens serve`.
    pub http_port: u16,
    /// Explicit Chromium binary.
    pub chromium_path: Option<PathBuf>,
}

impl Settings {
    /// Engine defaults against `site_url`.
    pub fn for_site(site_url: Url) -> Self {
        Self {
            site_url,
            credentials: None,
            retry_attempts: 10,
            retry_delay: Duration::from_secs(1),
            slide_tries: 3,
            scroll_settle: Duration::from_secs(5),
            navigation_timeout_ms: 30_000,
            cache_ttl: Duration::from_secs(15),
            cache_max_entries: 512,
            http_port: 8000,
            chromium_path: None,
        }
    }

    /// Load settings from the environment, reading `.env` first if present.
    pub fn from_env() -> Result<Self> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build settings from an arbitrary variable source.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let raw = lookup("FEEDLENS_SITE_URL").unwrap_or_else(|| DEFAULT_SITE_URL.to_string());
        let site_url =
            Url::parse(&raw).with_context(|| format!("FEEDLENS_SITE_URL is not a URL: {raw}"))?;
        let mut settings = Self::for_site(site_url);

        settings.credentials = match (lookup("FEEDLENS_USERNAME"), lookup("FEEDLENS_PASSWORD")) {
            (Some(user), Some(pass)) if !user.is_empty() => Some(Credentials::new(user, pass)),
            _ => None,
        };
        if let Some(n) = parse_var(&lookup, "FEEDLENS_RETRY_ATTEMPTS")? {
            settings.retry_attempts = n;
        }
        if let Some(ms) = parse_var(&lookup, "FEEDLENS_RETRY_DELAY_MS")? {
            settings.retry_delay = Duration::from_millis(ms);
        }
        if let Some(n) = parse_var(&lookup, "FEEDLENS_SLIDE_TRIES")? {
            settings.slide_tries = n;
        }
        if let Some(ms) = parse_var(&lookup, "FEEDLENS_SCROLL_SETTLE_MS")? {
            settings.scroll_settle = Duration::from_millis(ms);
        }
        if let Some(ms) = parse_var(&lookup, "FEEDLENS_NAV_TIMEOUT_MS")? {
            settings.navigation_timeout_ms = ms;
        }
        if let Some(secs) = parse_var(&lookup, "FEEDLENS_CACHE_TTL_SECS")? {
            settings.cache_ttl = Duration::from_secs(secs);
        }
        if let Some(n) = parse_var(&lookup, "FEEDLENS_CACHE_MAX_ENTRIES")? {
            settings.cache_max_entries = n;
        }
        if let Some(port) = parse_var(&lookup, "FEEDLENS_HTTP_PORT")? {
            settings.http_port = port;
        }
        settings.chromium_path = lookup("FEEDLENS_CHROMIUM_PATH").map(PathBuf::from);

        Ok(settings)
    }
}

fn parse_var<F, T>(lookup: &F, key: &str) -> Result<Option<T>>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
    T::Err: std::error::Error + Send + Sync + 'static,
{
    lookup(key)
        .map(|raw| {
            raw.trim()
                .parse::<T>()
                .with_context(|| format!("{key} must be a valid number, got `{raw}`"))
        })
        .transpose()
}
