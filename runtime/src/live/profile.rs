// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Profile existence check, the engine's only hard error boundary.

use super::auth::AuthSession;
use super::locator::ElementLocator;
use super::navigator::SessionNavigator;
use crate::error::{ExtractError, ExtractResult};
use crate::renderer::{PageErrorKind, RenderContext};
use crate::trust::credentials::Credentials;
use tracing::{debug, warn};
use url::Url;

/// Tab label rendered on every existing profile page.
pub const POSTS_MARKER: &str = "Posts";

#[derive(Debug, Clone)]
pub struct ProfileValidator {
    site_url: Url,
    auth: AuthSession,
    credentials: Option<Credentials>,
    locator: ElementLocator,
    navigator: SessionNavigator,
}

impl ProfileValidator {
    pub fn new(
        site_url: Url,
        credentials: Option<Credentials>,
        locator: ElementLocator,
        navigator: SessionNavigator,
    ) -> Self {
        let auth = AuthSession::new(site_url.clone(), locator.clone(), navigator);
        Self {
            site_url,
            auth,
            credentials,
            locator,
            navigator,
        }
    }

    /// URL of `username`'s profile page, always on the configured site.
    /// A username that is not one plain path segment names no profile.
    pub fn profile_url(&self, username: &str) -> ExtractResult<Url> {
        if !is_plain_username(username) {
            return Err(ExtractError::ProfileNotFound {
                username: username.to_string(),
            });
        }
        let mut url = self.site_url.clone();
        url.path_segments_mut()
            .map_err(|()| ExtractError::InvalidUrl {
                url: self.site_url.to_string(),
                source: url::ParseError::RelativeUrlWithCannotBeABaseBase,
            })?
            .pop_if_empty()
            .push(username)
            .push("");
        Ok(url)
    }

    /// Log in (best effort), open the profile, and require the posts tab.
    /// On success the session is left on the profile page.
    pub async fn validate(&self, ctx: &mut dyn RenderContext, username: &str) -> ExtractResult<()> {
        let url = self.profile_url(username)?;

        if let Some(credentials) = &self.credentials {
            match self.auth.login(ctx, credentials).await {
                Ok(outcome) => debug!(?outcome, "login finished"),
                Err(e) if matches!(e.kind(), PageErrorKind::NoSuchElement | PageErrorKind::ClickIntercepted) => {
                    warn!("login skipped: {e}");
                }
                Err(e) => return Err(e.into()),
            }
        }

        self.navigator.open(ctx, url.as_str()).await?;

        match self.locator.find_by_text(ctx, "span", POSTS_MARKER).await? {
            Some(_) => Ok(()),
            None => Err(ExtractError::ProfileNotFound {
                username: username.to_string(),
            }),
        }
    }
}

fn is_plain_username(username: &str) -> bool {
    !username.is_empty()
        && !username.contains("..")
        && !username.contains(['/', '\\', ':', '?', '#'])
        && !username.chars().any(char::is_whitespace)
}
