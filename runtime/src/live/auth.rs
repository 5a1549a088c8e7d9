// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Best-effort login through the site's own form.

use super::locator::{click_through, ElementLocator};
use super::navigator::SessionNavigator;
use crate::renderer::{PageError, RenderContext};
use crate::trust::credentials::Credentials;
use tracing::{debug, info};
use url::Url;

pub const USERNAME_INPUT: &str = "input[name='username']";
pub const PASSWORD_INPUT: &str = "input[name='password']";
pub const SUBMIT_BUTTON: &str = "button[type='submit']";

/// Label of the control that dismisses post-login dialogs
/// ("save your login info", "turn on notifications").
pub const DISMISS_LABEL: &str = "Not Now";

/// Post-login dialogs worth dismissing.
const MAX_DIALOGS: usize = 2;

/// What a login attempt did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginOutcome {
    /// The form was submitted.
    Submitted { dialogs_dismissed: usize },
    /// No login form rendered; the session is probably already signed in.
    FormMissing,
}

#[derive(Debug, Clone)]
pub struct AuthSession {
    site_url: Url,
    locator: ElementLocator,
    navigator: SessionNavigator,
}

impl AuthSession {
    pub fn new(site_url: Url, locator: ElementLocator, navigator: SessionNavigator) -> Self {
        Self {
            site_url,
            locator,
            navigator,
        }
    }

    /// Sign in with `credentials`.
    ///
    /// A missing form is reported as [`LoginOutcome::FormMissing`]; click
    /// and navigation failures propagate and the caller decides how lenient
    /// to be.
    pub async fn login(
        &self,
        ctx: &mut dyn RenderContext,
        credentials: &Credentials,
    ) -> Result<LoginOutcome, PageError> {
        self.navigator.open(ctx, self.site_url.as_str()).await?;

        let Some(user_field) = self.locator.find_one(ctx, USERNAME_INPUT).await? else {
            debug!("no login form at {}", self.site_url);
            return Ok(LoginOutcome::FormMissing);
        };
        let Some(pass_field) = self.locator.find_one(ctx, PASSWORD_INPUT).await? else {
            return Ok(LoginOutcome::FormMissing);
        };
        user_field.fill(credentials.username()).await?;
        pass_field.fill(credentials.expose_password()).await?;

        let Some(submit) = self.locator.find_one(ctx, SUBMIT_BUTTON).await? else {
            return Ok(LoginOutcome::FormMissing);
        };
        click_through(submit.as_ref()).await?;

        let mut dialogs_dismissed = 0;
        while dialogs_dismissed < MAX_DIALOGS {
            let Some(dismiss) = self.locator.find_by_text(ctx, "button", DISMISS_LABEL).await? else {
                break;
            };
            click_through(dismiss.as_ref()).await?;
            dialogs_dismissed += 1;
        }

        info!(user = credentials.username(), dialogs_dismissed, "logged in");
        Ok(LoginOutcome::Submitted { dialogs_dismissed })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::live::retry::RetryPolicy;
    use crate::renderer::mock::{MockContext, MockNode};
    use std::time::Duration;

    const SITE: &str = "https://site.test/";

    fn auth() -> AuthSession {
        AuthSession::new(
            Url::parse(SITE).unwrap(),
            ElementLocator::new(RetryPolicy::new(3, Duration::from_secs(1))),
            SessionNavigator::default(),
        )
    }

    fn creds() -> Credentials {
        Credentials::new("scraper", "hunter2")
    }

    #[tokio::test(start_paused = true)]
    async fn test_login_fills_form_and_dismisses_dialogs() {
        let ctx = MockContext::new()
            .page(
                SITE,
                vec![
                    MockNode::new(USERNAME_INPUT),
                    MockNode::new(PASSWORD_INPUT),
                    MockNode::new(SUBMIT_BUTTON).intercepted().on_click("https://site.test/home"),
                ],
            )
            .page("https://site.test/home", vec![MockNode::new("button").text("Not Now")]);

        let outcome = auth().login(&mut ctx.clone(), &creds()).await.unwrap();

        assert_eq!(outcome, LoginOutcome::Submitted { dialogs_dismissed: 2 });
        assert_eq!(
            ctx.fills(),
            vec![
                (USERNAME_INPUT.to_string(), "scraper".to_string()),
                (PASSWORD_INPUT.to_string(), "hunter2".to_string()),
            ]
        );
        assert_eq!(ctx.clicks_on(SUBMIT_BUTTON), 1);
        assert_eq!(ctx.clicks_on("button"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_missing_form_is_not_an_error() {
        let ctx = MockContext::new().page(SITE, vec![]);

        let outcome = auth().login(&mut ctx.clone(), &creds()).await.unwrap();

        assert_eq!(outcome, LoginOutcome::FormMissing);
        assert!(ctx.fills().is_empty());
        assert_eq!(ctx.navigations(), vec![SITE.to_string()]);
    }
}
