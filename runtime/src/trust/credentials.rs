// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Login credentials for the target site.
//!
//! The password is wrapped in [`SecretString`] so it never shows up in
//! `Debug` output or logs; it is exposed only when typed into the login form.

use secrecy::{ExposeSecret, SecretString};
use std::fmt;
use std::sync::Arc;

/// Username and password pair.
#[derive(Clone)]
pub struct Credentials {
    username: String,
    password: Arc<SecretString>,
}

impl Credentials {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: Arc::new(SecretString::from(password.into())),
        }
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    /// The raw password, for typing into the login form only.
    pub fn expose_password(&self) -> &str {
        self.password.expose_secret()
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("username", &self.username)
            .field("password", &"[REDACTED]")
            .finish()
    }
}
