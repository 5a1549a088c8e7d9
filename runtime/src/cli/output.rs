// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Terminal output helpers shared by all commands.
//!
//! Global flags are published as `FEEDLENS_*` environment variables by the
//! binary so every command can check them without threading them through.

use std::io::IsTerminal;

pub fn is_json() -> bool {
    flag("FEEDLENS_JSON")
}

pub fn is_quiet() -> bool {
    flag("FEEDLENS_QUIET")
}

fn flag(name: &str) -> bool {
    std::env::var(name).is_ok_and(|v| v == "1")
}

/// Print a JSON value to stdout, pretty when attached to a terminal.
pub fn print_json(value: &serde_json::Value) {
    let rendered = if std::io::stdout().is_terminal() {
        serde_json::to_string_pretty(value)
    } else {
        serde_json::to_string(value)
    };
    match rendered {
        Ok(s) => println!("{s}"),
        Err(e) => eprintln!("  failed to render JSON: {e}"),
    }
}

/// Status symbols, colored only on a color-capable terminal.
pub struct Styled {
    color: bool,
}

impl Styled {
    pub fn new() -> Self {
        let color = std::io::stderr().is_terminal() && std::env::var_os("NO_COLOR").is_none();
        Self { color }
    }

    pub fn ok_sym(&self) -> &'static str {
        if self.color {
            "\x1b[32m[OK]\x1b[0m"
        } else {
            "[OK]"
        }
    }

    pub fn warn_sym(&self) -> &'static str {
        if self.color {
            "\x1b[33m[!!]\x1b[0m"
        } else {
            "[!!]"
        }
    }
}

impl Default for Styled {
    fn default() -> Self {
        Self::new()
    }
}
