// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

//! Environment readiness check.

use super::output::{self, Styled};
use crate::config::Settings;
use crate::renderer::chromium::find_chromium;
use anyhow::Result;
use std::process::Command;

/// Check configuration, Chromium availability, credentials and memory.
pub async fn run() -> Result<()> {
    let s = Styled::new();
    let settings = match Settings::from_env() {
        Ok(settings) => settings,
        Err(e) => {
            println!("{} Configuration invalid: {e:#}", s.warn_sym());
            return Err(e);
        }
    };

    let chromium_path = find_chromium(settings.chromium_path.as_deref());
    let mem_mb = get_available_memory_mb();
    let ready = chromium_path.is_some();

    if output::is_json() {
        output::print_json(&serde_json::json!({
            "ready": ready,
            "os": std::env::consts::OS,
            "arch": std::env::consts::ARCH,
            "chromium": chromium_path.as_ref().map(|p| p.display().to_string()),
            "site_url": settings.site_url.as_str(),
            "credentials": settings.credentials.is_some(),
            "available_memory_mb": mem_mb,
        }));
        return Ok(());
    }

    println!("Feedlens Doctor");
    println!("===============");
    println!();
    println!("OS:   {}", std::env::consts::OS);
    println!("Arch: {}", std::env::consts::ARCH);
    println!();

    match &chromium_path {
        Some(path) => println!("{} Chromium found: {}", s.ok_sym(), path.display()),
        None => println!(
            "{} Chromium NOT found. Install Chrome or set FEEDLENS_CHROMIUM_PATH.",
            s.warn_sym()
        ),
    }

    println!("{} Site URL: {}", s.ok_sym(), settings.site_url);

    match &settings.credentials {
        Some(credentials) => println!("{} Credentials set for {}", s.ok_sym(), credentials.username()),
        None => println!(
            "{} No credentials (FEEDLENS_USERNAME/FEEDLENS_PASSWORD); profiles are browsed anonymously",
            s.warn_sym()
        ),
    }

    match mem_mb {
        Some(mb) if mb >= 512 => println!("{} Available memory: {mb}MB (>= 512MB required)", s.ok_sym()),
        Some(mb) => println!("{} Available memory: {mb}MB (< 512MB, may be insufficient)", s.warn_sym()),
        None => println!("[??] Could not determine available memory"),
    }

    println!();
    if ready {
        println!("Status: READY");
    } else {
        println!("Status: NOT READY");
    }

    Ok(())
}

/// Get available memory in MB (platform-specific).
fn get_available_memory_mb() -> Option<u64> {
    #[cfg(target_os = "macos")]
    {
        let output = Command::new("sysctl")
            .args(["-n", "hw.memsize"])
            .output()
            .ok()?;
        let s = String::from_utf8_lossy(&output.stdout);
        let bytes: u64 = s.trim().parse().ok()?;
        Some(bytes / 1_048_576)
    }
    #[cfg(target_os = "linux")]
    {
        let output = Command::new("free").args(["-m"]).output().ok()?;
        let s = String::from_utf8_lossy(&output.stdout);
        s.lines()
            .find(|line| line.starts_with("Mem:"))
            .and_then(|line| line.split_whitespace().nth(6))
            .and_then(|available| available.parse().ok())
    }
    #[cfg(not(any(target_os = "macos", target_os = "linux")))]
    {
        None
    }
}
