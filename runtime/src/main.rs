// Copyright 2026 Feedlens Contributors
// SPDX-License-Identifier: Apache-2.0

use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;
use feedlens_runtime::cli;
use feedlens_runtime::extraction::types::MediaType;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "feedlens",
    about = "Feedlens: profile media URLs through a headless browser",
    version,
    after_help = "Run 'feedlens <command> --help' for details on each command."
)]
struct Cli {
    /// Output results as JSON (machine-readable)
    #[arg(long, global = true)]
    json: bool,

    /// Suppress non-essential output
    #[arg(long, short, global = true)]
    quiet: bool,

    /// Enable verbose/debug logging
    #[arg(long, short, global = true)]
    verbose: bool,

    /// Emit logs as JSON lines
    #[arg(long, global = true)]
    log_json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Extract media URLs from a profile feed
    Extract {
        /// Profile username
        username: String,
        /// Media to collect (photo, clip, carousel)
        #[arg(long, default_value = "photo")]
        media_type: MediaType,
        /// Maximum number of URLs
        #[arg(long, default_value = "10")]
        max_count: usize,
    },
    /// List post permalinks from a profile grid
    Posts {
        /// Profile username
        username: String,
        /// Maximum number of posts
        #[arg(long, default_value = "10")]
        max_count: usize,
    },
    /// Serve the HTTP API
    Serve {
        /// Port to listen on (defaults to FEEDLENS_HTTP_PORT or 8000)
        #[arg(long)]
        port: Option<u16>,
    },
    /// Check environment and diagnose issues
    Doctor,
    /// Generate shell completion scripts
    Completions {
        /// Shell type (bash, zsh, fish, powershell)
        shell: Shell,
    },
}

fn init_tracing(verbose: bool, json: bool) {
    let default = if verbose { "feedlens=debug" } else { "feedlens=info" };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set global flags via environment variables so all modules can check them
    if cli.json {
        std::env::set_var("FEEDLENS_JSON", "1");
    }
    if cli.quiet {
        std::env::set_var("FEEDLENS_QUIET", "1");
    }
    init_tracing(cli.verbose, cli.log_json);

    let result = match cli.command {
        Commands::Extract {
            username,
            media_type,
            max_count,
        } => cli::extract_cmd::run(&username, media_type, max_count).await,
        Commands::Posts {
            username,
            max_count,
        } => cli::posts_cmd::run(&username, max_count).await,
        Commands::Serve { port } => cli::serve::run(port).await,
        Commands::Doctor => cli::doctor::run().await,
        Commands::Completions { shell } => {
            let mut cmd = Cli::command();
            clap_complete::generate(shell, &mut cmd, "feedlens", &mut std::io::stdout());
            Ok(())
        }
    };

    // Consistent exit codes: 0=success, 1=error
    if let Err(e) = &result {
        if cli::output::is_json() {
            cli::output::print_json(&serde_json::json!({
                "error": true,
                "message": format!("{e:#}"),
            }));
        } else if !cli::output::is_quiet() {
            eprintln!("  Error: {e:#}");
        }
        std::process::exit(1);
    }

    result
}
