// SPDX-FileCopyrightText: 2026 Adlens Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Adlens - marketing-visual critique service.
//!
//! This is the binary entry point for the Adlens server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

use clap::{Parser, Subcommand};

mod serve;

/// Adlens - marketing-visual critique service.
#[derive(Parser, Debug)]
#[command(name = "adlens", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Adlens HTTP server.
    Serve,
    /// Print the effective configuration with secrets redacted.
    Config,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    // Load and validate configuration at startup.
    let config = match adlens_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            adlens_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            if let Err(e) = serve::run_serve(config).await {
                eprintln!("adlens serve failed: {e}");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => {
            print_config(&config);
        }
        None => {
            println!("adlens: use --help for available commands");
        }
    }
}

/// Print the effective config as TOML, masking every secret value.
fn print_config(config: &adlens_config::AdlensConfig) {
    let mut redacted = config.clone();
    for secret in [
        &mut redacted.billing.api_key,
        &mut redacted.billing.webhook_secret,
        &mut redacted.vision.api_key,
    ] {
        if secret.is_some() {
            *secret = Some("[redacted]".to_string());
        }
    }
    match toml::to_string_pretty(&redacted) {
        Ok(rendered) => println!("{rendered}"),
        Err(e) => eprintln!("failed to render config: {e}"),
    }
}
