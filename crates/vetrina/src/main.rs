// SPDX-FileCopyrightText: 2026 Vetrina Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Vetrina - virtual try-on backend for jewelry storefronts.
//!
//! This is the binary entry point for the Vetrina server.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod serve;

use clap::{Parser, Subcommand};
use vetrina_config::VetrinaConfig;

/// Vetrina - virtual try-on backend for jewelry storefronts.
#[derive(Parser, Debug)]
#[command(name = "vetrina", version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the Vetrina try-on server.
    Serve,
    /// Print the resolved configuration.
    Config,
}

fn init_tracing(config: &VetrinaConfig) {
    // RUST_LOG wins over the configured level for ad hoc debugging.
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(&config.log.level));
    tracing_subscriber::fmt().with_env_filter(filter).init();
}

/// The resolved config with secret material blanked for display.
fn redacted(config: &VetrinaConfig) -> VetrinaConfig {
    let mut shown = config.clone();
    if shown.provider.api_key.is_some() {
        shown.provider.api_key = Some("[redacted]".to_string());
    }
    if shown.blobstore.service_key.is_some() {
        shown.blobstore.service_key = Some("[redacted]".to_string());
    }
    shown
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match vetrina_config::load_and_validate() {
        Ok(config) => config,
        Err(errors) => {
            vetrina_config::render_errors(&errors);
            std::process::exit(1);
        }
    };

    match cli.command {
        Some(Commands::Serve) => {
            init_tracing(&config);
            if let Err(e) = serve::run(config).await {
                tracing::error!(error = %e, "server exited with error");
                std::process::exit(1);
            }
        }
        Some(Commands::Config) => match toml::to_string_pretty(&redacted(&config)) {
            Ok(rendered) => print!("{rendered}"),
            Err(e) => {
                eprintln!("vetrina: failed to render config: {e}");
                std::process::exit(1);
            }
        },
        None => {
            println!("vetrina: use --help for available commands");
        }
    }
}
