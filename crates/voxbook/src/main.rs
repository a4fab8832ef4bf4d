// SPDX-FileCopyrightText: 2026 Voxbook Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Voxbook - voice-driven room booking backend.
//!
//! This is the binary entry point: `serve` runs the HTTP gateway, `seed`
//! loads venue data into the database and exits.

#[cfg(not(target_env = "msvc"))]
use tikv_jemallocator::Jemalloc;

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: Jemalloc = Jemalloc;

mod seed;
mod serve;
mod shutdown;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use voxbook_config::VoxbookConfig;

/// Voxbook - voice-driven room booking backend.
#[derive(Parser, Debug)]
#[command(name = "voxbook", version, about, long_about = None)]
struct Cli {
    /// Read configuration from this file instead of the standard locations.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Commands>,
}

/// Available subcommands.
#[derive(Subcommand, Debug)]
enum Commands {
    /// Start the HTTP gateway.
    Serve,
    /// Insert venues from a seed file, skipping ones already stored.
    Seed {
        /// Seed file; defaults to `venues.data_path`.
        #[arg(long)]
        file: Option<PathBuf>,
    },
}

fn load_config(path: Option<&PathBuf>) -> VoxbookConfig {
    let loaded = match path {
        Some(path) => voxbook_config::load_and_validate_path(path),
        None => voxbook_config::load_and_validate(),
    };
    match loaded {
        Ok(config) => config,
        Err(errors) => {
            voxbook_config::render_errors(&errors);
            std::process::exit(1);
        }
    }
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();
    let config = load_config(cli.config.as_ref());

    let result = match cli.command {
        Some(Commands::Serve) => serve::run_serve(config).await,
        Some(Commands::Seed { file }) => seed::run_seed(config, file).await,
        None => {
            println!("voxbook: use --help for available commands");
            Ok(())
        }
    };

    if let Err(e) = result {
        eprintln!("voxbook: {e}");
        std::process::exit(1);
    }
}
