//! # folder-matrix - CI matrix builder
//!
//! Scans a directory and emits a build matrix of its subdirectories for fan-out jobs.
//!
//! ## Features
//! - Hidden-name, exclude-list and regex filters
//! - Per-directory metadata from JSON or YAML files
//! - Changed-only mode, backed by the GitHub API or local git history
//! - Runs as a GitHub Actions step (`INPUT_*` inputs, `GITHUB_OUTPUT`) or as a plain CLI

mod cli;
mod core;
mod run;

use clap::Parser;
use dotenv::dotenv;

/// Main application entry point
///
/// Exits with status 1 after reporting any fatal error, so the workflow step fails.
#[tokio::main]
async fn main() {
    // Load environment variables from .env file
    dotenv().ok();

    let args = cli::Args::parse();
    run::init_logger(&args);

    if let Err(e) = run::run(&args).await {
        log::error!("Action failed: {}", e);
        if !log::log_enabled!(log::Level::Error) {
            eprintln!("Error: {}", e);
        }
        std::process::exit(1);
    }
}
