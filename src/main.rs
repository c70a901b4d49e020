//! # Gallery Relay Main Application Entry Point
//!
//! This is the main executable for the Gallery Relay web front-end. It
//! handles command-line argument parsing, tracing initialization, server
//! startup, and application lifecycle management.
//!
//! The application can be launched with optional command-line arguments:
//!
//! - First argument: Port number (falls back to the `PORT` environment
//!   variable, then 3000)
//! - Second argument: Path to a JSON5 configuration file (defaults apply
//!   when omitted)
//!
//! ## Example Usage
//!
//! ```bash
//! # Run with default settings (port 3000, built-in config)
//! cargo run
//!
//! # Run on a specific port
//! cargo run 8080
//!
//! # Run with a specific port and configuration file
//! cargo run 8080 my-config.json5
//! ```
//!
//! Log levels can be controlled through the `RUST_LOG` environment variable.

use std::env;
use std::path::PathBuf;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod client;
mod config;
mod error;
mod pages;
mod rotation;
mod search;
mod server;
mod throttle;

use crate::error::GalleryError;

/// Main entry point for the Gallery Relay application
///
/// This function:
/// 1. Initializes the tracing subscriber for application logging
/// 2. Resolves the listening port from the CLI, `PORT`, or the default
/// 3. Creates a cancellation token wired to Ctrl-C for graceful shutdown
/// 4. Starts the web server with the specified parameters
///
/// # Errors
///
/// Returns an error if the server fails to start, the configuration cannot
/// be loaded, or any unrecoverable error occurs during execution.
#[tokio::main]
async fn main() -> Result<(), GalleryError> {
    tracing_subscriber::registry()
        .with(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .with(tracing_subscriber::fmt::layer())
        .init();

    let port = config::resolve_port(env::args().nth(1));

    let mut config_file_path: Option<PathBuf> = None;
    if let Some(arg2) = env::args().nth(2) {
        config_file_path = Some(PathBuf::from(arg2));
    }

    tracing::info!("Starting Gallery Relay application");

    let cancel_token = CancellationToken::new();
    let shutdown_token = cancel_token.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Ctrl-C received, shutting down");
            shutdown_token.cancel();
        }
    });

    server::run(port, config_file_path, cancel_token).await?;

    tracing::info!("Gallery Relay application shutting down");
    Ok(())
}
