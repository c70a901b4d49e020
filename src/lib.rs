//! # Gallery Relay Library
//!
//! This library provides the core functionality for the Gallery Relay web
//! front-end. Gallery Relay proxies a public art-collection HTTP API,
//! rotates the displayed artwork on a fixed interval, and lets a visitor
//! search the collection by department and keyword.
//!
//! ## Overview
//!
//! The library is organized into modules that handle different aspects of
//! the application:
//!
//! - `client`: HTTP client for the remote collection API
//! - `config`: Application configuration and settings
//! - `error`: Custom error types for consistent error handling
//! - `pages`: Rendering contexts and route handlers
//! - `rotation`: Periodic artwork rotation and its shared state
//! - `search`: On-demand department/keyword search
//! - `server`: Web server setup and lifecycle
//! - `throttle`: Rate limiting for the search route
//!
//! ## Getting Started
//!
//! To embed the server, hand `server::run` a port, an optional config path,
//! and a cancellation token:
//!
//! ```no_run
//! use gallery_relay::server;
//! use tokio_util::sync::CancellationToken;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), gallery_relay::error::GalleryError> {
//!     let cancel_token = CancellationToken::new();
//!     server::run(3000, None, cancel_token).await
//! }
//! ```
//!
//! ## Architecture
//!
//! The rotation task is the single writer of the shared rotation state;
//! request handlers only read snapshots. The search pipeline runs entirely
//! per-request and never touches rotation state. All remote calls carry
//! timeouts and return tagged errors, so a misbehaving collection API can
//! degrade the page but never crash the process.

pub mod client;
pub mod config;
pub mod error;
pub mod pages;
pub mod rotation;
pub mod search;
pub mod server;
pub mod throttle;
