//! Web server setup and lifecycle.

use crate::client::CollectionClient;
use crate::config::Config;
use crate::error::Result;
use crate::rotation::{self, RotationState};
use crate::throttle::Throttle;
use crate::{pages, throttle};
use axum::{
    middleware,
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;
use tower_http::services::ServeDir;

/// Shared application state handed to every route handler.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub client: Arc<CollectionClient>,
    pub rotation: RotationState,
    pub throttle: Arc<Throttle>,
}

/// Build the router for the given state.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(pages::landing))
        .route(
            "/search",
            post(pages::search_page)
                .layer(middleware::from_fn_with_state(
                    state.clone(),
                    throttle::limit_search,
                ))
                .fallback(pages::not_found),
        )
        .route("/error-route", get(pages::error_route))
        .nest_service("/static", ServeDir::new("static"))
        .fallback(pages::not_found)
        .with_state(state)
}

/// Run the web server on the specified port until the cancellation token
/// fires.
///
/// Loads the configuration, starts the artwork rotation task, and serves the
/// routing surface with graceful shutdown.
///
/// # Errors
///
/// Returns an error if:
/// - The configuration cannot be loaded or is invalid
/// - The server fails to bind to the specified address
/// - The server encounters a runtime error
pub async fn run(
    port: u16,
    config_file_path: Option<PathBuf>,
    cancel_token: CancellationToken,
) -> Result<()> {
    tracing::info!("Initializing server");

    let config = Config::load(config_file_path.as_deref())?;
    let client = Arc::new(CollectionClient::new(
        &config.api_base_url,
        Duration::from_secs(config.request_timeout_secs),
    )?);
    let rotation = rotation::new_state();
    let throttle = Arc::new(Throttle::new(config.throttle.clone()));

    tokio::spawn(rotation::run_rotator(
        client.clone(),
        rotation.clone(),
        Duration::from_secs(config.rotation_interval_secs),
        cancel_token.child_token(),
    ));

    let state = AppState {
        config: Arc::new(config),
        client,
        rotation,
        throttle,
    };
    let app = build_router(state);
    tracing::debug!("Routes configured");

    let addr = format!("0.0.0.0:{port}");
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    tracing::info!("Site launched on: http://{addr}");

    axum::serve(listener, app)
        .with_graceful_shutdown(cancel_token.cancelled_owned())
        .await
        .map_err(|e| crate::error::GalleryError::Generic(format!("Server error: {e}")))?;

    tracing::info!("Server shutdown complete");
    Ok(())
}
