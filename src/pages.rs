//! Rendering contexts and route handlers for the HTML surface.

use crate::client::ArtworkRecord;
use crate::search::{run_search, SearchOutcome, SearchRequest};
use crate::server::AppState;
use askama_axum::Template;
use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use tracing::{debug, error};

/// Display fields pulled out of an opaque artwork document. Missing fields
/// render as empty strings; the template hides empty sections.
#[derive(Debug, Clone)]
pub struct ArtworkView {
    pub object_id: String,
    pub title: String,
    pub artist: String,
    pub date: String,
    pub medium: String,
    pub department: String,
    pub image_url: String,
    pub object_url: String,
}

impl ArtworkView {
    fn from_record(record: &ArtworkRecord) -> Self {
        let field = |name: &str| record.str_field(name).unwrap_or_default().to_string();
        let image_url = record
            .str_field("primaryImageSmall")
            .filter(|url| !url.is_empty())
            .or_else(|| record.str_field("primaryImage"))
            .unwrap_or_default()
            .to_string();

        Self {
            object_id: record
                .object_id()
                .map(|id| id.to_string())
                .unwrap_or_default(),
            title: field("title"),
            artist: field("artistDisplayName"),
            date: field("objectDate"),
            medium: field("medium"),
            department: field("department"),
            image_url,
            object_url: field("objectURL"),
        }
    }
}

/// Main artwork page, shared by the rotation view and search results.
#[derive(Template)]
#[template(path = "layout.html")]
pub struct LayoutTemplate {
    site_name: String,
    artwork: Option<ArtworkView>,
    searched_department: String,
    searched_term: String,
    updated_at: String,
}

impl LayoutTemplate {
    fn rotation(site_name: &str, record: &ArtworkRecord, updated_at: Option<String>) -> Self {
        Self {
            site_name: site_name.to_string(),
            artwork: Some(ArtworkView::from_record(record)),
            searched_department: String::new(),
            searched_term: String::new(),
            updated_at: updated_at.unwrap_or_default(),
        }
    }

    fn search(site_name: &str, outcome: SearchOutcome) -> Self {
        Self {
            site_name: site_name.to_string(),
            artwork: outcome.artwork.as_ref().map(ArtworkView::from_record),
            searched_department: outcome.searched_department,
            searched_term: outcome.searched_term,
            updated_at: String::new(),
        }
    }
}

/// Shown until the first rotation tick has published an artwork.
#[derive(Template)]
#[template(path = "loading.html")]
pub struct LoadingTemplate {
    site_name: String,
}

#[derive(Template)]
#[template(path = "404.html")]
pub struct NotFoundTemplate {
    msg: String,
}

#[derive(Template)]
#[template(path = "5xxerrors.html")]
pub struct ServerErrorTemplate {
    msg: String,
}

/// Landing page: current rotation snapshot, or the loading view before the
/// first successful tick.
pub async fn landing(State(state): State<AppState>) -> Response {
    debug!("Rendering landing page");

    let snapshot = match state.rotation.read() {
        Ok(guard) => guard.clone(),
        Err(e) => {
            error!("Failed to acquire rotation read lock: {e}");
            return (StatusCode::INTERNAL_SERVER_ERROR, "Rotation state error").into_response();
        }
    };

    match snapshot.current {
        Some(record) => {
            LayoutTemplate::rotation(&state.config.site_name, &record, snapshot.updated_at)
                .into_response()
        }
        None => LoadingTemplate {
            site_name: state.config.site_name.clone(),
        }
        .into_response(),
    }
}

/// Search results page.
pub async fn search_page(State(state): State<AppState>, request: SearchRequest) -> LayoutTemplate {
    let outcome = run_search(&state.client, &request.department_id, &request.search_term).await;
    LayoutTemplate::search(&state.config.site_name, outcome)
}

/// Deterministic 500 used as a manual harness for error presentation.
pub async fn error_route() -> (StatusCode, ServerErrorTemplate) {
    let msg = "GET /error-route: Error: route is broken!".to_string();
    error!("{msg}");
    (StatusCode::INTERNAL_SERVER_ERROR, ServerErrorTemplate { msg })
}

/// Fallback for any unmatched path or method.
pub async fn not_found() -> (StatusCode, NotFoundTemplate) {
    let msg = "Error! No matching route was found!".to_string();
    error!("{msg}");
    (StatusCode::NOT_FOUND, NotFoundTemplate { msg })
}
