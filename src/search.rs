//! On-demand collection search.
//!
//! One request runs at most two remote round-trips: a department/keyword
//! search, then a detail fetch for the first hit only. The search never
//! touches rotation state; its outcome lives and dies with the request.

use crate::client::{ArtworkRecord, CollectionClient};
use axum::{
    async_trait,
    extract::{FromRequest, Request},
    http::{header::CONTENT_TYPE, StatusCode},
    Form, Json,
};
use serde::Deserialize;
use tracing::{debug, error};

/// Search parameters submitted by the visitor. The route accepts both
/// form-encoded and JSON bodies.
#[derive(Debug, Clone, Deserialize)]
pub struct SearchRequest {
    #[serde(rename = "departmentId")]
    pub department_id: String,
    #[serde(rename = "searchTerm")]
    pub search_term: String,
}

#[async_trait]
impl<S> FromRequest<S> for SearchRequest
where
    S: Send + Sync,
{
    type Rejection = (StatusCode, &'static str);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.starts_with("application/json"));

        if is_json {
            let Json(request) = Json::<SearchRequest>::from_request(req, state)
                .await
                .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid JSON search body"))?;
            Ok(request)
        } else {
            let Form(request) = Form::<SearchRequest>::from_request(req, state)
                .await
                .map_err(|_| (StatusCode::BAD_REQUEST, "Invalid search form body"))?;
            Ok(request)
        }
    }
}

/// Result of one search request: the first matching record, if any, plus the
/// echoed query parameters for the result page.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub artwork: Option<ArtworkRecord>,
    pub searched_department: String,
    pub searched_term: String,
}

impl SearchOutcome {
    fn no_result(department_id: &str, term: &str) -> Self {
        Self {
            artwork: None,
            searched_department: department_id.to_string(),
            searched_term: term.to_string(),
        }
    }
}

/// Run one search: query the collection, then fetch the detail record for
/// the first hit. Any remote failure, as well as a zero-hit search, yields
/// the no-result outcome; an error never leaks into the rendering context.
pub async fn run_search(client: &CollectionClient, department_id: &str, term: &str) -> SearchOutcome {
    let hits = match client.search_objects(department_id, term).await {
        Ok(hits) => hits,
        Err(err) => {
            error!("Search request failed: {err}");
            return SearchOutcome::no_result(department_id, term);
        }
    };

    let Some(&first_id) = hits.object_ids.first() else {
        debug!("No matching objects for department {department_id}, keyword {term}");
        return SearchOutcome::no_result(department_id, term);
    };

    match client.fetch_object(first_id).await {
        Ok(record) => SearchOutcome {
            artwork: Some(record),
            searched_department: department_id.to_string(),
            searched_term: term.to_string(),
        },
        Err(err) => {
            error!("Detail fetch for search hit {first_id} failed: {err}");
            SearchOutcome::no_result(department_id, term)
        }
    }
}
