//! HTTP client for the remote art-collection API.
//!
//! Wraps three GET endpoints of the collection service: the full object-ID
//! listing, a single object by ID, and a department/keyword search. Every
//! request carries an explicit timeout and failures come back as a tagged
//! [`FetchError`] so callers branch on the kind instead of inspecting the
//! shape of the returned document.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::time::Duration;
use tracing::{debug, error, info};
use url::Url;

/// One museum object as returned by the collection API.
///
/// The document is carried verbatim; no schema is enforced beyond "it is a
/// JSON object". Accessors pull out the handful of fields the presentation
/// layer displays.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ArtworkRecord(serde_json::Map<String, Value>);

impl ArtworkRecord {
    /// The object identifier, when the document carries one.
    #[must_use]
    pub fn object_id(&self) -> Option<i64> {
        self.0.get("objectID").and_then(Value::as_i64)
    }

    /// A string-valued field, `None` when absent, null, or not a string.
    #[must_use]
    pub fn str_field(&self, name: &str) -> Option<&str> {
        self.0.get(name).and_then(Value::as_str)
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<serde_json::Map<String, Value>> for ArtworkRecord {
    fn from(fields: serde_json::Map<String, Value>) -> Self {
        Self(fields)
    }
}

/// Result of a department/keyword search: total hit count and the matching
/// object IDs. The remote sends `objectIDs: null` for zero hits; that is
/// decoded as an empty vec.
#[derive(Debug, Clone)]
pub struct SearchHits {
    pub total: u64,
    pub object_ids: Vec<i64>,
}

/// Wire shape shared by the listing and search endpoints.
#[derive(Debug, Deserialize)]
struct ObjectListing {
    #[serde(default)]
    total: u64,
    #[serde(rename = "objectIDs", default)]
    object_ids: Option<Vec<i64>>,
}

/// Failure kinds for collection API requests.
#[derive(Debug)]
pub enum FetchError {
    /// Connection, DNS, or timeout failure before a response arrived
    Transport(reqwest::Error),

    /// The remote answered with a non-2xx status
    Status(u16),

    /// A 2xx response with no usable body
    EmptyResponse,

    /// The response body was not the expected JSON
    Decode(serde_json::Error),
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FetchError::Transport(e) => write!(f, "transport error: {e}"),
            FetchError::Status(code) => write!(f, "unexpected status code {code}"),
            FetchError::EmptyResponse => write!(f, "empty response body"),
            FetchError::Decode(e) => write!(f, "failed to decode response: {e}"),
        }
    }
}

impl std::error::Error for FetchError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            FetchError::Transport(e) => Some(e),
            FetchError::Decode(e) => Some(e),
            FetchError::Status(_) | FetchError::EmptyResponse => None,
        }
    }
}

/// Client for the remote collection API.
pub struct CollectionClient {
    http: reqwest::Client,
    base: Url,
    timeout: Duration,
}

impl CollectionClient {
    /// Create a client for the API rooted at `base_url`.
    ///
    /// # Errors
    ///
    /// Returns an error if `base_url` is not a valid absolute URL.
    pub fn new(base_url: &str, timeout: Duration) -> crate::error::Result<Self> {
        let base = Url::parse(base_url)?;
        Ok(Self {
            http: reqwest::Client::new(),
            base,
            timeout,
        })
    }

    /// Fetch the full object-ID listing.
    ///
    /// The listing is not paginated and not cached; rotation re-requests it
    /// every tick.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] describing the transport, status, or decode
    /// failure.
    pub async fn list_object_ids(&self) -> Result<Vec<i64>, FetchError> {
        let url = self.endpoint("objects");
        let listing: ObjectListing = self.get_json(url).await?;
        Ok(listing.object_ids.unwrap_or_default())
    }

    /// Fetch one object by its identifier.
    ///
    /// # Errors
    ///
    /// Returns [`FetchError::EmptyResponse`] when the remote answers 2xx with
    /// an empty document, and the usual transport/status/decode kinds
    /// otherwise.
    pub async fn fetch_object(&self, id: i64) -> Result<ArtworkRecord, FetchError> {
        info!("Fetching artwork object {id} from the collection API");
        let url = self.endpoint(&format!("objects/{id}"));
        let record: ArtworkRecord = self.get_json(url).await?;
        if record.is_empty() {
            return Err(FetchError::EmptyResponse);
        }
        Ok(record)
    }

    /// Search the collection by department and keyword.
    ///
    /// `hasImages=true` is always forced on, matching the behavior the
    /// landing page depends on. Parameters go through the URL query encoder,
    /// so arbitrary search terms are safe.
    ///
    /// # Errors
    ///
    /// Returns a [`FetchError`] describing the transport, status, or decode
    /// failure.
    pub async fn search_objects(
        &self,
        department_id: &str,
        term: &str,
    ) -> Result<SearchHits, FetchError> {
        info!("Searching department {department_id} for artwork keyword {term}");
        let mut url = self.endpoint("search");
        url.query_pairs_mut()
            .append_pair("hasImages", "true")
            .append_pair("departmentId", department_id)
            .append_pair("q", term);

        let listing: ObjectListing = self.get_json(url).await?;
        Ok(SearchHits {
            total: listing.total,
            object_ids: listing.object_ids.unwrap_or_default(),
        })
    }

    fn endpoint(&self, path: &str) -> Url {
        let mut url = self.base.clone();
        url.set_path(&format!("{}/{path}", self.base.path().trim_end_matches('/')));
        url
    }

    async fn get_json<T: serde::de::DeserializeOwned>(&self, url: Url) -> Result<T, FetchError> {
        debug!("GET {url}");
        let response = self
            .http
            .get(url.clone())
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|err| {
                error!("GET {url} failed: {err}");
                FetchError::Transport(err)
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("GET {url} returned status {status}");
            return Err(FetchError::Status(status.as_u16()));
        }

        let body = response.bytes().await.map_err(|err| {
            error!("GET {url} body read failed: {err}");
            FetchError::Transport(err)
        })?;
        if body.is_empty() {
            error!("GET {url} returned an empty body");
            return Err(FetchError::EmptyResponse);
        }

        serde_json::from_slice(&body).map_err(|err| {
            error!("GET {url} returned undecodable JSON: {err}");
            FetchError::Decode(err)
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{routing::get, Router};
    use std::net::{Ipv4Addr, SocketAddr};

    fn test_client(base: &str) -> CollectionClient {
        CollectionClient::new(base, Duration::from_secs(2)).expect("valid base URL")
    }

    // Serve `router` on an ephemeral local port and return its base URL.
    async fn spawn_stub(router: Router) -> String {
        let addr = SocketAddr::new(Ipv4Addr::LOCALHOST.into(), 0);
        let listener = tokio::net::TcpListener::bind(addr)
            .await
            .expect("Failed to bind stub listener");
        let base = format!("http://{}", listener.local_addr().expect("stub addr"));
        tokio::spawn(async move {
            axum::serve(listener, router).await.expect("stub server");
        });
        base
    }

    #[test]
    fn test_search_url_is_query_encoded() {
        let client = test_client("https://example.com/collection/v1");
        let mut url = client.endpoint("search");
        url.query_pairs_mut()
            .append_pair("hasImages", "true")
            .append_pair("departmentId", "6")
            .append_pair("q", "winged lion & friends");

        assert_eq!(url.path(), "/collection/v1/search");
        let query = url.query().expect("query string");
        assert!(query.contains("hasImages=true"));
        assert!(query.contains("departmentId=6"));
        // Spaces and ampersands must never pass through raw
        assert!(query.contains("q=winged+lion+%26+friends"));
    }

    #[test]
    fn test_endpoint_handles_trailing_slash() {
        let client = test_client("https://example.com/collection/v1/");
        assert_eq!(
            client.endpoint("objects").as_str(),
            "https://example.com/collection/v1/objects"
        );
    }

    #[test]
    fn test_artwork_record_accessors() {
        let record: ArtworkRecord = serde_json::from_str(
            r#"{"objectID": 437133, "title": "Wheat Field with Cypresses", "artistDisplayName": "Vincent van Gogh"}"#,
        )
        .expect("record should parse");

        assert_eq!(record.object_id(), Some(437_133));
        assert_eq!(record.str_field("title"), Some("Wheat Field with Cypresses"));
        assert_eq!(record.str_field("medium"), None);
        assert!(!record.is_empty());
    }

    #[tokio::test]
    async fn test_list_object_ids_decodes_listing() {
        let router = Router::new().route(
            "/objects",
            get(|| async { r#"{"total": 3, "objectIDs": [10, 20, 30]}"# }),
        );
        let base = spawn_stub(router).await;

        let ids = test_client(&base)
            .list_object_ids()
            .await
            .expect("listing should decode");
        assert_eq!(ids, vec![10, 20, 30]);
    }

    #[tokio::test]
    async fn test_fetch_object_non_2xx_is_status_error() {
        let router = Router::new().route(
            "/objects/:id",
            get(|| async { (axum::http::StatusCode::NOT_FOUND, "no such object") }),
        );
        let base = spawn_stub(router).await;

        let err = test_client(&base)
            .fetch_object(99)
            .await
            .expect_err("non-2xx must be an error");
        assert!(matches!(err, FetchError::Status(404)));
    }

    #[tokio::test]
    async fn test_fetch_object_empty_document_is_empty_response() {
        let router = Router::new().route("/objects/:id", get(|| async { "{}" }));
        let base = spawn_stub(router).await;

        let err = test_client(&base)
            .fetch_object(7)
            .await
            .expect_err("empty document must be an error");
        assert!(matches!(err, FetchError::EmptyResponse));
    }

    #[tokio::test]
    async fn test_search_null_object_ids_decodes_as_empty() {
        let router = Router::new().route(
            "/search",
            get(|| async { r#"{"total": 0, "objectIDs": null}"# }),
        );
        let base = spawn_stub(router).await;

        let hits = test_client(&base)
            .search_objects("6", "nothing-matches-this")
            .await
            .expect("zero-hit search should decode");
        assert_eq!(hits.total, 0);
        assert!(hits.object_ids.is_empty());
    }

    #[tokio::test]
    async fn test_transport_failure_is_transport_error() {
        // Nothing listens on this port
        let err = test_client("http://127.0.0.1:1")
            .list_object_ids()
            .await
            .expect_err("connection refused must be an error");
        assert!(matches!(err, FetchError::Transport(_)));
    }
}
