//! A stand-in for the remote expense service.
//!
//! The mock listens on an ephemeral local port, answers each request with the
//! canned response of the first route matching its method and path, and
//! records every request it receives so tests can inspect what was sent.

use std::sync::{Arc, Mutex};

use axum::{
    Json, Router,
    body::Bytes,
    extract::State,
    http::{Method, StatusCode, Uri},
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};
use tokio::net::TcpListener;

use crate::{ApiClient, AppState};

/// A canned response for requests with `method` to `path`.
#[derive(Debug, Clone)]
pub(crate) struct MockRoute {
    method: Method,
    path: String,
    status: StatusCode,
    body: Option<Value>,
}

impl MockRoute {
    pub(crate) fn new(method: Method, path: &str, status: StatusCode, body: Option<Value>) -> Self {
        Self {
            method,
            path: path.to_owned(),
            status,
            body,
        }
    }

    /// Respond with 200 OK and `body`.
    pub(crate) fn ok(method: Method, path: &str, body: Value) -> Self {
        Self::new(method, path, StatusCode::OK, Some(body))
    }

    /// Respond with 200 OK and no body.
    pub(crate) fn empty(method: Method, path: &str) -> Self {
        Self::new(method, path, StatusCode::OK, None)
    }
}

/// A request received by the mock service.
#[derive(Debug, Clone)]
pub(crate) struct RecordedRequest {
    pub method: Method,
    pub path: String,
    pub query: Option<String>,
    pub body: Option<Value>,
}

impl RecordedRequest {
    /// The decoded query string, in the order it was sent.
    pub(crate) fn query_pairs(&self) -> Vec<(String, String)> {
        serde_urlencoded::from_str(self.query.as_deref().unwrap_or_default())
            .expect("query string should be URL encoded")
    }
}

#[derive(Clone)]
struct MockState {
    routes: Arc<Vec<MockRoute>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

pub(crate) struct MockApi {
    base_url: String,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl MockApi {
    /// Start a mock service that serves `routes`.
    ///
    /// Requests that match no route get a 404 response.
    pub(crate) async fn start(routes: Vec<MockRoute>) -> Self {
        let requests = Arc::new(Mutex::new(Vec::new()));
        let state = MockState {
            routes: Arc::new(routes),
            requests: requests.clone(),
        };
        let app = Router::new().fallback(handle_request).with_state(state);

        let listener = TcpListener::bind("127.0.0.1:0")
            .await
            .expect("Could not bind mock service");
        let address = listener
            .local_addr()
            .expect("Could not get mock service address");

        tokio::spawn(async move {
            axum::serve(listener, app)
                .await
                .expect("Mock service stopped unexpectedly");
        });

        Self {
            base_url: format!("http://{address}"),
            requests,
        }
    }

    /// A client for the mock service.
    pub(crate) fn client(&self) -> ApiClient {
        ApiClient::new(&self.base_url).expect("Mock service URL should be valid")
    }

    /// App state whose services all talk to the mock service.
    pub(crate) fn state(&self) -> AppState {
        AppState::new(&self.base_url, "Etc/UTC").expect("Mock service URL should be valid")
    }

    /// The requests received so far, oldest first.
    pub(crate) fn requests(&self) -> Vec<RecordedRequest> {
        self.requests
            .lock()
            .expect("Could not lock recorded requests")
            .clone()
    }
}

async fn handle_request(
    State(state): State<MockState>,
    method: Method,
    uri: Uri,
    body: Bytes,
) -> Response {
    let body = if body.is_empty() {
        None
    } else {
        serde_json::from_slice(&body).ok()
    };

    state
        .requests
        .lock()
        .expect("Could not lock recorded requests")
        .push(RecordedRequest {
            method: method.clone(),
            path: uri.path().to_owned(),
            query: uri.query().map(str::to_owned),
            body,
        });

    let route = state
        .routes
        .iter()
        .find(|route| route.method == method && route.path == uri.path());

    match route {
        Some(MockRoute {
            status,
            body: Some(body),
            ..
        }) => (*status, Json(body.clone())).into_response(),
        Some(MockRoute { status, .. }) => status.into_response(),
        None => (
            StatusCode::NOT_FOUND,
            Json(json!({"message": format!("no route for {method} {}", uri.path())})),
        )
            .into_response(),
    }
}
