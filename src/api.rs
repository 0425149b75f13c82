//! The HTTP client for the remote REST expense service.
//!
//! Every request made by the services goes through [ApiClient] so that
//! failures are logged and reported the same way: the server's response (or
//! the transport error when there is no response) is logged together with the
//! name of the operation, then returned to the caller as an [Error].

use reqwest::{Method, RequestBuilder, Url};
use serde::{Serialize, de::DeserializeOwned};

use crate::Error;

/// Query string parameters as key-value pairs. Keys may repeat.
pub type QueryPairs = Vec<(&'static str, String)>;

/// A client for the remote expense service, bound to its base URL.
///
/// Cloning is cheap, clones share the same connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
}

impl ApiClient {
    /// Create a client for the service at `base_url`, e.g. "http://localhost:3000".
    ///
    /// # Errors
    /// Returns [Error::InvalidApiUrl] if `base_url` is not an absolute http(s) URL.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let url = Url::parse(base_url).map_err(|_| Error::InvalidApiUrl(base_url.to_owned()))?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(Error::InvalidApiUrl(base_url.to_owned()));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base_url: base_url.trim_end_matches('/').to_owned(),
        })
    }

    /// The base URL without a trailing slash.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Send a GET request to `path` and decode the JSON response.
    pub(crate) async fn get<T>(
        &self,
        operation: &'static str,
        path: &str,
        query: &QueryPairs,
    ) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::GET, path).query(query);
        self.send(operation, request).await
    }

    /// Send a POST request with a JSON `body` to `path` and decode the JSON response.
    pub(crate) async fn post<B, T>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::POST, path).json(body);
        self.send(operation, request).await
    }

    /// Send a PUT request with a JSON `body` to `path` and decode the JSON response.
    pub(crate) async fn put<B, T>(
        &self,
        operation: &'static str,
        path: &str,
        body: &B,
    ) -> Result<T, Error>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let request = self.request(Method::PUT, path).json(body);
        self.send(operation, request).await
    }

    /// Send a DELETE request to `path` and decode the JSON response.
    pub(crate) async fn delete<T>(&self, operation: &'static str, path: &str) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let request = self.request(Method::DELETE, path);
        self.send(operation, request).await
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// Send `request` and decode the body of a successful response.
    ///
    /// An empty body is decoded as JSON `null`, so callers expecting no content
    /// can ask for `serde_json::Value` or an `Option`.
    async fn send<T>(&self, operation: &'static str, request: RequestBuilder) -> Result<T, Error>
    where
        T: DeserializeOwned,
    {
        let response = request.send().await.map_err(|error| {
            tracing::error!("{operation} error: {error}");
            Error::ApiTransport(error.to_string())
        })?;

        let status = response.status();
        let body = response.bytes().await.map_err(|error| {
            tracing::error!("{operation} error: could not read response body: {error}");
            Error::ApiTransport(error.to_string())
        })?;

        if !status.is_success() {
            let body = String::from_utf8_lossy(&body).into_owned();
            tracing::error!("{operation} error: {status} {body}");
            return Err(Error::ApiResponse {
                status: status.as_u16(),
                body,
            });
        }

        let decoded = if body.iter().all(u8::is_ascii_whitespace) {
            serde_json::from_value(serde_json::Value::Null)
        } else {
            serde_json::from_slice(&body)
        };

        decoded.map_err(|error| {
            tracing::error!("{operation} error: could not decode response: {error}");
            Error::InvalidApiResponse(error.to_string())
        })
    }
}

/// Join a collection path such as "/expense/" with a record ID.
pub(crate) fn record_path(collection: &str, id: &str) -> String {
    format!("{}/{}", collection.trim_end_matches('/'), id)
}
