//! Port interface for the HTTP transport
//!
//! The transport only moves bytes. Status interpretation, JSON parsing and
//! authentication all happen in the [`RequestExecutor`](super::RequestExecutor).

use armory_domain::Result;
use async_trait::async_trait;

/// A fully-resolved GET request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// Absolute URL with an already-encoded path
    pub url: String,
    pub query: Vec<(String, String)>,
    /// Bearer token, `None` for unauthenticated fetches
    pub bearer: Option<String>,
}

impl HttpRequest {
    pub fn unauthenticated(url: impl Into<String>) -> Self {
        Self { url: url.into(), query: Vec::new(), bearer: None }
    }

    /// Look up a query parameter by key.
    pub fn query_value(&self, key: &str) -> Option<&str> {
        self.query.iter().find(|(k, _)| k == key).map(|(_, v)| v.as_str())
    }
}

/// Raw response: status code plus body text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub body: String,
}

impl HttpResponse {
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Issues GET requests against the remote service
#[async_trait]
pub trait HttpTransport: Send + Sync {
    /// Send one GET request.
    ///
    /// Connection failures and timeouts are `ArmoryError::Network`; any HTTP
    /// status, success or not, is returned as a response.
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse>;
}
