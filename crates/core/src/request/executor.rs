//! Request executor
//!
//! Builds and issues a single authenticated GET against the game-data
//! service and returns the parsed JSON body verbatim. The payload shape is
//! never interpreted here.

use std::collections::BTreeMap;
use std::sync::Arc;

use armory_domain::constants::LOCALE_QUERY_KEY;
use armory_domain::{ArmoryError, Locale, Result};
use serde_json::Value;
use tracing::{debug, instrument, warn};

use super::path::ResourcePath;
use super::ports::{HttpRequest, HttpResponse, HttpTransport};
use crate::auth::TokenLifecycle;

/// Issues authenticated resource requests
pub struct RequestExecutor {
    transport: Arc<dyn HttpTransport>,
    tokens: Arc<TokenLifecycle>,
    base_url: String,
    locale: Locale,
}

impl RequestExecutor {
    /// Create a new executor
    ///
    /// # Arguments
    ///
    /// * `transport` - HTTP transport used for every call
    /// * `tokens` - Token lifecycle consulted before every call
    /// * `base_url` - Service base URL without trailing slash
    /// * `locale` - Default `locale` query value
    pub fn new(
        transport: Arc<dyn HttpTransport>,
        tokens: Arc<TokenLifecycle>,
        base_url: impl Into<String>,
        locale: Locale,
    ) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        Self { transport, tokens, base_url, locale }
    }

    /// Issue one authenticated GET.
    ///
    /// Operation-specific `query` keys win over the base `locale` key.
    ///
    /// # Errors
    ///
    /// - `ArmoryError::Auth` if a token renewal was needed and failed
    /// - `ArmoryError::Network` on transport failure
    /// - `ArmoryError::Remote` on a non-success status, carrying status and body
    /// - `ArmoryError::Decode` if the body is not JSON
    #[instrument(skip(self, query), fields(path = %path))]
    pub async fn issue(
        &self,
        path: &ResourcePath,
        query: Vec<(String, String)>,
        locale_override: Option<Locale>,
    ) -> Result<Value> {
        let token = self.tokens.ensure_fresh_token().await?;

        let request = HttpRequest {
            url: format!("{}{}", self.base_url, path.render()),
            query: merge_query(locale_override.unwrap_or(self.locale), query),
            bearer: Some(token),
        };

        debug!(url = %request.url, "GET resource");
        let response = self.transport.get(&request).await?;
        parse_response(&request.url, response)
    }

    /// Fetch an absolute URL without authentication or locale.
    ///
    /// Used for follow-up downloads whose URLs the service hands out.
    #[instrument(skip(self))]
    pub async fn fetch_unauthenticated(&self, url: &str) -> Result<Value> {
        let request = HttpRequest::unauthenticated(url);
        let response = self.transport.get(&request).await?;
        parse_response(url, response)
    }

    /// Default locale sent with every request
    pub fn locale(&self) -> Locale {
        self.locale
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn merge_query(locale: Locale, extra: Vec<(String, String)>) -> Vec<(String, String)> {
    let mut merged = BTreeMap::new();
    merged.insert(LOCALE_QUERY_KEY.to_string(), locale.as_str().to_string());
    for (key, value) in extra {
        merged.insert(key, value);
    }
    merged.into_iter().collect()
}

fn parse_response(url: &str, response: HttpResponse) -> Result<Value> {
    if !response.is_success() {
        warn!(url = %url, status = response.status, "Remote request failed");
        return Err(ArmoryError::Remote { status: response.status, body: response.body });
    }

    if response.body.trim().is_empty() {
        return Ok(Value::Null);
    }

    serde_json::from_str(&response.body)
        .map_err(|e| ArmoryError::Decode(format!("{url} returned invalid JSON: {e}")))
}
