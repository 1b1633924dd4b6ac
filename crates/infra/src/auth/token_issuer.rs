//! Battle.net client-credentials token issuer

use std::fmt;

use armory_core::TokenIssuer;
use armory_domain::constants::CLIENT_CREDENTIALS_GRANT;
use armory_domain::{ArmoryError, Result, TokenGrant};
use async_trait::async_trait;
use base64::engine::general_purpose::STANDARD as BASE64;
use base64::Engine;
use reqwest::header::AUTHORIZATION;
use reqwest::Method;
use tracing::{debug, instrument, warn};

use crate::http::HttpClient;

/// Exchanges the client id and secret for a bearer token
#[derive(Clone)]
pub struct BattleNetTokenIssuer {
    http: HttpClient,
    auth_url: String,
    client_id: String,
    client_secret: String,
}

impl BattleNetTokenIssuer {
    /// Create a new issuer
    ///
    /// # Arguments
    ///
    /// * `http` - HTTP client used for the exchange
    /// * `auth_url` - OAuth token endpoint
    /// * `client_id` - Client identifier
    /// * `client_secret` - Client secret
    pub fn new(
        http: HttpClient,
        auth_url: impl Into<String>,
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
    ) -> Self {
        Self {
            http,
            auth_url: auth_url.into(),
            client_id: client_id.into(),
            client_secret: client_secret.into(),
        }
    }

    fn basic_credentials(&self) -> String {
        let pair = format!("{}:{}", self.client_id, self.client_secret);
        format!("Basic {}", BASE64.encode(pair))
    }
}

impl fmt::Debug for BattleNetTokenIssuer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("BattleNetTokenIssuer")
            .field("auth_url", &self.auth_url)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .finish()
    }
}

#[async_trait]
impl TokenIssuer for BattleNetTokenIssuer {
    #[instrument(skip(self), fields(auth_url = %self.auth_url))]
    async fn request_token(&self) -> Result<TokenGrant> {
        let builder = self
            .http
            .request(Method::POST, self.auth_url.as_str())
            .header(AUTHORIZATION, self.basic_credentials())
            .form(&[("grant_type", CLIENT_CREDENTIALS_GRANT)]);

        let response = self.http.send_for_text(builder).await?;

        if !response.is_success() {
            warn!(status = response.status, "Token exchange rejected");
            return Err(ArmoryError::Auth(format!(
                "token endpoint returned status {}: {}",
                response.status, response.body
            )));
        }

        let grant: TokenGrant = serde_json::from_str(&response.body)
            .map_err(|e| ArmoryError::Auth(format!("malformed token response: {e}")))?;
        debug!(expires_in = grant.expires_in, "Token exchange succeeded");
        Ok(grant)
    }
}
