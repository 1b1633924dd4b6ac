//! Bearer token record and token-endpoint response

use std::fmt;

use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};

/// Persisted bearer token plus its effective expiry
///
/// `expires_at` already has the safety margin subtracted, so a record is
/// usable exactly while `expires_at > now`.
#[derive(Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CredentialRecord {
    pub access_token: String,
    pub expires_at: DateTime<Utc>,
}

impl CredentialRecord {
    #[must_use]
    pub fn new(access_token: impl Into<String>, expires_at: DateTime<Utc>) -> Self {
        Self { access_token: access_token.into(), expires_at }
    }

    /// Build a record from a server-declared lifetime.
    ///
    /// `expires_at = now + lifetime_secs - margin_secs`, or `None` when the
    /// result does not fit in a `DateTime<Utc>`.
    #[must_use]
    pub fn from_lifetime(
        access_token: impl Into<String>,
        lifetime_secs: i64,
        margin_secs: i64,
        now: DateTime<Utc>,
    ) -> Option<Self> {
        let expires_at = now
            .checked_add_signed(Duration::try_seconds(lifetime_secs)?)?
            .checked_sub_signed(Duration::try_seconds(margin_secs)?)?;
        Some(Self::new(access_token, expires_at))
    }

    /// Record that is stale under any sane clock, used when nothing is cached.
    #[must_use]
    pub fn expired_placeholder() -> Self {
        Self { access_token: String::new(), expires_at: DateTime::<Utc>::MIN_UTC }
    }

    /// Whether the token may still be presented at `now`.
    #[must_use]
    pub fn is_fresh_at(&self, now: DateTime<Utc>) -> bool {
        self.expires_at > now
    }

    #[must_use]
    pub fn is_fresh(&self) -> bool {
        self.is_fresh_at(Utc::now())
    }

    /// Seconds until the effective expiry (negative once stale).
    #[must_use]
    pub fn seconds_until_expiry(&self) -> i64 {
        (self.expires_at - Utc::now()).num_seconds()
    }
}

impl fmt::Debug for CredentialRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialRecord")
            .field("access_token", &"<redacted>")
            .field("expires_at", &self.expires_at)
            .finish()
    }
}

/// Client-credentials grant response from the token endpoint
///
/// Only the fields the lifecycle needs are modelled; anything else the
/// server sends is ignored.
#[derive(Clone, Deserialize)]
pub struct TokenGrant {
    pub access_token: String,
    /// Lifetime in seconds
    pub expires_in: i64,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl fmt::Debug for TokenGrant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TokenGrant")
            .field("access_token", &"<redacted>")
            .field("expires_in", &self.expires_in)
            .field("token_type", &self.token_type)
            .finish()
    }
}
