//! Token lifecycle manager
//!
//! Owns the in-memory credential record and is the only writer of its
//! persisted form:
//! - First use loads the record from the [`CredentialStore`]; nothing cached
//!   means an already-expired placeholder, so the freshness check renews
//! - Stale records are renewed through the [`TokenIssuer`] and saved back
//! - Fresh records are returned without any network call
//!
//! The whole read-check-renew-write sequence runs under one async mutex, so
//! concurrent callers on the same client trigger at most one exchange.

use std::sync::Arc;

use armory_domain::constants::{DEFAULT_TOKEN_SAFETY_MARGIN_SECS, MIN_TOKEN_SAFETY_MARGIN_SECS};
use armory_domain::{ArmoryError, CredentialRecord, Result};
use chrono::Utc;
use tokio::sync::Mutex;
use tracing::{debug, info, instrument, warn};

use super::ports::{CredentialStore, TokenIssuer};

/// Lifecycle state of the cached credential
#[derive(Debug)]
enum TokenState {
    /// The store has not been consulted yet in this process.
    Unloaded,
    /// Holding a record, possibly expired.
    Loaded(CredentialRecord),
}

/// Hands out bearer tokens, renewing them when stale
pub struct TokenLifecycle {
    store: Arc<dyn CredentialStore>,
    issuer: Arc<dyn TokenIssuer>,
    state: Mutex<TokenState>,
    safety_margin_secs: i64,
}

impl TokenLifecycle {
    /// Create a new lifecycle manager with the default safety margin
    pub fn new(store: Arc<dyn CredentialStore>, issuer: Arc<dyn TokenIssuer>) -> Self {
        Self {
            store,
            issuer,
            state: Mutex::new(TokenState::Unloaded),
            safety_margin_secs: DEFAULT_TOKEN_SAFETY_MARGIN_SECS,
        }
    }

    /// Seconds subtracted from the server-declared lifetime, at least one
    #[must_use]
    pub fn with_safety_margin_secs(mut self, secs: i64) -> Self {
        self.safety_margin_secs = secs.max(MIN_TOKEN_SAFETY_MARGIN_SECS);
        self
    }

    /// Return a bearer token that is fresh right now.
    ///
    /// Idempotent and cheap when the cached token is still valid; safe to call
    /// before every outbound request.
    ///
    /// # Errors
    /// Returns `ArmoryError::Auth` if a renewal was needed and the exchange
    /// was rejected or malformed. Failures are not retried here.
    #[instrument(skip(self))]
    pub async fn ensure_fresh_token(&self) -> Result<String> {
        let mut state = self.state.lock().await;

        if let TokenState::Unloaded = *state {
            *state = TokenState::Loaded(self.load_or_placeholder().await);
        }

        if let TokenState::Loaded(record) = &*state {
            if record.is_fresh_at(Utc::now()) {
                debug!(expires_in = record.seconds_until_expiry(), "Reusing cached token");
                return Ok(record.access_token.clone());
            }
        }

        let record = self.renew().await?;
        let token = record.access_token.clone();
        *state = TokenState::Loaded(record);

        Ok(token)
    }

    /// Current in-memory record without triggering a load or renewal
    pub async fn cached_record(&self) -> Option<CredentialRecord> {
        match &*self.state.lock().await {
            TokenState::Loaded(record) => Some(record.clone()),
            TokenState::Unloaded => None,
        }
    }

    /// Get the safety margin in seconds
    #[must_use]
    pub fn safety_margin_secs(&self) -> i64 {
        self.safety_margin_secs
    }

    async fn load_or_placeholder(&self) -> CredentialRecord {
        match self.store.load().await {
            Some(record) => {
                debug!(expires_at = %record.expires_at, "Loaded cached credential record");
                record
            }
            None => {
                debug!("No cached credential record; forcing renewal");
                CredentialRecord::expired_placeholder()
            }
        }
    }

    async fn renew(&self) -> Result<CredentialRecord> {
        let grant = self.issuer.request_token().await?;

        if grant.access_token.trim().is_empty() {
            return Err(ArmoryError::Auth("token endpoint returned an empty access token".into()));
        }
        if grant.expires_in <= 0 {
            return Err(ArmoryError::Auth(format!(
                "token endpoint returned a non-positive lifetime ({})",
                grant.expires_in
            )));
        }

        let lifetime = grant.expires_in;
        let record = CredentialRecord::from_lifetime(
            grant.access_token,
            lifetime,
            self.safety_margin_secs,
            Utc::now(),
        )
        .ok_or_else(|| {
            ArmoryError::Auth(format!(
                "token endpoint returned an out-of-range lifetime ({lifetime})"
            ))
        })?;

        // The fresh token is usable even if the cache write fails.
        if let Err(err) = self.store.save(&record).await {
            warn!(error = %err, "Failed to persist renewed credential record");
        }

        info!(expires_at = %record.expires_at, "Access token renewed");
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use armory_domain::ErrorKind;
    use chrono::Duration as ChronoDuration;

    use super::*;
    use crate::testing::{CountingTokenIssuer, InMemoryCredentialStore};

    fn lifecycle(
        store: &Arc<InMemoryCredentialStore>,
        issuer: &Arc<CountingTokenIssuer>,
    ) -> TokenLifecycle {
        TokenLifecycle::new(store.clone(), issuer.clone())
    }

    #[tokio::test]
    async fn test_empty_store_triggers_exactly_one_exchange() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let issuer = Arc::new(CountingTokenIssuer::new(3600));
        let manager = lifecycle(&store, &issuer);

        assert!(manager.cached_record().await.is_none());

        let token = manager.ensure_fresh_token().await.unwrap();
        assert_eq!(token, "token-1");
        assert_eq!(issuer.calls(), 1);
        assert_eq!(store.saves(), 1);

        // Second call reuses the renewed token
        let again = manager.ensure_fresh_token().await.unwrap();
        assert_eq!(again, "token-1");
        assert_eq!(issuer.calls(), 1);
    }

    #[tokio::test]
    async fn test_fresh_cached_record_skips_exchange() {
        let cached = CredentialRecord::new("cached", Utc::now() + ChronoDuration::hours(1));
        let store = Arc::new(InMemoryCredentialStore::with_record(cached));
        let issuer = Arc::new(CountingTokenIssuer::new(3600));
        let manager = lifecycle(&store, &issuer);

        assert_eq!(manager.ensure_fresh_token().await.unwrap(), "cached");
        assert_eq!(issuer.calls(), 0);
        assert_eq!(store.saves(), 0);
    }

    #[tokio::test]
    async fn test_expired_cached_record_is_renewed_and_persisted() {
        let cached = CredentialRecord::new("stale", Utc::now() - ChronoDuration::seconds(1));
        let store = Arc::new(InMemoryCredentialStore::with_record(cached));
        let issuer = Arc::new(CountingTokenIssuer::new(3600));
        let manager = lifecycle(&store, &issuer);

        assert_eq!(manager.ensure_fresh_token().await.unwrap(), "token-1");
        assert_eq!(issuer.calls(), 1);

        let persisted = store.current().expect("record persisted");
        assert_eq!(persisted.access_token, "token-1");
        assert_eq!(Some(persisted), manager.cached_record().await);
    }

    #[tokio::test]
    async fn test_expiry_includes_safety_margin() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let issuer = Arc::new(CountingTokenIssuer::new(100));
        let manager = lifecycle(&store, &issuer).with_safety_margin_secs(30);

        let before = Utc::now();
        manager.ensure_fresh_token().await.unwrap();
        let record = manager.cached_record().await.unwrap();

        let remaining = (record.expires_at - before).num_seconds();
        assert!((69..=70).contains(&remaining), "remaining = {remaining}");
    }

    #[tokio::test]
    async fn test_zero_margin_still_expires_before_remote_lifetime() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let issuer = Arc::new(CountingTokenIssuer::new(100));
        let manager = lifecycle(&store, &issuer).with_safety_margin_secs(0);

        let before = Utc::now();
        manager.ensure_fresh_token().await.unwrap();
        let after = Utc::now();
        let record = manager.cached_record().await.unwrap();

        assert!(record.expires_at <= after + ChronoDuration::seconds(99));
        assert!(record.expires_at >= before + ChronoDuration::seconds(99));
    }

    #[tokio::test]
    async fn test_lifetime_within_margin_renews_every_call() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let issuer = Arc::new(CountingTokenIssuer::new(3));
        let manager = lifecycle(&store, &issuer).with_safety_margin_secs(5);

        manager.ensure_fresh_token().await.unwrap();
        manager.ensure_fresh_token().await.unwrap();
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test]
    async fn test_exchange_failure_propagates_as_auth() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let issuer = Arc::new(CountingTokenIssuer::failing("invalid_client"));
        let manager = lifecycle(&store, &issuer);

        let err = manager.ensure_fresh_token().await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Authentication);
        assert_eq!(issuer.calls(), 1);
        assert_eq!(store.saves(), 0);

        // No silent retry: the next call performs a new exchange
        let _ = manager.ensure_fresh_token().await;
        assert_eq!(issuer.calls(), 2);
    }

    #[tokio::test]
    async fn test_malformed_grant_is_auth_failure() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let issuer = Arc::new(CountingTokenIssuer::new(0));
        let manager = lifecycle(&store, &issuer);

        let err = manager.ensure_fresh_token().await.unwrap_err();
        assert!(matches!(err, ArmoryError::Auth(_)));
        assert!(manager.cached_record().await.unwrap().access_token.is_empty());
    }

    #[tokio::test]
    async fn test_out_of_range_lifetime_is_auth_failure() {
        for lifetime in [i64::MAX, 10_000_000_000_000] {
            let store = Arc::new(InMemoryCredentialStore::new());
            let issuer = Arc::new(CountingTokenIssuer::new(lifetime));
            let manager = lifecycle(&store, &issuer);

            let err = manager.ensure_fresh_token().await.unwrap_err();
            assert_eq!(err.kind(), ErrorKind::Authentication, "lifetime = {lifetime}");
            assert_eq!(store.saves(), 0);
        }
    }

    #[tokio::test]
    async fn test_save_failure_still_returns_token() {
        let store = Arc::new(InMemoryCredentialStore::new().failing_saves());
        let issuer = Arc::new(CountingTokenIssuer::new(3600));
        let manager = lifecycle(&store, &issuer);

        assert_eq!(manager.ensure_fresh_token().await.unwrap(), "token-1");
        assert!(store.current().is_none());
    }

    #[tokio::test]
    async fn test_concurrent_callers_share_one_exchange() {
        let store = Arc::new(InMemoryCredentialStore::new());
        let issuer =
            Arc::new(CountingTokenIssuer::new(3600).with_delay(Duration::from_millis(50)));
        let manager = Arc::new(lifecycle(&store, &issuer));

        let mut handles = Vec::new();
        for _ in 0..16 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move { manager.ensure_fresh_token().await }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "token-1");
        }
        assert_eq!(issuer.calls(), 1);
        assert_eq!(store.loads(), 1);
        assert_eq!(store.saves(), 1);
    }

    #[tokio::test]
    async fn test_callers_arriving_during_slow_load_reuse_cached_record() {
        let cached = CredentialRecord::new("cached", Utc::now() + ChronoDuration::hours(1));
        let store = Arc::new(
            InMemoryCredentialStore::with_record(cached).with_load_delay(Duration::from_millis(50)),
        );
        let issuer = Arc::new(CountingTokenIssuer::new(3600));
        let manager = Arc::new(lifecycle(&store, &issuer));

        let mut handles = Vec::new();
        for _ in 0..8 {
            let manager = manager.clone();
            handles.push(tokio::spawn(async move { manager.ensure_fresh_token().await }));
        }

        for handle in handles {
            assert_eq!(handle.await.unwrap().unwrap(), "cached");
        }
        assert_eq!(store.loads(), 1);
        assert_eq!(issuer.calls(), 0);
    }
}
