//! In-memory doubles for the core ports
//!
//! Available to this crate's unit tests and, behind the `test-utils` feature,
//! to downstream crates.

// Test doubles keep their failure handling simple: a poisoned lock means a
// test already panicked.
#![allow(clippy::unwrap_used, clippy::missing_panics_doc)]

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use armory_domain::{ArmoryError, CredentialRecord, Result, TokenGrant};
use async_trait::async_trait;
use serde_json::Value;

use crate::auth::{CredentialStore, TokenIssuer};
use crate::request::{HttpRequest, HttpResponse, HttpTransport};

/// Credential store kept in memory, with call counters
#[derive(Debug, Default)]
pub struct InMemoryCredentialStore {
    record: Mutex<Option<CredentialRecord>>,
    loads: AtomicUsize,
    saves: AtomicUsize,
    fail_saves: bool,
    load_delay: Option<Duration>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_record(record: CredentialRecord) -> Self {
        Self { record: Mutex::new(Some(record)), ..Self::default() }
    }

    /// Make every `save` fail with a storage error.
    pub fn failing_saves(mut self) -> Self {
        self.fail_saves = true;
        self
    }

    /// Sleep inside `load` to widen race windows.
    pub fn with_load_delay(mut self, delay: Duration) -> Self {
        self.load_delay = Some(delay);
        self
    }

    pub fn current(&self) -> Option<CredentialRecord> {
        self.record.lock().unwrap().clone()
    }

    pub fn loads(&self) -> usize {
        self.loads.load(Ordering::SeqCst)
    }

    pub fn saves(&self) -> usize {
        self.saves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn load(&self) -> Option<CredentialRecord> {
        self.loads.fetch_add(1, Ordering::SeqCst);
        if let Some(delay) = self.load_delay {
            tokio::time::sleep(delay).await;
        }
        self.current()
    }

    async fn save(&self, record: &CredentialRecord) -> Result<()> {
        self.saves.fetch_add(1, Ordering::SeqCst);
        if self.fail_saves {
            return Err(ArmoryError::Storage("save disabled for test".into()));
        }
        *self.record.lock().unwrap() = Some(record.clone());
        Ok(())
    }
}

/// Token issuer that mints `token-1`, `token-2`, ... and counts exchanges
#[derive(Debug)]
pub struct CountingTokenIssuer {
    calls: AtomicUsize,
    lifetime_secs: i64,
    delay: Option<Duration>,
    failure: Option<String>,
}

impl CountingTokenIssuer {
    pub fn new(lifetime_secs: i64) -> Self {
        Self { calls: AtomicUsize::new(0), lifetime_secs, delay: None, failure: None }
    }

    /// Issuer whose every exchange is rejected with the given reason.
    pub fn failing(reason: impl Into<String>) -> Self {
        Self { failure: Some(reason.into()), ..Self::new(0) }
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenIssuer for CountingTokenIssuer {
    async fn request_token(&self) -> Result<TokenGrant> {
        let n = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        if let Some(reason) = &self.failure {
            return Err(ArmoryError::Auth(reason.clone()));
        }
        Ok(TokenGrant {
            access_token: format!("token-{n}"),
            expires_in: self.lifetime_secs,
            token_type: Some("bearer".into()),
        })
    }
}

/// Transport that answers from a URL-keyed script and records every request
#[derive(Debug, Default)]
pub struct ScriptedTransport {
    responses: Mutex<HashMap<String, HttpResponse>>,
    requests: Mutex<Vec<HttpRequest>>,
    delay: Option<Duration>,
}

impl ScriptedTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Answer requests for `url` with `status` and a JSON body.
    pub fn respond(&self, url: impl Into<String>, status: u16, body: &Value) {
        self.respond_raw(url, status, body.to_string());
    }

    /// Answer requests for `url` with a raw body.
    pub fn respond_raw(&self, url: impl Into<String>, status: u16, body: impl Into<String>) {
        self.responses
            .lock()
            .unwrap()
            .insert(url.into(), HttpResponse { status, body: body.into() });
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }
}

#[async_trait]
impl HttpTransport for ScriptedTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        if let Some(delay) = self.delay {
            tokio::time::sleep(delay).await;
        }
        let scripted = self.responses.lock().unwrap().get(&request.url).cloned();
        Ok(scripted.unwrap_or_else(|| HttpResponse { status: 200, body: "{}".into() }))
    }
}
