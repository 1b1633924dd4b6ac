//! Shared fixtures for `armory-core` integration tests.
//!
//! Lightweight port implementations so the tests can wire a full
//! lifecycle-executor-dispatcher stack without any real I/O.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use armory_core::{
    BatchDispatcher, CredentialStore, HttpRequest, HttpResponse, HttpTransport, OperationRegistry,
    Operations, RequestExecutor, TokenIssuer, TokenLifecycle,
};
use armory_domain::{CredentialRecord, Locale, Result, TokenGrant};
use async_trait::async_trait;

pub const BASE_URL: &str = "https://eu.api.blizzard.com/wow";

/// Store holding at most one record in memory.
#[derive(Default)]
pub struct MemoryStore {
    record: Mutex<Option<CredentialRecord>>,
}

impl MemoryStore {
    pub fn seeded(record: CredentialRecord) -> Self {
        Self { record: Mutex::new(Some(record)) }
    }

    pub fn current(&self) -> Option<CredentialRecord> {
        self.record.lock().unwrap().clone()
    }
}

#[async_trait]
impl CredentialStore for MemoryStore {
    async fn load(&self) -> Option<CredentialRecord> {
        self.current()
    }

    async fn save(&self, record: &CredentialRecord) -> Result<()> {
        *self.record.lock().unwrap() = Some(record.clone());
        Ok(())
    }
}

/// Issuer that takes a while to answer and counts exchanges.
pub struct SlowIssuer {
    pub exchanges: AtomicUsize,
    delay: Duration,
}

impl SlowIssuer {
    pub fn new(delay: Duration) -> Self {
        Self { exchanges: AtomicUsize::new(0), delay }
    }

    pub fn exchanges(&self) -> usize {
        self.exchanges.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TokenIssuer for SlowIssuer {
    async fn request_token(&self) -> Result<TokenGrant> {
        let n = self.exchanges.fetch_add(1, Ordering::SeqCst) + 1;
        tokio::time::sleep(self.delay).await;
        Ok(TokenGrant { access_token: format!("issued-{n}"), expires_in: 86_399, token_type: None })
    }
}

/// Transport echoing the requested URL back as `{"url": ...}`.
#[derive(Default)]
pub struct EchoTransport {
    pub requests: Mutex<Vec<HttpRequest>>,
}

impl EchoTransport {
    pub fn count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn bearers(&self) -> Vec<Option<String>> {
        self.requests.lock().unwrap().iter().map(|r| r.bearer.clone()).collect()
    }
}

#[async_trait]
impl HttpTransport for EchoTransport {
    async fn get(&self, request: &HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request.clone());
        tokio::task::yield_now().await;
        let body = serde_json::json!({ "url": request.url }).to_string();
        Ok(HttpResponse { status: 200, body })
    }
}

/// Fully wired stack over the given doubles.
pub struct Stack {
    pub dispatcher: BatchDispatcher,
    pub operations: Arc<Operations>,
    pub tokens: Arc<TokenLifecycle>,
}

pub fn stack(
    store: Arc<MemoryStore>,
    issuer: Arc<SlowIssuer>,
    transport: Arc<EchoTransport>,
) -> Stack {
    let tokens = Arc::new(TokenLifecycle::new(store, issuer));
    let executor = Arc::new(RequestExecutor::new(transport, tokens.clone(), BASE_URL, Locale::EnUs));
    let registry = Arc::new(OperationRegistry::standard());
    let operations = Arc::new(Operations::new(registry.clone(), executor));
    let dispatcher = BatchDispatcher::new(registry, operations.clone());
    Stack { dispatcher, operations, tokens }
}
