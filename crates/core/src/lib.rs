//! # Armory Core
//!
//! Client logic over ports - no HTTP or filesystem code.
//!
//! This crate contains:
//! - Ports for credential persistence, token issuance and HTTP transport
//! - The token lifecycle manager and the request executor
//! - The operation registry: descriptors, parameter binding, request planning
//! - The batch dispatch engine
//!
//! ## Architecture Principles
//! - Only depends on `armory-domain`
//! - All I/O via traits implemented in `armory-infra`
//! - In-memory doubles behind the `test-utils` feature

pub mod auth;
pub mod batch;
pub mod operations;
pub mod request;

#[cfg(any(test, feature = "test-utils"))]
pub mod testing;

pub use auth::{CredentialStore, TokenIssuer, TokenLifecycle};
pub use batch::BatchDispatcher;
pub use operations::{OperationId, OperationInvoker, OperationRegistry, Operations};
pub use request::{HttpRequest, HttpResponse, HttpTransport, RequestExecutor, ResourcePath};
