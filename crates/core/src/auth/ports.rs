//! Port interfaces for token persistence and token issuance

use armory_domain::{CredentialRecord, Result, TokenGrant};
use async_trait::async_trait;

/// Persistence for the single cached credential record
///
/// Implementations must replace the persisted record atomically so that a
/// concurrent reader (possibly in another process) never observes a torn
/// write.
#[async_trait]
pub trait CredentialStore: Send + Sync {
    /// Load the cached record.
    ///
    /// A missing or unreadable record is reported as `None`, never as an
    /// error: corruption simply means "no valid token cached".
    async fn load(&self) -> Option<CredentialRecord>;

    /// Atomically replace the cached record.
    async fn save(&self, record: &CredentialRecord) -> Result<()>;
}

/// Exchanges client credentials for a fresh bearer token
#[async_trait]
pub trait TokenIssuer: Send + Sync {
    /// Perform one client-credentials exchange against the auth endpoint.
    ///
    /// Rejections and malformed responses are reported as
    /// `ArmoryError::Auth`.
    async fn request_token(&self) -> Result<TokenGrant>;
}
