//! Token issuance and credential persistence adapters

pub mod file_store;
pub mod token_issuer;

pub use file_store::{default_cache_path, FileCredentialStore};
pub use token_issuer::BattleNetTokenIssuer;
