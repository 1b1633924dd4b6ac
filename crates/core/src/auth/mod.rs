//! Token lifecycle: cached bearer tokens renewed on demand

pub mod lifecycle;
pub mod ports;

pub use lifecycle::TokenLifecycle;
pub use ports::{CredentialStore, TokenIssuer};
