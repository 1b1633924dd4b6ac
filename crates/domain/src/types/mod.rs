//! Domain types and models

pub mod batch;
pub mod bracket;
pub mod credential;
pub mod params;

pub use batch::{BatchEntry, BatchOptions, BatchResult, FailurePolicy};
pub use bracket::PvpBracket;
pub use credential::{CredentialRecord, TokenGrant};
pub use params::ParamSet;
