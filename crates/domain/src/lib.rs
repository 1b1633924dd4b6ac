//! # Armory Domain
//!
//! Data types shared by every layer of the Armory client.
//!
//! This crate contains:
//! - Region/locale enumerations and the validated client configuration
//! - The credential record persisted between runs
//! - Operation parameter sets and batch result types
//! - The error taxonomy and `Result` alias
//!
//! ## Architecture
//! - No dependencies on other Armory crates
//! - No I/O; only serde-friendly data and validation

pub mod config;
pub mod constants;
pub mod errors;
pub mod macros;
pub mod types;

// Re-export commonly used items
pub use config::*;
pub use errors::*;
pub use types::*;
