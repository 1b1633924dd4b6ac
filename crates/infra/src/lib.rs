//! # Armory Infrastructure
//!
//! Adapters for the ports defined in `armory-core`, plus the client facade.
//!
//! This crate contains:
//! - The reqwest-based HTTP transport
//! - The Battle.net client-credentials token issuer
//! - The file-backed credential store
//! - Configuration loading and tracing setup
//! - [`ArmoryClient`], which wires all of the above together
//!
//! ## Architecture
//! - Implements traits defined in `armory-core`
//! - Contains all "impure" code (network, filesystem, environment)

pub mod auth;
pub mod client;
pub mod config;
pub mod errors;
pub mod http;
pub mod observability;

// Re-export commonly used items
pub use auth::{default_cache_path, BattleNetTokenIssuer, FileCredentialStore};
pub use client::ArmoryClient;
pub use errors::InfraError;
pub use http::{HttpClient, HttpClientBuilder};
