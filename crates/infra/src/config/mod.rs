//! Configuration loading
//!
//! Reads [`ClientSettings`](armory_domain::ClientSettings) from environment
//! variables or files and validates them into a
//! [`ClientConfig`](armory_domain::ClientConfig).

pub mod loader;

pub use loader::{load, load_from_env, load_from_file, load_settings, probe_config_paths};
