//! Library constants
//!
//! Centralized location for defaults shared by the core logic and the
//! adapters.

// Token lifecycle
pub const DEFAULT_TOKEN_SAFETY_MARGIN_SECS: i64 = 5;
pub const MIN_TOKEN_SAFETY_MARGIN_SECS: i64 = 1;
pub const CLIENT_CREDENTIALS_GRANT: &str = "client_credentials";

// Transport
pub const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;
pub const DEFAULT_RETRY_ATTEMPTS: usize = 1;
pub const USER_AGENT: &str = concat!("armory/", env!("CARGO_PKG_VERSION"));

// Query keys understood by the remote service
pub const LOCALE_QUERY_KEY: &str = "locale";
pub const FIELDS_QUERY_KEY: &str = "fields";

// Token cache
pub const TOKEN_CACHE_DIR: &str = "armory";
pub const TOKEN_CACHE_ID_HEX_LEN: usize = 16;
