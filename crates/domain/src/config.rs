//! Client configuration
//!
//! [`ClientSettings`] is the loose, serde-friendly form read from the
//! environment or a config file. [`ClientConfig`] is the validated, immutable
//! form a client is constructed from; building one fails with
//! [`ArmoryError::Config`] when the region or locale is not a member of its
//! fixed enumeration.

use std::fmt;
use std::path::PathBuf;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::constants::{
    DEFAULT_REQUEST_TIMEOUT_SECS, DEFAULT_RETRY_ATTEMPTS, DEFAULT_TOKEN_SAFETY_MARGIN_SECS,
    MIN_TOKEN_SAFETY_MARGIN_SECS,
};
use crate::errors::{ArmoryError, Result};
use crate::impl_code_conversions;

/// Service region
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Region {
    Us,
    Eu,
    Kr,
    Tw,
}

impl_code_conversions!(Region {
    Us => "us",
    Eu => "eu",
    Kr => "kr",
    Tw => "tw",
});

impl Region {
    /// Default game-data base URL for this region.
    pub fn api_base_url(&self) -> String {
        format!("https://{}.api.blizzard.com/wow", self.as_str())
    }

    /// Default OAuth token endpoint for this region.
    pub fn auth_url(&self) -> String {
        format!("https://{}.battle.net/oauth/token", self.as_str())
    }
}

/// Response locale
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Locale {
    #[default]
    EnUs,
    EsMx,
    PtBr,
    DeDe,
    EsEs,
    FrFr,
    ItIt,
    PtPt,
    RuRu,
    KoKr,
    ZhTw,
    ZhCn,
}

impl_code_conversions!(exact Locale {
    EnUs => "en_US",
    EsMx => "es_MX",
    PtBr => "pt_BR",
    DeDe => "de_DE",
    EsEs => "es_ES",
    FrFr => "fr_FR",
    ItIt => "it_IT",
    PtPt => "pt_PT",
    RuRu => "ru_RU",
    KoKr => "ko_KR",
    ZhTw => "zh_TW",
    ZhCn => "zh_CN",
});

/// Raw settings as they appear in env vars or config files
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ClientSettings {
    pub client_id: String,
    pub client_secret: String,
    #[serde(default = "default_region")]
    pub region: String,
    #[serde(default = "default_locale")]
    pub locale: String,
    #[serde(default)]
    pub api_base_url: Option<String>,
    #[serde(default)]
    pub auth_url: Option<String>,
    #[serde(default)]
    pub token_cache_path: Option<PathBuf>,
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    #[serde(default)]
    pub retry_attempts: Option<usize>,
    #[serde(default)]
    pub max_concurrency: Option<usize>,
    #[serde(default)]
    pub token_safety_margin_secs: Option<i64>,
}

fn default_region() -> String {
    Region::Us.as_str().to_string()
}

fn default_locale() -> String {
    Locale::EnUs.as_str().to_string()
}

/// Validated client configuration, immutable once a client holds it
#[derive(Clone)]
pub struct ClientConfig {
    pub region: Region,
    pub locale: Locale,
    pub client_id: String,
    pub client_secret: String,
    pub api_base_url: String,
    pub auth_url: String,
    /// `None` selects the per-identity default cache file.
    pub token_cache_path: Option<PathBuf>,
    pub request_timeout: Duration,
    pub retry_attempts: usize,
    /// `None` means one worker per pending batch invocation.
    pub max_concurrency: Option<usize>,
    pub token_safety_margin_secs: i64,
}

impl ClientConfig {
    /// Build a configuration from credentials plus region/locale codes.
    ///
    /// # Errors
    ///
    /// Returns [`ArmoryError::Config`] if the region or locale is unknown or a
    /// credential is blank.
    pub fn new(
        client_id: impl Into<String>,
        client_secret: impl Into<String>,
        region: &str,
        locale: &str,
    ) -> Result<Self> {
        let region: Region = region.parse().map_err(ArmoryError::Config)?;
        let locale: Locale = locale.parse().map_err(ArmoryError::Config)?;
        let client_id = client_id.into();
        let client_secret = client_secret.into();

        if client_id.trim().is_empty() || client_secret.trim().is_empty() {
            return Err(ArmoryError::Config("client id and secret must not be empty".into()));
        }

        Ok(Self {
            region,
            locale,
            client_id,
            client_secret,
            api_base_url: region.api_base_url(),
            auth_url: region.auth_url(),
            token_cache_path: None,
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry_attempts: DEFAULT_RETRY_ATTEMPTS,
            max_concurrency: None,
            token_safety_margin_secs: DEFAULT_TOKEN_SAFETY_MARGIN_SECS,
        })
    }

    /// Point resource requests at a different base URL.
    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into().trim_end_matches('/').to_string();
        self
    }

    /// Point token exchanges at a different endpoint.
    pub fn with_auth_url(mut self, url: impl Into<String>) -> Self {
        self.auth_url = url.into();
        self
    }

    pub fn with_token_cache_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.token_cache_path = Some(path.into());
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_retry_attempts(mut self, attempts: usize) -> Self {
        self.retry_attempts = attempts.max(1);
        self
    }

    pub fn with_max_concurrency(mut self, limit: Option<usize>) -> Self {
        self.max_concurrency = limit.filter(|n| *n > 0);
        self
    }

    /// Margin below one second is raised to one second.
    pub fn with_token_safety_margin_secs(mut self, secs: i64) -> Self {
        self.token_safety_margin_secs = secs.max(MIN_TOKEN_SAFETY_MARGIN_SECS);
        self
    }
}

impl TryFrom<ClientSettings> for ClientConfig {
    type Error = ArmoryError;

    fn try_from(settings: ClientSettings) -> Result<Self> {
        let mut config = Self::new(
            settings.client_id,
            settings.client_secret,
            &settings.region,
            &settings.locale,
        )?;

        if let Some(url) = settings.api_base_url {
            config = config.with_api_base_url(url);
        }
        if let Some(url) = settings.auth_url {
            config = config.with_auth_url(url);
        }
        if let Some(path) = settings.token_cache_path {
            config = config.with_token_cache_path(path);
        }
        if let Some(secs) = settings.request_timeout_secs {
            config = config.with_request_timeout(Duration::from_secs(secs));
        }
        if let Some(attempts) = settings.retry_attempts {
            config = config.with_retry_attempts(attempts);
        }
        if let Some(margin) = settings.token_safety_margin_secs {
            config = config.with_token_safety_margin_secs(margin);
        }

        Ok(config.with_max_concurrency(settings.max_concurrency))
    }
}

impl fmt::Debug for ClientConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientConfig")
            .field("region", &self.region)
            .field("locale", &self.locale)
            .field("client_id", &self.client_id)
            .field("client_secret", &"<redacted>")
            .field("api_base_url", &self.api_base_url)
            .field("auth_url", &self.auth_url)
            .field("token_cache_path", &self.token_cache_path)
            .field("request_timeout", &self.request_timeout)
            .field("retry_attempts", &self.retry_attempts)
            .field("max_concurrency", &self.max_concurrency)
            .field("token_safety_margin_secs", &self.token_safety_margin_secs)
            .finish()
    }
}
