//! File-backed credential store
//!
//! Persists the [`CredentialRecord`] as JSON. Writes go to a uniquely named
//! temporary file in the same directory which is synced and then renamed
//! over the target, so readers in this or another process never observe a
//! partially written record. A missing or unreadable file loads as "no
//! record".

use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use armory_core::CredentialStore;
use armory_domain::constants::{TOKEN_CACHE_DIR, TOKEN_CACHE_ID_HEX_LEN};
use armory_domain::{ArmoryError, CredentialRecord, Region, Result};
use async_trait::async_trait;
use sha2::{Digest, Sha256};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::{debug, instrument, warn};

use crate::errors::InfraError;

static TEMP_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Credential store backed by a single JSON file
#[derive(Debug, Clone)]
pub struct FileCredentialStore {
    path: PathBuf,
}

impl FileCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store at the default per-identity location for `region`/`client_id`
    pub fn for_identity(region: Region, client_id: &str) -> Self {
        Self::new(default_cache_path(region, client_id))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let file_name = self
            .path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_else(|| "token".to_string());
        let unique = TEMP_COUNTER.fetch_add(1, Ordering::Relaxed);
        self.path.with_file_name(format!(".{file_name}.{}.{unique}.tmp", std::process::id()))
    }

    async fn write_atomically(&self, data: &[u8]) -> Result<()> {
        let temp_path = self.temp_path();

        if let Some(parent) = temp_path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(io_error)?;
        }

        let write = async {
            let mut file = fs::OpenOptions::new()
                .write(true)
                .create(true)
                .truncate(true)
                .open(&temp_path)
                .await?;
            file.write_all(data).await?;
            file.sync_all().await?;
            drop(file);
            fs::rename(&temp_path, &self.path).await
        };

        if let Err(err) = write.await {
            fs::remove_file(&temp_path).await.ok();
            return Err(io_error(err));
        }
        Ok(())
    }
}

#[async_trait]
impl CredentialStore for FileCredentialStore {
    #[instrument(skip(self), fields(path = %self.path.display()))]
    async fn load(&self) -> Option<CredentialRecord> {
        let data = match fs::read(&self.path).await {
            Ok(data) => data,
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => {
                debug!("No token cache file");
                return None;
            }
            Err(err) => {
                warn!(error = %err, "Token cache unreadable; treating as empty");
                return None;
            }
        };

        match serde_json::from_slice::<CredentialRecord>(&data) {
            Ok(record) => Some(record),
            Err(err) => {
                warn!(error = %err, "Token cache corrupt; treating as empty");
                None
            }
        }
    }

    #[instrument(skip(self, record), fields(path = %self.path.display()))]
    async fn save(&self, record: &CredentialRecord) -> Result<()> {
        let data = serde_json::to_vec(record).map_err(|err| ArmoryError::from(InfraError::from(err)))?;
        self.write_atomically(&data).await?;
        debug!(expires_at = %record.expires_at, "Token cache written");
        Ok(())
    }
}

/// Default token cache location for one client identity.
///
/// `<temp dir>/armory/token-<region>-<hash>.json`, where the hash is a
/// prefix of the SHA-256 of the client id, so identities never share a file.
pub fn default_cache_path(region: Region, client_id: &str) -> PathBuf {
    let digest = hex::encode(Sha256::digest(client_id.as_bytes()));
    let id = &digest[..TOKEN_CACHE_ID_HEX_LEN];
    std::env::temp_dir().join(TOKEN_CACHE_DIR).join(format!("token-{region}-{id}.json"))
}

fn io_error(err: std::io::Error) -> ArmoryError {
    InfraError::from(err).into()
}
