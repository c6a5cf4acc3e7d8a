use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::debug;

use crate::application::CredentialStore;
use crate::domain::{CredentialKey, DomainError};

pub const CREDENTIALS_FILE_NAME: &str = "credentials.json";

/// Credentials persisted as one flat JSON object keyed by credential name:
///
/// ```json
/// { "chatApiKey": "sk-...", "visionApiKey": "..." }
/// ```
///
/// Writes go through a temporary file and a rename so a crash never leaves a
/// half-written file behind. On Unix the file is created with mode `0600`.
pub struct JsonCredentialStore {
    path: PathBuf,
    /// Serializes read-modify-write cycles within this process.
    write_lock: Mutex<()>,
}

impl JsonCredentialStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            write_lock: Mutex::new(()),
        }
    }

    /// Store rooted at `<data_dir>/credentials.json`.
    pub fn in_dir(data_dir: impl AsRef<Path>) -> Self {
        Self::new(data_dir.as_ref().join(CREDENTIALS_FILE_NAME))
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    async fn read_all(&self) -> Result<BTreeMap<String, String>, DomainError> {
        let contents = match tokio::fs::read_to_string(&self.path).await {
            Ok(contents) => contents,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!("No credentials file at {:?}", self.path);
                return Ok(BTreeMap::new());
            }
            Err(e) => return Err(e.into()),
        };

        if contents.trim().is_empty() {
            return Ok(BTreeMap::new());
        }

        serde_json::from_str(&contents).map_err(|e| {
            DomainError::storage(format!(
                "credentials file {} is not valid JSON: {e}",
                self.path.display()
            ))
        })
    }

    async fn write_all(&self, entries: &BTreeMap<String, String>) -> Result<(), DomainError> {
        if let Some(parent) = self.path.parent() {
            tokio::fs::create_dir_all(parent).await?;
        }

        let contents = serde_json::to_string_pretty(entries)
            .map_err(|e| DomainError::internal(format!("failed to encode credentials: {e}")))?;

        let tmp_path = self.path.with_extension("json.tmp");
        tokio::fs::write(&tmp_path, contents).await?;
        restrict_permissions(&tmp_path).await?;
        tokio::fs::rename(&tmp_path, &self.path).await?;

        debug!("Wrote {} credential(s) to {:?}", entries.len(), self.path);
        Ok(())
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> Result<(), DomainError> {
    use std::os::unix::fs::PermissionsExt;

    tokio::fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await?;
    Ok(())
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> Result<(), DomainError> {
    Ok(())
}

#[async_trait]
impl CredentialStore for JsonCredentialStore {
    async fn get(&self, key: CredentialKey) -> Result<Option<String>, DomainError> {
        let entries = self.read_all().await?;
        Ok(entries.get(key.as_str()).cloned())
    }

    async fn set(&self, key: CredentialKey, value: &str) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        entries.insert(key.as_str().to_string(), value.to_string());
        self.write_all(&entries).await
    }

    async fn clear(&self, key: CredentialKey) -> Result<(), DomainError> {
        let _guard = self.write_lock.lock().await;
        let mut entries = self.read_all().await?;
        if entries.remove(key.as_str()).is_none() {
            return Ok(());
        }
        self.write_all(&entries).await
    }
}
