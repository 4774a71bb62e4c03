//! File-based token storage.
//!
//! The pair is stored as `authTokens.json` in the client's state directory.
//! The file holds credentials and is written with owner-only permissions on
//! Unix.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use stockroom_application::ports::{StorageError, TOKEN_STORAGE_KEY, TokenStorage};
use stockroom_domain::TokenPair;
use tokio::fs;
use tracing::debug;

use crate::serialization::{from_json_bytes, to_json_stable_bytes};

/// Stores the token pair in a single JSON file.
///
/// ```json
/// {
///   "access": "eyJhbGciOi...",
///   "refresh": "eyJhbGciOi..."
/// }
/// ```
#[derive(Debug, Clone)]
pub struct FileTokenStorage {
    path: PathBuf,
}

impl FileTokenStorage {
    /// Uses `path` as the token file.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Uses the standard file name inside `dir`.
    #[must_use]
    pub fn in_dir(dir: &Path) -> Self {
        Self::new(Self::tokens_path(dir))
    }

    /// The token file location.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn tokens_path(dir: &Path) -> PathBuf {
        dir.join(format!("{TOKEN_STORAGE_KEY}.json"))
    }

    fn temp_path(&self) -> PathBuf {
        self.path.with_extension("json.tmp")
    }
}

#[async_trait]
impl TokenStorage for FileTokenStorage {
    async fn load(&self) -> Result<Option<TokenPair>, StorageError> {
        let content = match fs::read(&self.path).await {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StorageError::Io(e)),
        };

        let tokens: TokenPair = from_json_bytes(&content)
            .map_err(|e| StorageError::Serialization(e.to_string()))?;
        debug!(path = %self.path.display(), "loaded token record");
        Ok(Some(tokens))
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).await?;
        }

        let content =
            to_json_stable_bytes(tokens).map_err(|e| StorageError::Serialization(e.to_string()))?;

        // Write then rename so a crash never leaves half a record behind.
        let temp = self.temp_path();
        fs::write(&temp, &content).await?;
        restrict_permissions(&temp).await?;
        fs::rename(&temp, &self.path).await?;
        debug!(path = %self.path.display(), "saved token record");
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        match fs::remove_file(&self.path).await {
            Ok(()) => {
                debug!(path = %self.path.display(), "removed token record");
                Ok(())
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StorageError::Io(e)),
        }
    }
}

#[cfg(unix)]
async fn restrict_permissions(path: &Path) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_path: &Path) -> std::io::Result<()> {
    Ok(())
}
