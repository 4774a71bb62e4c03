//! In-process token storage.

use async_trait::async_trait;
use stockroom_application::ports::{StorageError, TokenStorage};
use stockroom_domain::TokenPair;
use tokio::sync::Mutex;

/// Keeps the pair in memory only; the session ends with the process.
#[derive(Debug, Default)]
pub struct MemoryTokenStorage {
    tokens: Mutex<Option<TokenPair>>,
}

impl MemoryTokenStorage {
    /// Creates empty storage.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl TokenStorage for MemoryTokenStorage {
    async fn load(&self) -> Result<Option<TokenPair>, StorageError> {
        Ok(self.tokens.lock().await.clone())
    }

    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageError> {
        *self.tokens.lock().await = Some(tokens.clone());
        Ok(())
    }

    async fn clear(&self) -> Result<(), StorageError> {
        self.tokens.lock().await.take();
        Ok(())
    }
}
