//! Token storage port
//!
//! Defines the interface for persisting the session's token pair.

use async_trait::async_trait;
use stockroom_domain::TokenPair;

/// Fixed key under which the token pair is persisted.
pub const TOKEN_STORAGE_KEY: &str = "authTokens";

/// Errors that can occur during token persistence.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(String),
}

/// Durable storage for the current token pair.
///
/// Both tokens are always written together as one record; absence of the
/// record means logged out.
#[async_trait]
pub trait TokenStorage: Send + Sync {
    /// Loads the stored pair, or `None` when logged out.
    ///
    /// # Errors
    /// Returns an error if the record exists but cannot be read or parsed.
    async fn load(&self) -> Result<Option<TokenPair>, StorageError>;

    /// Replaces the stored pair.
    ///
    /// # Errors
    /// Returns an error if the record cannot be written.
    async fn save(&self, tokens: &TokenPair) -> Result<(), StorageError>;

    /// Removes the stored pair. Removing an absent record is not an error.
    ///
    /// # Errors
    /// Returns an error if the record exists but cannot be removed.
    async fn clear(&self) -> Result<(), StorageError>;
}
