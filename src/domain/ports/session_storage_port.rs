//! Session storage port definition.

use async_trait::async_trait;

use crate::domain::entities::SecretToken;
use crate::domain::errors::AuthError;

/// Port for persisting the refresh token between runs.
#[async_trait]
pub trait SessionStoragePort: Send + Sync {
    /// Retrieves the stored refresh token.
    async fn get_refresh_token(&self) -> Result<Option<SecretToken>, AuthError>;

    /// Stores the refresh token securely.
    async fn store_refresh_token(&self, token: &SecretToken) -> Result<(), AuthError>;

    /// Deletes the stored refresh token.
    async fn delete_refresh_token(&self) -> Result<(), AuthError>;

    /// Checks if a refresh token exists.
    async fn has_refresh_token(&self) -> Result<bool, AuthError> {
        Ok(self.get_refresh_token().await?.is_some())
    }
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::sync::Arc;
    use tokio::sync::RwLock;

    /// Mock session storage for testing.
    pub struct MockSessionStorage {
        token: Arc<RwLock<Option<SecretToken>>>,
    }

    impl MockSessionStorage {
        /// Creates empty mock storage.
        pub fn new() -> Self {
            Self {
                token: Arc::new(RwLock::new(None)),
            }
        }

        /// Creates mock storage with token.
        pub fn with_token(token: SecretToken) -> Self {
            Self {
                token: Arc::new(RwLock::new(Some(token))),
            }
        }
    }

    impl Default for MockSessionStorage {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl SessionStoragePort for MockSessionStorage {
        async fn get_refresh_token(&self) -> Result<Option<SecretToken>, AuthError> {
            Ok(self.token.read().await.clone())
        }

        async fn store_refresh_token(&self, token: &SecretToken) -> Result<(), AuthError> {
            *self.token.write().await = Some(token.clone());
            Ok(())
        }

        async fn delete_refresh_token(&self) -> Result<(), AuthError> {
            *self.token.write().await = None;
            Ok(())
        }
    }
}
