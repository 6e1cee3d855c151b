//! Keyring-based session storage.

use async_trait::async_trait;
use keyring::Entry;
use tracing::{debug, warn};

use crate::domain::entities::SecretToken;
use crate::domain::errors::AuthError;
use crate::domain::ports::SessionStoragePort;

const KEYRING_SERVICE: &str = "campusdesk";
const KEYRING_USER: &str = "refresh-token";

/// Keeps the refresh token in the system keyring.
pub struct KeyringSessionStorage {
    service: String,
    user: String,
}

impl KeyringSessionStorage {
    /// Creates new storage with default names.
    #[must_use]
    pub fn new() -> Self {
        Self::with_names(KEYRING_SERVICE, KEYRING_USER)
    }

    /// Creates storage with custom names.
    #[must_use]
    pub fn with_names(service: impl Into<String>, user: impl Into<String>) -> Self {
        Self {
            service: service.into(),
            user: user.into(),
        }
    }

    fn entry(&self) -> Result<Entry, AuthError> {
        Entry::new(&self.service, &self.user)
            .map_err(|e| AuthError::storage(format!("failed to access keyring: {e}")))
    }
}

impl Default for KeyringSessionStorage {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SessionStoragePort for KeyringSessionStorage {
    async fn get_refresh_token(&self) -> Result<Option<SecretToken>, AuthError> {
        debug!(service = %self.service, "Reading session from keyring");

        match self.entry()?.get_password() {
            Ok(token) => Ok(SecretToken::new(token)),
            Err(keyring::Error::NoEntry) => {
                debug!("No session stored in keyring");
                Ok(None)
            }
            Err(e) => {
                warn!(error = %e, "Failed to read session from keyring");
                Err(AuthError::storage(e.to_string()))
            }
        }
    }

    async fn store_refresh_token(&self, token: &SecretToken) -> Result<(), AuthError> {
        self.entry()?.set_password(token.as_str()).map_err(|e| {
            warn!(error = %e, "Failed to store session in keyring");
            AuthError::storage(e.to_string())
        })
    }

    async fn delete_refresh_token(&self) -> Result<(), AuthError> {
        match self.entry()?.delete_credential() {
            Ok(()) | Err(keyring::Error::NoEntry) => Ok(()),
            Err(e) => {
                warn!(error = %e, "Failed to delete session from keyring");
                Err(AuthError::storage(e.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    #[ignore = "requires system keyring"]
    async fn test_store_and_retrieve_session() {
        let storage = KeyringSessionStorage::with_names("campusdesk-test", "refresh-token");
        let token = SecretToken::new_unchecked("AMf-vBx_refresh_token_value");

        storage.store_refresh_token(&token).await.unwrap();
        let retrieved = storage.get_refresh_token().await.unwrap();
        assert_eq!(retrieved.as_ref().map(SecretToken::as_str), Some(token.as_str()));

        storage.delete_refresh_token().await.unwrap();
        assert!(!storage.has_refresh_token().await.unwrap());
    }
}
