//! Authentication port definition.

use async_trait::async_trait;

use crate::domain::entities::{AuthSession, SecretToken};
use crate::domain::errors::AuthError;

/// Port for the managed authentication service.
#[async_trait]
pub trait AuthPort: Send + Sync {
    /// Signs in with email and password.
    async fn sign_in(&self, email: &str, password: &SecretToken) -> Result<AuthSession, AuthError>;

    /// Creates an account and signs it in.
    async fn sign_up(&self, email: &str, password: &SecretToken) -> Result<AuthSession, AuthError>;

    /// Exchanges a refresh token for a fresh session.
    async fn refresh(&self, refresh_token: &SecretToken) -> Result<AuthSession, AuthError>;
}

/// Supplies the bearer token of the signed-in user, if any.
pub trait IdTokenSource: Send + Sync {
    /// Current ID token, `None` while signed out.
    fn id_token(&self) -> Option<SecretToken>;
}
