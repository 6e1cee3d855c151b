//! Signed-in session tracking.

use std::sync::Arc;

use parking_lot::RwLock;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::application::services::pagination::AuthGate;
use crate::domain::entities::{AuthSession, SecretToken, User};
use crate::domain::errors::AuthError;
use crate::domain::ports::{AuthPort, IdTokenSource, SessionStoragePort};

/// Handle returned by [`SessionService::on_state_change`]. The callback stops
/// firing once the handle is dropped or [`Subscription::unsubscribe`] is
/// called.
#[must_use = "dropping the subscription unsubscribes immediately"]
pub struct Subscription {
    task: JoinHandle<()>,
}

impl Subscription {
    /// Stops the callback. Dropping the handle does the same.
    pub fn unsubscribe(self) {}
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}

/// Owns the current authentication session and broadcasts sign-in state.
pub struct SessionService {
    auth: Arc<dyn AuthPort>,
    storage: Arc<dyn SessionStoragePort>,
    session: RwLock<Option<AuthSession>>,
    state: watch::Sender<Option<User>>,
    persist: bool,
}

impl SessionService {
    /// Creates a signed-out service that persists refresh tokens.
    #[must_use]
    pub fn new(auth: Arc<dyn AuthPort>, storage: Arc<dyn SessionStoragePort>) -> Self {
        let (state, _) = watch::channel(None);
        Self {
            auth,
            storage,
            session: RwLock::new(None),
            state,
            persist: true,
        }
    }

    /// Controls whether refresh tokens are written to session storage.
    #[must_use]
    pub const fn with_persistence(mut self, persist: bool) -> Self {
        self.persist = persist;
        self
    }

    /// Signs in with email and password.
    ///
    /// # Errors
    /// Returns error if the credentials are rejected or the service is
    /// unreachable.
    pub async fn sign_in(&self, email: &str, password: &SecretToken) -> Result<User, AuthError> {
        debug!(email, "Signing in");
        let session = self.auth.sign_in(email.trim(), password).await.map_err(|e| {
            warn!(error = %e, "Sign in failed");
            e
        })?;
        Ok(self.establish(session).await)
    }

    /// Creates an account and signs it in.
    ///
    /// # Errors
    /// Returns error if the email is taken, the password is too weak or the
    /// service is unreachable.
    pub async fn sign_up(&self, email: &str, password: &SecretToken) -> Result<User, AuthError> {
        debug!(email, "Creating account");
        let session = self.auth.sign_up(email.trim(), password).await.map_err(|e| {
            warn!(error = %e, "Sign up failed");
            e
        })?;
        Ok(self.establish(session).await)
    }

    /// Exchanges a stored refresh token for a fresh session.
    ///
    /// Returns `Ok(None)` when nothing is stored. A revoked token is removed
    /// from storage.
    ///
    /// # Errors
    /// Returns error if storage cannot be read or the token is rejected.
    pub async fn restore(&self) -> Result<Option<User>, AuthError> {
        let Some(token) = self.storage.get_refresh_token().await? else {
            debug!("No stored session");
            return Ok(None);
        };

        match self.auth.refresh(&token).await {
            Ok(session) => {
                let user = self.establish(session).await;
                info!(uid = user.uid(), "Session restored");
                Ok(Some(user))
            }
            Err(AuthError::SessionExpired) => {
                warn!("Stored session revoked, clearing it");
                if let Err(e) = self.storage.delete_refresh_token().await {
                    warn!(error = %e, "Failed to clear revoked session");
                }
                Err(AuthError::SessionExpired)
            }
            Err(e) => Err(e),
        }
    }

    /// Signs out and forgets the stored refresh token.
    ///
    /// Local state is cleared even when the stored token cannot be removed.
    ///
    /// # Errors
    /// Returns error if session storage fails.
    pub async fn sign_out(&self) -> Result<(), AuthError> {
        let previous = self.session.write().take();
        self.state.send_replace(None);
        if let Some(session) = previous {
            info!(uid = session.user.uid(), "Signed out");
        }
        self.storage.delete_refresh_token().await
    }

    /// Receiver of sign-in state changes.
    #[must_use]
    pub fn subscribe(&self) -> AuthGate {
        self.state.subscribe()
    }

    /// Calls `callback` with the current state, then on every change, until
    /// the returned handle is dropped. Must be called inside a tokio runtime.
    pub fn on_state_change<F>(&self, mut callback: F) -> Subscription
    where
        F: FnMut(Option<User>) + Send + 'static,
    {
        let mut receiver = self.state.subscribe();
        let task = tokio::spawn(async move {
            callback(receiver.borrow_and_update().clone());
            while receiver.changed().await.is_ok() {
                callback(receiver.borrow_and_update().clone());
            }
        });
        Subscription { task }
    }

    /// The signed-in user, if any.
    #[must_use]
    pub fn current_user(&self) -> Option<User> {
        self.session.read().as_ref().map(|s| s.user.clone())
    }

    /// Whether somebody is signed in.
    #[must_use]
    pub fn is_signed_in(&self) -> bool {
        self.session.read().is_some()
    }

    /// Bearer token for store requests made on behalf of the user.
    #[must_use]
    pub fn id_token(&self) -> Option<SecretToken> {
        self.session.read().as_ref().map(|s| s.id_token.clone())
    }

    async fn establish(&self, session: AuthSession) -> User {
        let user = session.user.clone();

        if self.persist {
            match self.storage.store_refresh_token(&session.refresh_token).await {
                Ok(()) => debug!("Refresh token persisted"),
                Err(e) => warn!(error = %e, "Failed to persist session"),
            }
        }

        *self.session.write() = Some(session);
        self.state.send_replace(Some(user.clone()));
        info!(uid = user.uid(), email = user.email(), "Signed in");
        user
    }
}

impl IdTokenSource for SessionService {
    fn id_token(&self) -> Option<SecretToken> {
        Self::id_token(self)
    }
}
