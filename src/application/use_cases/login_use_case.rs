//! Login use case implementation.

use std::sync::Arc;

use tracing::{debug, warn};

use crate::application::dto::{LoginMode, LoginRequest, LoginResponse};
use crate::application::services::SessionService;
use crate::domain::entities::SecretToken;
use crate::domain::errors::AuthError;

/// Handles the email and password login form.
#[derive(Clone)]
pub struct LoginUseCase {
    session: Arc<SessionService>,
}

impl LoginUseCase {
    /// Creates new login use case.
    #[must_use]
    pub const fn new(session: Arc<SessionService>) -> Self {
        Self { session }
    }

    /// Executes login with provided request.
    ///
    /// # Errors
    /// Returns error if a field is blank or the auth service rejects the
    /// credentials.
    pub async fn execute(&self, request: LoginRequest) -> Result<LoginResponse, AuthError> {
        let email = request.email.trim();
        let password = SecretToken::new(request.password).filter(|_| !email.is_empty());

        let Some(password) = password else {
            warn!("Login form submitted with blank fields");
            return Err(AuthError::MissingCredentials);
        };

        debug!(mode = %request.mode, "Attempting login");

        let user = match request.mode {
            LoginMode::SignIn => self.session.sign_in(email, &password).await?,
            LoginMode::SignUp => self.session.sign_up(email, &password).await?,
        };

        Ok(LoginResponse {
            user,
            mode: request.mode,
        })
    }
}
