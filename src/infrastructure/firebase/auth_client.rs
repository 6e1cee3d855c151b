//! Firebase Identity Toolkit client.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use reqwest::{Client, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use super::dto::{
    ErrorEnvelope, LookupRequest, LookupResponse, PasswordRequest, PasswordResponse,
    RefreshRequest, RefreshResponse,
};
use super::{USER_AGENT, http_client};
use crate::domain::entities::{AuthSession, SecretToken, User};
use crate::domain::errors::AuthError;
use crate::domain::ports::AuthPort;

const IDENTITY_TOOLKIT_BASE: &str = "https://identitytoolkit.googleapis.com/v1";
const SECURE_TOKEN_BASE: &str = "https://securetoken.googleapis.com/v1";

/// Email and password authentication against Firebase.
pub struct FirebaseAuthClient {
    client: Client,
    api_key: String,
    identity_base: String,
    token_base: String,
}

impl FirebaseAuthClient {
    /// Creates a client for the project owning `api_key`.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn new(api_key: impl Into<String>) -> Result<Self, AuthError> {
        Self::with_base_urls(api_key, IDENTITY_TOOLKIT_BASE, SECURE_TOKEN_BASE)
    }

    /// Creates a client against custom endpoints, e.g. the auth emulator.
    ///
    /// # Errors
    /// Returns error if HTTP client creation fails.
    pub fn with_base_urls(
        api_key: impl Into<String>,
        identity_base: impl Into<String>,
        token_base: impl Into<String>,
    ) -> Result<Self, AuthError> {
        let client = http_client()
            .map_err(|e| AuthError::unexpected(format!("failed to create HTTP client: {e}")))?;

        Ok(Self {
            client,
            api_key: api_key.into(),
            identity_base: identity_base.into(),
            token_base: token_base.into(),
        })
    }

    async fn post<B, R>(&self, url: &str, body: &B) -> Result<R, AuthError>
    where
        B: Serialize + Sync,
        R: DeserializeOwned,
    {
        let response = self
            .client
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .header(reqwest::header::USER_AGENT, USER_AGENT)
            .json(body)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Failed to reach auth service");
                if e.is_timeout() {
                    AuthError::network("request timed out")
                } else if e.is_connect() {
                    AuthError::network("failed to connect to the auth service")
                } else {
                    AuthError::network(e.to_string())
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Self::handle_error_response(status, response).await);
        }

        response.json().await.map_err(|e| {
            warn!(error = %e, "Failed to parse auth response");
            AuthError::unexpected(format!("failed to parse response: {e}"))
        })
    }

    async fn handle_error_response(status: StatusCode, response: reqwest::Response) -> AuthError {
        match response.json::<ErrorEnvelope>().await {
            Ok(envelope) => {
                debug!(
                    code = envelope.error.code,
                    status = envelope.error.status.as_deref().unwrap_or_default(),
                    message = %envelope.error.message,
                    "Auth service error"
                );
                AuthError::from_service_code(&envelope.error.message)
            }
            Err(_) if status == StatusCode::TOO_MANY_REQUESTS => AuthError::TooManyAttempts,
            Err(_) if status.is_server_error() => {
                AuthError::network("auth service is temporarily unavailable")
            }
            Err(_) => AuthError::unexpected(format!("unexpected response: {status}")),
        }
    }

    async fn password_flow(
        &self,
        endpoint: &str,
        email: &str,
        password: &SecretToken,
    ) -> Result<AuthSession, AuthError> {
        let url = format!("{}/accounts:{endpoint}", self.identity_base);
        let body = PasswordRequest {
            email,
            password: password.as_str(),
            return_secure_token: true,
        };

        let response: PasswordResponse = self.post(&url, &body).await?;
        let email = if response.email.is_empty() {
            email.to_string()
        } else {
            response.email
        };

        session_from_parts(
            User::new(response.local_id, email),
            &response.id_token,
            &response.refresh_token,
            &response.expires_in,
        )
    }

    async fn lookup(&self, id_token: &str) -> Result<User, AuthError> {
        let url = format!("{}/accounts:lookup", self.identity_base);
        let response: LookupResponse = self.post(&url, &LookupRequest { id_token }).await?;
        response
            .users
            .into_iter()
            .next()
            .map(|user| User::new(user.local_id, user.email))
            .ok_or(AuthError::SessionExpired)
    }
}

fn session_from_parts(
    user: User,
    id_token: &str,
    refresh_token: &str,
    expires_in: &str,
) -> Result<AuthSession, AuthError> {
    let id_token = SecretToken::new(id_token)
        .ok_or_else(|| AuthError::unexpected("auth service returned an empty id token"))?;
    let refresh_token = SecretToken::new(refresh_token)
        .ok_or_else(|| AuthError::unexpected("auth service returned an empty refresh token"))?;
    let lifetime = expires_in.trim().parse::<i64>().unwrap_or(3600);

    Ok(AuthSession::new(
        user,
        id_token,
        refresh_token,
        Utc::now() + Duration::seconds(lifetime),
    ))
}

#[async_trait]
impl AuthPort for FirebaseAuthClient {
    async fn sign_in(&self, email: &str, password: &SecretToken) -> Result<AuthSession, AuthError> {
        debug!("Signing in with password");
        self.password_flow("signInWithPassword", email, password).await
    }

    async fn sign_up(&self, email: &str, password: &SecretToken) -> Result<AuthSession, AuthError> {
        debug!("Creating account");
        self.password_flow("signUp", email, password).await
    }

    async fn refresh(&self, refresh_token: &SecretToken) -> Result<AuthSession, AuthError> {
        let url = format!("{}/token", self.token_base);
        let body = RefreshRequest {
            grant_type: "refresh_token",
            refresh_token: refresh_token.as_str(),
        };

        let response: RefreshResponse = self.post(&url, &body).await?;
        let user = self.lookup(&response.id_token).await?;
        if user.uid() != response.user_id {
            warn!("Refreshed token belongs to a different account");
            return Err(AuthError::SessionExpired);
        }

        session_from_parts(
            user,
            &response.id_token,
            &response.refresh_token,
            &response.expires_in,
        )
    }
}
