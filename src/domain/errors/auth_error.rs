//! Authentication error types.

use thiserror::Error;

/// Authentication error variants.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum AuthError {
    #[error("invalid email or password")]
    InvalidCredentials,

    #[error("email and password are required")]
    MissingCredentials,

    #[error("an account already exists for this email")]
    EmailAlreadyInUse,

    #[error("password is too weak: {reason}")]
    WeakPassword { reason: String },

    #[error("session expired or revoked, please sign in again")]
    SessionExpired,

    #[error("not signed in")]
    NotSignedIn,

    #[error("too many attempts, try again later")]
    TooManyAttempts,

    #[error("network error during authentication: {message}")]
    NetworkError { message: String },

    #[error("session storage error: {message}")]
    SessionStorage { message: String },

    #[error("unexpected authentication error: {message}")]
    Unexpected { message: String },
}

impl AuthError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::NetworkError {
            message: message.into(),
        }
    }

    /// Creates session storage error.
    #[must_use]
    pub fn storage(message: impl Into<String>) -> Self {
        Self::SessionStorage {
            message: message.into(),
        }
    }

    /// Creates unexpected error.
    #[must_use]
    pub fn unexpected(message: impl Into<String>) -> Self {
        Self::Unexpected {
            message: message.into(),
        }
    }

    /// Maps an Identity Toolkit error code (e.g. `EMAIL_EXISTS`) to an error.
    #[must_use]
    pub fn from_service_code(code: &str) -> Self {
        let (head, detail) = code
            .split_once(" : ")
            .map_or((code, None), |(head, detail)| (head, Some(detail)));

        match head.trim() {
            "EMAIL_NOT_FOUND" | "INVALID_PASSWORD" | "INVALID_LOGIN_CREDENTIALS"
            | "INVALID_EMAIL" | "USER_DISABLED" | "MISSING_PASSWORD" => Self::InvalidCredentials,
            "EMAIL_EXISTS" => Self::EmailAlreadyInUse,
            "WEAK_PASSWORD" => Self::WeakPassword {
                reason: detail.unwrap_or("password rejected").to_string(),
            },
            "TOKEN_EXPIRED" | "INVALID_REFRESH_TOKEN" | "USER_NOT_FOUND" => Self::SessionExpired,
            "TOO_MANY_ATTEMPTS_TRY_LATER" => Self::TooManyAttempts,
            other => Self::unexpected(other.to_string()),
        }
    }

    /// Returns whether the user can fix the problem by retrying.
    #[must_use]
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::InvalidCredentials
                | Self::MissingCredentials
                | Self::EmailAlreadyInUse
                | Self::WeakPassword { .. }
                | Self::NetworkError { .. }
                | Self::TooManyAttempts
                | Self::SessionExpired
                | Self::NotSignedIn
        )
    }

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::NetworkError { .. } | Self::TooManyAttempts)
    }
}
