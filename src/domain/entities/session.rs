//! Authentication session value objects.

use std::fmt;

use chrono::{DateTime, Utc};
use zeroize::{Zeroize, ZeroizeOnDrop};

use super::User;

/// Secret string (token or password) wiped from memory on drop.
#[derive(Clone, PartialEq, Eq, Zeroize, ZeroizeOnDrop)]
pub struct SecretToken {
    value: String,
}

impl SecretToken {
    /// Creates a secret, trimming surrounding whitespace. Returns `None` when
    /// the value is empty.
    #[must_use]
    pub fn new(value: impl Into<String>) -> Option<Self> {
        let value = value.into().trim().to_string();
        if value.is_empty() {
            return None;
        }
        Some(Self { value })
    }

    /// Creates a secret without validation.
    #[must_use]
    pub fn new_unchecked(value: impl Into<String>) -> Self {
        Self {
            value: value.into(),
        }
    }

    /// Returns the secret as string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.value
    }

    /// Returns masked secret for display.
    #[must_use]
    pub fn masked(&self) -> String {
        if self.value.len() <= 10 {
            return "*".repeat(self.value.len());
        }

        let visible_prefix = &self.value[..4];
        let visible_suffix = &self.value[self.value.len() - 4..];
        format!("{visible_prefix}...{visible_suffix}")
    }
}

impl fmt::Debug for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretToken")
            .field("value", &self.masked())
            .finish()
    }
}

impl fmt::Display for SecretToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.masked())
    }
}

/// An authenticated session issued by the auth service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSession {
    /// Signed-in account.
    pub user: User,
    /// Short-lived bearer token for store requests.
    pub id_token: SecretToken,
    /// Long-lived token used to mint new id tokens.
    pub refresh_token: SecretToken,
    /// When the id token stops being accepted.
    pub expires_at: DateTime<Utc>,
}

impl AuthSession {
    /// Creates a session.
    #[must_use]
    pub const fn new(
        user: User,
        id_token: SecretToken,
        refresh_token: SecretToken,
        expires_at: DateTime<Utc>,
    ) -> Self {
        Self {
            user,
            id_token,
            refresh_token,
            expires_at,
        }
    }

    /// Returns whether the id token has expired at `now`.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        now >= self.expires_at
    }
}
