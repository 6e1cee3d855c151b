//! Authentication DTOs.

use crate::domain::entities::User;

/// Whether the login form signs in or creates an account.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginMode {
    /// Existing account.
    #[default]
    SignIn,
    /// New account.
    SignUp,
}

impl LoginMode {
    /// Returns human-readable description.
    #[must_use]
    pub const fn description(&self) -> &'static str {
        match self {
            Self::SignIn => "sign in",
            Self::SignUp => "create account",
        }
    }

    /// The other mode.
    #[must_use]
    pub const fn toggled(self) -> Self {
        match self {
            Self::SignIn => Self::SignUp,
            Self::SignUp => Self::SignIn,
        }
    }
}

impl std::fmt::Display for LoginMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.description())
    }
}

/// Login form data.
#[derive(Debug, Clone)]
pub struct LoginRequest {
    /// Account email.
    pub email: String,
    /// Raw password; wrapped in a zeroizing secret before use.
    pub password: String,
    /// Sign in or create an account.
    pub mode: LoginMode,
}

impl LoginRequest {
    /// Creates a sign-in request.
    #[must_use]
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
            mode: LoginMode::SignIn,
        }
    }

    /// Switches between sign-in and sign-up.
    #[must_use]
    pub const fn with_mode(mut self, mode: LoginMode) -> Self {
        self.mode = mode;
        self
    }
}

/// Login response data.
#[derive(Debug, Clone)]
pub struct LoginResponse {
    /// Authenticated user.
    pub user: User,
    /// Mode that succeeded.
    pub mode: LoginMode,
}
