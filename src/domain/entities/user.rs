//! Signed-in user entity.

use serde::{Deserialize, Serialize};

/// Account of the signed-in user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct User {
    uid: String,
    email: String,
}

impl User {
    /// Creates a user.
    #[must_use]
    pub fn new(uid: impl Into<String>, email: impl Into<String>) -> Self {
        Self {
            uid: uid.into(),
            email: email.into(),
        }
    }

    /// Returns the account id.
    #[must_use]
    pub fn uid(&self) -> &str {
        &self.uid
    }

    /// Returns the account email.
    #[must_use]
    pub fn email(&self) -> &str {
        &self.email
    }

    /// Returns the name shown in the UI.
    #[must_use]
    pub fn display_name(&self) -> &str {
        if self.email.is_empty() {
            &self.uid
        } else {
            &self.email
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_name_prefers_email() {
        assert_eq!(User::new("u1", "ada@uni.edu").display_name(), "ada@uni.edu");
        assert_eq!(User::new("u1", "").display_name(), "u1");
    }
}
