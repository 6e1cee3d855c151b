//! Document store error types.

use thiserror::Error;

/// Document store error variants.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[allow(missing_docs)]
pub enum StoreError {
    #[error("network error talking to the document store: {message}")]
    Network { message: String },

    #[error("document {collection}/{id} not found")]
    NotFound { collection: String, id: String },

    #[error("permission denied: {message}")]
    PermissionDenied { message: String },

    #[error("sign in required")]
    Unauthenticated,

    #[error("invalid response from the document store: {message}")]
    InvalidResponse { message: String },

    #[error("unexpected document store error: {message}")]
    Unexpected { message: String },
}

impl StoreError {
    /// Creates network error.
    #[must_use]
    pub fn network(message: impl Into<String>) -> Self {
        Self::Network {
            message: message.into(),
        }
    }

    /// Creates not found error.
    #[must_use]
    pub fn not_found(collection: impl Into<String>, id: impl Into<String>) -> Self {
        Self::NotFound {
            collection: collection.into(),
            id: id.into(),
        }
    }

    /// Creates invalid response error.
    #[must_use]
    pub fn invalid_response(message: impl Into<String>) -> Self {
        Self::InvalidResponse {
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

    /// Returns whether error is network related.
    #[must_use]
    pub const fn is_network_error(&self) -> bool {
        matches!(self, Self::Network { .. })
    }
}
