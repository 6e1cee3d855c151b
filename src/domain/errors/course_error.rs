//! Course management error types.

use thiserror::Error;

use super::StoreError;

/// Course management error variants.
#[derive(Debug, Clone, Error)]
#[allow(missing_docs)]
pub enum CourseError {
    #[error("please sign in to manage courses")]
    NotSignedIn,

    /// Checked on the client before the store is called; the store itself
    /// accepts any fields.
    #[error("course {field} is empty (checked locally, nothing was saved)")]
    BlankField { field: &'static str },

    #[error("removed {removed} course(s) before failing: {source}")]
    PartialRemoval {
        removed: usize,
        #[source]
        source: StoreError,
    },

    #[error(transparent)]
    Store(#[from] StoreError),
}
