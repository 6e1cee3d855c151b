//! Domain layer with core business entities and port definitions.

/// Entity definitions.
pub mod entities;
/// Error types.
pub mod errors;
/// Port definitions.
pub mod ports;

pub use entities::{AuthSession, Course, Document, DocumentId, PageCursor, User};
pub use errors::{AuthError, StoreError};
pub use ports::{AuthPort, DocumentStorePort, SessionStoragePort};
