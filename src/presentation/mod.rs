//! Presentation layer with UI components and event handling.

/// Key event classification.
pub mod events;
/// UI screens and the background worker.
pub mod ui;
/// Reusable widgets.
pub mod widgets;

pub use ui::{App, AppOptions, BackendServices};
