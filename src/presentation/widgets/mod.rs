mod header_bar;
mod input;
mod pagination_bar;
mod status_bar;

pub use header_bar::{HeaderBar, Tab};
pub use input::TextInput;
pub use pagination_bar::PaginationBar;
pub use status_bar::{StatusBar, StatusLevel, StatusMessage};
