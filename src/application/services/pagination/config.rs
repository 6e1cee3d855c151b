//! Fetcher configuration.

use serde::{Deserialize, Serialize};

use crate::domain::entities::CREATED_AT_FIELD;

/// Records per page unless configured otherwise.
pub const DEFAULT_PAGE_SIZE: u32 = 15;

/// What to page through and how.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PagerConfig {
    /// Collection to page through.
    pub collection: String,
    /// Records per page, at least one.
    pub page_size: u32,
    /// Field the pages are ordered by, ascending.
    pub sort_field: String,
    /// Count the collection alongside every page fetch.
    pub refresh_total: bool,
    /// Refuse to query while signed out.
    pub require_auth: bool,
}

impl PagerConfig {
    /// Configuration with default page size, sort field and flags.
    #[must_use]
    pub fn new(collection: impl Into<String>) -> Self {
        Self {
            collection: collection.into(),
            page_size: DEFAULT_PAGE_SIZE,
            sort_field: CREATED_AT_FIELD.to_string(),
            refresh_total: true,
            require_auth: false,
        }
    }

    /// Sets the page size; zero is raised to one.
    #[must_use]
    pub fn with_page_size(mut self, page_size: u32) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Sets the field pages are ordered by.
    #[must_use]
    pub fn with_sort_field(mut self, sort_field: impl Into<String>) -> Self {
        self.sort_field = sort_field.into();
        self
    }

    /// Enables or disables the count query.
    #[must_use]
    pub const fn with_refresh_total(mut self, refresh_total: bool) -> Self {
        self.refresh_total = refresh_total;
        self
    }

    /// Enables or disables the signed-in check.
    #[must_use]
    pub const fn with_require_auth(mut self, require_auth: bool) -> Self {
        self.require_auth = require_auth;
        self
    }
}
