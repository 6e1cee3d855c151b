//! Cursor-based pagination over a document store collection.

mod config;
mod fetcher;
mod state;

pub use config::{DEFAULT_PAGE_SIZE, PagerConfig};
pub use fetcher::{AuthGate, CollectionFetcher, PageView, execute_request};
pub use state::{
    ApplyOutcome, FetchState, LoadedPage, Navigation, PageRequest, PageResponse, Pager, RequestId,
    total_pages,
};
