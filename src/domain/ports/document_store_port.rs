//! Document store port definition.

use async_trait::async_trait;

use crate::domain::entities::{Document, DocumentId, DocumentSnapshot, Fields, PageCursor};
use crate::domain::errors::StoreError;

/// Bounded, ordered range query over one collection.
#[derive(Debug, Clone, PartialEq)]
pub struct PageQuery {
    /// Collection to read.
    pub collection: String,
    /// Field results are ordered by, ascending.
    pub order_by: String,
    /// Maximum number of records returned.
    pub limit: u32,
    /// Continue strictly after this position.
    pub start_after: Option<PageCursor>,
}

impl PageQuery {
    /// First page of `collection`.
    #[must_use]
    pub fn new(collection: impl Into<String>, order_by: impl Into<String>, limit: u32) -> Self {
        Self {
            collection: collection.into(),
            order_by: order_by.into(),
            limit,
            start_after: None,
        }
    }

    /// Continues after `cursor`, or from the start when `None`.
    #[must_use]
    pub fn start_after(mut self, cursor: Option<PageCursor>) -> Self {
        self.start_after = cursor;
        self
    }
}

/// Port for the hosted document database.
#[async_trait]
pub trait DocumentStorePort: Send + Sync {
    /// Lists one page of a collection in ascending `order_by` order.
    async fn list_page(&self, query: &PageQuery) -> Result<Vec<DocumentSnapshot>, StoreError>;

    /// Counts every document of a collection.
    async fn count_all(&self, collection: &str) -> Result<u64, StoreError>;

    /// Reads a single document.
    async fn get(&self, collection: &str, id: &DocumentId) -> Result<Document, StoreError>;

    /// Adds a document with a store-generated id.
    async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError>;

    /// Deletes a document.
    async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError>;
}

#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::VecDeque;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
    use std::time::Duration;

    use parking_lot::Mutex;

    use crate::infrastructure::store::MemoryDocumentStore;

    /// In-memory store with failure switches, call counters and latency.
    pub struct MockDocumentStore {
        inner: MemoryDocumentStore,
        fail_list: AtomicBool,
        fail_count: AtomicBool,
        fail_delete_after: Mutex<Option<usize>>,
        list_calls: AtomicUsize,
        count_calls: AtomicUsize,
        list_delays: Mutex<VecDeque<Duration>>,
        queries: Mutex<Vec<PageQuery>>,
    }

    impl MockDocumentStore {
        /// Creates empty mock.
        pub fn new() -> Self {
            Self {
                inner: MemoryDocumentStore::new(),
                fail_list: AtomicBool::new(false),
                fail_count: AtomicBool::new(false),
                fail_delete_after: Mutex::new(None),
                list_calls: AtomicUsize::new(0),
                count_calls: AtomicUsize::new(0),
                list_delays: Mutex::new(VecDeque::new()),
                queries: Mutex::new(Vec::new()),
            }
        }

        /// Creates mock holding `count` courses with increasing `created_at`.
        pub fn with_courses(count: usize) -> Arc<Self> {
            let store = Self::new();
            store.inner.seed_courses(count);
            Arc::new(store)
        }

        pub fn inner(&self) -> &MemoryDocumentStore {
            &self.inner
        }

        pub fn set_fail_list(&self, value: bool) {
            self.fail_list.store(value, Ordering::SeqCst);
        }

        pub fn set_fail_count(&self, value: bool) {
            self.fail_count.store(value, Ordering::SeqCst);
        }

        /// Fails every delete after `successes` successful ones.
        pub fn fail_delete_after(&self, successes: usize) {
            *self.fail_delete_after.lock() = Some(successes);
        }

        /// Queues latencies applied to subsequent `list_page` calls in order.
        pub fn push_list_delay(&self, delay: Duration) {
            self.list_delays.lock().push_back(delay);
        }

        pub fn list_calls(&self) -> usize {
            self.list_calls.load(Ordering::SeqCst)
        }

        pub fn count_calls(&self) -> usize {
            self.count_calls.load(Ordering::SeqCst)
        }

        /// Queries received so far.
        pub fn queries(&self) -> Vec<PageQuery> {
            self.queries.lock().clone()
        }
    }

    impl Default for MockDocumentStore {
        fn default() -> Self {
            Self::new()
        }
    }

    #[async_trait]
    impl DocumentStorePort for MockDocumentStore {
        async fn list_page(&self, query: &PageQuery) -> Result<Vec<DocumentSnapshot>, StoreError> {
            self.list_calls.fetch_add(1, Ordering::SeqCst);
            self.queries.lock().push(query.clone());
            let delay = self.list_delays.lock().pop_front();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }
            if self.fail_list.load(Ordering::SeqCst) {
                return Err(StoreError::network("mock list failure"));
            }
            self.inner.list_page(query).await
        }

        async fn count_all(&self, collection: &str) -> Result<u64, StoreError> {
            self.count_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_count.load(Ordering::SeqCst) {
                return Err(StoreError::network("mock count failure"));
            }
            self.inner.count_all(collection).await
        }

        async fn get(&self, collection: &str, id: &DocumentId) -> Result<Document, StoreError> {
            self.inner.get(collection, id).await
        }

        async fn add(&self, collection: &str, fields: Fields) -> Result<DocumentId, StoreError> {
            self.inner.add(collection, fields).await
        }

        async fn delete(&self, collection: &str, id: &DocumentId) -> Result<(), StoreError> {
            {
                let mut remaining = self.fail_delete_after.lock();
                if let Some(n) = remaining.as_mut() {
                    if *n == 0 {
                        return Err(StoreError::network("mock delete failure"));
                    }
                    *n -= 1;
                }
            }
            self.inner.delete(collection, id).await
        }
    }
}
