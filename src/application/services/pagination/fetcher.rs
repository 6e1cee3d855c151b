//! Async driver tying a [`Pager`] to a document store.

use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::watch;
use tracing::{debug, instrument};

use super::config::PagerConfig;
use super::state::{ApplyOutcome, Navigation, PageRequest, PageResponse, Pager};
use crate::domain::entities::{FromDocument, User};
use crate::domain::errors::StoreError;
use crate::domain::ports::DocumentStorePort;

/// Signed-in state consulted before querying on behalf of the user.
pub type AuthGate = watch::Receiver<Option<User>>;

/// Runs one page request: the page query and, when asked for, the collection
/// count, concurrently.
///
/// A request that requires authentication fails with
/// [`StoreError::Unauthenticated`] without touching the store when the gate
/// reports no user.
#[instrument(skip(store, auth, request), fields(request_id = %request.id, page = request.page_index))]
pub async fn execute_request(
    store: &dyn DocumentStorePort,
    auth: Option<&AuthGate>,
    request: &PageRequest,
) -> PageResponse {
    if request.require_auth {
        let signed_in = auth.is_some_and(|gate| gate.borrow().is_some());
        if !signed_in {
            debug!("Refusing page query while signed out");
            return PageResponse::failed(request, StoreError::Unauthenticated);
        }
    }

    let page = store.list_page(&request.query);
    if request.count_total {
        let (page, total) = tokio::join!(page, store.count_all(&request.query.collection));
        PageResponse {
            id: request.id,
            page,
            total: Some(total),
        }
    } else {
        PageResponse {
            id: request.id,
            page: page.await,
            total: None,
        }
    }
}

/// Read-only copy of the fetcher state for rendering.
#[derive(Debug, Clone, PartialEq)]
pub struct PageView<T> {
    /// Records of the visible page.
    pub items: Vec<T>,
    /// A request is outstanding.
    pub loading: bool,
    /// Failure of the latest request.
    pub error: Option<StoreError>,
    /// 1-based index of the visible page.
    pub current_page: u32,
    /// `ceil(total / page_size)`; 0 while unknown.
    pub total_pages: u32,
    /// The visible page came back full.
    pub has_more: bool,
    /// The visible page is past page 1.
    pub has_previous: bool,
}

impl<T> Default for PageView<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            loading: false,
            error: None,
            current_page: 1,
            total_pages: 0,
            has_more: false,
            has_previous: false,
        }
    }
}

/// Paginated view of one collection, shared between the UI and the worker
/// that performs the queries.
pub struct CollectionFetcher<T> {
    store: Arc<dyn DocumentStorePort>,
    auth: Option<AuthGate>,
    pager: Mutex<Pager<T>>,
}

impl<T: FromDocument + Clone + Send> CollectionFetcher<T> {
    /// Creates an idle fetcher. Call [`CollectionFetcher::load`] to fetch
    /// page 1.
    #[must_use]
    pub fn new(store: Arc<dyn DocumentStorePort>, config: PagerConfig) -> Self {
        Self {
            store,
            auth: None,
            pager: Mutex::new(Pager::new(config)),
        }
    }

    /// Attaches the signed-in state consulted when `require_auth` is set.
    #[must_use]
    pub fn with_auth_gate(mut self, gate: AuthGate) -> Self {
        self.auth = Some(gate);
        self
    }

    /// Fetches page 1, resetting the cursor stack.
    pub async fn load(&self) -> Option<ApplyOutcome> {
        self.navigate(Navigation::First).await
    }

    /// Advances one page when the current page was full.
    pub async fn fetch_next_page(&self) -> Option<ApplyOutcome> {
        self.navigate(Navigation::Next).await
    }

    /// Goes back one page.
    pub async fn fetch_prev_page(&self) -> Option<ApplyOutcome> {
        self.navigate(Navigation::Previous).await
    }

    /// Re-queries the current page.
    pub async fn refresh(&self) -> Option<ApplyOutcome> {
        self.navigate(Navigation::Refresh).await
    }

    /// Begins and completes a navigation. `None` when it was a no-op.
    pub async fn navigate(&self, navigation: Navigation) -> Option<ApplyOutcome> {
        let request = self.begin(navigation)?;
        Some(self.complete(&request).await)
    }

    /// Marks a navigation as in flight and returns the request to run.
    ///
    /// Split from [`CollectionFetcher::complete`] so callers can publish the
    /// loading state before the network round trip.
    pub fn begin(&self, navigation: Navigation) -> Option<PageRequest> {
        self.pager.lock().begin(navigation)
    }

    /// Runs a request obtained from [`CollectionFetcher::begin`] and applies
    /// its response.
    pub async fn complete(&self, request: &PageRequest) -> ApplyOutcome {
        let response = execute_request(self.store.as_ref(), self.auth.as_ref(), request).await;
        self.pager.lock().apply(response)
    }

    /// Snapshot of the current state.
    #[must_use]
    pub fn view(&self) -> PageView<T> {
        let pager = self.pager.lock();
        PageView {
            items: pager.items().to_vec(),
            loading: pager.is_loading(),
            error: pager.error().cloned(),
            current_page: pager.current_page(),
            total_pages: pager.total_pages(),
            has_more: pager.has_more(),
            has_previous: pager.has_previous(),
        }
    }

    /// Records of the visible page.
    #[must_use]
    pub fn items(&self) -> Vec<T> {
        self.pager.lock().items().to_vec()
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub fn loading(&self) -> bool {
        self.pager.lock().is_loading()
    }

    /// Failure of the latest request, if it failed.
    #[must_use]
    pub fn error(&self) -> Option<StoreError> {
        self.pager.lock().error().cloned()
    }

    /// 1-based index of the visible page.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.pager.lock().current_page()
    }

    /// Total page count, 0 while unknown.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.pager.lock().total_pages()
    }

    /// Whether another page may follow.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.pager.lock().has_more()
    }

    /// The configuration this fetcher was built with.
    #[must_use]
    pub fn config(&self) -> PagerConfig {
        self.pager.lock().config().clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    use crate::domain::entities::{COURSES_COLLECTION, Course};
    use crate::domain::ports::mocks::MockDocumentStore;

    fn fetcher(store: &Arc<MockDocumentStore>, page_size: u32) -> CollectionFetcher<Course> {
        let config = PagerConfig::new(COURSES_COLLECTION).with_page_size(page_size);
        CollectionFetcher::new(store.clone(), config)
    }

    fn titles(fetcher: &CollectionFetcher<Course>) -> Vec<String> {
        fetcher
            .items()
            .iter()
            .map(|c| c.title().to_string())
            .collect()
    }

    #[tokio::test]
    async fn test_walks_thirty_two_items_in_pages_of_fifteen() {
        let store = MockDocumentStore::with_courses(32);
        let fetcher = fetcher(&store, 15);

        fetcher.load().await;
        assert_eq!(fetcher.items().len(), 15);
        assert!(fetcher.has_more());
        assert_eq!(fetcher.total_pages(), 3);
        assert_eq!(fetcher.current_page(), 1);

        fetcher.fetch_next_page().await;
        assert_eq!(fetcher.items().len(), 15);
        assert!(fetcher.has_more());
        assert_eq!(fetcher.current_page(), 2);
        assert_eq!(titles(&fetcher)[0], "Course 016");

        fetcher.fetch_next_page().await;
        assert_eq!(fetcher.items().len(), 2);
        assert!(!fetcher.has_more());
        assert_eq!(fetcher.current_page(), 3);
        assert_eq!(titles(&fetcher), ["Course 031", "Course 032"]);
    }

    #[tokio::test]
    async fn test_next_without_more_issues_no_query() {
        let store = MockDocumentStore::with_courses(4);
        let fetcher = fetcher(&store, 15);
        fetcher.load().await;
        let before = fetcher.view();

        assert!(fetcher.fetch_next_page().await.is_none());
        assert_eq!(fetcher.view(), before);
        assert_eq!(store.list_calls(), 1);
    }

    #[tokio::test]
    async fn test_empty_collection() {
        let store = MockDocumentStore::with_courses(0);
        let fetcher = fetcher(&store, 15);

        let request = fetcher.begin(Navigation::First).unwrap();
        assert!(fetcher.loading());

        fetcher.complete(&request).await;
        let view = fetcher.view();
        assert!(view.items.is_empty());
        assert_eq!(view.total_pages, 0);
        assert!(!view.loading);
        assert!(view.error.is_none());
        assert!(!view.has_more);
    }

    #[tokio::test]
    async fn test_count_failure_retains_items() {
        let store = MockDocumentStore::with_courses(20);
        let fetcher = fetcher(&store, 15);
        fetcher.load().await;
        let before = fetcher.items();

        store.set_fail_count(true);
        let outcome = fetcher.fetch_next_page().await;

        assert_eq!(outcome, Some(ApplyOutcome::Failed));
        assert!(fetcher.error().is_some());
        assert!(!fetcher.loading());
        assert_eq!(fetcher.items(), before);
        assert_eq!(fetcher.current_page(), 1);
    }

    #[tokio::test]
    async fn test_page_failure_then_recovery() {
        let store = MockDocumentStore::with_courses(20);
        let fetcher = fetcher(&store, 15);
        store.set_fail_list(true);

        fetcher.load().await;
        assert!(matches!(fetcher.error(), Some(StoreError::Network { .. })));
        assert!(fetcher.items().is_empty());

        store.set_fail_list(false);
        fetcher.refresh().await;
        assert!(fetcher.error().is_none());
        assert_eq!(fetcher.items().len(), 15);
    }

    #[tokio::test]
    async fn test_prev_page_after_two_forward_moves() {
        let store = MockDocumentStore::with_courses(40);
        let fetcher = fetcher(&store, 10);
        fetcher.load().await;
        fetcher.fetch_next_page().await;
        let second_page = fetcher.items();
        fetcher.fetch_next_page().await;
        assert_eq!(fetcher.current_page(), 3);

        fetcher.fetch_prev_page().await;
        assert_eq!(fetcher.current_page(), 2);
        assert_eq!(fetcher.items(), second_page);

        fetcher.fetch_prev_page().await;
        assert_eq!(fetcher.current_page(), 1);
        assert_eq!(titles(&fetcher)[0], "Course 001");
    }

    #[tokio::test]
    async fn test_stale_response_is_discarded() {
        let store = MockDocumentStore::with_courses(30);
        let fetcher = fetcher(&store, 10);
        fetcher.load().await;

        store.push_list_delay(Duration::from_millis(150));
        let slow_next = fetcher.begin(Navigation::Next).unwrap();
        let fast_first = fetcher.begin(Navigation::First).unwrap();

        let (slow, fast) = tokio::join!(fetcher.complete(&slow_next), fetcher.complete(&fast_first));

        assert_eq!(slow, ApplyOutcome::Stale);
        assert_eq!(fast, ApplyOutcome::Applied);
        assert_eq!(fetcher.current_page(), 1);
        assert_eq!(titles(&fetcher)[0], "Course 001");
        assert!(!fetcher.loading());
    }

    #[tokio::test]
    async fn test_page_and_count_issued_together() {
        let store = MockDocumentStore::with_courses(3);
        let fetcher = fetcher(&store, 15);
        fetcher.load().await;

        assert_eq!(store.list_calls(), 1);
        assert_eq!(store.count_calls(), 1);
    }

    #[tokio::test]
    async fn test_total_not_counted_when_disabled() {
        let store = MockDocumentStore::with_courses(3);
        let config = PagerConfig::new(COURSES_COLLECTION).with_refresh_total(false);
        let fetcher: CollectionFetcher<Course> = CollectionFetcher::new(store.clone(), config);
        fetcher.load().await;

        assert_eq!(store.count_calls(), 0);
        assert_eq!(fetcher.total_pages(), 0);
        assert_eq!(fetcher.items().len(), 3);
    }

    #[tokio::test]
    async fn test_require_auth_blocks_signed_out_queries() {
        let store = MockDocumentStore::with_courses(3);
        let (tx, rx) = watch::channel(None);
        let config = PagerConfig::new(COURSES_COLLECTION).with_require_auth(true);
        let fetcher: CollectionFetcher<Course> =
            CollectionFetcher::new(store.clone(), config).with_auth_gate(rx);

        fetcher.load().await;
        assert_eq!(fetcher.error(), Some(StoreError::Unauthenticated));
        assert_eq!(store.list_calls(), 0);

        tx.send_replace(Some(User::new("u1", "ada@uni.edu")));
        fetcher.refresh().await;
        assert!(fetcher.error().is_none());
        assert_eq!(fetcher.items().len(), 3);
    }

    #[tokio::test]
    async fn test_refresh_sees_added_course() {
        let store = MockDocumentStore::with_courses(2);
        let fetcher = fetcher(&store, 15);
        fetcher.load().await;

        store.inner().seed_courses(3);
        fetcher.refresh().await;
        assert_eq!(fetcher.items().len(), 3);
        assert_eq!(fetcher.total_pages(), 1);
    }

    #[tokio::test]
    async fn test_exact_multiple_stops_on_last_full_page() {
        let store = MockDocumentStore::with_courses(30);
        let fetcher = fetcher(&store, 15);
        fetcher.load().await;

        fetcher.fetch_next_page().await;
        assert_eq!(fetcher.current_page(), 2);
        assert!(fetcher.has_more());

        assert_eq!(fetcher.fetch_next_page().await, Some(ApplyOutcome::Applied));
        assert_eq!(fetcher.current_page(), 2);
        assert_eq!(fetcher.total_pages(), 2);
        assert_eq!(titles(&fetcher)[0], "Course 016");
        assert!(!fetcher.has_more());

        assert!(fetcher.fetch_next_page().await.is_none());
        assert_eq!(store.list_calls(), 3);
    }

    #[tokio::test]
    async fn test_page_failure_keeps_fresh_total() {
        let store = MockDocumentStore::with_courses(20);
        let fetcher = fetcher(&store, 15);
        fetcher.load().await;
        assert_eq!(fetcher.total_pages(), 2);

        store.inner().seed_courses(50);
        store.set_fail_list(true);
        let outcome = fetcher.refresh().await;

        assert_eq!(outcome, Some(ApplyOutcome::Failed));
        assert!(fetcher.error().is_some());
        assert_eq!(fetcher.items().len(), 15);
        assert_eq!(fetcher.total_pages(), 4);
    }
}
