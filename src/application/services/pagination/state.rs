//! Pagination state machine.
//!
//! [`Pager`] never talks to the store itself. Navigation produces a
//! [`PageRequest`] tagged with a fresh [`RequestId`]; whoever executes it hands
//! the [`PageResponse`] back through [`Pager::apply`]. Only the response to the
//! most recently issued request is applied, so overlapping navigations cannot
//! mix the fields of different pages.

use std::fmt;

use tracing::{debug, trace, warn};

use super::config::PagerConfig;
use crate::domain::entities::{DocumentSnapshot, FromDocument, PageCursor};
use crate::domain::errors::StoreError;
use crate::domain::ports::PageQuery;

/// Monotonically increasing id of a page request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct RequestId(u64);

impl RequestId {
    /// Raw counter value.
    #[must_use]
    pub const fn as_u64(self) -> u64 {
        self.0
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Navigation intent.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Navigation {
    /// Load page 1, discarding the cursor stack.
    First,
    /// Advance one page, if the current page was full.
    Next,
    /// Go back one page, re-querying it.
    Previous,
    /// Re-query the current page.
    Refresh,
}

/// A page that was successfully loaded.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedPage<T> {
    /// Records in store order.
    pub items: Vec<T>,
    /// 1-based page index.
    pub page_index: u32,
    /// Position of the first record.
    pub first_cursor: Option<PageCursor>,
    /// Position of the last record; the next page starts after it.
    pub last_cursor: Option<PageCursor>,
    /// Whether the page came back full, hinting that more may follow.
    pub has_more: bool,
}

/// Fetch lifecycle.
#[derive(Debug, Clone, PartialEq)]
pub enum FetchState<T> {
    /// Nothing requested yet.
    Idle,
    /// A request is outstanding; the last good page stays visible.
    Loading {
        /// Request whose response will be applied.
        request_id: RequestId,
        /// Page shown while waiting.
        previous: Option<LoadedPage<T>>,
    },
    /// The latest request succeeded.
    Loaded(LoadedPage<T>),
    /// The latest request failed; the last good page stays visible.
    Failed {
        /// Why the request failed.
        error: StoreError,
        /// Last good page.
        previous: Option<LoadedPage<T>>,
    },
}

impl<T> FetchState<T> {
    /// The page currently on screen, if any.
    #[must_use]
    pub const fn visible_page(&self) -> Option<&LoadedPage<T>> {
        match self {
            Self::Idle => None,
            Self::Loaded(page) => Some(page),
            Self::Loading { previous, .. } | Self::Failed { previous, .. } => previous.as_ref(),
        }
    }

    fn take_visible_page(self) -> Option<LoadedPage<T>> {
        match self {
            Self::Idle => None,
            Self::Loaded(page) => Some(page),
            Self::Loading { previous, .. } | Self::Failed { previous, .. } => previous,
        }
    }
}

/// Work order for the store: one page query plus an optional total count.
#[derive(Debug, Clone, PartialEq)]
pub struct PageRequest {
    /// Id matched against the newest request on apply.
    pub id: RequestId,
    /// What the user asked for.
    pub navigation: Navigation,
    /// Page the request will land on when it succeeds.
    pub page_index: u32,
    /// Store query to run.
    pub query: PageQuery,
    /// Whether the collection total should be counted alongside.
    pub count_total: bool,
    /// Fail without querying when nobody is signed in.
    pub require_auth: bool,
}

/// Results of executing a [`PageRequest`].
#[derive(Debug, Clone)]
pub struct PageResponse {
    /// Id of the request this answers.
    pub id: RequestId,
    /// Records of the page query.
    pub page: Result<Vec<DocumentSnapshot>, StoreError>,
    /// `None` when no count was requested.
    pub total: Option<Result<u64, StoreError>>,
}

impl PageResponse {
    /// Builds a response where both parts failed with the same error.
    #[must_use]
    pub fn failed(request: &PageRequest, error: StoreError) -> Self {
        Self {
            id: request.id,
            total: request.count_total.then(|| Err(error.clone())),
            page: Err(error),
        }
    }
}

/// What [`Pager::apply`] did with a response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    /// The page, or the kept page after an empty forward fetch, is visible.
    Applied,
    /// The request failed; the previous page stays visible.
    Failed,
    /// Superseded by a newer request and dropped.
    Stale,
}

/// Pagination state for one collection.
pub struct Pager<T> {
    config: PagerConfig,
    state: FetchState<T>,
    /// `cursor_stack[i]` is the start-after cursor that produced page `i + 1`.
    cursor_stack: Vec<Option<PageCursor>>,
    total_items: Option<u64>,
    last_issued: u64,
    pending: Option<PendingRequest>,
}

struct PendingRequest {
    id: RequestId,
    navigation: Navigation,
    page_index: u32,
    start_after: Option<PageCursor>,
}

impl<T: FromDocument> Pager<T> {
    /// Creates an idle pager.
    #[must_use]
    pub const fn new(config: PagerConfig) -> Self {
        Self {
            config,
            state: FetchState::Idle,
            cursor_stack: Vec::new(),
            total_items: None,
            last_issued: 0,
            pending: None,
        }
    }

    /// The pager configuration.
    #[must_use]
    pub const fn config(&self) -> &PagerConfig {
        &self.config
    }

    /// The fetch lifecycle state.
    #[must_use]
    pub const fn state(&self) -> &FetchState<T> {
        &self.state
    }

    /// Items of the visible page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        self.state
            .visible_page()
            .map_or(&[], |page| page.items.as_slice())
    }

    /// Whether a request is outstanding.
    #[must_use]
    pub const fn is_loading(&self) -> bool {
        matches!(self.state, FetchState::Loading { .. })
    }

    /// Failure of the latest request, if it failed.
    #[must_use]
    pub const fn error(&self) -> Option<&StoreError> {
        match &self.state {
            FetchState::Failed { error, .. } => Some(error),
            _ => None,
        }
    }

    /// 1-based index of the visible page; 1 before anything loaded.
    #[must_use]
    pub fn current_page(&self) -> u32 {
        self.state.visible_page().map_or(1, |page| page.page_index)
    }

    /// `ceil(total / page_size)`, 0 while the total is unknown or zero.
    #[must_use]
    pub fn total_pages(&self) -> u32 {
        self.total_items
            .map_or(0, |total| total_pages(total, self.config.page_size))
    }

    /// Collection size from the last successful count.
    #[must_use]
    pub const fn total_items(&self) -> Option<u64> {
        self.total_items
    }

    /// Whether the visible page came back full.
    #[must_use]
    pub fn has_more(&self) -> bool {
        self.state.visible_page().is_some_and(|page| page.has_more)
    }

    /// Whether the visible page is past page 1.
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.current_page() > 1
    }

    /// Starts a navigation. Returns `None` when it is a no-op (e.g. `Next`
    /// after a short page, `Previous` on page 1).
    pub fn begin(&mut self, navigation: Navigation) -> Option<PageRequest> {
        let (page_index, start_after) = self.plan(navigation)?;

        self.last_issued += 1;
        let id = RequestId(self.last_issued);

        let query = PageQuery::new(
            self.config.collection.clone(),
            self.config.sort_field.clone(),
            self.config.page_size,
        )
        .start_after(start_after.clone());

        self.pending = Some(PendingRequest {
            id,
            navigation,
            page_index,
            start_after,
        });

        let previous = std::mem::replace(&mut self.state, FetchState::Idle).take_visible_page();
        self.state = FetchState::Loading {
            request_id: id,
            previous,
        };

        debug!(
            request = %id,
            ?navigation,
            page = page_index,
            collection = %self.config.collection,
            "Page request issued"
        );

        Some(PageRequest {
            id,
            navigation,
            page_index,
            query,
            count_total: self.config.refresh_total,
            require_auth: self.config.require_auth,
        })
    }

    fn plan(&self, navigation: Navigation) -> Option<(u32, Option<PageCursor>)> {
        let visible = self.state.visible_page();
        match navigation {
            Navigation::First => Some((1, None)),
            Navigation::Refresh => {
                let index = visible.map_or(1, |page| page.page_index);
                let start_after = self.stack_entry(index);
                Some((index, start_after))
            }
            Navigation::Next => {
                let page = visible?;
                if !page.has_more {
                    trace!(page = page.page_index, "No further page, ignoring next");
                    return None;
                }
                Some((page.page_index + 1, page.last_cursor.clone()))
            }
            Navigation::Previous => {
                let page = visible?;
                if page.page_index <= 1 {
                    trace!("Already on first page, ignoring previous");
                    return None;
                }
                let index = page.page_index - 1;
                Some((index, self.stack_entry(index)))
            }
        }
    }

    fn stack_entry(&self, page_index: u32) -> Option<PageCursor> {
        let slot = usize::try_from(page_index).ok()?.checked_sub(1)?;
        self.cursor_stack.get(slot).cloned().flatten()
    }

    /// Applies the response of a request issued by [`Pager::begin`].
    pub fn apply(&mut self, response: PageResponse) -> ApplyOutcome {
        let Some(pending) = self.pending.take_if(|pending| pending.id == response.id) else {
            debug!(request = %response.id, "Dropping stale page response");
            return ApplyOutcome::Stale;
        };

        let previous = std::mem::replace(&mut self.state, FetchState::Idle).take_visible_page();

        // The total is tracked apart from the page outcome.
        if let Some(Ok(total)) = &response.total {
            self.total_items = Some(*total);
        }

        match (response.page, response.total) {
            (Err(error), _) | (Ok(_), Some(Err(error))) => {
                warn!(request = %pending.id, error = %error, "Page fetch failed");
                self.state = FetchState::Failed { error, previous };
                ApplyOutcome::Failed
            }
            (Ok(snapshots), _) if snapshots.is_empty() && pending.navigation == Navigation::Next => {
                // The previous page was exactly full and nothing follows it.
                let Some(mut page) = previous else {
                    self.state = FetchState::Loaded(self.build_page(1, snapshots));
                    return ApplyOutcome::Applied;
                };
                debug!(
                    request = %pending.id,
                    page = page.page_index,
                    "Empty forward page, staying on the last page"
                );
                page.has_more = false;
                self.state = FetchState::Loaded(page);
                ApplyOutcome::Applied
            }
            (Ok(snapshots), _) => {
                let page = self.build_page(pending.page_index, snapshots);
                debug!(
                    request = %pending.id,
                    page = page.page_index,
                    items = page.items.len(),
                    has_more = page.has_more,
                    "Page loaded"
                );
                self.record_cursor(pending.page_index, pending.start_after);
                self.state = FetchState::Loaded(page);
                ApplyOutcome::Applied
            }
        }
    }

    fn build_page(&self, page_index: u32, snapshots: Vec<DocumentSnapshot>) -> LoadedPage<T> {
        let has_more = u32::try_from(snapshots.len()).is_ok_and(|n| n == self.config.page_size);
        let first_cursor = snapshots.first().map(|s| s.cursor.clone());
        let last_cursor = snapshots.last().map(|s| s.cursor.clone());
        let items = snapshots
            .into_iter()
            .map(|snapshot| T::from_document(snapshot.document))
            .collect();

        LoadedPage {
            items,
            page_index,
            first_cursor,
            last_cursor,
            has_more,
        }
    }

    fn record_cursor(&mut self, page_index: u32, start_after: Option<PageCursor>) {
        let depth = usize::try_from(page_index).unwrap_or(usize::MAX);
        self.cursor_stack.truncate(depth.saturating_sub(1));
        self.cursor_stack.push(start_after);
    }
}

/// `ceil(total / page_size)`; a zero page size counts as one.
#[must_use]
pub fn total_pages(total: u64, page_size: u32) -> u32 {
    let size = u64::from(page_size.max(1));
    u32::try_from(total.div_ceil(size)).unwrap_or(u32::MAX)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entities::{Document, DocumentId, FieldValue, Fields};
    use test_case::test_case;

    fn config(page_size: u32) -> PagerConfig {
        PagerConfig::new("courses").with_page_size(page_size)
    }

    fn snapshots(range: std::ops::Range<usize>) -> Vec<DocumentSnapshot> {
        range
            .map(|i| {
                let id = DocumentId::new(format!("doc-{i:03}"));
                let mut fields = Fields::new();
                fields.insert("created_at".into(), FieldValue::Integer(i as i64));
                DocumentSnapshot {
                    document: Document::new(id.clone(), fields),
                    cursor: PageCursor::new(Some(FieldValue::Integer(i as i64)), id),
                }
            })
            .collect()
    }

    fn ok(request: &PageRequest, page: Vec<DocumentSnapshot>, total: u64) -> PageResponse {
        PageResponse {
            id: request.id,
            page: Ok(page),
            total: Some(Ok(total)),
        }
    }

    #[test_case(0, 15, 0 ; "empty_collection")]
    #[test_case(1, 15, 1 ; "single_item")]
    #[test_case(15, 15, 1 ; "exactly_one_page")]
    #[test_case(16, 15, 2 ; "one_over")]
    #[test_case(32, 15, 3 ; "thirty_two_by_fifteen")]
    #[test_case(7, 1, 7 ; "page_size_one")]
    fn test_total_pages(total: u64, page_size: u32, expected: u32) {
        assert_eq!(total_pages(total, page_size), expected);
    }

    #[test]
    fn test_initial_state() {
        let pager: Pager<Document> = Pager::new(config(15));
        assert_eq!(pager.state(), &FetchState::Idle);
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.total_pages(), 0);
        assert!(pager.items().is_empty());
        assert!(!pager.is_loading());
    }

    #[test]
    fn test_first_page_request_shape() {
        let mut pager: Pager<Document> = Pager::new(config(15));
        let request = pager.begin(Navigation::First).unwrap();

        assert_eq!(request.page_index, 1);
        assert_eq!(request.query.limit, 15);
        assert_eq!(request.query.order_by, "created_at");
        assert!(request.query.start_after.is_none());
        assert!(request.count_total);
        assert!(pager.is_loading());
    }

    #[test]
    fn test_full_page_sets_has_more() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let request = pager.begin(Navigation::First).unwrap();
        assert_eq!(pager.apply(ok(&request, snapshots(0..5), 12)), ApplyOutcome::Applied);

        assert!(pager.has_more());
        assert_eq!(pager.total_pages(), 3);
        assert!(!pager.is_loading());
    }

    #[test]
    fn test_short_page_clears_has_more() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let request = pager.begin(Navigation::First).unwrap();
        pager.apply(ok(&request, snapshots(0..3), 3));

        assert!(!pager.has_more());
        assert!(pager.begin(Navigation::Next).is_none());
    }

    #[test]
    fn test_next_is_noop_without_more() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let request = pager.begin(Navigation::First).unwrap();
        pager.apply(ok(&request, snapshots(0..2), 2));
        let before = pager.state().clone();

        assert!(pager.begin(Navigation::Next).is_none());
        assert_eq!(pager.state(), &before);
    }

    #[test]
    fn test_next_continues_after_last_cursor() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let first = pager.begin(Navigation::First).unwrap();
        pager.apply(ok(&first, snapshots(0..5), 12));

        let next = pager.begin(Navigation::Next).unwrap();
        let cursor = next.query.start_after.as_ref().unwrap();
        assert_eq!(cursor.document_id().as_str(), "doc-004");
        assert_eq!(next.page_index, 2);
    }

    #[test]
    fn test_previous_reuses_stacked_cursor() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let first = pager.begin(Navigation::First).unwrap();
        pager.apply(ok(&first, snapshots(0..5), 15));
        let second = pager.begin(Navigation::Next).unwrap();
        pager.apply(ok(&second, snapshots(5..10), 15));
        let third = pager.begin(Navigation::Next).unwrap();
        pager.apply(ok(&third, snapshots(10..15), 15));
        assert_eq!(pager.current_page(), 3);

        let back = pager.begin(Navigation::Previous).unwrap();
        assert_eq!(back.page_index, 2);
        assert_eq!(back.query.start_after, second.query.start_after);

        pager.apply(ok(&back, snapshots(5..10), 15));
        let back_again = pager.begin(Navigation::Previous).unwrap();
        assert_eq!(back_again.page_index, 1);
        assert!(back_again.query.start_after.is_none());
    }

    #[test]
    fn test_previous_is_noop_on_first_page() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let request = pager.begin(Navigation::First).unwrap();
        pager.apply(ok(&request, snapshots(0..5), 10));

        assert!(pager.begin(Navigation::Previous).is_none());
    }

    #[test]
    fn test_refresh_requeries_current_page() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let first = pager.begin(Navigation::First).unwrap();
        pager.apply(ok(&first, snapshots(0..5), 10));
        let second = pager.begin(Navigation::Next).unwrap();
        pager.apply(ok(&second, snapshots(5..10), 10));

        let refresh = pager.begin(Navigation::Refresh).unwrap();
        assert_eq!(refresh.page_index, 2);
        assert_eq!(refresh.query.start_after, second.query.start_after);
    }

    #[test]
    fn test_stale_response_is_dropped() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let first = pager.begin(Navigation::First).unwrap();
        let second = pager.begin(Navigation::Refresh).unwrap();
        assert!(second.id > first.id);

        assert_eq!(pager.apply(ok(&first, snapshots(0..5), 5)), ApplyOutcome::Stale);
        assert!(pager.is_loading());

        assert_eq!(pager.apply(ok(&second, snapshots(0..2), 2)), ApplyOutcome::Applied);
        assert_eq!(pager.items().len(), 2);
    }

    #[test]
    fn test_count_failure_keeps_previous_items() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let first = pager.begin(Navigation::First).unwrap();
        pager.apply(ok(&first, snapshots(0..5), 12));

        let next = pager.begin(Navigation::Next).unwrap();
        let outcome = pager.apply(PageResponse {
            id: next.id,
            page: Ok(snapshots(5..10)),
            total: Some(Err(StoreError::network("count failed"))),
        });

        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(pager.error().is_some());
        assert!(!pager.is_loading());
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.items()[0].id.as_str(), "doc-000");
        assert_eq!(pager.total_pages(), 3);
    }

    #[test]
    fn test_next_after_failure_uses_last_good_page() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let first = pager.begin(Navigation::First).unwrap();
        pager.apply(ok(&first, snapshots(0..5), 12));
        let failed = pager.begin(Navigation::Next).unwrap();
        pager.apply(PageResponse::failed(&failed, StoreError::network("down")));

        let retry = pager.begin(Navigation::Next).unwrap();
        assert_eq!(retry.page_index, 2);
        assert_eq!(retry.query.start_after, failed.query.start_after);
    }

    #[test]
    fn test_no_count_keeps_total() {
        let mut pager: Pager<Document> =
            Pager::new(config(5).with_refresh_total(false));
        let request = pager.begin(Navigation::First).unwrap();
        assert!(!request.count_total);

        pager.apply(PageResponse {
            id: request.id,
            page: Ok(snapshots(0..5)),
            total: None,
        });
        assert_eq!(pager.total_items(), None);
        assert_eq!(pager.total_pages(), 0);
    }

    #[test]
    fn test_empty_forward_page_stays_on_last_page() {
        let mut pager: Pager<Document> = Pager::new(config(15));
        let first = pager.begin(Navigation::First).unwrap();
        pager.apply(ok(&first, snapshots(0..15), 30));
        let second = pager.begin(Navigation::Next).unwrap();
        pager.apply(ok(&second, snapshots(15..30), 30));
        assert!(pager.has_more());

        let third = pager.begin(Navigation::Next).unwrap();
        assert_eq!(pager.apply(ok(&third, Vec::new(), 30)), ApplyOutcome::Applied);

        assert_eq!(pager.current_page(), 2);
        assert_eq!(pager.total_pages(), 2);
        assert_eq!(pager.items().len(), 15);
        assert!(!pager.has_more());
        assert!(pager.begin(Navigation::Next).is_none());

        let back = pager.begin(Navigation::Previous).unwrap();
        assert_eq!(back.page_index, 1);
        assert!(back.query.start_after.is_none());
        pager.apply(ok(&back, snapshots(0..15), 30));
        let forward = pager.begin(Navigation::Next).unwrap();
        assert_eq!(forward.query.start_after, second.query.start_after);
    }

    #[test]
    fn test_page_failure_still_updates_total() {
        let mut pager: Pager<Document> = Pager::new(config(5));
        let first = pager.begin(Navigation::First).unwrap();
        pager.apply(ok(&first, snapshots(0..5), 12));
        assert_eq!(pager.total_pages(), 3);

        let next = pager.begin(Navigation::Next).unwrap();
        let outcome = pager.apply(PageResponse {
            id: next.id,
            page: Err(StoreError::network("list failed")),
            total: Some(Ok(21)),
        });

        assert_eq!(outcome, ApplyOutcome::Failed);
        assert!(pager.error().is_some());
        assert_eq!(pager.current_page(), 1);
        assert_eq!(pager.items()[0].id.as_str(), "doc-000");
        assert_eq!(pager.total_pages(), 5);
    }
}
