// ── List page state machine ──
//
// One `ListPage` backs one list view. It owns the query and the fetched
// collection, tracks load state, and guards against out-of-order fetch
// responses with a sequence number per fetch.

use stockdesk_api::{Page, Pagination};
use tracing::{debug, info, warn};

use super::query::{ListQuery, SortDirection};
use super::reconcile::{PageResult, reconcile, reconcile_server_page};
use crate::error::{CoreError, Notice};
use crate::model::{EntityId, Record};

/// Where the data for this list is paged.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Paging {
    /// Full collection fetched once; filter/sort/page happen locally.
    Client,
    /// The backend filters and pages; one page is held at a time.
    Server(Pagination),
}

#[derive(Debug)]
pub enum LoadState {
    Loading,
    Loaded,
    /// Initial load failed and there is nothing cached to show.
    Error(CoreError),
}

/// Handle for one in-flight fetch. Responses are applied only if no newer
/// fetch has been applied in the meantime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct FetchTicket(u64);

pub struct ListPage<T> {
    query: ListQuery,
    items: Vec<T>,
    paging: Paging,
    state: LoadState,
    has_data: bool,
    issued: u64,
    applied: u64,
    notice: Option<Notice>,
}

impl<T: Record> ListPage<T> {
    /// A list whose full collection is reconciled locally.
    pub fn new(query: ListQuery) -> Self {
        Self::with_paging(query, Paging::Client)
    }

    /// A list whose filtering and paging are done by the backend.
    pub fn server_paged(query: ListQuery) -> Self {
        Self::with_paging(query, Paging::Server(Pagination::default()))
    }

    fn with_paging(query: ListQuery, paging: Paging) -> Self {
        Self {
            query,
            items: Vec::new(),
            paging,
            state: LoadState::Loading,
            has_data: false,
            issued: 0,
            applied: 0,
            notice: None,
        }
    }

    // ── Accessors ────────────────────────────────────────────────────

    pub fn query(&self) -> &ListQuery {
        &self.query
    }

    pub fn state(&self) -> &LoadState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, LoadState::Loading)
    }

    /// The fetched collection (for server-paged lists, the current page).
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Take the initial-load error, leaving an empty `Loaded` list behind.
    pub fn take_error(&mut self) -> Option<CoreError> {
        match std::mem::replace(&mut self.state, LoadState::Loaded) {
            LoadState::Error(err) => Some(err),
            other => {
                self.state = other;
                None
            }
        }
    }

    /// Take the pending notice, if any (stale-data warnings and the like).
    pub fn take_notice(&mut self) -> Option<Notice> {
        self.notice.take()
    }

    fn is_server_paged(&self) -> bool {
        matches!(self.paging, Paging::Server(_))
    }

    // ── Fetch lifecycle ──────────────────────────────────────────────

    /// Start a fetch: moves to `Loading` and hands out a fresh ticket.
    pub fn begin_fetch(&mut self) -> FetchTicket {
        self.issued += 1;
        self.state = LoadState::Loading;
        debug!(seq = self.issued, "fetch started");
        FetchTicket(self.issued)
    }

    /// Explicit retry after an error.
    pub fn retry(&mut self) -> FetchTicket {
        self.begin_fetch()
    }

    /// Apply a full-collection fetch result. Returns `false` when the
    /// response was stale and dropped.
    pub fn apply(&mut self, ticket: FetchTicket, result: Result<Vec<T>, CoreError>) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        match result {
            Ok(items) => {
                self.items = items;
                self.on_loaded(ticket);
            }
            Err(err) => self.on_failed(ticket, err),
        }
        true
    }

    /// Apply one server page. Returns `false` when the response was stale.
    pub fn apply_page(&mut self, ticket: FetchTicket, result: Result<Page<T>, CoreError>) -> bool {
        if !self.accept(ticket) {
            return false;
        }
        match result {
            Ok(page) => {
                self.items = page.items;
                self.paging = Paging::Server(page.pagination);
                self.on_loaded(ticket);
            }
            Err(err) => self.on_failed(ticket, err),
        }
        true
    }

    fn accept(&mut self, ticket: FetchTicket) -> bool {
        if ticket.0 <= self.applied {
            warn!(
                seq = ticket.0,
                applied = self.applied,
                "discarding stale list response"
            );
            return false;
        }
        self.applied = ticket.0;
        true
    }

    fn on_loaded(&mut self, ticket: FetchTicket) {
        self.has_data = true;
        // A newer fetch is still in flight: keep showing `Loading`.
        if ticket.0 == self.issued {
            self.state = LoadState::Loaded;
        }
        info!(kind = T::KIND, count = self.items.len(), "list loaded");
        self.clamp_page();
    }

    fn on_failed(&mut self, ticket: FetchTicket, err: CoreError) {
        if self.has_data {
            // Refresh failed: keep stale rows visible and surface a notice.
            self.notice = err.notice();
            if ticket.0 == self.issued {
                self.state = LoadState::Loaded;
            }
        } else {
            self.state = LoadState::Error(err);
        }
    }

    // ── Query changes ────────────────────────────────────────────────

    /// Any change that alters the result set goes back to page 1. Server
    /// paged lists also need a refetch.
    fn query_changed(&mut self) {
        self.query.page = 1;
        if self.is_server_paged() {
            self.state = LoadState::Loading;
        }
    }

    pub fn set_search(&mut self, term: impl Into<String>) {
        let term = term.into();
        if term != self.query.search_term {
            self.query.search_term = term;
            self.query_changed();
        }
    }

    /// Set a filter. An empty value removes it.
    pub fn set_filter(&mut self, key: impl Into<String>, value: impl Into<String>) {
        let key = key.into();
        let value = value.into();
        let changed = if value.trim().is_empty() {
            self.query.filters.shift_remove(&key).is_some()
        } else {
            self.query.filters.insert(key, value.clone()) != Some(value)
        };
        if changed {
            self.query_changed();
        }
    }

    pub fn clear_filters(&mut self) {
        if !self.query.filters.is_empty() {
            self.query.filters.clear();
            self.query_changed();
        }
    }

    /// Select a sort column. Selecting the active column flips direction;
    /// a new column starts ascending.
    pub fn sort_by(&mut self, key: &str) {
        if self.query.sort_key.as_deref() == Some(key) {
            self.query.sort_direction = self.query.sort_direction.toggled();
        } else {
            self.query.sort_key = Some(key.to_owned());
            self.query.sort_direction = SortDirection::Asc;
        }
        self.query_changed();
    }

    pub fn set_sort(&mut self, key: Option<String>, direction: SortDirection) {
        if self.query.sort_key != key || self.query.sort_direction != direction {
            self.query.sort_key = key;
            self.query.sort_direction = direction;
            self.query_changed();
        }
    }

    pub fn set_page_size(&mut self, page_size: usize) {
        let page_size = page_size.max(1);
        if page_size != self.query.page_size {
            self.query.page_size = page_size;
            self.query_changed();
        }
    }

    /// Move to another page. Filter and sort output is untouched.
    pub fn set_page(&mut self, page: usize) {
        let page = page.max(1);
        if page != self.query.page {
            self.query.page = page;
            if self.is_server_paged() {
                self.state = LoadState::Loading;
            }
        }
    }

    // ── View ─────────────────────────────────────────────────────────

    fn total_pages(&self) -> usize {
        match self.paging {
            Paging::Client => reconcile(&self.items, &self.query).total_pages,
            Paging::Server(p) => p.total_pages,
        }
    }

    /// Reset to page 1 when the current page no longer exists. Returns
    /// whether a reset happened.
    pub fn clamp_page(&mut self) -> bool {
        let total_pages = self.total_pages();
        if self.query.page > total_pages.max(1) {
            debug!(
                page = self.query.page,
                total_pages, "page out of range, resetting to 1"
            );
            self.query.page = 1;
            if self.is_server_paged() {
                self.state = LoadState::Loading;
            }
            return true;
        }
        false
    }

    /// The visible page. Corrects an out-of-range page first.
    pub fn view(&mut self) -> PageResult<&T> {
        self.clamp_page();
        match self.paging {
            Paging::Client => reconcile(&self.items, &self.query),
            Paging::Server(p) => reconcile_server_page(&self.items, p, &self.query),
        }
    }

    // ── Optimistic updates ───────────────────────────────────────────

    /// Insert or replace a record after a successful create/update.
    pub fn upsert(&mut self, record: T) {
        let id = record.record_id();
        match self.items.iter_mut().find(|item| item.record_id() == id) {
            Some(slot) => *slot = record,
            None => self.items.push(record),
        }
    }

    /// Drop a record after a successful delete.
    pub fn remove_by_id(&mut self, id: &EntityId) -> Option<T> {
        let index = self.items.iter().position(|item| &item.record_id() == id)?;
        let removed = self.items.remove(index);
        self.clamp_page();
        Some(removed)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::list::reconcile::tests::{Row, row, rows};

    fn loaded(n: i64, query: ListQuery) -> ListPage<Row> {
        let mut page = ListPage::new(query);
        let ticket = page.begin_fetch();
        assert!(page.apply(ticket, Ok(rows(n))));
        page
    }

    fn offline() -> CoreError {
        CoreError::ConnectionFailed {
            url: "http://localhost".into(),
            reason: "refused".into(),
        }
    }

    #[test]
    fn query_changes_reset_to_first_page() {
        let mut page = loaded(40, ListQuery::default().with_page_size(5));

        page.set_page(4);
        page.set_search("branch");
        assert_eq!(page.query().page, 1);

        page.set_page(3);
        page.set_filter("hub", "BKS");
        assert_eq!(page.query().page, 1);

        page.set_page(2);
        page.sort_by("seats");
        assert_eq!(page.query().page, 1);
    }

    #[test]
    fn page_change_leaves_result_set_alone() {
        let mut page = loaded(
            40,
            ListQuery::default()
                .with_filter("hub", "BKS")
                .with_page_size(5),
        );
        let before = page.view().total;

        page.set_page(3);
        let after = page.view();
        assert_eq!(after.total, before);
        assert_eq!(after.page, 3);
        assert_eq!(page.query().filters.len(), 1);
    }

    #[test]
    fn reselecting_sort_key_toggles_direction() {
        let mut page = loaded(3, ListQuery::default());
        page.sort_by("name");
        assert_eq!(page.query().sort_direction, SortDirection::Asc);
        page.sort_by("name");
        assert_eq!(page.query().sort_direction, SortDirection::Desc);
        page.sort_by("seats");
        assert_eq!(page.query().sort_direction, SortDirection::Asc);
    }

    #[test]
    fn shrinking_data_resets_out_of_range_page() {
        let mut page = loaded(20, ListQuery::default().with_page_size(5));
        page.set_page(4);
        assert_eq!(page.view().items.len(), 5);

        // A refresh returns fewer rows: page 4 no longer exists.
        let ticket = page.begin_fetch();
        page.apply(ticket, Ok(rows(6)));
        let view = page.view();
        assert_eq!(view.page, 1);
        assert_eq!(view.total_pages, 2);
        assert_eq!(view.items.len(), 5);
    }

    #[test]
    fn narrowing_filter_on_last_page_lands_on_first() {
        let mut page = loaded(24, ListQuery::default().with_page_size(8));
        page.set_page(3);
        let last = page.view();
        assert_eq!(last.total_pages, 3);
        assert_eq!(last.items.first().map(|r| r.id), Some(17));

        page.set_filter("hub", "SND");
        let view = page.view();
        assert_eq!(view.page, 1);
        assert_eq!(view.total, 8);
        assert_eq!(view.total_pages, 1);
        assert_eq!(
            view.items.iter().map(|r| r.id).collect::<Vec<_>>(),
            [3, 6, 9, 12, 15, 18, 21, 24]
        );
    }

    #[test]
    fn removing_last_row_of_last_page_resets() {
        let mut page = loaded(6, ListQuery::default().with_page_size(5));
        page.set_page(2);
        assert_eq!(page.view().items.len(), 1);

        page.remove_by_id(&EntityId::Numeric(6)).unwrap();
        assert_eq!(page.query().page, 1);
    }

    #[test]
    fn stale_response_is_discarded() {
        let mut page: ListPage<Row> = ListPage::new(ListQuery::default());
        let first = page.begin_fetch();
        let second = page.begin_fetch();

        assert!(page.apply(second, Ok(rows(2))));
        assert!(!page.apply(first, Ok(rows(9))));
        assert_eq!(page.items().len(), 2);
        assert!(matches!(page.state(), LoadState::Loaded));
    }

    #[test]
    fn older_response_first_still_loading() {
        let mut page: ListPage<Row> = ListPage::new(ListQuery::default());
        let first = page.begin_fetch();
        let second = page.begin_fetch();

        assert!(page.apply(first, Ok(rows(9))));
        assert!(page.is_loading());
        assert!(page.apply(second, Ok(rows(2))));
        assert!(matches!(page.state(), LoadState::Loaded));
        assert_eq!(page.items().len(), 2);
    }

    #[test]
    fn initial_failure_is_error_state() {
        let mut page: ListPage<Row> = ListPage::new(ListQuery::default());
        let ticket = page.begin_fetch();
        page.apply(ticket, Err(offline()));
        assert!(matches!(page.state(), LoadState::Error(_)));

        let ticket = page.retry();
        assert!(page.is_loading());
        page.apply(ticket, Ok(rows(1)));
        assert!(matches!(page.state(), LoadState::Loaded));
        assert!(page.take_error().is_none());
    }

    #[test]
    fn load_error_can_be_taken() {
        let mut page: ListPage<Row> = ListPage::new(ListQuery::default());
        let ticket = page.begin_fetch();
        page.apply(ticket, Err(offline()));

        let err = page.take_error().unwrap();
        assert_eq!(err.category(), crate::ErrorCategory::Network);
        assert!(matches!(page.state(), LoadState::Loaded));
        assert!(page.view().is_empty());
    }

    #[test]
    fn refresh_failure_keeps_stale_data() {
        let mut page = loaded(4, ListQuery::default());
        let ticket = page.begin_fetch();
        page.apply(ticket, Err(offline()));

        assert!(matches!(page.state(), LoadState::Loaded));
        assert_eq!(page.items().len(), 4);
        assert!(page.take_notice().is_some());
        assert!(page.take_notice().is_none());
    }

    #[test]
    fn upsert_replaces_or_appends() {
        let mut page = loaded(3, ListQuery::default());
        page.upsert(row(2, "Renamed", "SND", true, 0));
        page.upsert(row(10, "New", "SND", true, 0));

        assert_eq!(page.items().len(), 4);
        assert_eq!(page.items()[1].name, "Renamed");
    }

    #[test]
    fn server_paged_page_change_requires_fetch() {
        let mut page: ListPage<Row> =
            ListPage::server_paged(ListQuery::default().with_page_size(2));
        let ticket = page.begin_fetch();
        page.apply_page(
            ticket,
            Ok(Page {
                items: rows(2),
                pagination: Pagination {
                    total: 6,
                    total_pages: 3,
                },
                source: stockdesk_api::PaginationSource::Absent,
            }),
        );
        assert!(!page.is_loading());

        page.set_page(2);
        assert!(page.is_loading());
        assert_eq!(page.view().total_pages, 3);
    }

    #[test]
    fn server_paged_out_of_range_resets_and_refetches() {
        let mut page: ListPage<Row> =
            ListPage::server_paged(ListQuery::default().with_page(5).with_page_size(2));
        let ticket = page.begin_fetch();
        page.apply_page(
            ticket,
            Ok(Page {
                items: Vec::new(),
                pagination: Pagination {
                    total: 3,
                    total_pages: 2,
                },
                source: stockdesk_api::PaginationSource::Absent,
            }),
        );
        assert_eq!(page.query().page, 1);
        assert!(page.is_loading());
    }
}
