// ── Client-side list state ──
//
// `reconcile` is the pure filter → sort → paginate step; `ListPage` owns a
// query plus the fetched collection and drives load states around it.

mod page;
mod query;
mod reconcile;

pub use page::{FetchTicket, ListPage, LoadState};
pub use query::{DEFAULT_PAGE_SIZE, ListQuery, SortDirection};
pub use reconcile::{PageResult, filter_and_sort, reconcile, reconcile_server_page};
