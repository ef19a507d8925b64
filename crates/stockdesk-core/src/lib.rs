//! Client-side logic between `stockdesk-api` and the console front end.
//!
//! This crate owns everything the console decides locally, without a
//! round-trip to the backend:
//!
//! - **[`list`]** — The filter → sort → paginate reconciler ([`reconcile`])
//!   shared by every list view, and [`ListPage`], the per-view state machine
//!   that owns a [`ListQuery`], tracks load state, resets the page on query
//!   changes, and drops out-of-order fetch responses.
//!
//! - **[`SearchDebouncer`]** — Turns raw keystrokes into committed search
//!   terms after a quiet window, on tokio timers.
//!
//! - **[`FormState`]** — Values, errors, touched flags, and the submitting
//!   flag for one create/edit flow, driven by a [`FormSchema`]. Per-entity
//!   schemas live in [`forms`].
//!
//! - **[`Console`]** — Session facade: owns the [`ApiClient`], routes every
//!   call through one error path into [`CoreError`] / [`ErrorCategory`],
//!   and holds the shared [`AppContext`] (theme, branch dropdown cache).
//!
//! [`ApiClient`]: stockdesk_api::ApiClient

pub mod config;
pub mod console;
pub mod context;
pub mod debounce;
pub mod error;
pub mod form;
pub mod format;
pub mod forms;
pub mod list;
pub mod model;
pub mod validate;

/// The HTTP layer, re-exported so front ends need only this crate.
pub use stockdesk_api as api;

// ── Primary re-exports ──────────────────────────────────────────────
pub use config::ConsoleConfig;
pub use console::Console;
pub use context::{AppContext, DropdownCache, Theme};
pub use debounce::SearchDebouncer;
pub use error::{CoreError, ErrorCategory, Notice, NoticeLevel};
pub use form::{FieldRule, FieldValue, FormSchema, FormState, FormValues, Submission};
pub use list::{
    FetchTicket, ListPage, ListQuery, LoadState, PageResult, SortDirection, filter_and_sort,
    reconcile, reconcile_server_page,
};
pub use model::{Cell, EntityId, Record};
