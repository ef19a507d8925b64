//! Activity log command handler. The backend pages and filters the log.

use tabled::Tabled;

use stockdesk_core::api::LogEntry;
use stockdesk_core::{Console, ListPage, format};

use crate::cli::{GlobalOpts, LogsArgs};
use crate::error::CliError;

use super::util;

#[derive(Tabled)]
struct LogRow {
    #[tabled(rename = "Time")]
    time: String,
    #[tabled(rename = "Action")]
    action: String,
    #[tabled(rename = "Entity")]
    entity: String,
    #[tabled(rename = "User")]
    actor: String,
    #[tabled(rename = "Branch")]
    branch: String,
    #[tabled(rename = "Description")]
    description: String,
}

impl From<&LogEntry> for LogRow {
    fn from(e: &LogEntry) -> Self {
        Self {
            time: format::datetime(e.created_at),
            action: e.action.clone(),
            entity: format::or_dash(e.entity_type.as_deref()),
            actor: format::or_dash(e.actor.as_deref()),
            branch: format::or_dash(e.branch_code.as_deref()),
            description: format::truncate(&e.description, 60),
        }
    }
}

pub async fn handle(console: &Console, args: LogsArgs, global: &GlobalOpts) -> Result<(), CliError> {
    // The backend pages the log itself; an unbounded `limit` is not a page.
    if args.list.all {
        return Err(CliError::Validation {
            field: "all".into(),
            reason: "the activity log is paged by the server; use --page and --page-size (up to 500)"
                .into(),
        });
    }
    let mut query = util::list_query::<LogEntry>(&args.list, console.config().page_size)?;
    if let Some(action) = args.action {
        query = query.with_filter("action", action.to_uppercase());
    }
    if let Some(branch) = args.branch {
        query = query.with_filter("branch_code", branch.to_uppercase());
    }
    let requested = query.page;
    let mut page = ListPage::server_paged(query);

    util::with_spinner("Loading activity log", global, console.load_logs(&mut page)).await;
    // Asked past the last page: the page was reset to 1 and needs fetching.
    if page.is_loading() {
        console.load_logs(&mut page).await;
    }
    util::finish_load(&mut page, requested, util::palette(console, global))?;
    util::print_page(&mut page, global, |e| LogRow::from(e), |e| e.id.to_string())
}
