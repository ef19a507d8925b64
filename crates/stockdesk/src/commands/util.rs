//! Shared helpers for command handlers.

use std::future::Future;
use std::io::IsTerminal;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use tabled::Tabled;

use stockdesk_core::{
    Console, EntityId, FormState, FormValues, ListPage, ListQuery, Record, SortDirection,
    Submission, api, forms,
};

use crate::cli::{GlobalOpts, ListArgs};
use crate::error::CliError;
use crate::output::{self, Palette};

/// Prompt for confirmation, auto-approving if `--yes` was passed.
/// Without a terminal to ask on, `--yes` is required.
pub fn confirm(message: &str, action: &str, yes_flag: bool) -> Result<bool, CliError> {
    if yes_flag {
        return Ok(true);
    }
    if !std::io::stdin().is_terminal() {
        return Err(CliError::NonInteractiveRequiresYes {
            action: action.into(),
        });
    }
    dialoguer::Confirm::new()
        .with_prompt(message)
        .default(false)
        .interact()
        .map_err(prompt_err)
}

/// Map a dialoguer / interactive I/O failure into CliError.
pub fn prompt_err(e: impl std::fmt::Display) -> CliError {
    CliError::Validation {
        field: "interactive".into(),
        reason: format!("prompt failed: {e}"),
    }
}

/// Parse a record id argument.
pub fn entity_id(raw: &str) -> EntityId {
    raw.trim().parse().unwrap_or_else(|_| EntityId::from(raw.trim()))
}

pub fn palette(console: &Console, global: &GlobalOpts) -> Palette {
    Palette::new(global.color, console.context().theme())
}

/// Submit a form filled from flags. `on_submit` only runs when every field
/// is valid; otherwise all field errors surface at once.
pub async fn submit_form<R, Fut>(
    mut form: FormState,
    on_submit: impl FnOnce(FormValues) -> Fut,
) -> Result<R, CliError>
where
    Fut: Future<Output = Result<R, CliError>>,
{
    match form.handle_submit(on_submit).await? {
        Submission::Submitted(out) => Ok(out),
        Submission::Invalid => Err(forms::rejected(&form).into()),
    }
}

/// Stderr spinner for a request, shown only on an interactive terminal.
pub fn spinner(message: &str, global: &GlobalOpts) -> Option<ProgressBar> {
    if global.quiet || !std::io::stderr().is_terminal() {
        return None;
    }
    let bar = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
        bar.set_style(style);
    }
    bar.set_message(message.to_owned());
    bar.enable_steady_tick(Duration::from_millis(100));
    Some(bar)
}

/// Await `fut` behind a spinner.
pub async fn with_spinner<F: Future>(message: &str, global: &GlobalOpts, fut: F) -> F::Output {
    let bar = spinner(message, global);
    let out = fut.await;
    if let Some(bar) = bar {
        bar.finish_and_clear();
    }
    out
}

// ── Lists ────────────────────────────────────────────────────────────

/// Translate list flags into a `ListQuery`, rejecting unknown sort keys.
pub fn list_query<T: Record>(args: &ListArgs, default_page_size: usize) -> Result<ListQuery, CliError> {
    let page_size = if args.all {
        usize::MAX
    } else {
        args.page_size
            .map_or(default_page_size, |n| usize::try_from(n).unwrap_or(default_page_size))
    };

    let mut query = ListQuery::default()
        .with_page(usize::try_from(args.page).unwrap_or(1))
        .with_page_size(page_size);

    if let Some(ref term) = args.search {
        query = query.with_search(term.clone());
    }
    for (key, value) in &args.filter {
        query = query.with_filter(key.clone(), value.clone());
    }
    if let Some(ref key) = args.sort {
        if !T::SORT_FIELDS.contains(&key.as_str()) {
            return Err(CliError::Validation {
                field: "sort".into(),
                reason: format!(
                    "cannot sort {} by '{key}'. Valid keys: {}",
                    T::KIND.to_lowercase(),
                    T::SORT_FIELDS.join(", ")
                ),
            });
        }
        let direction = if args.desc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        query = query.sorted_by(key.clone(), direction);
    }
    Ok(query)
}

/// Report the outcome of a list load: an initial failure becomes the
/// command's error, a failed refresh is a notice, and a requested page
/// past the end (already reset to 1) is mentioned.
pub fn finish_load<T: Record>(
    page: &mut ListPage<T>,
    requested_page: usize,
    palette: Palette,
) -> Result<(), CliError> {
    if let Some(err) = page.take_error() {
        return Err(err.into());
    }
    if let Some(notice) = page.take_notice() {
        output::print_notice(&notice, palette);
    }
    if page.query().page != requested_page {
        eprintln!(
            "{}",
            palette.dim(&format!(
                "page {requested_page} is out of range, showing page {}",
                page.query().page
            ))
        );
    }
    Ok(())
}

/// Render the current view of a loaded list to stdout.
pub fn print_page<T, R>(
    page: &mut ListPage<T>,
    global: &GlobalOpts,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<(), CliError>
where
    T: Record + Serialize,
    R: Tabled,
{
    let page_size = page.query().page_size;
    let view = page.view();
    let out = output::render_page(global.output, &view, page_size, to_row, id_fn)?;
    output::print_output(&out, global.quiet);
    Ok(())
}

/// The common `list` subcommand: fetch the full collection, reconcile it
/// against the flags, and print one page.
pub async fn list<T, R, Fut>(
    console: &Console,
    args: &ListArgs,
    global: &GlobalOpts,
    fetch: Fut,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<(), CliError>
where
    T: Record + Serialize,
    R: Tabled,
    Fut: Future<Output = Result<Vec<T>, api::Error>>,
{
    let query = list_query::<T>(args, console.config().page_size)?;
    let requested = query.page;
    let mut page = ListPage::new(query);
    let label = format!("Loading {}s", T::KIND.to_lowercase());
    with_spinner(&label, global, console.load(&mut page, fetch)).await;
    finish_load(&mut page, requested, palette(console, global))?;
    print_page(&mut page, global, to_row, id_fn)
}
