//! Interactive list browsing driven by stdin.
//!
//! Each plain line is treated as the current contents of the search box and
//! fed through the search debouncer, so a burst of lines only re-renders
//! once the input goes quiet. Lines starting with `:` are commands.

use std::future::Future;

use serde::Serialize;
use tabled::Tabled;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::debug;

use stockdesk_core::api;
use stockdesk_core::{Console, ListPage, Record, SearchDebouncer};

use crate::cli::{BrowseArgs, BrowseResource, GlobalOpts, ListArgs};
use crate::error::CliError;

use super::branches::BranchRow;
use super::modules::ModuleRow;
use super::teachers::TeacherRow;
use super::util;

const HELP: &str = "type to search, :n next page, :p previous page, :sort KEY, :r reload, :q quit";

/// One parsed `:` command.
#[derive(Debug, PartialEq, Eq)]
enum Action<'a> {
    Next,
    Prev,
    Sort(&'a str),
    Reload,
    Quit,
    Unknown(&'a str),
}

fn parse_action(line: &str) -> Action<'_> {
    let line = line.trim();
    match line.split_once(char::is_whitespace) {
        Some(("sort", key)) => Action::Sort(key.trim()),
        _ => match line {
            "n" | "next" => Action::Next,
            "p" | "prev" => Action::Prev,
            "r" | "reload" => Action::Reload,
            "q" | "quit" => Action::Quit,
            other => Action::Unknown(other),
        },
    }
}

pub async fn handle(console: &Console, args: BrowseArgs, global: &GlobalOpts) -> Result<(), CliError> {
    let palette = util::palette(console, global);
    let list = ListArgs {
        search: None,
        filter: Vec::new(),
        sort: None,
        desc: false,
        page: 1,
        page_size: args.page_size,
        all: false,
    };

    match args.resource {
        BrowseResource::Branches => {
            browse(
                console,
                global,
                &list,
                || console.api().list_branches(),
                |b| BranchRow::new(b, palette),
                |b| b.code.clone(),
            )
            .await
        }
        BrowseResource::Teachers => {
            browse(
                console,
                global,
                &list,
                || console.api().list_teachers(),
                |t| TeacherRow::new(t, palette),
                |t| t.username.clone(),
            )
            .await
        }
        BrowseResource::Modules => {
            browse(
                console,
                global,
                &list,
                || console.api().list_modules(),
                |m| ModuleRow::new(m, palette),
                |m| m.code.clone(),
            )
            .await
        }
    }
}

#[allow(clippy::too_many_lines)]
async fn browse<T, R, F, Fut>(
    console: &Console,
    global: &GlobalOpts,
    list: &ListArgs,
    fetch: F,
    to_row: impl Fn(&T) -> R + Copy,
    id_fn: impl Fn(&T) -> String + Copy,
) -> Result<(), CliError>
where
    T: Record + Serialize,
    R: Tabled,
    F: Fn() -> Fut,
    Fut: Future<Output = Result<Vec<T>, api::Error>>,
{
    let palette = util::palette(console, global);
    let query = util::list_query::<T>(list, console.config().page_size)?;
    let mut page = ListPage::new(query);

    util::with_spinner("Loading", global, console.load(&mut page, fetch())).await;
    util::finish_load(&mut page, 1, palette)?;
    eprintln!("{}", palette.dim(HELP));
    util::print_page(&mut page, global, to_row, id_fn)?;

    let mut debouncer = SearchDebouncer::spawn(
        console.config().search_debounce,
        console.cancel_token().child_token(),
    );
    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    // Lines pushed since the last committed term.
    let mut pending = false;

    loop {
        tokio::select! {
            line = lines.next_line() => {
                let Some(line) = line? else { break };
                if !line.starts_with(':') {
                    debouncer.push(line);
                    pending = true;
                    continue;
                }
                match parse_action(&line[1..]) {
                    Action::Quit => break,
                    Action::Next => {
                        let next = page.query().page + 1;
                        page.set_page(next);
                    }
                    Action::Prev => {
                        let prev = page.query().page.saturating_sub(1);
                        page.set_page(prev);
                    }
                    Action::Sort(key) if T::SORT_FIELDS.contains(&key) => page.sort_by(key),
                    Action::Sort(key) => {
                        eprintln!(
                            "{}",
                            palette.dim(&format!(
                                "cannot sort by '{key}'. Valid keys: {}",
                                T::SORT_FIELDS.join(", ")
                            ))
                        );
                        continue;
                    }
                    Action::Reload => {
                        console.load(&mut page, fetch()).await;
                        if let Some(notice) = page.take_notice() {
                            crate::output::print_notice(&notice, palette);
                        }
                    }
                    Action::Unknown(other) => {
                        eprintln!("{}", palette.dim(&format!("unknown command ':{other}' ({HELP})")));
                        continue;
                    }
                }
                util::print_page(&mut page, global, to_row, id_fn)?;
            }

            Some(term) = debouncer.next() => {
                debug!(term = %term, "search committed");
                pending = false;
                page.set_search(term);
                util::print_page(&mut page, global, to_row, id_fn)?;
            }
        }
    }

    // Input ended mid-burst: let the last term settle before leaving.
    if pending {
        let settle = console.config().search_debounce * 2;
        if let Ok(Some(term)) = tokio::time::timeout(settle, debouncer.next()).await {
            page.set_search(term);
            util::print_page(&mut page, global, to_row, id_fn)?;
        }
    }
    debouncer.shutdown();
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn commands_parse() {
        assert_eq!(parse_action("n"), Action::Next);
        assert_eq!(parse_action(" prev "), Action::Prev);
        assert_eq!(parse_action("sort name"), Action::Sort("name"));
        assert_eq!(parse_action("q"), Action::Quit);
        assert_eq!(parse_action("zz"), Action::Unknown("zz"));
    }
}
