//! Command dispatch: bridges CLI args -> console calls -> output formatting.

pub mod auth;
pub mod branches;
pub mod browse;
pub mod config_cmd;
pub mod logs;
pub mod modules;
pub mod print;
pub mod stock;
pub mod teachers;
pub mod theme;
pub mod util;

use stockdesk_core::Console;

use crate::cli::{Command, GlobalOpts};
use crate::error::CliError;

/// Dispatch a backend-bound command to the appropriate handler.
pub async fn dispatch(
    cmd: Command,
    console: &Console,
    profile_name: &str,
    global: &GlobalOpts,
) -> Result<(), CliError> {
    match cmd {
        Command::Login(args) => auth::login(console, profile_name, args, global).await,
        Command::Logout => auth::logout(console, profile_name, global).await,
        Command::Whoami => auth::whoami(console, global).await,
        Command::Branches(args) => branches::handle(console, args, global).await,
        Command::Teachers(args) => teachers::handle(console, args, global).await,
        Command::Modules(args) => modules::handle(console, args, global).await,
        Command::Stock(args) => stock::handle(console, args, global).await,
        Command::Logs(args) => logs::handle(console, args, global).await,
        Command::Print(args) => print::handle(console, args, global).await,
        Command::Browse(args) => browse::handle(console, args, global).await,
        // Client-side commands are handled before a console exists
        Command::Theme(_) | Command::Config(_) | Command::Completions(_) => unreachable!(),
    }
}
