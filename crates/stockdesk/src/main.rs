mod cli;
mod commands;
mod config;
mod error;
mod output;

use clap::Parser;
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

use stockdesk_core::Console;

use crate::cli::{Cli, Command, GlobalOpts};
use crate::error::CliError;

#[tokio::main]
async fn main() {
    // Parse CLI arguments
    let cli = Cli::parse();

    // Setup tracing based on verbosity; the guard flushes the log file on exit
    let _guard = init_tracing(&cli.global);

    // Dispatch and handle errors with proper exit codes
    if let Err(err) = run(cli).await {
        let code = err.exit_code();
        eprintln!("{:?}", miette::Report::new(err));
        std::process::exit(code);
    }
}

fn init_tracing(global: &GlobalOpts) -> Option<WorkerGuard> {
    let level = match global.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = || {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| {
            EnvFilter::new(format!(
                "stockdesk={level},stockdesk_core={level},stockdesk_api={level},stockdesk_config={level}"
            ))
        })
    };

    let stderr = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_filter(filter());

    let (file, guard) = match global.log_file.as_deref() {
        Some(path) => {
            let dir = path
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .unwrap_or(std::path::Path::new("."));
            let name = path
                .file_name()
                .unwrap_or(std::ffi::OsStr::new("stockdesk.log"));
            let (writer, guard) =
                tracing_appender::non_blocking(tracing_appender::rolling::never(dir, name));
            let layer = fmt::layer()
                .with_writer(writer)
                .with_ansi(false)
                .with_target(true)
                .with_filter(filter());
            (Some(layer), Some(guard))
        }
        None => (None, None),
    };

    tracing_subscriber::registry().with(stderr).with(file).init();
    guard
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let global = cli.global;
    match cli.command {
        // Config commands don't need a backend connection
        Command::Config(args) => commands::config_cmd::handle(args, &global),

        // Neither does the client-side theme
        Command::Theme(args) => commands::theme::handle(args, &global),

        // Shell completions generation
        Command::Completions(args) => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Cli::command();
            generate(args.shell, &mut cmd, "stockdesk", &mut std::io::stdout());
            Ok(())
        }

        // All other commands talk to the backend
        cmd => {
            let cfg = config::load_config_or_default();
            let (profile_name, console_config) = config::resolve_console_config(&global, &cfg)?;
            let console = Console::new(console_config)?;
            let is_login = matches!(cmd, Command::Login(_));

            tracing::debug!(command = ?cmd, profile = %profile_name, "dispatching command");
            let result = commands::dispatch(cmd, &console, &profile_name, &global).await;

            // A rejected session token is useless from here on.
            if let Err(ref err) = result {
                if err.is_session_expired() && !is_login && global.token.is_none() {
                    if let Err(e) = config::forget_session(&profile_name) {
                        tracing::warn!(error = %e, "could not clear the stored session");
                    }
                }
            }
            result
        }
    }
}
