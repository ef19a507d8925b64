//! Clap derive structures for the `stockdesk` CLI.
//!
//! Defines the complete command tree, global flags, and shared types.
//! This file is also compiled by `build.rs` for man pages, so it may only
//! depend on clap and clap_complete.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};

// ── Top-Level CLI ────────────────────────────────────────────────────

/// stockdesk -- administration console for certificate and medal stock
#[derive(Debug, Parser)]
#[command(
    name = "stockdesk",
    version,
    about = "Manage certificate and medal stock from the command line",
    long_about = "Administration console for a certificate/medal stock backend.\n\n\
        Manages branches, teacher accounts, learning modules, stock batches,\n\
        stock migrations between branches, activity logs, and certificate printing.",
    propagate_version = true,
    subcommand_required = true,
    arg_required_else_help = true
)]
pub struct Cli {
    #[command(flatten)]
    pub global: GlobalOpts,

    #[command(subcommand)]
    pub command: Command,
}

// ── Global Options ───────────────────────────────────────────────────

#[derive(Debug, Args)]
pub struct GlobalOpts {
    /// Backend profile to use
    #[arg(long, short = 'p', env = "STOCKDESK_PROFILE", global = true)]
    pub profile: Option<String>,

    /// API base URL (overrides profile)
    #[arg(long, short = 'u', env = "STOCKDESK_API_URL", global = true)]
    pub api_url: Option<String>,

    /// Session token (overrides the stored one)
    #[arg(long, env = "STOCKDESK_TOKEN", global = true, hide_env_values = true)]
    pub token: Option<String>,

    /// Output format
    #[arg(
        long,
        short = 'o',
        env = "STOCKDESK_OUTPUT",
        default_value = "table",
        global = true
    )]
    pub output: OutputFormat,

    /// When to use color output
    #[arg(long, default_value = "auto", global = true)]
    pub color: ColorMode,

    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(long, short = 'v', action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress non-error output
    #[arg(long, short = 'q', global = true)]
    pub quiet: bool,

    /// Skip confirmation prompts
    #[arg(long, short = 'y', global = true)]
    pub yes: bool,

    /// Accept self-signed TLS certificates
    #[arg(long, short = 'k', env = "STOCKDESK_INSECURE", global = true)]
    pub insecure: bool,

    /// Request timeout in seconds (overrides profile)
    #[arg(long, env = "STOCKDESK_TIMEOUT", global = true)]
    pub timeout: Option<u64>,

    /// Also write logs to this file
    #[arg(long, env = "STOCKDESK_LOG_FILE", global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

// ── Output & Color Enums ─────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Pretty table (default, interactive)
    Table,
    /// Pretty-printed JSON
    Json,
    /// Compact single-line JSON
    JsonCompact,
    /// YAML
    Yaml,
    /// Plain text, one value per line (scripting)
    Plain,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ColorMode {
    /// Auto-detect (color if terminal is interactive)
    Auto,
    /// Always emit color codes
    Always,
    /// Never emit color codes
    Never,
}

// ── Top-Level Command Enum ───────────────────────────────────────────

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in and store the session token
    Login(LoginArgs),

    /// End the session and forget the stored token
    Logout,

    /// Show the logged-in user
    Whoami,

    /// Manage branches and regional hubs
    #[command(alias = "br", alias = "b")]
    Branches(BranchesArgs),

    /// Manage teacher accounts
    #[command(alias = "t")]
    Teachers(TeachersArgs),

    /// Manage learning modules
    #[command(alias = "mod", alias = "m")]
    Modules(ModulesArgs),

    /// Certificate and medal stock: batches, summary, migrations
    #[command(alias = "st")]
    Stock(StockArgs),

    /// Browse the activity log
    Logs(LogsArgs),

    /// Print certificates and view print history
    Print(PrintArgs),

    /// Interactively search a list (one query per line on stdin)
    Browse(BrowseArgs),

    /// Show or change the color theme
    Theme(ThemeArgs),

    /// Manage CLI configuration and profiles
    Config(ConfigArgs),

    /// Generate shell completions
    Completions(CompletionsArgs),
}

// ── Shared List Arguments ────────────────────────────────────────────

/// Shared search, filter, sort, and paging arguments for list commands.
#[derive(Debug, Clone, Args)]
pub struct ListArgs {
    /// Case-insensitive text search
    #[arg(long, short = 's')]
    pub search: Option<String>,

    /// Field filter as KEY=VALUE (repeatable), e.g. "is_active=true"
    #[arg(long, short = 'f', value_parser = parse_key_val)]
    pub filter: Vec<(String, String)>,

    /// Sort by this field
    #[arg(long)]
    pub sort: Option<String>,

    /// Sort descending
    #[arg(long, requires = "sort")]
    pub desc: bool,

    /// Page to show (1-based)
    #[arg(long, default_value = "1", value_parser = clap::value_parser!(u32).range(1..))]
    pub page: u32,

    /// Rows per page (overrides config)
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..=500))]
    pub page_size: Option<u32>,

    /// Show every matching row on one page
    #[arg(long, short = 'a', conflicts_with_all = ["page", "page_size"])]
    pub all: bool,
}

/// Parse a `KEY=VALUE` pair.
pub fn parse_key_val(raw: &str) -> Result<(String, String), String> {
    let (key, value) = raw
        .split_once('=')
        .ok_or_else(|| format!("expected KEY=VALUE, got '{raw}'"))?;
    let key = key.trim();
    if key.is_empty() {
        return Err(format!("missing key in '{raw}'"));
    }
    Ok((key.to_owned(), value.trim().to_owned()))
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  SESSION
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username (prompted when omitted)
    #[arg(long)]
    pub username: Option<String>,

    /// Read the password from the first line of stdin
    #[arg(long)]
    pub password_stdin: bool,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BRANCHES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BranchesArgs {
    #[command(subcommand)]
    pub command: BranchesCommand,
}

#[derive(Debug, Subcommand)]
pub enum BranchesCommand {
    /// List branches
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show branch details
    Get {
        /// Branch ID
        id: String,
    },

    /// Create a branch
    Create(BranchFields),

    /// Update a branch (unset flags keep their current value)
    Update {
        /// Branch ID
        id: String,

        #[command(flatten)]
        fields: BranchFields,
    },

    /// Delete a branch
    #[command(alias = "rm")]
    Delete {
        /// Branch ID
        id: String,
    },

    /// Activate or deactivate a branch
    Toggle {
        /// Branch ID
        id: String,
    },

    /// List branch picker options
    Options,
}

#[derive(Debug, Clone, Default, Args)]
pub struct BranchFields {
    /// Branch code, e.g. "SND"
    #[arg(long)]
    pub code: Option<String>,

    /// Branch name
    #[arg(long)]
    pub name: Option<String>,

    /// Mark as a head branch (its own regional hub)
    #[arg(long, num_args = 0..=1, default_missing_value = "true")]
    pub head: Option<bool>,

    /// Regional hub code (required for regular branches)
    #[arg(long)]
    pub hub: Option<String>,

    /// Street address
    #[arg(long)]
    pub address: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  TEACHERS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct TeachersArgs {
    #[command(subcommand)]
    pub command: TeachersCommand,
}

#[derive(Debug, Subcommand)]
pub enum TeachersCommand {
    /// List teachers
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show teacher details
    Get {
        /// Teacher ID
        id: String,
    },

    /// Create a teacher account (the password is generated by the server)
    Create(TeacherFields),

    /// Update a teacher (unset flags keep their current value)
    Update {
        /// Teacher ID
        id: String,

        #[command(flatten)]
        fields: TeacherFields,
    },

    /// Delete a teacher account
    #[command(alias = "rm")]
    Delete {
        /// Teacher ID
        id: String,
    },

    /// Generate a new password for a teacher
    ResetPassword {
        /// Teacher ID
        id: String,
    },

    /// Activate or deactivate a teacher
    Toggle {
        /// Teacher ID
        id: String,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct TeacherFields {
    /// Login name
    #[arg(long)]
    pub username: Option<String>,

    /// Full name
    #[arg(long)]
    pub full_name: Option<String>,

    /// Email address
    #[arg(long)]
    pub email: Option<String>,

    /// Phone number
    #[arg(long)]
    pub phone: Option<String>,

    /// Branch code
    #[arg(long)]
    pub branch: Option<String>,

    /// Division
    #[arg(long)]
    pub division: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  MODULES
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ModulesArgs {
    #[command(subcommand)]
    pub command: ModulesCommand,
}

#[derive(Debug, Subcommand)]
pub enum ModulesCommand {
    /// List learning modules
    #[command(alias = "ls")]
    List(ListArgs),

    /// Show module details
    Get {
        /// Module ID
        id: String,
    },

    /// Create a module
    Create(ModuleFields),

    /// Update a module (unset flags keep their current value)
    Update {
        /// Module ID
        id: String,

        #[command(flatten)]
        fields: ModuleFields,
    },

    /// Delete a module
    #[command(alias = "rm")]
    Delete {
        /// Module ID
        id: String,
    },
}

#[derive(Debug, Clone, Default, Args)]
pub struct ModuleFields {
    /// Module code
    #[arg(long)]
    pub code: Option<String>,

    /// Module name
    #[arg(long)]
    pub name: Option<String>,

    /// Description
    #[arg(long)]
    pub description: Option<String>,

    /// Division
    #[arg(long)]
    pub division: Option<String>,

    /// Minimum student age
    #[arg(long, allow_negative_numbers = true)]
    pub min_age: Option<i64>,

    /// Maximum student age
    #[arg(long, allow_negative_numbers = true)]
    pub max_age: Option<i64>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  STOCK
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct StockArgs {
    #[command(subcommand)]
    pub command: StockCommand,
}

#[derive(Debug, Subcommand)]
pub enum StockCommand {
    /// List stock batches received by branches
    Batches(ListArgs),

    /// Record a new stock batch for a branch
    Add(BatchFields),

    /// Current certificate and medal stock per branch
    Summary(ListArgs),

    /// Move stock from one branch to another
    Migrate(MigrationFields),

    /// Stock migration history
    Migrations(ListArgs),
}

#[derive(Debug, Clone, Args)]
pub struct BatchFields {
    /// Receiving branch code
    #[arg(long)]
    pub branch: String,

    /// Number of certificates
    #[arg(long, allow_negative_numbers = true)]
    pub certificates: Option<i64>,

    /// Number of medals
    #[arg(long, allow_negative_numbers = true)]
    pub medals: Option<i64>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

#[derive(Debug, Clone, Args)]
pub struct MigrationFields {
    /// Source branch code
    #[arg(long)]
    pub from: String,

    /// Destination branch code
    #[arg(long)]
    pub to: String,

    /// Number of certificates
    #[arg(long, allow_negative_numbers = true)]
    pub certificates: Option<i64>,

    /// Number of medals
    #[arg(long, allow_negative_numbers = true)]
    pub medals: Option<i64>,

    /// Free-form notes
    #[arg(long)]
    pub notes: Option<String>,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  LOGS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct LogsArgs {
    /// Only entries with this action (e.g. CREATE, MIGRATE)
    #[arg(long)]
    pub action: Option<String>,

    /// Only entries for this branch code
    #[arg(long)]
    pub branch: Option<String>,

    #[command(flatten)]
    pub list: ListArgs,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  PRINT
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct PrintArgs {
    #[command(subcommand)]
    pub command: PrintCommand,
}

#[derive(Debug, Subcommand)]
pub enum PrintCommand {
    /// Issue a certificate for a student (deducts branch stock)
    Certificate {
        /// Module code
        #[arg(long)]
        module: String,

        /// Student's full name
        #[arg(long)]
        student: String,

        /// Print date, YYYY-MM-DD (defaults to today on the server)
        #[arg(long)]
        date: Option<String>,
    },

    /// Certificates printed so far
    History(ListArgs),
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  BROWSE
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct BrowseArgs {
    /// List to browse
    pub resource: BrowseResource,

    /// Rows per page (overrides config)
    #[arg(long, short = 'l', value_parser = clap::value_parser!(u32).range(1..=500))]
    pub page_size: Option<u32>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum BrowseResource {
    Branches,
    Teachers,
    Modules,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  THEME
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ThemeArgs {
    #[command(subcommand)]
    pub command: Option<ThemeCommand>,
}

#[derive(Debug, Subcommand)]
pub enum ThemeCommand {
    /// Show the current theme (default)
    Show,

    /// Switch between light and dark
    Toggle,

    /// Set the theme explicitly
    Set {
        /// Theme name
        theme: ThemeName,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum ThemeName {
    Light,
    Dark,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  CONFIG
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommand,
}

#[derive(Debug, Subcommand)]
pub enum ConfigCommand {
    /// Create initial config file with guided setup
    Init,

    /// Display current configuration (secrets masked)
    Show,

    /// Set a value on the active profile
    Set {
        /// Profile key: api_url, token_env, username, ca_cert, insecure, timeout
        key: String,

        /// Value to set
        value: String,
    },

    /// List configured profiles
    Profiles,

    /// Set the default profile
    Use {
        /// Profile name to set as default
        name: String,
    },

    /// Print the config file path
    Path,
}

// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━
//  COMPLETIONS
// ━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━━

#[derive(Debug, Args)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    pub shell: clap_complete::Shell,
}
