//! Output formatting: table, JSON, YAML, plain.
//!
//! Renders data in the format selected by `--output`. Table uses `tabled`,
//! structured formats use serde, plain emits one identifier per line.
//! Status colours follow the persisted light/dark theme.

use std::io::{self, IsTerminal, Write};

use owo_colors::OwoColorize;
use serde::Serialize;
use tabled::{Table, Tabled, settings::Style};

use stockdesk_core::{Notice, NoticeLevel, PageResult, Theme, format};

use crate::cli::{ColorMode, OutputFormat};
use crate::error::CliError;

// ── Colours ──────────────────────────────────────────────────────────

/// Determine whether color output should be enabled.
pub fn should_color(mode: ColorMode) -> bool {
    match mode {
        ColorMode::Always => true,
        ColorMode::Never => false,
        ColorMode::Auto => io::stdout().is_terminal() && std::env::var("NO_COLOR").is_err(),
    }
}

/// Theme-aware colouring for status cells and notices.
#[derive(Debug, Clone, Copy)]
pub struct Palette {
    enabled: bool,
    theme: Theme,
}

impl Palette {
    pub fn new(mode: ColorMode, theme: Theme) -> Self {
        Self {
            enabled: should_color(mode),
            theme,
        }
    }

    pub fn plain() -> Self {
        Self {
            enabled: false,
            theme: Theme::Light,
        }
    }

    /// `active` / `inactive`, green or red.
    pub fn active(self, active: bool) -> String {
        let label = format::active_label(active);
        if !self.enabled {
            return label.to_owned();
        }
        match (active, self.theme.is_dark()) {
            (true, true) => label.bright_green().to_string(),
            (true, false) => label.green().to_string(),
            (false, true) => label.bright_red().to_string(),
            (false, false) => label.red().to_string(),
        }
    }

    /// Stock counts: zero is highlighted as a warning.
    pub fn count(self, value: u64) -> String {
        let text = format::count(value);
        if !self.enabled || value > 0 {
            return text;
        }
        if self.theme.is_dark() {
            text.bright_yellow().to_string()
        } else {
            text.yellow().to_string()
        }
    }

    pub fn emphasis(self, text: &str) -> String {
        if !self.enabled {
            return text.to_owned();
        }
        if self.theme.is_dark() {
            text.bright_cyan().bold().to_string()
        } else {
            text.blue().bold().to_string()
        }
    }

    pub fn dim(self, text: &str) -> String {
        if self.enabled {
            text.dimmed().to_string()
        } else {
            text.to_owned()
        }
    }

    fn notice_tag(self, level: NoticeLevel) -> String {
        let tag = match level {
            NoticeLevel::Info => "info",
            NoticeLevel::Warning => "warning",
            NoticeLevel::Error => "error",
        };
        if !self.enabled {
            return tag.to_owned();
        }
        match level {
            NoticeLevel::Info => tag.cyan().to_string(),
            NoticeLevel::Warning => tag.yellow().to_string(),
            NoticeLevel::Error => tag.red().bold().to_string(),
        }
    }
}

// ── Render dispatchers ───────────────────────────────────────────────

/// Render a list of serde-serializable + tabled items in the chosen format.
///
/// - `table`: uses the `Tabled` derive to build a pretty table
/// - `json` / `json-compact`: serializes the original data via serde
/// - `yaml`: serializes via serde_yaml
/// - `plain`: calls `id_fn` on each item to emit one identifier per line
pub fn render_list<T, R>(
    format: OutputFormat,
    data: &[T],
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            let rows: Vec<R> = data.iter().map(to_row).collect();
            Ok(render_table(&rows))
        }
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(data.iter().map(&id_fn).collect::<Vec<_>>().join("\n")),
    }
}

/// Render one reconciled page. Structured formats carry the totals along
/// with the items; tables get a "Showing x–y of n" footer.
pub fn render_page<T, R>(
    format: OutputFormat,
    page: &PageResult<&T>,
    page_size: usize,
    to_row: impl Fn(&T) -> R,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
    R: Tabled,
{
    match format {
        OutputFormat::Table => {
            if page.is_empty() {
                return Ok("No results".into());
            }
            let rows: Vec<R> = page.items.iter().map(|item| to_row(item)).collect();
            let mut out = render_table(&rows);
            out.push('\n');
            out.push_str(&format::page_summary(
                page.page,
                page_size,
                page.items.len(),
                page.total,
            ));
            if page.has_pages() {
                out.push_str(&format!(" (page {}/{})", page.page, page.total_pages));
            }
            Ok(out)
        }
        OutputFormat::Json => render_json(page, false),
        OutputFormat::JsonCompact => render_json(page, true),
        OutputFormat::Yaml => render_yaml(page),
        OutputFormat::Plain => Ok(page
            .items
            .iter()
            .map(|item| id_fn(item))
            .collect::<Vec<_>>()
            .join("\n")),
    }
}

/// Render a single serde-serializable item in the chosen format.
///
/// Table rendering uses a custom `detail_fn` that returns a pre-formatted
/// string, since single-item detail views don't use `Tabled` derive.
pub fn render_single<T>(
    format: OutputFormat,
    data: &T,
    detail_fn: impl Fn(&T) -> String,
    id_fn: impl Fn(&T) -> String,
) -> Result<String, CliError>
where
    T: Serialize,
{
    match format {
        OutputFormat::Table => Ok(detail_fn(data)),
        OutputFormat::Json => render_json(data, false),
        OutputFormat::JsonCompact => render_json(data, true),
        OutputFormat::Yaml => render_yaml(data),
        OutputFormat::Plain => Ok(id_fn(data)),
    }
}

/// Print the rendered output to stdout, respecting quiet mode.
pub fn print_output(output: &str, quiet: bool) {
    if quiet || output.is_empty() {
        return;
    }
    let mut stdout = io::stdout().lock();
    let _ = writeln!(stdout, "{output}");
}

/// Status line on stderr ("✓ Branch created"), suppressed by `--quiet`.
pub fn print_status(message: &str, quiet: bool) {
    if !quiet {
        eprintln!("✓ {message}");
    }
}

/// Surface a notice (e.g. a failed refresh) on stderr.
pub fn print_notice(notice: &Notice, palette: Palette) {
    eprintln!("{}: {}", palette.notice_tag(notice.level), notice.message);
}

/// Aligned `Label: value` lines for detail views.
pub fn detail_lines(pairs: &[(&str, String)]) -> String {
    let width = pairs.iter().map(|(label, _)| label.len()).max().unwrap_or(0) + 1;
    pairs
        .iter()
        .map(|(label, value)| format!("{:<width$} {value}", format!("{label}:")))
        .collect::<Vec<_>>()
        .join("\n")
}

// ── Format-specific renderers ────────────────────────────────────────

fn render_table<R: Tabled>(rows: &[R]) -> String {
    Table::new(rows).with(Style::rounded()).to_string()
}

fn render_json<T: Serialize + ?Sized>(data: &T, compact: bool) -> Result<String, CliError> {
    let rendered = if compact {
        serde_json::to_string(data)
    } else {
        serde_json::to_string_pretty(data)
    };
    rendered.map_err(|e| CliError::Render(e.to_string()))
}

fn render_yaml<T: Serialize + ?Sized>(data: &T) -> Result<String, CliError> {
    serde_yaml::to_string(data).map_err(|e| CliError::Render(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Serialize, Tabled)]
    struct Row {
        code: &'static str,
        qty: u64,
    }

    fn page(rows: &[Row]) -> PageResult<&Row> {
        PageResult {
            items: rows.iter().collect(),
            total: 12,
            total_pages: 2,
            page: 1,
        }
    }

    #[test]
    fn table_page_has_footer() {
        let rows = [Row { code: "SND", qty: 5 }, Row { code: "JKT", qty: 0 }];
        let out = render_page(OutputFormat::Table, &page(&rows), 10, |r| Row { ..*r }, |r| {
            r.code.into()
        })
        .unwrap();
        assert!(out.contains("SND"));
        assert!(out.ends_with("Showing 1–2 of 12 (page 1/2)"));
    }

    #[test]
    fn json_page_carries_totals() {
        let rows = [Row { code: "SND", qty: 5 }];
        let out = render_page(OutputFormat::JsonCompact, &page(&rows), 10, |r| Row { ..*r }, |r| {
            r.code.into()
        })
        .unwrap();
        assert_eq!(
            out,
            r#"{"items":[{"code":"SND","qty":5}],"total":12,"total_pages":2,"page":1}"#
        );
    }

    #[test]
    fn plain_emits_ids() {
        let rows = [Row { code: "SND", qty: 5 }, Row { code: "JKT", qty: 1 }];
        let out = render_list(OutputFormat::Plain, &rows, |r| Row { ..*r }, |r| r.code.into())
            .unwrap();
        assert_eq!(out, "SND\nJKT");
    }

    #[test]
    fn plain_palette_has_no_escapes() {
        let palette = Palette::plain();
        assert_eq!(palette.active(true), "active");
        assert_eq!(palette.count(0), "0");
        assert_eq!(
            detail_lines(&[("Code", "SND".into()), ("Name", "Sunda".into())]),
            "Code: SND\nName: Sunda"
        );
    }
}
