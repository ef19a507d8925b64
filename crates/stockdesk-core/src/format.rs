// ── Display formatting ──
//
// Small helpers shared by every table and detail view.

use chrono::{DateTime, Local, Utc};

/// `2024-03-01`, or `-` when absent.
pub fn date(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(|| "-".into(), |d| d.with_timezone(&Local).format("%Y-%m-%d").to_string())
}

/// `2024-03-01 08:00`, or `-` when absent.
pub fn datetime(value: Option<DateTime<Utc>>) -> String {
    value.map_or_else(
        || "-".into(),
        |d| d.with_timezone(&Local).format("%Y-%m-%d %H:%M").to_string(),
    )
}

/// Thousands separators: `12345` → `12,345`.
pub fn count(value: u64) -> String {
    let digits = value.to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

pub fn active_label(active: bool) -> &'static str {
    if active { "active" } else { "inactive" }
}

pub fn yes_no(value: bool) -> &'static str {
    if value { "yes" } else { "no" }
}

/// `-` for missing optional text.
pub fn or_dash(value: Option<&str>) -> String {
    match value {
        Some(s) if !s.trim().is_empty() => s.to_owned(),
        _ => "-".into(),
    }
}

/// Cut to `max` characters, ending in `…` when shortened.
pub fn truncate(value: &str, max: usize) -> String {
    if value.chars().count() <= max {
        return value.to_owned();
    }
    let mut out: String = value.chars().take(max.saturating_sub(1)).collect();
    out.push('…');
    out
}

/// `Showing 11–20 of 57` style summary for a page.
pub fn page_summary(page: usize, page_size: usize, shown: usize, total: usize) -> String {
    if total == 0 {
        return "No results".into();
    }
    let first = (page.max(1) - 1).saturating_mul(page_size).saturating_add(1);
    let last = first.saturating_add(shown.saturating_sub(1));
    format!("Showing {first}–{last} of {total}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn counts_get_separators() {
        assert_eq!(count(0), "0");
        assert_eq!(count(999), "999");
        assert_eq!(count(1_000), "1,000");
        assert_eq!(count(1_234_567), "1,234,567");
    }

    #[test]
    fn truncation() {
        assert_eq!(truncate("Sunda Kelapa", 20), "Sunda Kelapa");
        assert_eq!(truncate("Sunda Kelapa", 6), "Sunda…");
    }

    #[test]
    fn page_summaries() {
        assert_eq!(page_summary(2, 10, 10, 57), "Showing 11–20 of 57");
        assert_eq!(page_summary(6, 10, 7, 57), "Showing 51–57 of 57");
        assert_eq!(page_summary(1, 10, 0, 0), "No results");
    }

    #[test]
    fn unbounded_page_size_does_not_overflow() {
        assert_eq!(page_summary(1, usize::MAX, 3, 3), "Showing 1–3 of 3");
        let far = page_summary(2, usize::MAX, 1, 500);
        assert!(far.ends_with("of 500"));
    }

    #[test]
    fn missing_values() {
        assert_eq!(date(None), "-");
        assert_eq!(or_dash(Some("  ")), "-");
        assert_eq!(active_label(false), "inactive");
    }
}
