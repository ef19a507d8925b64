// ── Record model ──
//
// The list reconciler is generic over `Record`: each entity type names the
// fields search runs against and exposes any field as a typed `Cell` so
// sorting and filtering can compare values by kind instead of by string.

mod records;

use std::cmp::Ordering;

use chrono::{DateTime, NaiveDate, Utc};

pub use stockdesk_api::EntityId;

/// A typed field value pulled out of a record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Cell {
    Text(String),
    Int(i64),
    Bool(bool),
    Date(DateTime<Utc>),
    List(Vec<String>),
    Empty,
}

impl Cell {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn opt_text(value: Option<&str>) -> Self {
        value.map_or(Self::Empty, Self::text)
    }

    pub fn opt_date(value: Option<DateTime<Utc>>) -> Self {
        value.map_or(Self::Empty, Self::Date)
    }

    pub fn count(value: u64) -> Self {
        Self::Int(i64::try_from(value).unwrap_or(i64::MAX))
    }

    /// Rank used when two cells of different kinds meet. Empty sorts first.
    fn kind_rank(&self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::Bool(_) => 1,
            Self::Int(_) => 2,
            Self::Date(_) => 3,
            Self::Text(_) => 4,
            Self::List(_) => 5,
        }
    }

    /// Type-aware ordering: dates by timestamp, strings case-insensitively,
    /// booleans as 0/1, integers numerically.
    pub fn compare(&self, other: &Self) -> Ordering {
        match (self, other) {
            (Self::Text(a), Self::Text(b)) => a.to_lowercase().cmp(&b.to_lowercase()),
            (Self::Int(a), Self::Int(b)) => a.cmp(b),
            (Self::Bool(a), Self::Bool(b)) => u8::from(*a).cmp(&u8::from(*b)),
            (Self::Date(a), Self::Date(b)) => a.cmp(b),
            (Self::List(a), Self::List(b)) => a.join(",").to_lowercase().cmp(&b.join(",").to_lowercase()),
            _ => self.kind_rank().cmp(&other.kind_rank()),
        }
    }

    /// Case-insensitive substring match against an already-lowercased needle.
    pub fn contains_lowercase(&self, needle: &str) -> bool {
        match self {
            Self::Text(s) => s.to_lowercase().contains(needle),
            Self::List(items) => items.iter().any(|s| s.to_lowercase().contains(needle)),
            Self::Int(n) => n.to_string().contains(needle),
            Self::Date(d) => d.format("%Y-%m-%d").to_string().contains(needle),
            Self::Bool(_) | Self::Empty => false,
        }
    }

    /// Filter match: the value equals the field, or is one of the entries
    /// of a list-valued field.
    pub fn matches_filter(&self, value: &str) -> bool {
        let value = value.trim();
        match self {
            Self::Text(s) => s.eq_ignore_ascii_case(value),
            Self::List(items) => items.iter().any(|s| s.eq_ignore_ascii_case(value)),
            Self::Int(n) => value.parse::<i64>().is_ok_and(|v| v == *n),
            Self::Bool(b) => parse_flag(value).is_some_and(|v| v == *b),
            Self::Date(d) => NaiveDate::parse_from_str(value, "%Y-%m-%d")
                .map_or_else(|_| d.to_rfc3339() == value, |day| d.date_naive() == day),
            Self::Empty => value.is_empty(),
        }
    }
}

/// Parse the spellings a boolean filter may arrive in.
pub fn parse_flag(value: &str) -> Option<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "true" | "1" | "yes" | "y" | "active" | "on" => Some(true),
        "false" | "0" | "no" | "n" | "inactive" | "off" => Some(false),
        _ => None,
    }
}

/// An entity the list reconciler can search, filter, and sort.
pub trait Record {
    /// Entity name used in messages ("Branch", "Teacher", ...).
    const KIND: &'static str;

    /// Fields the free-text search runs against.
    const SEARCH_FIELDS: &'static [&'static str];

    /// Fields offered as sort keys. Any field `field()` knows works; this
    /// list is what the console advertises and validates against.
    const SORT_FIELDS: &'static [&'static str];

    /// Stable identity used for optimistic upsert/remove.
    fn record_id(&self) -> EntityId;

    /// A field by name; unknown names yield `Cell::Empty`.
    fn field(&self, name: &str) -> Cell;

    /// Whether the lowercased search term hits any searchable field.
    fn matches_search(&self, needle: &str) -> bool {
        needle.is_empty()
            || Self::SEARCH_FIELDS
                .iter()
                .any(|name| self.field(name).contains_lowercase(needle))
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn text_compares_case_insensitively() {
        assert_eq!(Cell::text("alpha").compare(&Cell::text("Beta")), Ordering::Less);
        assert_eq!(Cell::text("ALPHA").compare(&Cell::text("alpha")), Ordering::Equal);
    }

    #[test]
    fn booleans_sort_as_zero_one() {
        assert_eq!(Cell::Bool(false).compare(&Cell::Bool(true)), Ordering::Less);
    }

    #[test]
    fn empty_sorts_first() {
        assert_eq!(Cell::Empty.compare(&Cell::Int(-5)), Ordering::Less);
    }

    #[test]
    fn list_filter_matches_any_entry() {
        let cell = Cell::List(vec!["SND".into(), "BKS".into()]);
        assert!(cell.matches_filter("bks"));
        assert!(!cell.matches_filter("JKT"));
    }

    #[test]
    fn bool_filter_accepts_words() {
        assert!(Cell::Bool(true).matches_filter("active"));
        assert!(Cell::Bool(false).matches_filter("no"));
        assert!(!Cell::Bool(false).matches_filter("maybe"));
    }

    #[test]
    fn date_filter_matches_calendar_day() {
        let at = DateTime::parse_from_rfc3339("2024-03-01T08:00:00Z")
            .unwrap()
            .with_timezone(&Utc);
        assert!(Cell::Date(at).matches_filter("2024-03-01"));
        assert!(!Cell::Date(at).matches_filter("2024-03-02"));
    }
}
