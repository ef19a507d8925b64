// ── Input validators ──
//
// Shared patterns used by the form schemas and by CLI argument parsing.

use std::sync::LazyLock;

use chrono::NaiveDate;
use regex::Regex;

/// Branch and module codes: 2–10 uppercase letters, digits, or dashes.
pub static CODE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[A-Z0-9][A-Z0-9-]{1,9}$").expect("code pattern"));

/// Teacher login names: 3–30 lowercase letters, digits, dots, underscores.
pub static USERNAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^[a-z0-9._]{3,30}$").expect("username pattern"));

pub static EMAIL: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern")
});

/// Local or international phone numbers, optional spaces and dashes.
pub static PHONE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\+?[0-9][0-9 \-]{6,18}[0-9]$").expect("phone pattern"));

pub fn is_valid_code(value: &str) -> bool {
    CODE.is_match(value.trim())
}

pub fn is_valid_username(value: &str) -> bool {
    USERNAME.is_match(value.trim())
}

pub fn is_valid_email(value: &str) -> bool {
    EMAIL.is_match(value.trim())
}

pub fn is_valid_phone(value: &str) -> bool {
    PHONE.is_match(value.trim())
}

/// Parse a `YYYY-MM-DD` calendar date.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(value.trim(), "%Y-%m-%d").ok()
}

/// Normalise a code as typed: trimmed and uppercased.
pub fn normalize_code(value: &str) -> String {
    value.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes() {
        assert!(is_valid_code("SND"));
        assert!(is_valid_code("JKT-01"));
        assert!(!is_valid_code("s"));
        assert!(!is_valid_code("snd"));
        assert!(!is_valid_code("-SND"));
    }

    #[test]
    fn usernames() {
        assert!(is_valid_username("rina.putri"));
        assert!(!is_valid_username("Rina"));
        assert!(!is_valid_username("ab"));
    }

    #[test]
    fn emails_and_phones() {
        assert!(is_valid_email("rina@example.com"));
        assert!(!is_valid_email("rina@example"));
        assert!(is_valid_phone("+62 812-3456-7890"));
        assert!(!is_valid_phone("12-34"));
    }

    #[test]
    fn dates() {
        assert!(parse_date("2024-02-29").is_some());
        assert!(parse_date("2023-02-29").is_none());
        assert_eq!(normalize_code(" snd "), "SND");
    }
}
