use indexmap::IndexMap;
use serde::Serialize;
use strum::{Display, EnumString};

pub const DEFAULT_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Display, EnumString)]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    pub fn toggled(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }
}

/// What the user asked to see: search term, field filters, sort, and page.
///
/// Filters keep insertion order so they render the way they were entered.
/// A filter whose value is empty is treated as inactive.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ListQuery {
    pub search_term: String,
    pub filters: IndexMap<String, String>,
    pub sort_key: Option<String>,
    pub sort_direction: SortDirection,
    pub page: usize,
    pub page_size: usize,
}

impl Default for ListQuery {
    fn default() -> Self {
        Self {
            search_term: String::new(),
            filters: IndexMap::new(),
            sort_key: None,
            sort_direction: SortDirection::Asc,
            page: 1,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl ListQuery {
    pub fn with_search(mut self, term: impl Into<String>) -> Self {
        self.search_term = term.into();
        self
    }

    pub fn with_filter(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.filters.insert(key.into(), value.into());
        self
    }

    pub fn sorted_by(mut self, key: impl Into<String>, direction: SortDirection) -> Self {
        self.sort_key = Some(key.into());
        self.sort_direction = direction;
        self
    }

    pub fn with_page(mut self, page: usize) -> Self {
        self.page = page.max(1);
        self
    }

    pub fn with_page_size(mut self, page_size: usize) -> Self {
        self.page_size = page_size.max(1);
        self
    }

    /// Filters with a non-empty value.
    pub fn active_filters(&self) -> impl Iterator<Item = (&str, &str)> {
        self.filters
            .iter()
            .map(|(k, v)| (k.as_str(), v.trim()))
            .filter(|(_, v)| !v.is_empty())
    }

    /// The trimmed, lowercased search term (empty when no search).
    pub fn search_needle(&self) -> String {
        self.search_term.trim().to_lowercase()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_filters_are_inactive() {
        let query = ListQuery::default()
            .with_filter("is_active", "true")
            .with_filter("regional_hub", "  ");
        let active: Vec<_> = query.active_filters().collect();
        assert_eq!(active, vec![("is_active", "true")]);
    }

    #[test]
    fn page_and_size_never_zero() {
        let query = ListQuery::default().with_page(0).with_page_size(0);
        assert_eq!((query.page, query.page_size), (1, 1));
    }

    #[test]
    fn direction_parses_case_insensitively() {
        assert_eq!("DESC".parse::<SortDirection>().ok(), Some(SortDirection::Desc));
        assert_eq!(SortDirection::Desc.toggled(), SortDirection::Asc);
    }
}
