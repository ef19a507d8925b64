// Response envelope and pagination discovery.
//
// Every backend response is `{success, data, message?}` plus pagination
// metadata that lives in one of three places depending on the endpoint.
// `PaginationSource::of` settles that once per response so call sites never
// probe optional paths themselves.

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The `{success, data, message}` wrapper around every response body.
#[derive(Debug, Deserialize)]
pub struct Envelope<T> {
    #[serde(default = "default_success")]
    pub success: bool,
    pub data: Option<T>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub pagination: Option<serde_json::Value>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

fn default_success() -> bool {
    true
}

impl<T> Envelope<T> {
    /// An empty successful envelope, used for `204 No Content` answers.
    pub(crate) fn empty() -> Self {
        Self {
            success: true,
            data: None,
            message: None,
            pagination: None,
            meta: None,
        }
    }

    /// Take the payload, failing if a successful envelope carried no `data`.
    pub fn into_data(self) -> Result<T, Error> {
        self.data.ok_or_else(|| Error::Deserialization {
            message: "envelope reported success but carried no data".into(),
            body: String::new(),
        })
    }
}

/// Pagination metadata as the backend spells it.
///
/// Field names vary between endpoints (`totalPages` vs `total_pages`,
/// `total` vs `totalItems`), so every known spelling is accepted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PaginationMeta {
    #[serde(alias = "totalItems", alias = "total_items", alias = "count")]
    pub total: usize,
    #[serde(
        default,
        rename = "totalPages",
        alias = "total_pages",
        alias = "pages"
    )]
    pub total_pages: Option<usize>,
    #[serde(default, alias = "currentPage", alias = "current_page")]
    pub page: Option<usize>,
    #[serde(default, alias = "pageSize", alias = "page_size", alias = "per_page")]
    pub limit: Option<usize>,
}

/// Where a response kept its pagination metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginationSource {
    /// `response.pagination`
    TopLevel(PaginationMeta),
    /// `response.meta.pagination`
    UnderMeta(PaginationMeta),
    /// `response.meta` is itself the pagination object.
    MetaIsPagination(PaginationMeta),
    /// No pagination metadata anywhere.
    Absent,
}

/// Resolved totals for one server page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct Pagination {
    pub total: usize,
    pub total_pages: usize,
}

impl PaginationSource {
    /// Discover pagination metadata with the ordered fallback
    /// `pagination` → `meta.pagination` → `meta` → absent.
    pub fn of<T>(envelope: &Envelope<T>) -> Self {
        if let Some(meta) = envelope.pagination.as_ref().and_then(parse_meta) {
            return Self::TopLevel(meta);
        }
        if let Some(meta) = envelope.meta.as_ref() {
            if let Some(inner) = meta.get("pagination").and_then(parse_meta) {
                return Self::UnderMeta(inner);
            }
            if let Some(outer) = parse_meta(meta) {
                return Self::MetaIsPagination(outer);
            }
        }
        Self::Absent
    }

    /// The metadata, when present.
    pub fn meta(&self) -> Option<&PaginationMeta> {
        match self {
            Self::TopLevel(m) | Self::UnderMeta(m) | Self::MetaIsPagination(m) => Some(m),
            Self::Absent => None,
        }
    }

    /// Turn the discovered metadata into totals.
    ///
    /// `item_count` and `page_size` are the returned item count and the
    /// page size that was requested; they fill in whatever the backend
    /// left out. Zero items always means zero pages.
    pub fn resolve(&self, item_count: usize, page_size: usize) -> Pagination {
        let page_size = page_size.max(1);
        match self.meta() {
            Some(meta) => {
                let per_page = meta.limit.filter(|l| *l > 0).unwrap_or(page_size);
                let total_pages = meta
                    .total_pages
                    .unwrap_or_else(|| meta.total.div_ceil(per_page));
                Pagination {
                    total: meta.total,
                    total_pages: if meta.total == 0 { 0 } else { total_pages },
                }
            }
            None => Pagination {
                total: item_count,
                total_pages: item_count.div_ceil(page_size),
            },
        }
    }
}

fn parse_meta(value: &serde_json::Value) -> Option<PaginationMeta> {
    if !value.is_object() {
        return None;
    }
    serde_json::from_value(value.clone()).ok()
}

/// One page of server-filtered, server-paginated results.
#[derive(Debug, Clone)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub source: PaginationSource,
}

impl<T> Page<T> {
    /// Build a page from a list envelope, resolving pagination on the way.
    pub fn from_envelope(envelope: Envelope<Vec<T>>, page_size: usize) -> Self {
        let source = PaginationSource::of(&envelope);
        let items = envelope.data.unwrap_or_default();
        let pagination = source.resolve(items.len(), page_size);
        Self {
            items,
            pagination,
            source,
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use serde_json::json;

    use super::*;

    fn envelope(body: serde_json::Value) -> Envelope<Vec<serde_json::Value>> {
        serde_json::from_value(body).unwrap()
    }

    /// A payload type with no `Default`, decoded through a generic helper
    /// the way the client does.
    #[derive(Debug, Deserialize, PartialEq)]
    struct Receipt {
        number: String,
    }

    fn decode<T: serde::de::DeserializeOwned>(body: &str) -> Envelope<T> {
        serde_json::from_str(body).unwrap()
    }

    #[test]
    fn payload_type_needs_no_default() {
        let env: Envelope<Receipt> = decode(r#"{"success":true,"data":{"number":"C-001"}}"#);
        assert_eq!(env.into_data().unwrap(), Receipt { number: "C-001".into() });

        let bare: Envelope<Receipt> = decode(r#"{"success":true,"message":"done"}"#);
        assert!(bare.data.is_none());
        assert!(bare.into_data().is_err());
    }

    #[test]
    fn top_level_pagination_wins() {
        let env = envelope(json!({
            "success": true,
            "data": [],
            "pagination": { "total": 40, "totalPages": 4 },
            "meta": { "pagination": { "total": 1, "totalPages": 1 } }
        }));
        let source = PaginationSource::of(&env);
        assert!(matches!(source, PaginationSource::TopLevel(_)));
        assert_eq!(
            source.resolve(0, 10),
            Pagination {
                total: 40,
                total_pages: 4
            }
        );
    }

    #[test]
    fn meta_pagination_matches_top_level() {
        let top = envelope(json!({
            "success": true,
            "data": [{}, {}],
            "pagination": { "total": 17, "totalPages": 3 }
        }));
        let nested = envelope(json!({
            "success": true,
            "data": [{}, {}],
            "meta": { "pagination": { "total": 17, "totalPages": 3 } }
        }));

        let nested_source = PaginationSource::of(&nested);
        assert!(matches!(nested_source, PaginationSource::UnderMeta(_)));
        assert_eq!(
            nested_source.resolve(2, 8),
            PaginationSource::of(&top).resolve(2, 8)
        );
    }

    #[test]
    fn meta_itself_can_be_pagination() {
        let env = envelope(json!({
            "success": true,
            "data": [],
            "meta": { "total_items": 25, "per_page": 10 }
        }));
        let source = PaginationSource::of(&env);
        assert!(matches!(source, PaginationSource::MetaIsPagination(_)));
        assert_eq!(source.resolve(0, 50).total_pages, 3);
    }

    #[test]
    fn absent_pagination_synthesised_from_items() {
        let env = envelope(json!({ "success": true, "data": [{}, {}, {}] }));
        let source = PaginationSource::of(&env);
        assert_eq!(source, PaginationSource::Absent);
        assert_eq!(
            source.resolve(3, 2),
            Pagination {
                total: 3,
                total_pages: 2
            }
        );
    }

    #[test]
    fn unrelated_meta_is_ignored() {
        let env = envelope(json!({
            "success": true,
            "data": [],
            "meta": { "generated_at": "2024-01-01" }
        }));
        assert_eq!(PaginationSource::of(&env), PaginationSource::Absent);
    }

    #[test]
    fn empty_total_means_zero_pages() {
        let env = envelope(json!({
            "success": true,
            "data": [],
            "pagination": { "total": 0, "totalPages": 1 }
        }));
        assert_eq!(PaginationSource::of(&env).resolve(0, 10).total_pages, 0);
    }
}
