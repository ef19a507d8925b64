// ── Filter → sort → paginate ──
//
// Pure functions over borrowed collections. The reconciler never clamps
// the requested page and cannot fail: an out-of-range page is simply an
// empty slice, and `ListPage` decides what to do about it.

use serde::Serialize;
use stockdesk_api::Pagination;

use super::query::{ListQuery, SortDirection};
use crate::model::Record;

/// One visible page plus totals for the whole filtered set.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PageResult<T> {
    pub items: Vec<T>,
    pub total: usize,
    /// `ceil(total / page_size)`; zero when nothing matched.
    pub total_pages: usize,
    pub page: usize,
}

impl<T> PageResult<T> {
    pub fn is_empty(&self) -> bool {
        self.total == 0
    }

    /// Whether pagination controls are worth showing.
    pub fn has_pages(&self) -> bool {
        self.total_pages > 1
    }
}

/// Filter and sort without paginating.
///
/// Search is a case-insensitive substring match over `T::SEARCH_FIELDS`;
/// every active filter must match its field. The sort is stable and
/// descending order reverses the comparison, so ties keep input order in
/// both directions.
pub fn filter_and_sort<'a, T: Record>(collection: &'a [T], query: &ListQuery) -> Vec<&'a T> {
    let needle = query.search_needle();
    let filters: Vec<(&str, &str)> = query.active_filters().collect();

    let mut matched: Vec<&T> = collection
        .iter()
        .filter(|item| item.matches_search(&needle))
        .filter(|item| {
            filters
                .iter()
                .all(|(key, value)| item.field(key).matches_filter(value))
        })
        .collect();

    if let Some(key) = query.sort_key.as_deref() {
        let direction = query.sort_direction;
        matched.sort_by(|a, b| {
            let ordering = a.field(key).compare(&b.field(key));
            match direction {
                SortDirection::Asc => ordering,
                SortDirection::Desc => ordering.reverse(),
            }
        });
    }

    matched
}

/// Derive the visible page: filter → sort → paginate, in that order.
pub fn reconcile<'a, T: Record>(collection: &'a [T], query: &ListQuery) -> PageResult<&'a T> {
    let sorted = filter_and_sort(collection, query);
    let page_size = query.page_size.max(1);
    let page = query.page.max(1);
    let total = sorted.len();

    let start = (page - 1).saturating_mul(page_size);
    let items = sorted.into_iter().skip(start).take(page_size).collect();

    PageResult {
        items,
        total,
        total_pages: total.div_ceil(page_size),
        page,
    }
}

/// Server-paginated variant: the backend already filtered and paged, so
/// items pass through in server order and totals come from the envelope.
pub fn reconcile_server_page<'a, T>(
    items: &'a [T],
    pagination: Pagination,
    query: &ListQuery,
) -> PageResult<&'a T> {
    PageResult {
        items: items.iter().take(query.page_size.max(1)).collect(),
        total: pagination.total,
        total_pages: pagination.total_pages,
        page: query.page.max(1),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
pub(crate) mod tests {
    use chrono::{DateTime, TimeZone, Utc};
    use pretty_assertions::assert_eq;

    use super::*;
    use crate::model::{Cell, EntityId};

    #[derive(Debug, Clone, PartialEq)]
    pub(crate) struct Row {
        pub id: i64,
        pub name: String,
        pub hub: String,
        pub active: bool,
        pub seats: i64,
        pub created: DateTime<Utc>,
        pub tags: Vec<String>,
    }

    impl Record for Row {
        const KIND: &'static str = "Row";
        const SEARCH_FIELDS: &'static [&'static str] = &["name", "hub"];
        const SORT_FIELDS: &'static [&'static str] = &["name", "active", "seats", "created"];

        fn record_id(&self) -> EntityId {
            EntityId::Numeric(self.id)
        }

        fn field(&self, name: &str) -> Cell {
            match name {
                "name" => Cell::text(&self.name),
                "hub" => Cell::text(&self.hub),
                "active" => Cell::Bool(self.active),
                "seats" => Cell::Int(self.seats),
                "created" => Cell::Date(self.created),
                "tags" => Cell::List(self.tags.clone()),
                _ => Cell::Empty,
            }
        }
    }

    pub(crate) fn row(id: i64, name: &str, hub: &str, active: bool, seats: i64) -> Row {
        Row {
            id,
            name: name.into(),
            hub: hub.into(),
            active,
            seats,
            created: Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()
                + chrono::Duration::days(seats),
            tags: vec![hub.to_owned()],
        }
    }

    pub(crate) fn rows(n: i64) -> Vec<Row> {
        (1..=n)
            .map(|i| {
                let hub = if i % 3 == 0 { "SND" } else { "BKS" };
                row(i, &format!("Branch {i:02}"), hub, i % 2 == 0, i % 4)
            })
            .collect()
    }

    fn ids(items: &[&Row]) -> Vec<i64> {
        items.iter().map(|r| r.id).collect()
    }

    #[test]
    fn filtering_is_idempotent() {
        let data = rows(30);
        let query = ListQuery::default()
            .with_search("branch 1")
            .with_filter("active", "true");

        let once: Vec<Row> = filter_and_sort(&data, &query).into_iter().cloned().collect();
        let twice: Vec<Row> = filter_and_sort(&once, &query).into_iter().cloned().collect();

        assert_eq!(once, twice);
        assert!(!once.is_empty());
    }

    #[test]
    fn search_is_case_insensitive_over_search_fields() {
        let data = vec![
            row(1, "Sunda Kelapa", "SND", true, 1),
            row(2, "Bekasi", "SND", true, 1),
            row(3, "Cibubur", "BKS", true, 1),
        ];
        let query = ListQuery::default().with_search("  snd ");
        assert_eq!(ids(&filter_and_sort(&data, &query)), vec![1, 2]);

        let query = ListQuery::default().with_search("KELAPA");
        assert_eq!(ids(&filter_and_sort(&data, &query)), vec![1]);
    }

    #[test]
    fn list_filter_uses_containment() {
        let mut data = rows(3);
        data[1].tags.push("JKT".into());
        let query = ListQuery::default().with_filter("tags", "jkt");
        assert_eq!(ids(&filter_and_sort(&data, &query)), vec![2]);
    }

    #[test]
    fn sort_is_stable_for_every_key_type() {
        // Equal keys in every column so ties decide the whole order.
        let data: Vec<Row> = (1..=6).map(|i| row(i, "Same", "SND", true, 2)).collect();
        for key in Row::SORT_FIELDS {
            for direction in [SortDirection::Asc, SortDirection::Desc] {
                let query = ListQuery::default().sorted_by(*key, direction);
                assert_eq!(
                    ids(&filter_and_sort(&data, &query)),
                    vec![1, 2, 3, 4, 5, 6],
                    "key {key} {direction}"
                );
            }
        }
    }

    #[test]
    fn sort_keeps_tie_order_within_groups() {
        let data = vec![
            row(1, "b", "X", true, 2),
            row(2, "a", "X", false, 1),
            row(3, "c", "X", true, 2),
            row(4, "d", "X", false, 1),
        ];
        let asc = ListQuery::default().sorted_by("active", SortDirection::Asc);
        assert_eq!(ids(&filter_and_sort(&data, &asc)), vec![2, 4, 1, 3]);

        let desc = ListQuery::default().sorted_by("seats", SortDirection::Desc);
        assert_eq!(ids(&filter_and_sort(&data, &desc)), vec![1, 3, 2, 4]);
    }

    #[test]
    fn dates_sort_by_timestamp() {
        let data = vec![row(1, "a", "X", true, 3), row(2, "b", "X", true, 1)];
        let query = ListQuery::default().sorted_by("created", SortDirection::Asc);
        assert_eq!(ids(&filter_and_sort(&data, &query)), vec![2, 1]);
    }

    #[test]
    fn strings_sort_case_insensitively() {
        let data = vec![row(1, "beta", "X", true, 0), row(2, "Alpha", "X", true, 0)];
        let query = ListQuery::default().sorted_by("name", SortDirection::Asc);
        assert_eq!(ids(&filter_and_sort(&data, &query)), vec![2, 1]);
    }

    #[test]
    fn pages_cover_the_filtered_set_exactly() {
        let data = rows(23);
        let base = ListQuery::default()
            .with_filter("hub", "BKS")
            .sorted_by("name", SortDirection::Desc)
            .with_page_size(4);
        let expected = ids(&filter_and_sort(&data, &base));

        let first = reconcile(&data, &base);
        let mut seen = Vec::new();
        for page in 1..=first.total_pages {
            let result = reconcile(&data, &base.clone().with_page(page));
            assert!(result.items.len() <= 4);
            seen.extend(ids(&result.items));
        }
        assert_eq!(seen, expected);
        assert_eq!(first.total, expected.len());
    }

    #[test]
    fn seventeen_items_by_eight_make_three_pages() {
        let data = rows(17);
        let query = ListQuery::default().with_page_size(8);
        let sizes: Vec<usize> = (1..=3)
            .map(|p| reconcile(&data, &query.clone().with_page(p)).items.len())
            .collect();

        let first = reconcile(&data, &query);
        assert_eq!(first.total, 17);
        assert_eq!(first.total_pages, 3);
        assert_eq!(sizes, vec![8, 8, 1]);
    }

    #[test]
    fn empty_result_has_zero_pages() {
        let data = rows(5);
        let query = ListQuery::default().with_search("no such branch");
        let result = reconcile(&data, &query);
        assert!(result.is_empty());
        assert_eq!(result.total_pages, 0);
        assert!(!result.has_pages());
    }

    #[test]
    fn out_of_range_page_is_empty_not_a_panic() {
        let data = rows(5);
        let result = reconcile(&data, &ListQuery::default().with_page(99));
        assert!(result.items.is_empty());
        assert_eq!(result.page, 99);
        assert_eq!(result.total_pages, 1);
    }

    #[test]
    fn server_page_passes_items_through() {
        let data = rows(3);
        let result = reconcile_server_page(
            &data,
            Pagination {
                total: 42,
                total_pages: 15,
            },
            &ListQuery::default().with_page(4).with_page_size(3),
        );
        assert_eq!(ids(&result.items), vec![1, 2, 3]);
        assert_eq!((result.total, result.total_pages, result.page), (42, 15, 4));
    }
}
