//! Lazy table pagination and sorting.
//!
//! The upstream API has no pagination parameters, so every reload fetches
//! the full collection. This module turns a full collection plus the
//! viewport description from the query string into the single page of
//! rows a table fragment renders: sort first (when requested), then slice
//! the window `[offset, offset + rows)`.
//!
//! Sorting compares the string values of the requested field. A record
//! where the field is absent or empty never moves relative to its
//! neighbours; the comparator returns `Ordering::Equal` for any pair
//! involving such a record, and the sort is stable.

use std::cmp::Ordering;

use serde::Deserialize;

/// Page sizes offered by the table footer.
pub const PAGE_SIZE_OPTIONS: &[usize] = &[10, 20, 50, 100];

const DEFAULT_ROWS: usize = 10;

/// Sort direction for a table column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

impl SortDirection {
    /// Apply the direction to an ascending ordering.
    #[must_use]
    pub const fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            Self::Asc => ordering,
            Self::Desc => ordering.reverse(),
        }
    }

    /// The direction a second click on the same column header selects.
    #[must_use]
    pub const fn toggle(self) -> Self {
        match self {
            Self::Asc => Self::Desc,
            Self::Desc => Self::Asc,
        }
    }

    /// Query-string representation.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Viewport description carried in a table fragment's query string.
#[derive(Debug, Clone, Deserialize)]
pub struct TableQuery {
    /// Index of the first row to render.
    #[serde(default)]
    pub offset: usize,
    /// Number of rows per page.
    #[serde(default = "default_rows")]
    pub rows: usize,
    /// Field to sort by, if any.
    #[serde(default)]
    pub sort: Option<String>,
    /// Sort direction (ignored without `sort`).
    #[serde(default)]
    pub dir: SortDirection,
}

const fn default_rows() -> usize {
    DEFAULT_ROWS
}

impl Default for TableQuery {
    fn default() -> Self {
        Self {
            offset: 0,
            rows: DEFAULT_ROWS,
            sort: None,
            dir: SortDirection::default(),
        }
    }
}

/// A record that exposes sortable fields as strings.
///
/// `sort_value` returns `None` for fields the record does not carry.
/// An empty string counts as missing for ordering purposes.
pub trait SortableRecord {
    fn sort_value(&self, field: &str) -> Option<&str>;
}

/// One rendered page of a lazy table.
#[derive(Debug)]
pub struct TablePage<T> {
    /// The rows inside the requested window.
    pub rows: Vec<T>,
    /// Size of the full collection before slicing.
    pub total_records: usize,
    /// Offset the window started at.
    pub offset: usize,
    /// Requested page size (clamped to at least 1).
    pub page_size: usize,
}

/// Sort and slice a full collection into the requested page.
///
/// An offset at or beyond the end of the collection yields an empty page;
/// `total_records` still reflects the full collection.
pub fn paginate<T: SortableRecord>(mut records: Vec<T>, query: &TableQuery) -> TablePage<T> {
    let total_records = records.len();
    let page_size = query.rows.max(1);

    if let Some(field) = query.sort.as_deref() {
        records.sort_by(|a, b| compare_records(a, b, field, query.dir));
    }

    let rows: Vec<T> = records
        .into_iter()
        .skip(query.offset)
        .take(page_size)
        .collect();

    TablePage {
        rows,
        total_records,
        offset: query.offset,
        page_size,
    }
}

/// Compare two records on a field, treating missing or empty values as
/// incomparable (`Equal`).
fn compare_records<T: SortableRecord>(
    a: &T,
    b: &T,
    field: &str,
    dir: SortDirection,
) -> Ordering {
    let left = a.sort_value(field).filter(|v| !v.is_empty());
    let right = b.sort_value(field).filter(|v| !v.is_empty());

    match (left, right) {
        (Some(x), Some(y)) => dir.apply(x.cmp(y)),
        _ => Ordering::Equal,
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Row {
        name: String,
        date: String,
    }

    impl Row {
        fn new(name: &str, date: &str) -> Self {
            Self {
                name: name.to_string(),
                date: date.to_string(),
            }
        }
    }

    impl SortableRecord for Row {
        fn sort_value(&self, field: &str) -> Option<&str> {
            match field {
                "name" => Some(self.name.as_str()),
                "date" => Some(self.date.as_str()),
                _ => None,
            }
        }
    }

    fn sample(n: usize) -> Vec<Row> {
        (0..n)
            .map(|i| Row::new(&format!("row{i:02}"), &format!("2025-03-{:02}", (i % 28) + 1)))
            .collect()
    }

    fn query(offset: usize, rows: usize, sort: Option<&str>, dir: SortDirection) -> TableQuery {
        TableQuery {
            offset,
            rows,
            sort: sort.map(String::from),
            dir,
        }
    }

    #[test]
    fn test_default_query_first_page() {
        // Empty payload exercises the serde defaults.
        let q: TableQuery = serde_json::from_str("{}").unwrap();
        assert_eq!(q.offset, 0);
        assert_eq!(q.rows, 10);
        assert!(q.sort.is_none());
        assert_eq!(q.dir, SortDirection::Asc);
    }

    #[test]
    fn test_dir_deserializes_lowercase() {
        let q: TableQuery = serde_json::from_str(r#"{"sort":"date","dir":"desc"}"#).unwrap();
        assert_eq!(q.dir, SortDirection::Desc);
    }

    #[test]
    fn test_unsorted_page_preserves_arrival_order() {
        let page = paginate(sample(25), &query(0, 10, None, SortDirection::Asc));
        assert_eq!(page.total_records, 25);
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.rows[0].name, "row00");
        assert_eq!(page.rows[9].name, "row09");
    }

    #[test]
    fn test_second_page_window() {
        let page = paginate(sample(25), &query(10, 10, None, SortDirection::Asc));
        assert_eq!(page.rows.len(), 10);
        assert_eq!(page.rows[0].name, "row10");
        assert_eq!(page.offset, 10);
    }

    #[test]
    fn test_last_partial_page() {
        let page = paginate(sample(25), &query(20, 10, None, SortDirection::Asc));
        assert_eq!(page.rows.len(), 5);
        assert_eq!(page.total_records, 25);
    }

    #[test]
    fn test_offset_beyond_total_yields_empty_page() {
        let page = paginate(sample(5), &query(50, 10, None, SortDirection::Asc));
        assert!(page.rows.is_empty());
        assert_eq!(page.total_records, 5);
    }

    #[test]
    fn test_zero_rows_clamped_to_one() {
        let page = paginate(sample(5), &query(0, 0, None, SortDirection::Asc));
        assert_eq!(page.rows.len(), 1);
        assert_eq!(page.page_size, 1);
    }

    #[test]
    fn test_sorted_page_is_pairwise_ordered() {
        let rows = vec![
            Row::new("c", "2025-03-03"),
            Row::new("a", "2025-03-01"),
            Row::new("d", "2025-03-04"),
            Row::new("b", "2025-03-02"),
        ];
        let page = paginate(rows, &query(0, 10, Some("date"), SortDirection::Asc));
        for pair in page.rows.windows(2) {
            assert!(pair[0].date <= pair[1].date);
        }
        assert_eq!(page.rows[0].name, "a");
    }

    #[test]
    fn test_descending_sort_reverses_order() {
        let rows = vec![
            Row::new("a", "2025-03-01"),
            Row::new("c", "2025-03-03"),
            Row::new("b", "2025-03-02"),
        ];
        let page = paginate(rows, &query(0, 10, Some("date"), SortDirection::Desc));
        assert_eq!(page.rows[0].date, "2025-03-03");
        assert_eq!(page.rows[2].date, "2025-03-01");
    }

    #[test]
    fn test_sort_preserves_multiset() {
        let rows = sample(25);
        let mut names: Vec<String> = rows.iter().map(|r| r.name.clone()).collect();

        let page = paginate(rows, &query(0, 100, Some("date"), SortDirection::Desc));
        let mut sorted_names: Vec<String> = page.rows.iter().map(|r| r.name.clone()).collect();

        names.sort();
        sorted_names.sort();
        assert_eq!(names, sorted_names);
    }

    #[test]
    fn test_all_values_missing_leaves_order_unchanged() {
        let rows = vec![
            Row::new("first", ""),
            Row::new("second", ""),
            Row::new("third", ""),
        ];
        let page = paginate(rows, &query(0, 10, Some("date"), SortDirection::Asc));
        let names: Vec<&str> = page.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(names, vec!["first", "second", "third"]);
    }

    #[test]
    fn test_unknown_sort_field_leaves_order_unchanged() {
        let rows = vec![Row::new("b", "2"), Row::new("a", "1")];
        let page = paginate(rows, &query(0, 10, Some("nope"), SortDirection::Asc));
        assert_eq!(page.rows[0].name, "b");
    }

    #[test]
    fn test_pagination_is_idempotent_for_same_query() {
        let q = query(10, 10, Some("date"), SortDirection::Desc);
        let first = paginate(sample(25), &q);
        let second = paginate(sample(25), &q);
        let a: Vec<&str> = first.rows.iter().map(|r| r.name.as_str()).collect();
        let b: Vec<&str> = second.rows.iter().map(|r| r.name.as_str()).collect();
        assert_eq!(a, b);
        assert_eq!(first.total_records, second.total_records);
    }

    #[test]
    fn test_direction_toggle() {
        assert_eq!(SortDirection::Asc.toggle(), SortDirection::Desc);
        assert_eq!(SortDirection::Desc.toggle(), SortDirection::Asc);
        assert_eq!(SortDirection::Desc.as_str(), "desc");
    }
}
