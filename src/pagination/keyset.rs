//! Keyset ("seek") pagination plans.
//!
//! A [`KeysetQuery`] describes one page of a list: the sort column and
//! direction, the page size, and the position to resume after. Rows are
//! ordered by `(sort column, id)` so the order is total even when sort
//! values tie, and the next page is found by a composite comparison against
//! the last row rather than by an offset.

use std::fmt::{Display, Formatter};

use chrono::NaiveDateTime;

use crate::domain::types::{format_timestamp, parse_timestamp};
use crate::pagination::cursor::{CursorError, CursorPayload, SortValue};
use crate::pagination::{Page, SortOrder};

/// Type domain of a sortable column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortValueKind {
    Text,
    /// 32-bit signed integer column.
    Integer,
    Timestamp,
}

/// Sortable columns of one resource kind.
pub trait SortKey: Copy + Eq + std::fmt::Debug + Send + Sync + 'static {
    const DEFAULT: Self;

    /// Parses the public name used in the `sort` query parameter.
    fn parse(raw: &str) -> Option<Self>;

    /// Public name accepted by [`SortKey::parse`].
    fn as_str(&self) -> &'static str;

    /// Storage column backing this key.
    fn column(&self) -> &'static str;

    fn kind(&self) -> SortValueKind;

    fn default_order(&self) -> SortOrder {
        SortOrder::Desc
    }
}

/// Rows that can report their position under a given sort.
pub trait Keyed<S> {
    fn sort_value(&self, sort: S) -> SortValue;

    /// Primary key rendered as stored.
    fn key(&self) -> String;

    fn cursor(&self, sort: S) -> CursorPayload {
        CursorPayload::new(self.sort_value(sort), self.key())
    }
}

/// Cursor sort value converted to the type of the sort column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SeekValue {
    Text(String),
    Integer(i32),
    Timestamp(NaiveDateTime),
}

impl SeekValue {
    fn resolve(kind: SortValueKind, value: &SortValue) -> Result<Self, CursorError> {
        match (kind, value) {
            (SortValueKind::Text, SortValue::Text(s)) => Ok(SeekValue::Text(s.clone())),
            (SortValueKind::Integer, SortValue::Number(n)) => n
                .as_i64()
                .and_then(|v| i32::try_from(v).ok())
                .map(SeekValue::Integer)
                .ok_or(CursorError::SortValueMismatch),
            (SortValueKind::Timestamp, SortValue::Text(s)) => parse_timestamp(s)
                .map(SeekValue::Timestamp)
                .map_err(|_| CursorError::SortValueMismatch),
            _ => Err(CursorError::SortValueMismatch),
        }
    }

    fn render(&self) -> String {
        match self {
            SeekValue::Text(s) => quote_filter_value(s),
            SeekValue::Integer(n) => n.to_string(),
            SeekValue::Timestamp(t) => quote_filter_value(&format_timestamp(*t)),
        }
    }
}

/// Position to resume after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Seek {
    value: SeekValue,
    id: String,
}

impl Seek {
    pub fn value(&self) -> &SeekValue {
        &self.value
    }

    pub fn id(&self) -> &str {
        &self.id
    }
}

/// Quotes a value for a textual filter expression, doubling embedded quotes.
pub fn quote_filter_value(value: &str) -> String {
    format!("\"{}\"", value.replace('"', "\"\""))
}

/// Escapes `LIKE` metacharacters so the term matches literally with `\` as
/// the escape character, and wraps it for substring matching.
pub fn like_pattern(term: &str) -> String {
    let mut pattern = String::with_capacity(term.len() + 2);
    pattern.push('%');
    for c in term.chars() {
        if matches!(c, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(c);
    }
    pattern.push('%');
    pattern
}

/// One page of a keyset-paginated list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeysetQuery<S> {
    sort: S,
    order: SortOrder,
    limit: usize,
    seek: Option<Seek>,
}

impl<S: SortKey> KeysetQuery<S> {
    /// Builds the plan, checking that the cursor matches the sort column.
    pub fn new(
        sort: S,
        order: SortOrder,
        limit: usize,
        cursor: Option<&CursorPayload>,
    ) -> Result<Self, CursorError> {
        let seek = match cursor {
            Some(cursor) => Some(Seek {
                value: SeekValue::resolve(sort.kind(), &cursor.sort_value)?,
                id: cursor.id.clone(),
            }),
            None => None,
        };
        Ok(Self {
            sort,
            order,
            limit: limit.max(1),
            seek,
        })
    }

    pub fn sort(&self) -> S {
        self.sort
    }

    pub fn order(&self) -> SortOrder {
        self.order
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    pub fn seek(&self) -> Option<&Seek> {
        self.seek.as_ref()
    }

    /// Number of rows to fetch: one more than the page size, so the presence
    /// of a further page is known without a count query.
    pub fn fetch_limit(&self) -> i64 {
        i64::try_from(self.limit).unwrap_or(i64::MAX - 1) + 1
    }

    /// Seek position for a text column.
    pub fn seek_text(&self) -> Option<(String, String)> {
        self.seek.as_ref().and_then(|seek| match &seek.value {
            SeekValue::Text(value) => Some((value.clone(), seek.id.clone())),
            _ => None,
        })
    }

    /// Seek position for an integer column.
    pub fn seek_integer(&self) -> Option<(i32, String)> {
        self.seek.as_ref().and_then(|seek| match seek.value {
            SeekValue::Integer(value) => Some((value, seek.id.clone())),
            _ => None,
        })
    }

    /// Seek position for a timestamp column.
    pub fn seek_timestamp(&self) -> Option<(NaiveDateTime, String)> {
        self.seek.as_ref().and_then(|seek| match seek.value {
            SeekValue::Timestamp(value) => Some((value, seek.id.clone())),
            _ => None,
        })
    }

    /// Renders the seek predicate as a filter expression, e.g.
    /// `or(created_at.lt."…",and(created_at.eq."…",id.lt."…"))`.
    pub fn filter_expression(&self) -> Option<String> {
        let seek = self.seek.as_ref()?;
        let column = self.sort.column();
        let op = match self.order {
            SortOrder::Asc => "gt",
            SortOrder::Desc => "lt",
        };
        let value = seek.value.render();
        let id = quote_filter_value(&seek.id);
        Some(format!(
            "or({column}.{op}.{value},and({column}.eq.{value},id.{op}.{id}))"
        ))
    }

    /// Turns up to [`KeysetQuery::fetch_limit`] rows into a page.
    pub fn paginate<T: Keyed<S>>(&self, mut rows: Vec<T>) -> Page<T> {
        if rows.len() <= self.limit {
            return Page::last(rows);
        }
        rows.truncate(self.limit);
        let next_cursor = rows.last().map(|row| row.cursor(self.sort).encode());
        Page {
            items: rows,
            next_cursor,
        }
    }
}

impl<S: SortKey> Display for KeysetQuery<S> {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let column = self.sort.column();
        let order = self.order;
        write!(f, "order={column}.{order},id.{order} limit={}", self.fetch_limit())?;
        if let Some(filter) = self.filter_expression() {
            write!(f, " {filter}")?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::cmp::Ordering;

    use chrono::{Duration, NaiveDate};

    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum RowSort {
        Name,
        Rank,
        CreatedAt,
    }

    impl SortKey for RowSort {
        const DEFAULT: Self = RowSort::CreatedAt;

        fn parse(raw: &str) -> Option<Self> {
            match raw {
                "name" => Some(RowSort::Name),
                "rank" => Some(RowSort::Rank),
                "createdAt" => Some(RowSort::CreatedAt),
                _ => None,
            }
        }

        fn as_str(&self) -> &'static str {
            match self {
                RowSort::Name => "name",
                RowSort::Rank => "rank",
                RowSort::CreatedAt => "createdAt",
            }
        }

        fn column(&self) -> &'static str {
            match self {
                RowSort::Name => "name",
                RowSort::Rank => "rank",
                RowSort::CreatedAt => "created_at",
            }
        }

        fn kind(&self) -> SortValueKind {
            match self {
                RowSort::Name => SortValueKind::Text,
                RowSort::Rank => SortValueKind::Integer,
                RowSort::CreatedAt => SortValueKind::Timestamp,
            }
        }
    }

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        name: String,
        rank: i32,
        created_at: NaiveDateTime,
    }

    impl Keyed<RowSort> for Row {
        fn sort_value(&self, sort: RowSort) -> SortValue {
            match sort {
                RowSort::Name => SortValue::Text(self.name.clone()),
                RowSort::Rank => self.rank.into(),
                RowSort::CreatedAt => SortValue::Text(format_timestamp(self.created_at)),
            }
        }

        fn key(&self) -> String {
            self.id.clone()
        }
    }

    fn compare(sort: RowSort, a: &Row, b: &Row) -> Ordering {
        let primary = match sort {
            RowSort::Name => a.name.cmp(&b.name),
            RowSort::Rank => a.rank.cmp(&b.rank),
            RowSort::CreatedAt => a.created_at.cmp(&b.created_at),
        };
        primary.then_with(|| a.id.cmp(&b.id))
    }

    /// In-memory stand-in for the datastore executing a plan.
    fn execute(rows: &[Row], query: &KeysetQuery<RowSort>) -> Vec<Row> {
        let mut sorted: Vec<Row> = rows.to_vec();
        sorted.sort_by(|a, b| compare(query.sort(), a, b));
        if query.order() == SortOrder::Desc {
            sorted.reverse();
        }
        let after = |row: &Row| -> bool {
            let Some(seek) = query.seek() else {
                return true;
            };
            let primary = match (query.sort(), seek.value()) {
                (RowSort::Name, SeekValue::Text(v)) => row.name.cmp(v),
                (RowSort::Rank, SeekValue::Integer(v)) => row.rank.cmp(v),
                (RowSort::CreatedAt, SeekValue::Timestamp(v)) => row.created_at.cmp(v),
                _ => unreachable!("plan validated the cursor"),
            };
            let position = primary.then_with(|| row.id.as_str().cmp(seek.id()));
            match query.order() {
                SortOrder::Asc => position == Ordering::Greater,
                SortOrder::Desc => position == Ordering::Less,
            }
        };
        sorted
            .into_iter()
            .filter(|row| after(row))
            .take(query.fetch_limit() as usize)
            .collect()
    }

    fn sample_rows() -> Vec<Row> {
        let base = NaiveDate::from_ymd_opt(2024, 1, 1)
            .unwrap()
            .and_hms_opt(12, 0, 0)
            .unwrap();
        (0..17)
            .map(|i| Row {
                id: format!("id-{:02}", (i * 7) % 17),
                name: ["alpha", "beta", "gamma"][i % 3].to_string(),
                rank: (i % 4) as i32,
                created_at: base + Duration::seconds((i / 2) as i64),
            })
            .collect()
    }

    fn collect_all(rows: &[Row], sort: RowSort, order: SortOrder, limit: usize) -> Vec<Row> {
        let mut out = Vec::new();
        let mut cursor: Option<CursorPayload> = None;
        loop {
            let query = KeysetQuery::new(sort, order, limit, cursor.as_ref()).unwrap();
            let page = query.paginate(execute(rows, &query));
            assert!(page.items.len() <= limit);
            out.extend(page.items);
            match page.next_cursor {
                Some(token) => cursor = Some(CursorPayload::decode(&token).unwrap()),
                None => break,
            }
        }
        out
    }

    #[test]
    fn pages_cover_every_row_once_for_every_limit() {
        let rows = sample_rows();
        for sort in [RowSort::Name, RowSort::Rank, RowSort::CreatedAt] {
            for order in [SortOrder::Asc, SortOrder::Desc] {
                let mut expected = rows.clone();
                expected.sort_by(|a, b| compare(sort, a, b));
                if order == SortOrder::Desc {
                    expected.reverse();
                }
                for limit in 1..=rows.len() + 2 {
                    let got = collect_all(&rows, sort, order, limit);
                    assert_eq!(got, expected, "{sort:?} {order:?} limit={limit}");
                }
            }
        }
    }

    #[test]
    fn exact_fit_has_no_next_cursor() {
        let rows = sample_rows();
        let query = KeysetQuery::new(RowSort::Name, SortOrder::Asc, rows.len(), None).unwrap();
        let page = query.paginate(execute(&rows, &query));
        assert_eq!(page.items.len(), rows.len());
        assert!(page.next_cursor.is_none());
    }

    #[test]
    fn cursor_type_must_match_sort_column() {
        let text = CursorPayload::new("alpha", "id-01");
        let number = CursorPayload::new(3_i64, "id-01");
        let fraction =
            CursorPayload::new(SortValue::Number(serde_json::Number::from_f64(1.5).unwrap()), "x");
        let not_a_time = CursorPayload::new("tomorrow", "x");

        assert!(KeysetQuery::new(RowSort::Name, SortOrder::Asc, 5, Some(&text)).is_ok());
        assert!(KeysetQuery::new(RowSort::Rank, SortOrder::Asc, 5, Some(&number)).is_ok());
        assert_eq!(
            KeysetQuery::new(RowSort::Rank, SortOrder::Asc, 5, Some(&text)),
            Err(CursorError::SortValueMismatch)
        );
        assert_eq!(
            KeysetQuery::new(RowSort::Name, SortOrder::Asc, 5, Some(&number)),
            Err(CursorError::SortValueMismatch)
        );
        assert_eq!(
            KeysetQuery::new(RowSort::Rank, SortOrder::Asc, 5, Some(&fraction)),
            Err(CursorError::SortValueMismatch)
        );
        assert_eq!(
            KeysetQuery::new(RowSort::CreatedAt, SortOrder::Asc, 5, Some(&not_a_time)),
            Err(CursorError::SortValueMismatch)
        );
        let too_big = CursorPayload::new(i64::from(i32::MAX) + 1, "x");
        assert_eq!(
            KeysetQuery::new(RowSort::Rank, SortOrder::Asc, 5, Some(&too_big)),
            Err(CursorError::SortValueMismatch)
        );
    }

    #[test]
    fn typed_seek_accessors() {
        let cursor = CursorPayload::new("2024-01-01T12:00:03Z", "id-04");
        let query =
            KeysetQuery::new(RowSort::CreatedAt, SortOrder::Desc, 5, Some(&cursor)).unwrap();
        let (value, id) = query.seek_timestamp().unwrap();
        assert_eq!(format_timestamp(value), "2024-01-01T12:00:03Z");
        assert_eq!(id, "id-04");
        assert!(query.seek_text().is_none());
        assert!(query.seek_integer().is_none());
        assert_eq!(query.fetch_limit(), 6);
    }

    #[test]
    fn filter_expression_quotes_values() {
        let cursor = CursorPayload::new("O\"Brien", "k\"1");
        let query = KeysetQuery::new(RowSort::Name, SortOrder::Asc, 10, Some(&cursor)).unwrap();
        assert_eq!(
            query.filter_expression().unwrap(),
            r#"or(name.gt."O""Brien",and(name.eq."O""Brien",id.gt."k""1"))"#
        );

        let cursor = CursorPayload::new(4_i64, "k");
        let query = KeysetQuery::new(RowSort::Rank, SortOrder::Desc, 10, Some(&cursor)).unwrap();
        assert_eq!(
            query.to_string(),
            r#"order=rank.desc,id.desc limit=11 or(rank.lt.4,and(rank.eq.4,id.lt."k"))"#
        );

        let query = KeysetQuery::new(RowSort::Rank, SortOrder::Desc, 10, None).unwrap();
        assert!(query.filter_expression().is_none());
    }

    #[test]
    fn like_pattern_escapes_metacharacters() {
        assert_eq!(like_pattern("acme"), "%acme%");
        assert_eq!(like_pattern("50%_off\\"), "%50\\%\\_off\\\\%");
    }
}
