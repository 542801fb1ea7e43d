//! Cursor-based pagination shared by every list endpoint.

use std::fmt::{Display, Formatter};

use serde::{Deserialize, Serialize};

pub mod cursor;
pub mod keyset;
pub mod params;

pub use cursor::{CursorError, CursorPayload, SortValue};
pub use keyset::{Keyed, KeysetQuery, SortKey, SortValueKind, like_pattern};
pub use params::{ListParams, ListParamsError, PageLimits, RawListParams};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    Asc,
    Desc,
}

impl Display for SortOrder {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            SortOrder::Asc => write!(f, "asc"),
            SortOrder::Desc => write!(f, "desc"),
        }
    }
}

/// One page of results plus the token for the following page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    /// `None` when this is the last page.
    pub next_cursor: Option<String>,
}

impl<T> Page<T> {
    /// A page with nothing after it.
    pub fn last(items: Vec<T>) -> Self {
        Self {
            items,
            next_cursor: None,
        }
    }

    pub fn map<U, F>(self, f: F) -> Page<U>
    where
        F: FnMut(T) -> U,
    {
        Page {
            items: self.items.into_iter().map(f).collect(),
            next_cursor: self.next_cursor,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn page_serializes_null_cursor() {
        let page = Page::last(vec![1, 2]);
        assert_eq!(
            serde_json::to_value(&page).unwrap(),
            serde_json::json!({"items": [1, 2], "nextCursor": null})
        );
    }

    #[test]
    fn map_keeps_cursor() {
        let page = Page {
            items: vec![1, 2],
            next_cursor: Some("abc".to_string()),
        };
        let mapped = page.map(|n| n * 10);
        assert_eq!(mapped.items, vec![10, 20]);
        assert_eq!(mapped.next_cursor.as_deref(), Some("abc"));
    }
}
