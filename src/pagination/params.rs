//! Normalization of raw list query parameters.
//!
//! `limit` and `order` never fail: malformed input falls back to a default.
//! Everything else is parsed strictly and rejected when ambiguous.

use serde::Deserialize;
use thiserror::Error;

use crate::pagination::SortOrder;
use crate::pagination::cursor::{CursorError, CursorPayload};
use crate::pagination::keyset::SortKey;

pub const DEFAULT_LIMIT: usize = 20;
pub const MAX_LIMIT: usize = 100;
pub const MAX_SEARCH_LEN: usize = 200;

/// Bounds applied to the requested page size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageLimits {
    pub default_limit: usize,
    pub max_limit: usize,
}

impl Default for PageLimits {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_LIMIT,
            max_limit: MAX_LIMIT,
        }
    }
}

impl PageLimits {
    /// Builds limits from configuration, repairing nonsensical values.
    pub fn new(default_limit: usize, max_limit: usize) -> Self {
        let max_limit = max_limit.max(1);
        Self {
            default_limit: default_limit.clamp(1, max_limit),
            max_limit,
        }
    }
}

/// Parses the requested page size.
///
/// Missing, unparseable and non-positive input yields `default_limit`.
/// Fractions are floored and the result is clamped to `max_limit`.
pub fn parse_limit(raw: Option<&str>, default_limit: usize, max_limit: usize) -> usize {
    let Some(value) = raw.and_then(|s| s.trim().parse::<f64>().ok()) else {
        return default_limit;
    };
    if !value.is_finite() {
        return default_limit;
    }
    let floored = value.floor();
    if floored < 1.0 {
        return default_limit;
    }
    if floored >= max_limit as f64 {
        max_limit
    } else {
        floored as usize
    }
}

/// Only the exact literal `asc` sorts ascending.
pub fn parse_order(raw: Option<&str>) -> SortOrder {
    match raw {
        Some("asc") => SortOrder::Asc,
        _ => SortOrder::Desc,
    }
}

/// Like [`parse_order`] but falls back to `default_order` for anything other
/// than the exact literals `asc` and `desc`.
pub fn parse_order_with_default(raw: Option<&str>, default_order: SortOrder) -> SortOrder {
    match raw {
        Some("asc") => SortOrder::Asc,
        Some("desc") => SortOrder::Desc,
        _ => default_order,
    }
}

/// Errors raised while validating list parameters.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ListParamsError {
    #[error("unknown sort field `{0}`")]
    UnknownSort(String),
    #[error("search must be at most {0} characters long")]
    SearchTooLong(usize),
    #[error(transparent)]
    Cursor(#[from] CursorError),
}

/// Trims the search term, treating blank input as absent.
pub fn parse_search(raw: Option<&str>) -> Result<Option<String>, ListParamsError> {
    let Some(term) = raw.map(str::trim).filter(|s| !s.is_empty()) else {
        return Ok(None);
    };
    if term.chars().count() > MAX_SEARCH_LEN {
        return Err(ListParamsError::SearchTooLong(MAX_SEARCH_LEN));
    }
    Ok(Some(term.to_string()))
}

/// Query string parameters shared by every list endpoint.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
pub struct RawListParams {
    pub limit: Option<String>,
    pub cursor: Option<String>,
    pub sort: Option<String>,
    pub order: Option<String>,
    pub search: Option<String>,
}

/// Normalized list parameters for a resource sorted by `S`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListParams<S> {
    pub limit: usize,
    pub cursor: Option<CursorPayload>,
    pub sort: S,
    pub order: SortOrder,
    pub search: Option<String>,
}

impl<S: SortKey> ListParams<S> {
    pub fn parse(raw: &RawListParams, limits: PageLimits) -> Result<Self, ListParamsError> {
        let limit = parse_limit(raw.limit.as_deref(), limits.default_limit, limits.max_limit);

        let sort = match raw.sort.as_deref().map(str::trim).filter(|s| !s.is_empty()) {
            Some(name) => {
                S::parse(name).ok_or_else(|| ListParamsError::UnknownSort(name.to_string()))?
            }
            None => S::DEFAULT,
        };
        let order = parse_order_with_default(raw.order.as_deref(), sort.default_order());
        let search = parse_search(raw.search.as_deref())?;

        let cursor = match raw.cursor.as_deref().filter(|s| !s.is_empty()) {
            Some(token) => Some(CursorPayload::decode(token)?),
            None => None,
        };

        Ok(Self {
            limit,
            cursor,
            sort,
            order,
            search,
        })
    }

    /// Stable textual form of the parameters, used as a cache key.
    pub fn fingerprint(&self) -> String {
        format!(
            "limit={}&sort={}&order={}&search={:?}&cursor={}",
            self.limit,
            self.sort.as_str(),
            self.order,
            self.search,
            self.cursor
                .as_ref()
                .map(CursorPayload::encode)
                .unwrap_or_default(),
        )
    }
}
