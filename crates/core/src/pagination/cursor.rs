//! Keyset cursors over time-sortable ids.
//!
//! A cursor names the boundary row of a page and the direction to move from
//! it. Storage implementations turn a [`KeysetQuery`] into a filtered, ordered
//! query fetching `limit + 1` rows and hand the rows back to
//! [`KeysetQuery::paginate`], which trims them and computes the neighbouring
//! cursors.

use base64::engine::general_purpose::URL_SAFE_NO_PAD;
use base64::Engine;
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::pagination_model::{CursorPagination, ListFilter, Page, PaginationConfig, SortOrder};
use crate::errors::{Result, ValidationError};

/// Position within an id-ordered list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Cursor {
    pub id: String,
    pub points_next: bool,
}

impl Cursor {
    pub fn next(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            points_next: true,
        }
    }

    pub fn prev(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            points_next: false,
        }
    }

    pub fn encode(&self) -> String {
        // Serializing two plain fields cannot fail.
        let json = serde_json::to_vec(self).unwrap_or_default();
        URL_SAFE_NO_PAD.encode(json)
    }

    pub fn decode(raw: &str) -> Result<Self> {
        let bytes = URL_SAFE_NO_PAD
            .decode(raw.trim())
            .map_err(|e| ValidationError::InvalidCursor(e.to_string()))?;
        let cursor: Cursor = serde_json::from_slice(&bytes)
            .map_err(|e| ValidationError::InvalidCursor(e.to_string()))?;
        if cursor.id.is_empty() {
            return Err(ValidationError::InvalidCursor("cursor id is empty".to_string()).into());
        }
        Ok(cursor)
    }
}

/// Id comparison a storage query must apply for a cursor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeysetBound {
    /// Only rows with `id > value`.
    After(String),
    /// Only rows with `id < value`.
    Before(String),
}

/// A list filter resolved against a pagination config.
#[derive(Debug, Clone, PartialEq)]
pub struct KeysetQuery {
    pub limit: i64,
    pub bound: Option<KeysetBound>,
    /// Order the storage query must use; reversed when paging backwards.
    pub order: SortOrder,
    pub requested_order: SortOrder,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
    has_cursor: bool,
    points_next: bool,
}

impl KeysetQuery {
    pub fn from_filter(filter: &ListFilter, config: &PaginationConfig) -> Result<Self> {
        filter.validate()?;

        let limit = config.normalize_limit(filter.limit);
        let cursor = filter
            .cursor
            .as_deref()
            .filter(|c| !c.trim().is_empty())
            .map(Cursor::decode)
            .transpose()?;

        let requested_order = filter.sort_order;
        let (bound, order, points_next) = match cursor {
            None => (None, requested_order, true),
            Some(Cursor {
                id,
                points_next: true,
            }) => {
                let bound = match requested_order {
                    SortOrder::Asc => KeysetBound::After(id),
                    SortOrder::Desc => KeysetBound::Before(id),
                };
                (Some(bound), requested_order, true)
            }
            Some(Cursor {
                id,
                points_next: false,
            }) => {
                let bound = match requested_order {
                    SortOrder::Asc => KeysetBound::Before(id),
                    SortOrder::Desc => KeysetBound::After(id),
                };
                (Some(bound), requested_order.reversed(), false)
            }
        };

        Ok(Self {
            limit,
            bound,
            order,
            requested_order,
            start_date: filter.start_date,
            end_date: filter.end_date,
            has_cursor: filter.cursor.as_deref().is_some_and(|c| !c.trim().is_empty()),
            points_next,
        })
    }

    /// Number of rows the storage query should fetch.
    pub fn fetch_limit(&self) -> i64 {
        self.limit + 1
    }

    /// Trims the fetched rows to one page in the requested order and computes
    /// the neighbouring cursors.
    pub fn paginate<T, F>(&self, mut rows: Vec<T>, id_of: F) -> Page<T>
    where
        F: Fn(&T) -> &str,
    {
        let has_more = rows.len() as i64 > self.limit;
        rows.truncate(self.limit.max(0) as usize);
        if !self.points_next {
            rows.reverse();
        }

        let is_first_page = !self.has_cursor || (!has_more && !self.points_next);

        let pagination = match (rows.first(), rows.last()) {
            (Some(first), Some(last)) => {
                let first_id = id_of(first);
                let last_id = id_of(last);
                if self.points_next {
                    CursorPagination {
                        next: has_more.then(|| Cursor::next(last_id).encode()),
                        prev: (!is_first_page).then(|| Cursor::prev(first_id).encode()),
                    }
                } else {
                    CursorPagination {
                        next: Some(Cursor::next(last_id).encode()),
                        prev: (!is_first_page).then(|| Cursor::prev(first_id).encode()),
                    }
                }
            }
            _ => CursorPagination::default(),
        };

        Page {
            items: rows,
            pagination,
        }
    }
}
