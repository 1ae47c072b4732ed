//! List filter and page types shared by every paginated repository.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use log::warn;
use serde::{Deserialize, Serialize};

use crate::constants::{DEFAULT_PAGE_LIMIT, MAX_PAGE_LIMIT, MAX_PAGE_LIMIT_ENV};
use crate::errors::{Error, Result, ValidationError};

/// Direction in which a list is ordered by id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    #[default]
    Asc,
    Desc,
}

impl SortOrder {
    pub fn reversed(self) -> Self {
        match self {
            SortOrder::Asc => SortOrder::Desc,
            SortOrder::Desc => SortOrder::Asc,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SortOrder::Asc => "asc",
            SortOrder::Desc => "desc",
        }
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SortOrder {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "asc" => Ok(SortOrder::Asc),
            "desc" => Ok(SortOrder::Desc),
            _ => Err(ValidationError::InvalidSortOrder(s.to_string()).into()),
        }
    }
}

/// Filter accepted by every `find_all` operation.
///
/// `start_date` and `end_date` bound `created_at` inclusively; a missing bound
/// leaves that side of the window open.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListFilter {
    pub limit: i64,
    pub cursor: Option<String>,
    pub sort_order: SortOrder,
    pub start_date: Option<NaiveDateTime>,
    pub end_date: Option<NaiveDateTime>,
}

impl Default for ListFilter {
    fn default() -> Self {
        Self {
            limit: DEFAULT_PAGE_LIMIT,
            cursor: None,
            sort_order: SortOrder::default(),
            start_date: None,
            end_date: None,
        }
    }
}

impl ListFilter {
    pub fn with_limit(mut self, limit: i64) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    pub fn with_sort_order(mut self, sort_order: SortOrder) -> Self {
        self.sort_order = sort_order;
        self
    }

    pub fn with_window(mut self, start: NaiveDateTime, end: NaiveDateTime) -> Self {
        self.start_date = Some(start);
        self.end_date = Some(end);
        self
    }

    /// Rejects a window whose start lies after its end.
    pub fn validate(&self) -> Result<()> {
        if let (Some(start), Some(end)) = (self.start_date, self.end_date) {
            if start > end {
                return Err(ValidationError::InvalidDateRange {
                    start: start.to_string(),
                    end: end.to_string(),
                }
                .into());
            }
        }
        Ok(())
    }
}

/// Page size limits applied to every list request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_limit: i64,
    pub max_limit: i64,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_limit: DEFAULT_PAGE_LIMIT,
            max_limit: MAX_PAGE_LIMIT,
        }
    }
}

impl PaginationConfig {
    /// Reads `MAX_PAGINATION_LIMIT` from the environment, falling back to the defaults.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(MAX_PAGE_LIMIT_ENV) {
            let max_limit = raw.trim().parse::<i64>().map_err(|_| {
                Error::InvalidConfigValue(format!("{MAX_PAGE_LIMIT_ENV}={raw}"))
            })?;
            if max_limit <= 0 {
                return Err(Error::InvalidConfigValue(format!(
                    "{MAX_PAGE_LIMIT_ENV} must be positive, got {max_limit}"
                )));
            }
            config.max_limit = max_limit;
            config.default_limit = config.default_limit.min(max_limit);
        }
        Ok(config)
    }

    /// Clamps a requested page size into `1..=max_limit`.
    pub fn normalize_limit(&self, requested: i64) -> i64 {
        if requested <= 0 {
            self.default_limit
        } else if requested > self.max_limit {
            warn!(
                "Requested page size {} exceeds maximum {}, clamping",
                requested, self.max_limit
            );
            self.max_limit
        } else {
            requested
        }
    }
}

/// Opaque cursors for the neighbouring pages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CursorPagination {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub next: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub prev: Option<String>,
}

/// One page of a list result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: CursorPagination,
}

impl<T> Page<T> {
    pub fn empty() -> Self {
        Self {
            items: Vec::new(),
            pagination: CursorPagination::default(),
        }
    }

    pub fn map<U, F: FnMut(T) -> U>(self, f: F) -> Page<U> {
        Page {
            items: self.items.into_iter().map(f).collect(),
            pagination: self.pagination,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
