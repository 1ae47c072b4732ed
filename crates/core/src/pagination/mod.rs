//! Pagination module - list filters, keyset cursors, and pages.

mod cursor;
mod pagination_model;

pub use cursor::{Cursor, KeysetBound, KeysetQuery};
pub use pagination_model::{CursorPagination, ListFilter, Page, PaginationConfig, SortOrder};
