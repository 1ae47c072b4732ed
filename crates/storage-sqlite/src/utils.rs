//! Utility functions for SQLite storage operations.
//!
//! Row identity and timestamps are assigned here, plus chunking for
//! `IN (...)` lookups so large id lists stay under SQLite's parameter limit.

use chrono::{NaiveDateTime, Utc};
use uuid::Uuid;

/// Maximum number of parameters for SQLite IN (...) queries.
///
/// SQLite has a compile-time limit on the number of parameters in a SQL statement,
/// typically around 999 (SQLITE_MAX_VARIABLE_NUMBER). Scoped lookups bind a few
/// extra parameters, so 500 leaves room for them.
pub const SQLITE_MAX_PARAMS_CHUNK: usize = 500;

/// Chunk a slice into smaller slices for batch SQLite queries.
///
/// # Example
///
/// ```ignore
/// let mut routes = Vec::with_capacity(ids.len());
/// for chunk in chunk_for_sqlite(&ids) {
///     routes.extend(load_operation_routes(conn, chunk)?);
/// }
/// ```
pub fn chunk_for_sqlite<T>(items: &[T]) -> impl Iterator<Item = &[T]> {
    items.chunks(SQLITE_MAX_PARAMS_CHUNK)
}

/// New time-sortable row id (UUIDv7, hyphenated lower-case).
pub fn new_id() -> String {
    Uuid::now_v7().to_string()
}

/// Current UTC time as stored in timestamp columns.
pub fn now_utc() -> NaiveDateTime {
    Utc::now().naive_utc()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chunk_for_sqlite_empty() {
        let items: Vec<i32> = vec![];
        let chunks: Vec<_> = chunk_for_sqlite(&items).collect();
        assert!(chunks.is_empty());
    }

    #[test]
    fn test_chunk_for_sqlite_over_limit() {
        let items: Vec<i32> = (0..1200).collect();
        let chunks: Vec<_> = chunk_for_sqlite(&items).collect();
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), SQLITE_MAX_PARAMS_CHUNK);
        assert_eq!(chunks[2].len(), 200);
    }

    #[test]
    fn test_new_id_is_hyphenated_v7() {
        let id = new_id();
        let parsed = Uuid::parse_str(&id).unwrap();
        assert_eq!(parsed.get_version_num(), 7);
        assert_eq!(id.len(), 36);
        assert_eq!(id, id.to_lowercase());
    }
}
