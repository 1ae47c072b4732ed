//! Core error types for the routing engine.
//!
//! This module defines database-agnostic error types. Storage-specific errors
//! (from Diesel, SQLite, etc.) are converted to these types by the storage layer.

use std::fmt;

use thiserror::Error;

/// Type alias for Result using our Error type.
pub type Result<T> = std::result::Result<T, Error>;

/// The kind of persisted entity an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    OperationRoute,
    TransactionRoute,
    RouteLink,
}

impl EntityKind {
    /// Upper-case prefix used in machine-readable error codes.
    pub fn code_prefix(&self) -> &'static str {
        match self {
            EntityKind::OperationRoute => "OPERATION_ROUTE",
            EntityKind::TransactionRoute => "TRANSACTION_ROUTE",
            EntityKind::RouteLink => "ROUTE_LINK",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::OperationRoute => "operation route",
            EntityKind::TransactionRoute => "transaction route",
            EntityKind::RouteLink => "route link",
        };
        f.write_str(name)
    }
}

/// Which integrity rule the backing store enforced.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    Unique,
    ForeignKey,
}

impl fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConstraintKind::Unique => f.write_str("unique"),
            ConstraintKind::ForeignKey => f.write_str("foreign key"),
        }
    }
}

/// Root error type for the routing engine.
#[derive(Error, Debug)]
pub enum Error {
    /// The id does not resolve to an active row in the requested scope.
    #[error("The {entity} was not found")]
    NotFound { entity: EntityKind },

    /// A write reported success but affected no rows.
    #[error("The {entity} could not be persisted")]
    NotPersisted { entity: EntityKind },

    #[error("The {entity} violates a {kind} constraint: {constraint}")]
    ConstraintViolation {
        entity: EntityKind,
        kind: ConstraintKind,
        constraint: String,
    },

    #[error("Database operation failed: {0}")]
    Database(#[from] DatabaseError),

    #[error("Input validation failed: {0}")]
    Validation(#[from] ValidationError),

    #[error("Routing rule error: {0}")]
    Route(#[from] RouteError),

    #[error("Invalid configuration value: {0}")]
    InvalidConfigValue(String),

    #[error("Unexpected error: {0}")]
    Unexpected(String),
}

impl Error {
    pub fn not_found(entity: EntityKind) -> Self {
        Error::NotFound { entity }
    }

    pub fn not_persisted(entity: EntityKind) -> Self {
        Error::NotPersisted { entity }
    }

    /// Returns true when the error is a `NotFound` for any entity.
    pub fn is_not_found(&self) -> bool {
        matches!(self, Error::NotFound { .. })
    }

    /// The entity this error is about, when it carries one.
    pub fn entity(&self) -> Option<EntityKind> {
        match self {
            Error::NotFound { entity }
            | Error::NotPersisted { entity }
            | Error::ConstraintViolation { entity, .. } => Some(*entity),
            _ => None,
        }
    }

    /// Stable machine-readable code for callers that must branch on the error.
    pub fn code(&self) -> String {
        match self {
            Error::NotFound { entity } => format!("{}_NOT_FOUND", entity.code_prefix()),
            Error::NotPersisted { entity } => {
                format!("{}_NOT_PERSISTED", entity.code_prefix())
            }
            Error::ConstraintViolation { entity, .. } => {
                format!("{}_CONSTRAINT_VIOLATION", entity.code_prefix())
            }
            Error::Database(e) => e.code().to_string(),
            Error::Validation(e) => e.code().to_string(),
            Error::Route(e) => e.code().to_string(),
            Error::InvalidConfigValue(_) => "INVALID_CONFIG_VALUE".to_string(),
            Error::Unexpected(_) => "INTERNAL_ERROR".to_string(),
        }
    }

    /// Attaches an entity kind to raw integrity violations coming from storage.
    ///
    /// Every other error is returned unchanged.
    pub fn classify(self, entity: EntityKind) -> Self {
        match self {
            Error::Database(DatabaseError::UniqueViolation(constraint)) => {
                Error::ConstraintViolation {
                    entity,
                    kind: ConstraintKind::Unique,
                    constraint,
                }
            }
            Error::Database(DatabaseError::ForeignKeyViolation(constraint)) => {
                Error::ConstraintViolation {
                    entity,
                    kind: ConstraintKind::ForeignKey,
                    constraint,
                }
            }
            other => other,
        }
    }
}

/// Database-agnostic error type for storage operations.
///
/// This enum uses `String` for all error details, allowing the storage layer
/// to convert storage-specific errors into this format.
#[derive(Error, Debug)]
pub enum DatabaseError {
    /// Failed to establish a database connection.
    #[error("Failed to connect to database: {0}")]
    ConnectionFailed(String),

    /// Failed to create or configure the connection pool.
    #[error("Failed to create database pool: {0}")]
    PoolCreationFailed(String),

    /// A database query failed to execute.
    #[error("Database query failed: {0}")]
    QueryFailed(String),

    /// A unique constraint was violated (e.g., duplicate key).
    #[error("Unique constraint violation: {0}")]
    UniqueViolation(String),

    /// A foreign key constraint was violated.
    #[error("Foreign key violation: {0}")]
    ForeignKeyViolation(String),

    /// Begin, commit, or rollback failed.
    #[error("Transaction failed: {0}")]
    TransactionFailed(String),

    /// Database migration failed.
    #[error("Database migration failed: {0}")]
    MigrationFailed(String),

    /// Internal/unexpected database error.
    #[error("Internal database error: {0}")]
    Internal(String),
}

impl DatabaseError {
    pub fn code(&self) -> &'static str {
        match self {
            DatabaseError::ConnectionFailed(_) => "DB_CONNECTION_FAILED",
            DatabaseError::PoolCreationFailed(_) => "DB_POOL_FAILED",
            DatabaseError::QueryFailed(_) => "DB_QUERY_FAILED",
            DatabaseError::UniqueViolation(_) => "UNIQUE_VIOLATION",
            DatabaseError::ForeignKeyViolation(_) => "FOREIGN_KEY_VIOLATION",
            DatabaseError::TransactionFailed(_) => "TRANSACTION_FAILED",
            DatabaseError::MigrationFailed(_) => "DB_MIGRATION_FAILED",
            DatabaseError::Internal(_) => "DB_INTERNAL_ERROR",
        }
    }
}

/// Validation errors for caller input.
#[derive(Error, Debug)]
pub enum ValidationError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Required field '{0}' is missing")]
    MissingField(String),

    #[error("Invalid pagination cursor: {0}")]
    InvalidCursor(String),

    #[error("Invalid sort order '{0}', expected 'asc' or 'desc'")]
    InvalidSortOrder(String),

    #[error("Invalid operation type '{0}', expected 'source' or 'destination'")]
    InvalidOperationType(String),

    #[error("Invalid date range: start {start} is after end {end}")]
    InvalidDateRange { start: String, end: String },
}

impl ValidationError {
    pub fn code(&self) -> &'static str {
        match self {
            ValidationError::InvalidInput(_) => "INVALID_INPUT",
            ValidationError::MissingField(_) => "MISSING_FIELD",
            ValidationError::InvalidCursor(_) => "INVALID_CURSOR",
            ValidationError::InvalidSortOrder(_) => "INVALID_SORT_ORDER",
            ValidationError::InvalidOperationType(_) => "INVALID_OPERATION_TYPE",
            ValidationError::InvalidDateRange { .. } => "INVALID_DATE_RANGE",
        }
    }
}

/// Business-rule violations raised by the route services.
#[derive(Error, Debug)]
pub enum RouteError {
    #[error("Operation route is linked to transaction routes: {}", .transaction_route_ids.join(", "))]
    OperationRouteInUse { transaction_route_ids: Vec<String> },

    #[error("Operation route '{0}' is referenced more than once")]
    DuplicateOperationRoute(String),

    #[error("A transaction route needs at least one source and one destination operation route")]
    IncompleteRouteComposition,
}

impl RouteError {
    pub fn code(&self) -> &'static str {
        match self {
            RouteError::OperationRouteInUse { .. } => "OPERATION_ROUTE_IN_USE",
            RouteError::DuplicateOperationRoute(_) => "DUPLICATE_OPERATION_ROUTE",
            RouteError::IncompleteRouteComposition => "INCOMPLETE_ROUTE_COMPOSITION",
        }
    }
}
