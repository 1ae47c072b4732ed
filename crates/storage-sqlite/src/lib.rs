//! SQLite storage implementation for the ledger routing rule engine.
//!
//! This crate provides all database-related functionality using Diesel ORM with SQLite.
//! It implements the repository traits defined in `ledger-routing-core` and contains:
//! - Database connection pooling and configuration
//! - Embedded Diesel migrations
//! - The single-writer actor that runs every write in one transaction
//! - Repository implementations for operation routes and transaction routes
//!
//! # Architecture
//!
//! This crate is the only place where Diesel dependencies exist. The `core`
//! crate is database-agnostic and works with traits.
//!
//! ```text
//!        core (domain, services)
//!                  │
//!                  ▼
//!          storage-sqlite (this crate)
//!                  │
//!                  ▼
//!              SQLite DB
//! ```

pub mod db;
pub mod errors;
pub mod schema;
pub mod utils;

// Repository implementations
pub mod operation_routes;
pub mod transaction_routes;

// Re-export database utilities
pub use db::{
    create_pool, get_connection, get_db_path, init, run_migrations, spawn_writer, DbConfig,
    DbConnection, DbPool, WriteHandle,
};

// Re-export storage errors and conversion helpers
pub use errors::{IntoCore, StorageError};

// Re-export repositories
pub use operation_routes::OperationRouteRepository;
pub use transaction_routes::TransactionRouteRepository;

// Re-export from ledger-routing-core for convenience
pub use ledger_routing_core::errors::{DatabaseError, Error, Result};
