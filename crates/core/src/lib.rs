//! Ledger Routing Core - Domain entities, services, and traits.
//!
//! This crate contains the routing rule engine's business logic: operation
//! routes (single-leg account eligibility rules) and transaction routes
//! (named templates grouping operation routes). It is database-agnostic and
//! defines traits that are implemented by the `storage-sqlite` crate.

pub mod constants;
pub mod errors;
pub mod operation_routes;
pub mod pagination;
pub mod transaction_routes;

// Re-export error types
pub use errors::Error;
pub use errors::Result;
