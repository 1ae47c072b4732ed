//! Transaction routes module - named templates of operation routes.

mod transaction_routes_model;
mod transaction_routes_service;
mod transaction_routes_traits;

#[cfg(test)]
mod transaction_routes_service_tests;

// Re-export the public interface
pub use transaction_routes_model::{
    ensure_distinct, validate_composition, NewTransactionRoute, RouteLinkChanges,
    TransactionRoute, TransactionRouteUpdate,
};
pub use transaction_routes_service::TransactionRouteService;
pub use transaction_routes_traits::{
    TransactionRouteRepositoryTrait, TransactionRouteServiceTrait,
};
