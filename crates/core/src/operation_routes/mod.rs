//! Operation routes module - single-leg account eligibility rules.

mod account_rule;
mod operation_routes_model;
mod operation_routes_service;
mod operation_routes_traits;

#[cfg(test)]
mod operation_routes_model_tests;

// Re-export the public interface
pub use account_rule::{is_account_type_rule, AccountRule, EncodedAccountRule};
pub use operation_routes_model::{
    NewOperationRoute, OperationRoute, OperationRouteUpdate, OperationType,
};
pub use operation_routes_service::OperationRouteService;
pub use operation_routes_traits::{OperationRouteRepositoryTrait, OperationRouteServiceTrait};
