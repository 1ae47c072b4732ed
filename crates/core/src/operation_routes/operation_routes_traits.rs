//! Operation route repository and service traits.
//!
//! These traits define the contract for operation route operations without any
//! database-specific types, allowing for different storage implementations.

use async_trait::async_trait;

use super::operation_routes_model::{NewOperationRoute, OperationRoute, OperationRouteUpdate};
use crate::errors::Result;
use crate::pagination::{ListFilter, Page};

/// Trait defining the contract for OperationRoute repository operations.
///
/// Every lookup is scoped by organization and ledger and only sees rows that
/// have not been soft-deleted.
#[async_trait]
pub trait OperationRouteRepositoryTrait: Send + Sync {
    /// Persists a new operation route.
    async fn create(
        &self,
        organization_id: &str,
        ledger_id: &str,
        new_route: NewOperationRoute,
    ) -> Result<OperationRoute>;

    /// Retrieves an active operation route by its ID.
    fn find_by_id(&self, organization_id: &str, ledger_id: &str, id: &str)
        -> Result<OperationRoute>;

    /// Retrieves every listed operation route.
    ///
    /// Fails with `NotFound` if any ID does not resolve; an empty list yields
    /// an empty result.
    fn find_by_ids(
        &self,
        organization_id: &str,
        ledger_id: &str,
        ids: &[String],
    ) -> Result<Vec<OperationRoute>>;

    /// Applies the fields present in `update`.
    async fn update(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
        update: OperationRouteUpdate,
    ) -> Result<OperationRoute>;

    /// Soft-deletes an operation route.
    ///
    /// Deleting a route that is already deleted is not an error.
    async fn delete(&self, organization_id: &str, ledger_id: &str, id: &str) -> Result<()>;

    /// Lists active operation routes inside the filter's creation-time window.
    fn find_all(
        &self,
        organization_id: &str,
        ledger_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<OperationRoute>>;

    /// True if any active transaction route link references the route.
    fn has_transaction_route_links(&self, operation_route_id: &str) -> Result<bool>;

    /// IDs of the transaction routes actively linked to the route, oldest link first.
    fn find_transaction_route_ids(&self, operation_route_id: &str) -> Result<Vec<String>>;
}

/// Trait defining the contract for OperationRoute service operations.
#[async_trait]
pub trait OperationRouteServiceTrait: Send + Sync {
    async fn create_operation_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        new_route: NewOperationRoute,
    ) -> Result<OperationRoute>;

    fn get_operation_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<OperationRoute>;

    fn list_operation_routes(
        &self,
        organization_id: &str,
        ledger_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<OperationRoute>>;

    async fn update_operation_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
        update: OperationRouteUpdate,
    ) -> Result<OperationRoute>;

    /// Deletes an operation route that no transaction route links to.
    async fn delete_operation_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<()>;
}
