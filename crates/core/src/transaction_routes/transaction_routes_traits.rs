//! Transaction route repository and service traits.

use async_trait::async_trait;

use super::transaction_routes_model::{
    NewTransactionRoute, TransactionRoute, TransactionRouteUpdate,
};
use crate::errors::Result;
use crate::pagination::{ListFilter, Page};

/// Trait defining the contract for TransactionRoute repository operations.
///
/// Implementations own the route links and must apply every multi-step write
/// atomically.
#[async_trait]
pub trait TransactionRouteRepositoryTrait: Send + Sync {
    /// Inserts the route and one link per referenced operation route.
    ///
    /// The returned route is built from the insert payload; its
    /// `operation_routes` snapshot list is empty.
    async fn create(
        &self,
        organization_id: &str,
        ledger_id: &str,
        new_route: NewTransactionRoute,
    ) -> Result<TransactionRoute>;

    /// Retrieves the route with every actively linked operation route.
    fn find_by_id(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<TransactionRoute>;

    /// Applies the present fields, then removes and adds links.
    ///
    /// No conflict detection is done between `to_add` and `to_remove`: an id in
    /// both ends up with a fresh active link.
    async fn update(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
        update: TransactionRouteUpdate,
        to_add: &[String],
        to_remove: &[String],
    ) -> Result<TransactionRoute>;

    /// Soft-deletes the route and the links to the listed operation routes.
    async fn delete(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
        to_remove: &[String],
    ) -> Result<()>;

    /// Lists active routes without their operation routes.
    fn find_all(
        &self,
        organization_id: &str,
        ledger_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<TransactionRoute>>;
}

/// Trait defining the contract for TransactionRoute service operations.
#[async_trait]
pub trait TransactionRouteServiceTrait: Send + Sync {
    async fn create_transaction_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        new_route: NewTransactionRoute,
    ) -> Result<TransactionRoute>;

    fn get_transaction_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<TransactionRoute>;

    fn list_transaction_routes(
        &self,
        organization_id: &str,
        ledger_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<TransactionRoute>>;

    /// Updates the route's fields and, when `operation_routes` is given,
    /// replaces its linked set with exactly those routes.
    async fn update_transaction_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
        update: TransactionRouteUpdate,
        operation_routes: Option<Vec<String>>,
    ) -> Result<TransactionRoute>;

    /// Deletes the route together with all of its links.
    async fn delete_transaction_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<()>;
}
