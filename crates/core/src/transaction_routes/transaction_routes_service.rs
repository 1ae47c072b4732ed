use log::debug;
use std::sync::Arc;

use super::transaction_routes_model::{
    ensure_distinct, validate_composition, NewTransactionRoute, RouteLinkChanges,
    TransactionRoute, TransactionRouteUpdate,
};
use super::transaction_routes_traits::{
    TransactionRouteRepositoryTrait, TransactionRouteServiceTrait,
};
use crate::errors::Result;
use crate::operation_routes::{OperationRoute, OperationRouteRepositoryTrait};
use crate::pagination::{ListFilter, Page};

/// Service for managing transaction routes and their operation-route membership
pub struct TransactionRouteService {
    repository: Arc<dyn TransactionRouteRepositoryTrait>,
    operation_routes: Arc<dyn OperationRouteRepositoryTrait>,
}

impl TransactionRouteService {
    pub fn new(
        repository: Arc<dyn TransactionRouteRepositoryTrait>,
        operation_routes: Arc<dyn OperationRouteRepositoryTrait>,
    ) -> Self {
        Self {
            repository,
            operation_routes,
        }
    }

    /// Loads the referenced operation routes in the given order and checks
    /// that together they form a usable route.
    fn resolve_operation_routes(
        &self,
        organization_id: &str,
        ledger_id: &str,
        ids: &[String],
    ) -> Result<Vec<OperationRoute>> {
        let found = self
            .operation_routes
            .find_by_ids(organization_id, ledger_id, ids)?;
        validate_composition(&found)?;

        let mut ordered = Vec::with_capacity(found.len());
        for id in ids {
            if let Some(route) = found.iter().find(|r| &r.id == id) {
                ordered.push(route.clone());
            }
        }
        Ok(ordered)
    }
}

#[async_trait::async_trait]
impl TransactionRouteServiceTrait for TransactionRouteService {
    async fn create_transaction_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        new_route: NewTransactionRoute,
    ) -> Result<TransactionRoute> {
        new_route.validate()?;
        let operation_routes =
            self.resolve_operation_routes(organization_id, ledger_id, &new_route.operation_routes)?;

        debug!(
            "Creating transaction route '{}' with {} operation route(s)",
            new_route.title,
            operation_routes.len()
        );

        let mut created = self
            .repository
            .create(organization_id, ledger_id, new_route)
            .await?;
        created.operation_routes = operation_routes;
        Ok(created)
    }

    fn get_transaction_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<TransactionRoute> {
        self.repository.find_by_id(organization_id, ledger_id, id)
    }

    fn list_transaction_routes(
        &self,
        organization_id: &str,
        ledger_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<TransactionRoute>> {
        self.repository.find_all(organization_id, ledger_id, filter)
    }

    async fn update_transaction_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
        update: TransactionRouteUpdate,
        operation_routes: Option<Vec<String>>,
    ) -> Result<TransactionRoute> {
        update.validate()?;

        let changes = match operation_routes {
            Some(desired) => {
                ensure_distinct(&desired)?;
                let current = self.repository.find_by_id(organization_id, ledger_id, id)?;
                self.resolve_operation_routes(organization_id, ledger_id, &desired)?;
                RouteLinkChanges::between(&current.operation_route_ids(), &desired)
            }
            None => RouteLinkChanges::default(),
        };

        debug!(
            "Updating transaction route {}: +{} / -{} operation route link(s)",
            id,
            changes.to_add.len(),
            changes.to_remove.len()
        );

        self.repository
            .update(
                organization_id,
                ledger_id,
                id,
                update,
                &changes.to_add,
                &changes.to_remove,
            )
            .await
    }

    async fn delete_transaction_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<()> {
        let route = self.repository.find_by_id(organization_id, ledger_id, id)?;
        let to_remove = route.operation_route_ids();

        debug!(
            "Deleting transaction route {} and {} link(s)",
            id,
            to_remove.len()
        );

        self.repository
            .delete(organization_id, ledger_id, id, &to_remove)
            .await
    }
}
