use log::{debug, warn};
use std::sync::Arc;

use super::operation_routes_model::{NewOperationRoute, OperationRoute, OperationRouteUpdate};
use super::operation_routes_traits::{OperationRouteRepositoryTrait, OperationRouteServiceTrait};
use crate::errors::{Result, RouteError};
use crate::pagination::{ListFilter, Page};

/// Service for managing operation routes
pub struct OperationRouteService {
    repository: Arc<dyn OperationRouteRepositoryTrait>,
}

impl OperationRouteService {
    pub fn new(repository: Arc<dyn OperationRouteRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl OperationRouteServiceTrait for OperationRouteService {
    async fn create_operation_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        new_route: NewOperationRoute,
    ) -> Result<OperationRoute> {
        new_route.validate()?;
        debug!(
            "Creating {} operation route '{}' in ledger {}",
            new_route.operation_type, new_route.title, ledger_id
        );
        self.repository
            .create(organization_id, ledger_id, new_route)
            .await
    }

    fn get_operation_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<OperationRoute> {
        self.repository.find_by_id(organization_id, ledger_id, id)
    }

    fn list_operation_routes(
        &self,
        organization_id: &str,
        ledger_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<OperationRoute>> {
        self.repository.find_all(organization_id, ledger_id, filter)
    }

    async fn update_operation_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
        update: OperationRouteUpdate,
    ) -> Result<OperationRoute> {
        update.validate()?;
        self.repository
            .update(organization_id, ledger_id, id, update)
            .await
    }

    async fn delete_operation_route(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<()> {
        // Surfaces NotFound for unknown or out-of-scope routes.
        self.repository.find_by_id(organization_id, ledger_id, id)?;

        if self.repository.has_transaction_route_links(id)? {
            let transaction_route_ids = self.repository.find_transaction_route_ids(id)?;
            warn!(
                "Refusing to delete operation route {} linked to {} transaction route(s)",
                id,
                transaction_route_ids.len()
            );
            return Err(RouteError::OperationRouteInUse {
                transaction_route_ids,
            }
            .into());
        }

        self.repository.delete(organization_id, ledger_id, id).await
    }
}
