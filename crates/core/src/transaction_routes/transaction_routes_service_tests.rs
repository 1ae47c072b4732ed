#[cfg(test)]
mod tests {
    use crate::errors::{EntityKind, Error, Result, RouteError};
    use crate::operation_routes::{
        AccountRule, NewOperationRoute, OperationRoute, OperationRouteRepositoryTrait,
        OperationRouteService, OperationRouteServiceTrait, OperationRouteUpdate, OperationType,
    };
    use crate::pagination::{ListFilter, Page};
    use crate::transaction_routes::{
        NewTransactionRoute, TransactionRoute, TransactionRouteRepositoryTrait,
        TransactionRouteService, TransactionRouteServiceTrait, TransactionRouteUpdate,
    };
    use async_trait::async_trait;
    use chrono::NaiveDateTime;
    use std::collections::HashMap;
    use std::sync::{Arc, Mutex};

    const ORG: &str = "org-1";
    const LEDGER: &str = "ledger-1";

    fn timestamp() -> NaiveDateTime {
        chrono::DateTime::from_timestamp(1_700_000_000, 0)
            .unwrap()
            .naive_utc()
    }

    fn op_route(id: &str, operation_type: OperationType) -> OperationRoute {
        OperationRoute {
            id: id.to_string(),
            organization_id: ORG.to_string(),
            ledger_id: LEDGER.to_string(),
            title: format!("route {id}"),
            description: None,
            code: None,
            operation_type,
            account: Some(AccountRule::alias("@cash")),
            created_at: timestamp(),
            updated_at: timestamp(),
            deleted_at: None,
        }
    }

    fn ids(values: &[&str]) -> Vec<String> {
        values.iter().map(|v| v.to_string()).collect()
    }

    // --- Mock OperationRouteRepository ---
    #[derive(Default)]
    struct MockOperationRoutes {
        routes: Mutex<Vec<OperationRoute>>,
        /// operation route id -> linked transaction route ids
        links: Mutex<HashMap<String, Vec<String>>>,
        deleted: Mutex<Vec<String>>,
    }

    impl MockOperationRoutes {
        fn with_routes(routes: Vec<OperationRoute>) -> Self {
            Self {
                routes: Mutex::new(routes),
                ..Default::default()
            }
        }

        fn link(&self, operation_route_id: &str, transaction_route_id: &str) {
            self.links
                .lock()
                .unwrap()
                .entry(operation_route_id.to_string())
                .or_default()
                .push(transaction_route_id.to_string());
        }
    }

    #[async_trait]
    impl OperationRouteRepositoryTrait for MockOperationRoutes {
        async fn create(
            &self,
            _organization_id: &str,
            _ledger_id: &str,
            new_route: NewOperationRoute,
        ) -> Result<OperationRoute> {
            let mut route = op_route("new", new_route.operation_type);
            route.title = new_route.title;
            route.account = new_route.account;
            self.routes.lock().unwrap().push(route.clone());
            Ok(route)
        }

        fn find_by_id(
            &self,
            _organization_id: &str,
            _ledger_id: &str,
            id: &str,
        ) -> Result<OperationRoute> {
            self.routes
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| Error::not_found(EntityKind::OperationRoute))
        }

        fn find_by_ids(
            &self,
            organization_id: &str,
            ledger_id: &str,
            ids: &[String],
        ) -> Result<Vec<OperationRoute>> {
            ids.iter()
                .map(|id| self.find_by_id(organization_id, ledger_id, id))
                .collect()
        }

        async fn update(
            &self,
            _organization_id: &str,
            _ledger_id: &str,
            _id: &str,
            _update: OperationRouteUpdate,
        ) -> Result<OperationRoute> {
            unimplemented!()
        }

        async fn delete(&self, _organization_id: &str, _ledger_id: &str, id: &str) -> Result<()> {
            self.deleted.lock().unwrap().push(id.to_string());
            Ok(())
        }

        fn find_all(
            &self,
            _organization_id: &str,
            _ledger_id: &str,
            _filter: &ListFilter,
        ) -> Result<Page<OperationRoute>> {
            Ok(Page::empty())
        }

        fn has_transaction_route_links(&self, operation_route_id: &str) -> Result<bool> {
            Ok(self
                .links
                .lock()
                .unwrap()
                .get(operation_route_id)
                .is_some_and(|l| !l.is_empty()))
        }

        fn find_transaction_route_ids(&self, operation_route_id: &str) -> Result<Vec<String>> {
            Ok(self
                .links
                .lock()
                .unwrap()
                .get(operation_route_id)
                .cloned()
                .unwrap_or_default())
        }
    }

    // --- Mock TransactionRouteRepository ---
    #[derive(Default)]
    struct MockTransactionRoutes {
        routes: Mutex<Vec<TransactionRoute>>,
        created: Mutex<Vec<NewTransactionRoute>>,
        last_update: Mutex<Option<(Vec<String>, Vec<String>)>>,
        last_delete: Mutex<Option<Vec<String>>>,
    }

    impl MockTransactionRoutes {
        fn with_route(id: &str, linked: Vec<OperationRoute>) -> Self {
            let route = TransactionRoute {
                id: id.to_string(),
                organization_id: ORG.to_string(),
                ledger_id: LEDGER.to_string(),
                title: "Transfer".to_string(),
                description: None,
                operation_routes: linked,
                created_at: timestamp(),
                updated_at: timestamp(),
                deleted_at: None,
            };
            Self {
                routes: Mutex::new(vec![route]),
                ..Default::default()
            }
        }
    }

    #[async_trait]
    impl TransactionRouteRepositoryTrait for MockTransactionRoutes {
        async fn create(
            &self,
            organization_id: &str,
            ledger_id: &str,
            new_route: NewTransactionRoute,
        ) -> Result<TransactionRoute> {
            self.created.lock().unwrap().push(new_route.clone());
            Ok(TransactionRoute {
                id: "tr-new".to_string(),
                organization_id: organization_id.to_string(),
                ledger_id: ledger_id.to_string(),
                title: new_route.title,
                description: new_route.description,
                operation_routes: Vec::new(),
                created_at: timestamp(),
                updated_at: timestamp(),
                deleted_at: None,
            })
        }

        fn find_by_id(
            &self,
            _organization_id: &str,
            _ledger_id: &str,
            id: &str,
        ) -> Result<TransactionRoute> {
            self.routes
                .lock()
                .unwrap()
                .iter()
                .find(|r| r.id == id)
                .cloned()
                .ok_or_else(|| Error::not_found(EntityKind::TransactionRoute))
        }

        async fn update(
            &self,
            organization_id: &str,
            ledger_id: &str,
            id: &str,
            _update: TransactionRouteUpdate,
            to_add: &[String],
            to_remove: &[String],
        ) -> Result<TransactionRoute> {
            *self.last_update.lock().unwrap() = Some((to_add.to_vec(), to_remove.to_vec()));
            self.find_by_id(organization_id, ledger_id, id)
        }

        async fn delete(
            &self,
            _organization_id: &str,
            _ledger_id: &str,
            _id: &str,
            to_remove: &[String],
        ) -> Result<()> {
            *self.last_delete.lock().unwrap() = Some(to_remove.to_vec());
            Ok(())
        }

        fn find_all(
            &self,
            _organization_id: &str,
            _ledger_id: &str,
            _filter: &ListFilter,
        ) -> Result<Page<TransactionRoute>> {
            Ok(Page::empty())
        }
    }

    fn standard_operation_routes() -> Arc<MockOperationRoutes> {
        Arc::new(MockOperationRoutes::with_routes(vec![
            op_route("a", OperationType::Source),
            op_route("b", OperationType::Destination),
            op_route("c", OperationType::Source),
            op_route("d", OperationType::Destination),
        ]))
    }

    // ==================== Create ====================

    #[tokio::test]
    async fn test_create_fills_operation_routes_in_input_order() {
        let operation_routes = standard_operation_routes();
        let repository = Arc::new(MockTransactionRoutes::default());
        let service = TransactionRouteService::new(repository.clone(), operation_routes);

        let created = service
            .create_transaction_route(ORG, LEDGER, NewTransactionRoute::new("Pay", ["b", "a"]))
            .await
            .unwrap();

        assert_eq!(created.operation_route_ids(), ids(&["b", "a"]));
        assert_eq!(repository.created.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_create_requires_source_and_destination() {
        let operation_routes = standard_operation_routes();
        let repository = Arc::new(MockTransactionRoutes::default());
        let service = TransactionRouteService::new(repository.clone(), operation_routes);

        let err = service
            .create_transaction_route(ORG, LEDGER, NewTransactionRoute::new("Pay", ["a", "c"]))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Route(RouteError::IncompleteRouteComposition)
        ));
        assert!(repository.created.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_create_with_unknown_operation_route_fails() {
        let operation_routes = standard_operation_routes();
        let repository = Arc::new(MockTransactionRoutes::default());
        let service = TransactionRouteService::new(repository.clone(), operation_routes);

        let err = service
            .create_transaction_route(
                ORG,
                LEDGER,
                NewTransactionRoute::new("Pay", ["a", "missing"]),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), "OPERATION_ROUTE_NOT_FOUND");
        assert!(repository.created.lock().unwrap().is_empty());
    }

    // ==================== Update ====================

    #[tokio::test]
    async fn test_update_sends_link_differences() {
        let operation_routes = standard_operation_routes();
        let repository = Arc::new(MockTransactionRoutes::with_route(
            "tr-1",
            vec![
                op_route("c", OperationType::Source),
                op_route("d", OperationType::Destination),
            ],
        ));
        let service = TransactionRouteService::new(repository.clone(), operation_routes);

        service
            .update_transaction_route(
                ORG,
                LEDGER,
                "tr-1",
                TransactionRouteUpdate::default(),
                Some(ids(&["a", "b", "d"])),
            )
            .await
            .unwrap();

        let (to_add, to_remove) = repository.last_update.lock().unwrap().clone().unwrap();
        assert_eq!(to_add, ids(&["a", "b"]));
        assert_eq!(to_remove, ids(&["c"]));
    }

    #[tokio::test]
    async fn test_update_without_route_set_leaves_links_alone() {
        let operation_routes = standard_operation_routes();
        let repository = Arc::new(MockTransactionRoutes::with_route("tr-1", Vec::new()));
        let service = TransactionRouteService::new(repository.clone(), operation_routes);

        service
            .update_transaction_route(
                ORG,
                LEDGER,
                "tr-1",
                TransactionRouteUpdate {
                    title: Some("Renamed".to_string()),
                    description: None,
                },
                None,
            )
            .await
            .unwrap();

        let (to_add, to_remove) = repository.last_update.lock().unwrap().clone().unwrap();
        assert!(to_add.is_empty());
        assert!(to_remove.is_empty());
    }

    #[tokio::test]
    async fn test_update_rejects_duplicate_ids() {
        let operation_routes = standard_operation_routes();
        let repository = Arc::new(MockTransactionRoutes::with_route("tr-1", Vec::new()));
        let service = TransactionRouteService::new(repository.clone(), operation_routes);

        let err = service
            .update_transaction_route(
                ORG,
                LEDGER,
                "tr-1",
                TransactionRouteUpdate::default(),
                Some(ids(&["a", "b", "a"])),
            )
            .await
            .unwrap_err();

        assert_eq!(err.code(), "DUPLICATE_OPERATION_ROUTE");
        assert!(repository.last_update.lock().unwrap().is_none());
    }

    // ==================== Delete ====================

    #[tokio::test]
    async fn test_delete_removes_every_link() {
        let operation_routes = standard_operation_routes();
        let repository = Arc::new(MockTransactionRoutes::with_route(
            "tr-1",
            vec![
                op_route("a", OperationType::Source),
                op_route("b", OperationType::Destination),
            ],
        ));
        let service = TransactionRouteService::new(repository.clone(), operation_routes);

        service
            .delete_transaction_route(ORG, LEDGER, "tr-1")
            .await
            .unwrap();

        let removed = repository.last_delete.lock().unwrap().clone().unwrap();
        assert_eq!(removed, ids(&["a", "b"]));
    }

    #[tokio::test]
    async fn test_delete_unknown_route_is_not_found() {
        let service = TransactionRouteService::new(
            Arc::new(MockTransactionRoutes::default()),
            standard_operation_routes(),
        );

        let err = service
            .delete_transaction_route(ORG, LEDGER, "nope")
            .await
            .unwrap_err();
        assert!(err.is_not_found());
    }

    // ==================== Operation route deletion ====================

    #[tokio::test]
    async fn test_linked_operation_route_cannot_be_deleted() {
        let operation_routes = standard_operation_routes();
        operation_routes.link("a", "tr-1");
        operation_routes.link("a", "tr-2");
        let service = OperationRouteService::new(operation_routes.clone());

        let err = service
            .delete_operation_route(ORG, LEDGER, "a")
            .await
            .unwrap_err();

        match err {
            Error::Route(RouteError::OperationRouteInUse {
                transaction_route_ids,
            }) => assert_eq!(transaction_route_ids, ids(&["tr-1", "tr-2"])),
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(operation_routes.deleted.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unlinked_operation_route_is_deleted() {
        let operation_routes = standard_operation_routes();
        let service = OperationRouteService::new(operation_routes.clone());

        service
            .delete_operation_route(ORG, LEDGER, "b")
            .await
            .unwrap();

        assert_eq!(*operation_routes.deleted.lock().unwrap(), ids(&["b"]));
    }

    #[tokio::test]
    async fn test_create_operation_route_validates_input() {
        let service = OperationRouteService::new(standard_operation_routes());

        let err = service
            .create_operation_route(
                ORG,
                LEDGER,
                NewOperationRoute::new("", OperationType::Source),
            )
            .await
            .unwrap_err();
        assert_eq!(err.code(), "MISSING_FIELD");
    }
}
