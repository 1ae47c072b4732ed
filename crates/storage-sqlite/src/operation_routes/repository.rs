use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use ledger_routing_core::errors::{EntityKind, Error};
use ledger_routing_core::operation_routes::{
    NewOperationRoute, OperationRoute, OperationRouteRepositoryTrait, OperationRouteUpdate,
};
use ledger_routing_core::pagination::{
    KeysetBound, KeysetQuery, ListFilter, Page, PaginationConfig, SortOrder,
};
use ledger_routing_core::Result;
use log::debug;

use super::model::{OperationRouteChangesetDB, OperationRouteDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{classify_diesel, StorageError};
use crate::schema::{operation_route, operation_transaction_route};
use crate::utils::{chunk_for_sqlite, new_id, now_utc};

pub struct OperationRouteRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    pagination: PaginationConfig,
}

impl OperationRouteRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        OperationRouteRepository {
            pool,
            writer,
            pagination: PaginationConfig::default(),
        }
    }

    pub fn with_pagination(mut self, pagination: PaginationConfig) -> Self {
        self.pagination = pagination;
        self
    }
}

/// Loads one active, in-scope operation route on an open connection.
pub(crate) fn load_operation_route(
    conn: &mut SqliteConnection,
    organization_id: &str,
    ledger_id: &str,
    id: &str,
) -> Result<OperationRoute> {
    let row = operation_route::table
        .filter(operation_route::organization_id.eq(organization_id))
        .filter(operation_route::ledger_id.eq(ledger_id))
        .filter(operation_route::id.eq(id))
        .filter(operation_route::deleted_at.is_null())
        .select(OperationRouteDB::as_select())
        .first::<OperationRouteDB>(conn)
        .optional()
        .map_err(StorageError::from)?
        .ok_or_else(|| Error::not_found(EntityKind::OperationRoute))?;

    OperationRoute::try_from(row)
}

#[async_trait]
impl OperationRouteRepositoryTrait for OperationRouteRepository {
    async fn create(
        &self,
        organization_id: &str,
        ledger_id: &str,
        new_route: NewOperationRoute,
    ) -> Result<OperationRoute> {
        let row = OperationRouteDB::from_new(
            new_id(),
            organization_id,
            ledger_id,
            new_route,
            now_utc(),
        );

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<OperationRoute> {
                let affected = diesel::insert_into(operation_route::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(classify_diesel(EntityKind::OperationRoute))?;
                if affected == 0 {
                    return Err(Error::not_persisted(EntityKind::OperationRoute));
                }
                debug!("Created operation route {}", row.id);
                OperationRoute::try_from(row)
            })
            .await
    }

    fn find_by_id(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<OperationRoute> {
        let mut conn = get_connection(&self.pool)?;
        load_operation_route(&mut conn, organization_id, ledger_id, id)
    }

    fn find_by_ids(
        &self,
        organization_id: &str,
        ledger_id: &str,
        ids: &[String],
    ) -> Result<Vec<OperationRoute>> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut conn = get_connection(&self.pool)?;
        let mut found: HashMap<String, OperationRouteDB> = HashMap::with_capacity(ids.len());
        for chunk in chunk_for_sqlite(ids) {
            let rows = operation_route::table
                .filter(operation_route::organization_id.eq(organization_id))
                .filter(operation_route::ledger_id.eq(ledger_id))
                .filter(operation_route::id.eq_any(chunk))
                .filter(operation_route::deleted_at.is_null())
                .select(OperationRouteDB::as_select())
                .load::<OperationRouteDB>(&mut conn)
                .map_err(StorageError::from)?;
            found.extend(rows.into_iter().map(|row| (row.id.clone(), row)));
        }

        // Input order; any unresolved id fails the whole lookup.
        ids.iter()
            .map(|id| {
                found
                    .get(id)
                    .cloned()
                    .ok_or_else(|| Error::not_found(EntityKind::OperationRoute))
                    .and_then(OperationRoute::try_from)
            })
            .collect()
    }

    async fn update(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
        update: OperationRouteUpdate,
    ) -> Result<OperationRoute> {
        let organization_id = organization_id.to_string();
        let ledger_id = ledger_id.to_string();
        let id = id.to_string();
        let changes = OperationRouteChangesetDB::from_update(update, now_utc());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<OperationRoute> {
                let affected = diesel::update(
                    operation_route::table
                        .filter(operation_route::organization_id.eq(&organization_id))
                        .filter(operation_route::ledger_id.eq(&ledger_id))
                        .filter(operation_route::id.eq(&id))
                        .filter(operation_route::deleted_at.is_null()),
                )
                .set(&changes)
                .execute(conn)
                .map_err(classify_diesel(EntityKind::OperationRoute))?;

                if affected == 0 {
                    return Err(Error::not_found(EntityKind::OperationRoute));
                }
                load_operation_route(conn, &organization_id, &ledger_id, &id)
            })
            .await
    }

    async fn delete(&self, organization_id: &str, ledger_id: &str, id: &str) -> Result<()> {
        let organization_id = organization_id.to_string();
        let ledger_id = ledger_id.to_string();
        let id = id.to_string();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::update(
                    operation_route::table
                        .filter(operation_route::organization_id.eq(&organization_id))
                        .filter(operation_route::ledger_id.eq(&ledger_id))
                        .filter(operation_route::id.eq(&id))
                        .filter(operation_route::deleted_at.is_null()),
                )
                .set(operation_route::deleted_at.eq(Some(now_utc())))
                .execute(conn)
                .map_err(StorageError::from)?;

                if affected == 0 {
                    debug!("Operation route {} was not active; nothing to delete", id);
                }
                Ok(())
            })
            .await
    }

    fn find_all(
        &self,
        organization_id: &str,
        ledger_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<OperationRoute>> {
        let keyset = KeysetQuery::from_filter(filter, &self.pagination)?;
        let mut conn = get_connection(&self.pool)?;

        let mut query = operation_route::table
            .filter(operation_route::organization_id.eq(organization_id))
            .filter(operation_route::ledger_id.eq(ledger_id))
            .filter(operation_route::deleted_at.is_null())
            .select(OperationRouteDB::as_select())
            .into_boxed();

        if let Some(start) = keyset.start_date {
            query = query.filter(operation_route::created_at.ge(start));
        }
        if let Some(end) = keyset.end_date {
            query = query.filter(operation_route::created_at.le(end));
        }
        match &keyset.bound {
            Some(KeysetBound::After(cursor_id)) => {
                query = query.filter(operation_route::id.gt(cursor_id.clone()));
            }
            Some(KeysetBound::Before(cursor_id)) => {
                query = query.filter(operation_route::id.lt(cursor_id.clone()));
            }
            None => {}
        }
        query = match keyset.order {
            SortOrder::Asc => query.order(operation_route::id.asc()),
            SortOrder::Desc => query.order(operation_route::id.desc()),
        };

        let rows = query
            .limit(keyset.fetch_limit())
            .load::<OperationRouteDB>(&mut conn)
            .map_err(StorageError::from)?;

        let routes = rows
            .into_iter()
            .map(OperationRoute::try_from)
            .collect::<Result<Vec<_>>>()?;
        Ok(keyset.paginate(routes, |r| r.id.as_str()))
    }

    fn has_transaction_route_links(&self, operation_route_id: &str) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        let linked = diesel::select(diesel::dsl::exists(
            operation_transaction_route::table
                .inner_join(operation_route::table)
                .filter(operation_transaction_route::operation_route_id.eq(operation_route_id))
                .filter(operation_transaction_route::deleted_at.is_null())
                .filter(operation_route::deleted_at.is_null()),
        ))
        .get_result::<bool>(&mut conn)
        .map_err(StorageError::from)?;
        Ok(linked)
    }

    fn find_transaction_route_ids(&self, operation_route_id: &str) -> Result<Vec<String>> {
        let mut conn = get_connection(&self.pool)?;
        // A link is active only while its operation route is.
        let ids = operation_transaction_route::table
            .inner_join(operation_route::table)
            .filter(operation_transaction_route::operation_route_id.eq(operation_route_id))
            .filter(operation_transaction_route::deleted_at.is_null())
            .filter(operation_route::deleted_at.is_null())
            .order((
                operation_transaction_route::created_at.asc(),
                operation_transaction_route::id.asc(),
            ))
            .select(operation_transaction_route::transaction_route_id)
            .load::<String>(&mut conn)
            .map_err(StorageError::from)?;
        Ok(ids)
    }
}
