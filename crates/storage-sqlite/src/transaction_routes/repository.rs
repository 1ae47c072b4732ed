use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use diesel::prelude::*;
use diesel::SqliteConnection;
use ledger_routing_core::errors::{EntityKind, Error};
use ledger_routing_core::operation_routes::OperationRoute;
use ledger_routing_core::pagination::{
    KeysetBound, KeysetQuery, ListFilter, Page, PaginationConfig, SortOrder,
};
use ledger_routing_core::transaction_routes::{
    NewTransactionRoute, TransactionRoute, TransactionRouteRepositoryTrait,
    TransactionRouteUpdate,
};
use ledger_routing_core::Result;
use log::debug;

use super::model::{RouteLinkDB, TransactionRouteChangesetDB, TransactionRouteDB};
use crate::db::{get_connection, DbPool, WriteHandle};
use crate::errors::{classify_diesel, StorageError};
use crate::operation_routes::OperationRouteDB;
use crate::schema::{operation_route, operation_transaction_route, transaction_route};
use crate::utils::{chunk_for_sqlite, new_id, now_utc};

pub struct TransactionRouteRepository {
    pool: Arc<DbPool>,
    writer: WriteHandle,
    pagination: PaginationConfig,
}

impl TransactionRouteRepository {
    pub fn new(pool: Arc<DbPool>, writer: WriteHandle) -> Self {
        TransactionRouteRepository {
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

/// Soft-deletes the route's active links to `to_remove`, then links `to_add`.
///
/// Runs on the caller's open transaction, so a failed insert also undoes the
/// removals.
fn apply_link_changes(
    conn: &mut SqliteConnection,
    transaction_route_id: &str,
    to_add: &[String],
    to_remove: &[String],
) -> Result<()> {
    let now = now_utc();

    for chunk in chunk_for_sqlite(to_remove) {
        diesel::update(
            operation_transaction_route::table
                .filter(operation_transaction_route::transaction_route_id.eq(transaction_route_id))
                .filter(operation_transaction_route::operation_route_id.eq_any(chunk))
                .filter(operation_transaction_route::deleted_at.is_null()),
        )
        .set(operation_transaction_route::deleted_at.eq(Some(now)))
        .execute(conn)
        .map_err(classify_diesel(EntityKind::RouteLink))?;
    }

    for operation_route_id in to_add {
        let link = RouteLinkDB::active(new_id(), operation_route_id, transaction_route_id, now);
        let inserted = diesel::insert_into(operation_transaction_route::table)
            .values(&link)
            .execute(conn)
            .map_err(classify_diesel(EntityKind::RouteLink))?;
        if inserted == 0 {
            return Err(Error::not_persisted(EntityKind::RouteLink));
        }
    }

    debug!(
        "Transaction route {}: linked {}, unlinked {}",
        transaction_route_id,
        to_add.len(),
        to_remove.len()
    );
    Ok(())
}

/// Loads an active route with its active, in-scope operation routes in one join.
fn load_transaction_route(
    conn: &mut SqliteConnection,
    organization_id: &str,
    ledger_id: &str,
    id: &str,
) -> Result<TransactionRoute> {
    let rows = transaction_route::table
        .left_join(
            operation_transaction_route::table.on(operation_transaction_route::transaction_route_id
                .eq(transaction_route::id)
                .and(operation_transaction_route::deleted_at.is_null())),
        )
        .left_join(
            operation_route::table.on(operation_route::id
                .eq(operation_transaction_route::operation_route_id)
                .and(operation_route::organization_id.eq(organization_id))
                .and(operation_route::ledger_id.eq(ledger_id))
                .and(operation_route::deleted_at.is_null())),
        )
        .filter(transaction_route::organization_id.eq(organization_id))
        .filter(transaction_route::ledger_id.eq(ledger_id))
        .filter(transaction_route::id.eq(id))
        .filter(transaction_route::deleted_at.is_null())
        .order((operation_route::created_at.asc(), operation_route::id.asc()))
        .select((
            TransactionRouteDB::as_select(),
            Option::<OperationRouteDB>::as_select(),
        ))
        .load::<(TransactionRouteDB, Option<OperationRouteDB>)>(conn)
        .map_err(StorageError::from)?;

    let mut rows = rows.into_iter();
    let (route, first) = rows
        .next()
        .ok_or_else(|| Error::not_found(EntityKind::TransactionRoute))?;

    let mut seen = HashSet::new();
    let mut operation_routes = Vec::new();
    for linked in std::iter::once(first).chain(rows.map(|(_, op)| op)).flatten() {
        if seen.insert(linked.id.clone()) {
            operation_routes.push(OperationRoute::try_from(linked)?);
        }
    }

    Ok(route.into_domain(operation_routes))
}

#[async_trait]
impl TransactionRouteRepositoryTrait for TransactionRouteRepository {
    async fn create(
        &self,
        organization_id: &str,
        ledger_id: &str,
        new_route: NewTransactionRoute,
    ) -> Result<TransactionRoute> {
        let now = now_utc();
        let row = TransactionRouteDB {
            id: new_id(),
            organization_id: organization_id.to_string(),
            ledger_id: ledger_id.to_string(),
            title: new_route.title,
            description: new_route.description,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        };
        let operation_route_ids = new_route.operation_routes;

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<TransactionRoute> {
                let affected = diesel::insert_into(transaction_route::table)
                    .values(&row)
                    .execute(conn)
                    .map_err(classify_diesel(EntityKind::TransactionRoute))?;
                if affected == 0 {
                    return Err(Error::not_persisted(EntityKind::TransactionRoute));
                }

                apply_link_changes(conn, &row.id, &operation_route_ids, &[])?;
                debug!(
                    "Created transaction route {} with {} link(s)",
                    row.id,
                    operation_route_ids.len()
                );
                Ok(TransactionRoute::from(row))
            })
            .await
    }

    fn find_by_id(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
    ) -> Result<TransactionRoute> {
        let mut conn = get_connection(&self.pool)?;
        load_transaction_route(&mut conn, organization_id, ledger_id, id)
    }

    async fn update(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
        update: TransactionRouteUpdate,
        to_add: &[String],
        to_remove: &[String],
    ) -> Result<TransactionRoute> {
        let organization_id = organization_id.to_string();
        let ledger_id = ledger_id.to_string();
        let id = id.to_string();
        let to_add = to_add.to_vec();
        let to_remove = to_remove.to_vec();
        let changes = TransactionRouteChangesetDB::from_update(update, now_utc());

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<TransactionRoute> {
                let affected = diesel::update(
                    transaction_route::table
                        .filter(transaction_route::organization_id.eq(&organization_id))
                        .filter(transaction_route::ledger_id.eq(&ledger_id))
                        .filter(transaction_route::id.eq(&id))
                        .filter(transaction_route::deleted_at.is_null()),
                )
                .set(&changes)
                .execute(conn)
                .map_err(classify_diesel(EntityKind::TransactionRoute))?;

                if affected == 0 {
                    return Err(Error::not_found(EntityKind::TransactionRoute));
                }

                if !to_add.is_empty() || !to_remove.is_empty() {
                    apply_link_changes(conn, &id, &to_add, &to_remove)?;
                }

                load_transaction_route(conn, &organization_id, &ledger_id, &id)
            })
            .await
    }

    async fn delete(
        &self,
        organization_id: &str,
        ledger_id: &str,
        id: &str,
        to_remove: &[String],
    ) -> Result<()> {
        let organization_id = organization_id.to_string();
        let ledger_id = ledger_id.to_string();
        let id = id.to_string();
        let to_remove = to_remove.to_vec();

        self.writer
            .exec(move |conn: &mut SqliteConnection| -> Result<()> {
                let affected = diesel::update(
                    transaction_route::table
                        .filter(transaction_route::organization_id.eq(&organization_id))
                        .filter(transaction_route::ledger_id.eq(&ledger_id))
                        .filter(transaction_route::id.eq(&id))
                        .filter(transaction_route::deleted_at.is_null()),
                )
                .set(transaction_route::deleted_at.eq(Some(now_utc())))
                .execute(conn)
                .map_err(StorageError::from)?;

                if affected == 0 {
                    debug!("Transaction route {} was not active; nothing to delete", id);
                }

                apply_link_changes(conn, &id, &[], &to_remove)
            })
            .await
    }

    fn find_all(
        &self,
        organization_id: &str,
        ledger_id: &str,
        filter: &ListFilter,
    ) -> Result<Page<TransactionRoute>> {
        let keyset = KeysetQuery::from_filter(filter, &self.pagination)?;
        let mut conn = get_connection(&self.pool)?;

        let mut query = transaction_route::table
            .filter(transaction_route::organization_id.eq(organization_id))
            .filter(transaction_route::ledger_id.eq(ledger_id))
            .filter(transaction_route::deleted_at.is_null())
            .select(TransactionRouteDB::as_select())
            .into_boxed();

        if let Some(start) = keyset.start_date {
            query = query.filter(transaction_route::created_at.ge(start));
        }
        if let Some(end) = keyset.end_date {
            query = query.filter(transaction_route::created_at.le(end));
        }
        match &keyset.bound {
            Some(KeysetBound::After(cursor_id)) => {
                query = query.filter(transaction_route::id.gt(cursor_id.clone()));
            }
            Some(KeysetBound::Before(cursor_id)) => {
                query = query.filter(transaction_route::id.lt(cursor_id.clone()));
            }
            None => {}
        }
        query = match keyset.order {
            SortOrder::Asc => query.order(transaction_route::id.asc()),
            SortOrder::Desc => query.order(transaction_route::id.desc()),
        };

        let rows = query
            .limit(keyset.fetch_limit())
            .load::<TransactionRouteDB>(&mut conn)
            .map_err(StorageError::from)?;

        let routes: Vec<TransactionRoute> = rows.into_iter().map(TransactionRoute::from).collect();
        Ok(keyset.paginate(routes, |r| r.id.as_str()))
    }
}
