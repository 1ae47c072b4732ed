//! Database models for transaction routes and their operation-route links.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use ledger_routing_core::operation_routes::OperationRoute;
use ledger_routing_core::transaction_routes::{TransactionRoute, TransactionRouteUpdate};

/// Database model for transaction routes
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::transaction_route)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct TransactionRouteDB {
    pub id: String,
    pub organization_id: String,
    pub ledger_id: String,
    pub title: String,
    pub description: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

/// Column changes for a partial update; `None` fields are left untouched.
#[derive(AsChangeset, Debug, Clone)]
#[diesel(table_name = crate::schema::transaction_route)]
pub struct TransactionRouteChangesetDB {
    pub title: Option<String>,
    pub description: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl TransactionRouteChangesetDB {
    pub fn from_update(update: TransactionRouteUpdate, now: NaiveDateTime) -> Self {
        Self {
            title: update.title,
            description: update.description,
            updated_at: now,
        }
    }
}

/// Database model for the operation route / transaction route junction
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::operation_transaction_route)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct RouteLinkDB {
    pub id: String,
    pub operation_route_id: String,
    pub transaction_route_id: String,
    pub created_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

impl RouteLinkDB {
    pub fn active(
        id: String,
        operation_route_id: &str,
        transaction_route_id: &str,
        now: NaiveDateTime,
    ) -> Self {
        Self {
            id,
            operation_route_id: operation_route_id.to_string(),
            transaction_route_id: transaction_route_id.to_string(),
            created_at: now,
            deleted_at: None,
        }
    }
}

impl TransactionRouteDB {
    pub fn into_domain(self, operation_routes: Vec<OperationRoute>) -> TransactionRoute {
        TransactionRoute {
            id: self.id,
            organization_id: self.organization_id,
            ledger_id: self.ledger_id,
            title: self.title,
            description: self.description,
            operation_routes,
            created_at: self.created_at,
            updated_at: self.updated_at,
            deleted_at: self.deleted_at,
        }
    }
}

impl From<TransactionRouteDB> for TransactionRoute {
    fn from(db: TransactionRouteDB) -> Self {
        db.into_domain(Vec::new())
    }
}
