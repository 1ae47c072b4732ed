//! Database models for operation routes.

use chrono::NaiveDateTime;
use diesel::prelude::*;
use ledger_routing_core::errors::Error;
use ledger_routing_core::operation_routes::{
    AccountRule, NewOperationRoute, OperationRoute, OperationRouteUpdate, OperationType,
};

/// Database model for operation routes
#[derive(Queryable, Identifiable, Insertable, Selectable, PartialEq, Debug, Clone)]
#[diesel(table_name = crate::schema::operation_route)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OperationRouteDB {
    pub id: String,
    pub organization_id: String,
    pub ledger_id: String,
    pub title: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub operation_type: String,
    pub account_rule_type: Option<String>,
    pub account_rule_valid_if: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    pub deleted_at: Option<NaiveDateTime>,
}

/// Column changes for a partial update; `None` fields are left untouched.
#[derive(AsChangeset, Debug, Clone, Default)]
#[diesel(table_name = crate::schema::operation_route)]
pub struct OperationRouteChangesetDB {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub account_rule_type: Option<String>,
    pub account_rule_valid_if: Option<String>,
    pub updated_at: NaiveDateTime,
}

impl OperationRouteDB {
    /// Builds the row for a new route with the given identity and timestamp.
    pub fn from_new(
        id: String,
        organization_id: &str,
        ledger_id: &str,
        route: NewOperationRoute,
        now: NaiveDateTime,
    ) -> Self {
        let (account_rule_type, account_rule_valid_if) = encode_account(route.account.as_ref());
        Self {
            id,
            organization_id: organization_id.to_string(),
            ledger_id: ledger_id.to_string(),
            title: route.title,
            description: route.description,
            code: route.code,
            operation_type: route.operation_type.as_str().to_string(),
            account_rule_type,
            account_rule_valid_if,
            created_at: now,
            updated_at: now,
            deleted_at: None,
        }
    }
}

impl OperationRouteChangesetDB {
    pub fn from_update(update: OperationRouteUpdate, now: NaiveDateTime) -> Self {
        let (account_rule_type, account_rule_valid_if) = encode_account(update.account.as_ref());
        Self {
            title: update.title,
            description: update.description,
            code: update.code,
            account_rule_type,
            account_rule_valid_if,
            updated_at: now,
        }
    }
}

fn encode_account(account: Option<&AccountRule>) -> (Option<String>, Option<String>) {
    match account {
        Some(rule) => {
            let encoded = rule.encode();
            (Some(encoded.rule_type), Some(encoded.valid_if))
        }
        None => (None, None),
    }
}

impl TryFrom<OperationRouteDB> for OperationRoute {
    type Error = Error;

    fn try_from(db: OperationRouteDB) -> Result<Self, Self::Error> {
        let operation_type = db.operation_type.parse::<OperationType>()?;
        let account = AccountRule::decode(
            db.account_rule_type.as_deref(),
            db.account_rule_valid_if.as_deref(),
        );

        Ok(OperationRoute {
            id: db.id,
            organization_id: db.organization_id,
            ledger_id: db.ledger_id,
            title: db.title,
            description: db.description,
            code: db.code,
            operation_type,
            account,
            created_at: db.created_at,
            updated_at: db.updated_at,
            deleted_at: db.deleted_at,
        })
    }
}
