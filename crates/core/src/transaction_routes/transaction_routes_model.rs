//! Transaction route domain models.

use std::collections::HashSet;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::errors::{RouteError, ValidationError};
use crate::operation_routes::{OperationRoute, OperationType};
use crate::{Error, Result};

/// A named template aggregating operation routes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRoute {
    pub id: String,
    pub organization_id: String,
    pub ledger_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Linked operation routes; only populated when a single route is read.
    #[serde(default)]
    pub operation_routes: Vec<OperationRoute>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<NaiveDateTime>,
}

impl TransactionRoute {
    pub fn operation_route_ids(&self) -> Vec<String> {
        self.operation_routes.iter().map(|r| r.id.clone()).collect()
    }
}

/// Input model for creating a transaction route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewTransactionRoute {
    pub title: String,
    pub description: Option<String>,
    /// IDs of existing operation routes to link.
    pub operation_routes: Vec<String>,
}

impl NewTransactionRoute {
    pub fn new<I, S>(title: impl Into<String>, operation_routes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            title: title.into(),
            description: None,
            operation_routes: operation_routes.into_iter().map(Into::into).collect(),
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// Validates the new transaction route data.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "title".to_string(),
            )));
        }
        ensure_distinct(&self.operation_routes)
    }
}

/// Partial update of a transaction route's own fields.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TransactionRouteUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
}

impl TransactionRouteUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.description.is_none()
    }

    pub fn validate(&self) -> Result<()> {
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Transaction route title cannot be empty".to_string(),
                )));
            }
        }
        Ok(())
    }
}

/// Links to add and remove to move a route from one operation-route set to another.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RouteLinkChanges {
    pub to_add: Vec<String>,
    pub to_remove: Vec<String>,
}

impl RouteLinkChanges {
    /// `to_add = desired - current`, `to_remove = current - desired`, each in input order.
    pub fn between(current: &[String], desired: &[String]) -> Self {
        let current_set: HashSet<&str> = current.iter().map(String::as_str).collect();
        let desired_set: HashSet<&str> = desired.iter().map(String::as_str).collect();

        Self {
            to_add: desired
                .iter()
                .filter(|id| !current_set.contains(id.as_str()))
                .cloned()
                .collect(),
            to_remove: current
                .iter()
                .filter(|id| !desired_set.contains(id.as_str()))
                .cloned()
                .collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.to_add.is_empty() && self.to_remove.is_empty()
    }
}

/// Rejects an operation-route id list that names the same route twice.
pub fn ensure_distinct(ids: &[String]) -> Result<()> {
    let mut seen = HashSet::with_capacity(ids.len());
    for id in ids {
        if !seen.insert(id.as_str()) {
            return Err(RouteError::DuplicateOperationRoute(id.clone()).into());
        }
    }
    Ok(())
}

/// A usable route needs at least one source and one destination leg.
pub fn validate_composition(operation_routes: &[OperationRoute]) -> Result<()> {
    let has_source = operation_routes
        .iter()
        .any(|r| r.operation_type == OperationType::Source);
    let has_destination = operation_routes
        .iter()
        .any(|r| r.operation_type == OperationType::Destination);

    if !has_source || !has_destination {
        return Err(RouteError::IncompleteRouteComposition.into());
    }
    Ok(())
}
