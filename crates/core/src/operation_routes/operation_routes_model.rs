//! Operation route domain models.

use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use super::account_rule::AccountRule;
use crate::{errors::ValidationError, Error, Result};

/// The leg of a transaction an operation route validates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OperationType {
    Source,
    Destination,
}

impl OperationType {
    /// Lower-case form persisted in `operation_route.operation_type`.
    pub fn as_str(&self) -> &'static str {
        match self {
            OperationType::Source => "source",
            OperationType::Destination => "destination",
        }
    }
}

impl fmt::Display for OperationType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OperationType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "source" => Ok(OperationType::Source),
            "destination" => Ok(OperationType::Destination),
            _ => Err(ValidationError::InvalidOperationType(s.to_string()).into()),
        }
    }
}

/// Domain model representing a single-leg routing rule.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRoute {
    pub id: String,
    pub organization_id: String,
    pub ledger_id: String,
    pub title: String,
    pub description: Option<String>,
    /// Free-form external reference
    pub code: Option<String>,
    pub operation_type: OperationType,
    pub account: Option<AccountRule>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub deleted_at: Option<NaiveDateTime>,
}

/// Input model for creating a new operation route.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewOperationRoute {
    pub title: String,
    pub description: Option<String>,
    pub code: Option<String>,
    pub operation_type: OperationType,
    pub account: Option<AccountRule>,
}

impl NewOperationRoute {
    pub fn new(title: impl Into<String>, operation_type: OperationType) -> Self {
        Self {
            title: title.into(),
            description: None,
            code: None,
            operation_type,
            account: None,
        }
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_code(mut self, code: impl Into<String>) -> Self {
        self.code = Some(code.into());
        self
    }

    pub fn with_account(mut self, account: AccountRule) -> Self {
        self.account = Some(account);
        self
    }

    /// Validates the new operation route data.
    pub fn validate(&self) -> Result<()> {
        if self.title.trim().is_empty() {
            return Err(Error::Validation(ValidationError::MissingField(
                "title".to_string(),
            )));
        }
        if let Some(account) = &self.account {
            validate_account_rule(account)?;
        }
        Ok(())
    }
}

/// Partial update for an operation route.
///
/// Fields left as `None` are not touched. The operation type and tenancy keys
/// are immutable.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OperationRouteUpdate {
    pub title: Option<String>,
    pub description: Option<String>,
    pub code: Option<String>,
    pub account: Option<AccountRule>,
}

impl OperationRouteUpdate {
    pub fn is_empty(&self) -> bool {
        self.title.is_none()
            && self.description.is_none()
            && self.code.is_none()
            && self.account.is_none()
    }

    /// Validates the fields that are present.
    pub fn validate(&self) -> Result<()> {
        if self.is_empty() {
            return Err(Error::Validation(ValidationError::InvalidInput(
                "Operation route update has no fields to change".to_string(),
            )));
        }
        if let Some(title) = &self.title {
            if title.trim().is_empty() {
                return Err(Error::Validation(ValidationError::InvalidInput(
                    "Operation route title cannot be empty".to_string(),
                )));
            }
        }
        if let Some(account) = &self.account {
            validate_account_rule(account)?;
        }
        Ok(())
    }
}

fn validate_account_rule(account: &AccountRule) -> Result<()> {
    if account.is_blank() {
        return Err(Error::Validation(ValidationError::InvalidInput(format!(
            "Account rule '{}' has no valid value",
            account.rule_type()
        ))));
    }
    Ok(())
}
