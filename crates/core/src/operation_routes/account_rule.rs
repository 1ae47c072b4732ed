//! Account eligibility rules attached to an operation route.
//!
//! The shape of `validIf` depends on the rule type: an `account_type` rule
//! carries a list of account-type labels, every other rule type (e.g. `alias`)
//! carries one pattern string. Storage keeps both in two text columns; the
//! list is comma-joined.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::constants::{ACCOUNT_TYPE_RULE, ACCOUNT_TYPE_SEPARATOR, ALIAS_RULE};

/// Returns true when `rule_type` names the account-type list rule, ignoring case.
pub fn is_account_type_rule(rule_type: &str) -> bool {
    rule_type.trim().eq_ignore_ascii_case(ACCOUNT_TYPE_RULE)
}

/// Which accounts may take part in one leg of a transaction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "RawAccountRule", into = "RawAccountRule")]
pub enum AccountRule {
    /// Eligible accounts must have one of these account types.
    AccountType(Vec<String>),
    /// Eligible accounts must match `pattern` under `rule_type`.
    Pattern { rule_type: String, pattern: String },
}

/// Both columns of a stored account rule.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct EncodedAccountRule {
    pub rule_type: String,
    pub valid_if: String,
}

impl AccountRule {
    pub fn alias(pattern: impl Into<String>) -> Self {
        AccountRule::Pattern {
            rule_type: ALIAS_RULE.to_string(),
            pattern: pattern.into(),
        }
    }

    pub fn account_types<I, S>(types: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AccountRule::AccountType(types.into_iter().map(Into::into).collect())
    }

    /// Builds a rule from dynamically typed input.
    ///
    /// For `account_type` only string elements of an array are kept; a
    /// non-array value yields an empty list. For any other rule type a
    /// non-string value is dropped and the pattern is left empty.
    pub fn from_dynamic(rule_type: &str, valid_if: Option<&Value>) -> Self {
        if is_account_type_rule(rule_type) {
            let types = match valid_if {
                Some(Value::Array(items)) => items
                    .iter()
                    .filter_map(|item| item.as_str().map(str::to_string))
                    .collect(),
                _ => Vec::new(),
            };
            AccountRule::AccountType(types)
        } else {
            let pattern = valid_if
                .and_then(Value::as_str)
                .map(str::to_string)
                .unwrap_or_default();
            AccountRule::Pattern {
                rule_type: rule_type.to_string(),
                pattern,
            }
        }
    }

    pub fn rule_type(&self) -> &str {
        match self {
            AccountRule::AccountType(_) => ACCOUNT_TYPE_RULE,
            AccountRule::Pattern { rule_type, .. } => rule_type,
        }
    }

    /// `validIf` as a JSON value: an array for account types, a string otherwise.
    pub fn valid_if(&self) -> Value {
        match self {
            AccountRule::AccountType(types) => {
                Value::Array(types.iter().cloned().map(Value::String).collect())
            }
            AccountRule::Pattern { pattern, .. } => Value::String(pattern.clone()),
        }
    }

    /// True when the rule carries no usable criterion.
    pub fn is_blank(&self) -> bool {
        match self {
            AccountRule::AccountType(types) => types.iter().all(|t| t.trim().is_empty()),
            AccountRule::Pattern { rule_type, pattern } => {
                rule_type.trim().is_empty() || pattern.trim().is_empty()
            }
        }
    }

    pub fn encode(&self) -> EncodedAccountRule {
        match self {
            AccountRule::AccountType(types) => EncodedAccountRule {
                rule_type: ACCOUNT_TYPE_RULE.to_string(),
                valid_if: types.join(ACCOUNT_TYPE_SEPARATOR),
            },
            // A pattern cannot stand in for an account-type list; the value is dropped.
            AccountRule::Pattern { rule_type, .. } if is_account_type_rule(rule_type) => {
                EncodedAccountRule {
                    rule_type: rule_type.clone(),
                    valid_if: String::new(),
                }
            }
            AccountRule::Pattern { rule_type, pattern } => EncodedAccountRule {
                rule_type: rule_type.clone(),
                valid_if: pattern.clone(),
            },
        }
    }

    /// Rebuilds a rule from its stored columns.
    ///
    /// Returns `None` when both columns are empty, i.e. no rule was configured.
    pub fn decode(rule_type: Option<&str>, valid_if: Option<&str>) -> Option<Self> {
        let rule_type = rule_type.unwrap_or_default();
        let valid_if = valid_if.unwrap_or_default();

        if rule_type.is_empty() && valid_if.is_empty() {
            return None;
        }

        // An empty account-type value is not split; it comes back verbatim.
        if is_account_type_rule(rule_type) && !valid_if.is_empty() {
            let types = valid_if
                .split(ACCOUNT_TYPE_SEPARATOR)
                .map(|t| t.trim().to_string())
                .collect();
            return Some(AccountRule::AccountType(types));
        }

        Some(AccountRule::Pattern {
            rule_type: rule_type.to_string(),
            pattern: valid_if.to_string(),
        })
    }
}

/// Wire shape of an account rule: `{ "ruleType": ..., "validIf": ... }`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawAccountRule {
    rule_type: String,
    #[serde(default)]
    valid_if: Option<Value>,
}

impl From<RawAccountRule> for AccountRule {
    fn from(raw: RawAccountRule) -> Self {
        AccountRule::from_dynamic(&raw.rule_type, raw.valid_if.as_ref())
    }
}

impl From<AccountRule> for RawAccountRule {
    fn from(rule: AccountRule) -> Self {
        RawAccountRule {
            rule_type: rule.rule_type().to_string(),
            valid_if: Some(rule.valid_if()),
        }
    }
}
