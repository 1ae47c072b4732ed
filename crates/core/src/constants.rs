/// Rule type whose `validIf` value is a list of account-type labels.
pub const ACCOUNT_TYPE_RULE: &str = "account_type";

/// Rule type whose `validIf` value is an account alias pattern.
pub const ALIAS_RULE: &str = "alias";

/// Separator used when an account-type list is stored as a single column.
pub const ACCOUNT_TYPE_SEPARATOR: &str = ",";

/// Page size used when a list request does not specify one
pub const DEFAULT_PAGE_LIMIT: i64 = 10;

/// Largest page size a list request may ask for
pub const MAX_PAGE_LIMIT: i64 = 100;

/// Environment variable overriding `MAX_PAGE_LIMIT`
pub const MAX_PAGE_LIMIT_ENV: &str = "MAX_PAGINATION_LIMIT";
