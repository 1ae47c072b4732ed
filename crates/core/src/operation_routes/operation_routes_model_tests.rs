//! Tests for operation route domain models.

#[cfg(test)]
mod tests {
    use crate::errors::{Error, ValidationError};
    use crate::operation_routes::{
        AccountRule, NewOperationRoute, OperationRouteUpdate, OperationType,
    };

    // ==================== OperationType Tests ====================

    #[test]
    fn test_operation_type_parses_case_insensitively() {
        assert_eq!(
            "SOURCE".parse::<OperationType>().unwrap(),
            OperationType::Source
        );
        assert_eq!(
            " Destination ".parse::<OperationType>().unwrap(),
            OperationType::Destination
        );
    }

    #[test]
    fn test_operation_type_rejects_unknown_values() {
        let err = "debit".parse::<OperationType>().unwrap_err();
        assert!(matches!(
            err,
            Error::Validation(ValidationError::InvalidOperationType(_))
        ));
    }

    #[test]
    fn test_operation_type_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&OperationType::Destination).unwrap(),
            "\"destination\""
        );
    }

    // ==================== NewOperationRoute Tests ====================

    #[test]
    fn test_new_route_requires_title() {
        let route = NewOperationRoute::new("  ", OperationType::Source);
        assert!(route.validate().is_err());
    }

    #[test]
    fn test_new_route_rejects_blank_account_rule() {
        let route = NewOperationRoute::new("Cash in", OperationType::Source)
            .with_account(AccountRule::alias(""));
        assert!(route.validate().is_err());
    }

    #[test]
    fn test_new_route_without_rule_is_valid() {
        let route = NewOperationRoute::new("Cash in", OperationType::Source).with_code("EXT-1");
        assert!(route.validate().is_ok());
    }

    #[test]
    fn test_new_route_deserializes_dynamic_rule() {
        let json = r#"{
            "title": "Fund savings",
            "description": null,
            "code": null,
            "operationType": "destination",
            "account": { "ruleType": "account_type", "validIf": ["deposit", "savings"] }
        }"#;
        let route: NewOperationRoute = serde_json::from_str(json).unwrap();

        assert_eq!(route.operation_type, OperationType::Destination);
        assert_eq!(
            route.account,
            Some(AccountRule::account_types(["deposit", "savings"]))
        );
    }

    // ==================== OperationRouteUpdate Tests ====================

    #[test]
    fn test_empty_update_is_rejected() {
        assert!(OperationRouteUpdate::default().validate().is_err());
    }

    #[test]
    fn test_title_only_update_is_valid() {
        let update = OperationRouteUpdate {
            title: Some("Renamed".to_string()),
            ..Default::default()
        };
        assert!(update.validate().is_ok());
    }

    #[test]
    fn test_blank_title_update_is_rejected() {
        let update = OperationRouteUpdate {
            title: Some(String::new()),
            ..Default::default()
        };
        assert!(update.validate().is_err());
    }
}
