#![cfg(feature = "serde")]

use serde_json::json;
use treeness_core::{DayOfWeek, ForestConfig, Gps, IdentityPolicy, PropertyValue};

#[test]
fn config_uses_camel_case_tags() {
    let config = ForestConfig::new().with_identity(IdentityPolicy::HandleOrId {
        absent_ids_match: true,
    });

    let value = serde_json::to_value(&config).unwrap();

    assert_eq!(
        value,
        json!({ "identity": { "kind": "handleOrId", "absentIdsMatch": true } })
    );
    let back: ForestConfig = serde_json::from_value(value).unwrap();
    assert_eq!(back, config);
}

#[test]
fn missing_fields_fall_back_to_defaults() {
    let empty: ForestConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, ForestConfig::default());

    let handle: ForestConfig =
        serde_json::from_str(r#"{ "identity": { "kind": "handle" } }"#).unwrap();
    assert_eq!(handle.identity, IdentityPolicy::Handle);

    let strict: ForestConfig =
        serde_json::from_str(r#"{ "identity": { "kind": "handleOrId" } }"#).unwrap();
    assert_eq!(
        strict.identity,
        IdentityPolicy::HandleOrId {
            absent_ids_match: false
        }
    );
}

#[test]
fn unknown_policy_is_rejected() {
    let result = serde_json::from_str::<ForestConfig>(r#"{ "identity": { "kind": "byName" } }"#);
    assert!(result.is_err());
}

#[test]
fn value_types_serialize_plainly() {
    assert_eq!(serde_json::to_value(PropertyValue::from("x")).unwrap(), json!("x"));
    assert_eq!(serde_json::to_value(PropertyValue::Int(3)).unwrap(), json!(3));
    assert_eq!(serde_json::to_value(DayOfWeek::Monday).unwrap(), json!("MONDAY"));

    let gps = Gps::new(1.5, -2.0).unwrap();
    assert_eq!(
        serde_json::to_value(gps).unwrap(),
        json!({ "latitude": 1.5, "longitude": -2.0 })
    );
}
