use serde_json::json;
use vehicle_core::{BrandPatch, NewVehicle, Patch, VehiclePatch};

#[test]
fn patch_absent_keys_stay_unset() {
    let patch: VehiclePatch = serde_json::from_value(json!({ "name": "I30 Facelift" })).unwrap();
    assert_eq!(patch.name.as_deref(), Some("I30 Facelift"));
    assert_eq!(patch.manufacturing_year, None);
    assert_eq!(patch.is_driveable, None);
    assert_eq!(patch.body, None);
}

#[test]
fn patch_keeps_explicit_false() {
    let patch: VehiclePatch = serde_json::from_value(json!({ "is_driveable": false })).unwrap();
    assert_eq!(patch.is_driveable, Some(false));
}

#[test]
fn patch_rejects_explicit_null() {
    for key in ["name", "manufacturing_year", "is_driveable", "body"] {
        let err = serde_json::from_value::<VehiclePatch>(json!({ key: null })).unwrap_err();
        assert!(
            err.to_string().contains("null is not allowed"),
            "{key}: {err}"
        );
    }

    let err = serde_json::from_value::<BrandPatch>(json!({ "name": null })).unwrap_err();
    assert!(err.to_string().contains("null is not allowed"));
}

#[test]
fn patch_null_is_rejected_from_raw_json_too() {
    let result = serde_json::from_str::<VehiclePatch>(r#"{"is_driveable": true, "body": null}"#);
    assert!(result.is_err());

    let empty: VehiclePatch = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, VehiclePatch::default());
}

#[test]
fn patch_is_empty_only_without_provided_fields() {
    assert!(VehiclePatch::default().is_empty());
    assert!(BrandPatch::default().is_empty());

    let falsy = VehiclePatch {
        is_driveable: Some(false),
        ..VehiclePatch::default()
    };
    assert!(!falsy.is_empty());

    let empty_body: VehiclePatch = serde_json::from_value(json!({ "body": {} })).unwrap();
    assert!(!empty_body.is_empty());
}

#[test]
fn patch_rejects_unknown_keys() {
    let result = serde_json::from_value::<VehiclePatch>(json!({ "colour": "red" }));
    assert!(result.is_err());
}

#[test]
fn patch_serializes_only_provided_fields() {
    let patch = VehiclePatch {
        manufacturing_year: Some(2019),
        ..VehiclePatch::default()
    };
    assert_eq!(
        serde_json::to_value(&patch).unwrap(),
        json!({ "manufacturing_year": 2019 })
    );
}

#[test]
fn new_vehicle_requires_year_and_defaults_the_rest() {
    let payload: NewVehicle =
        serde_json::from_value(json!({ "name": "Audi A4", "manufacturing_year": 2020 })).unwrap();
    assert_eq!(payload, NewVehicle::new("Audi A4", 2020));
    assert!(!payload.is_driveable);
    assert_eq!(payload.body, json!({}));

    let missing_year = serde_json::from_value::<NewVehicle>(json!({ "name": "Audi A4" }));
    assert!(missing_year.is_err());
}
