use serde_json::json;

use super::*;

// -----------------------------------------------------------------------
// online
// -----------------------------------------------------------------------

#[test]
fn online_flag_true_is_online() {
    let v = normalize_vendor("v1", &json!({ "online": true }));
    assert!(v.online);
}

#[test]
fn legacy_status_online_is_online() {
    let v = normalize_vendor("v1", &json!({ "status": "online" }));
    assert!(v.online, "status:\"online\" without an online flag must count");
}

#[test]
fn either_representation_marks_online() {
    let v = normalize_vendor("v1", &json!({ "online": false, "status": "online" }));
    assert!(v.online);
}

#[test]
fn offline_status_and_truthy_non_bool_are_offline() {
    assert!(!normalize_vendor("v1", &json!({ "status": "offline" })).online);
    assert!(!normalize_vendor("v1", &json!({ "online": "true" })).online);
    assert!(!normalize_vendor("v1", &json!({ "status": "Online" })).online);
}

// -----------------------------------------------------------------------
// last_online_at
// -----------------------------------------------------------------------

#[test]
fn store_timestamp_converts_to_millis() {
    let raw = json!({ "lastOnlineAt": { "seconds": 1_700_000_000, "nanoseconds": 987_654_321 } });
    let v = normalize_vendor("v1", &raw);
    assert_eq!(v.last_online_at, 1_700_000_000_987);
}

#[test]
fn admin_serialized_timestamp_converts_to_millis() {
    let raw = json!({ "updatedAt": { "_seconds": 10, "_nanoseconds": 5_000_000 } });
    assert_eq!(normalize_vendor("v1", &raw).last_online_at, 10_005);
}

#[test]
fn rfc3339_date_converts_to_millis() {
    let raw = json!({ "lastUpdated": "2024-03-01T12:00:00.250Z" });
    assert_eq!(normalize_vendor("v1", &raw).last_online_at, 1_709_294_400_250);
}

#[test]
fn bare_number_is_millis() {
    assert_eq!(
        normalize_vendor("v1", &json!({ "lastOnlineAt": 200 })).last_online_at,
        200
    );
}

#[test]
fn last_online_at_wins_over_fallback_fields() {
    let raw = json!({
        "lastOnlineAt": { "seconds": 3 },
        "updatedAt": { "seconds": 2 },
        "lastUpdated": { "seconds": 1 },
    });
    assert_eq!(normalize_vendor("v1", &raw).last_online_at, 3_000);
}

#[test]
fn falls_through_absent_and_null_fields() {
    let raw = json!({ "lastOnlineAt": null, "lastUpdated": { "seconds": 1 } });
    assert_eq!(normalize_vendor("v1", &raw).last_online_at, 1_000);
}

#[test]
fn unrecognised_timestamp_is_zero() {
    let raw = json!({ "lastOnlineAt": "yesterday", "updatedAt": { "seconds": 5 } });
    assert_eq!(
        normalize_vendor("v1", &raw).last_online_at,
        0,
        "first present field wins even when it cannot be converted"
    );
    assert_eq!(
        normalize_vendor("v1", &json!({ "lastOnlineAt": [1, 2] })).last_online_at,
        0
    );
}

// -----------------------------------------------------------------------
// location
// -----------------------------------------------------------------------

#[test]
fn numeric_lat_lng_is_a_location() {
    let v = normalize_vendor("v1", &json!({ "location": { "lat": 28.61, "lng": 77.2 } }));
    assert_eq!(v.location, Some(Position::new(28.61, 77.2)));
}

#[test]
fn zero_coordinates_are_valid() {
    let v = normalize_vendor("v1", &json!({ "location": { "lat": 0.0, "lng": 0 } }));
    assert_eq!(v.location, Some(Position::new(0.0, 0.0)));
}

#[test]
fn geopoint_shapes_are_locations() {
    let a = normalize_vendor("v1", &json!({ "location": { "latitude": 1.5, "longitude": 2.5 } }));
    let b = normalize_vendor("v2", &json!({ "location": { "_latitude": 1.5, "_longitude": 2.5 } }));
    assert_eq!(a.location, Some(Position::new(1.5, 2.5)));
    assert_eq!(b.location, a.location);
}

#[test]
fn malformed_locations_are_dropped() {
    for raw in [
        json!({ "location": { "lat": "28.61", "lng": 77.2 } }),
        json!({ "location": { "lat": 28.61 } }),
        json!({ "location": [28.61, 77.2] }),
        json!({ "location": { "lat": 128.0, "lng": 77.2 } }),
        json!({ "location": null }),
    ] {
        assert_eq!(normalize_vendor("v1", &raw).location, None, "{raw}");
    }
}

// -----------------------------------------------------------------------
// names, category, description
// -----------------------------------------------------------------------

#[test]
fn name_falls_back_to_service_name() {
    let v = normalize_vendor("v1", &json!({ "name": "  ", "serviceName": "Ravi Tailors" }));
    assert_eq!(v.name, "Ravi Tailors");
}

#[test]
fn category_is_parsed_case_insensitively() {
    let v = normalize_vendor("v1", &json!({ "category": "Electrician" }));
    assert_eq!(v.category, Some(Category::Electrician));
    let unknown = normalize_vendor("v1", &json!({ "category": "bakery" }));
    assert_eq!(unknown.category, None);
}

#[test]
fn blank_description_is_none() {
    let v = normalize_vendor("v1", &json!({ "serviceDescription": "" }));
    assert_eq!(v.service_description, None);
}

// -----------------------------------------------------------------------
// totality
// -----------------------------------------------------------------------

#[test]
fn empty_document_yields_defaults() {
    let v = normalize_vendor("v1", &json!({}));
    assert_eq!(
        v,
        VendorRecord {
            id: "v1".to_string(),
            name: String::new(),
            category: None,
            service_description: None,
            location: None,
            online: false,
            last_online_at: 0,
        }
    );
}

#[test]
fn non_object_documents_yield_defaults() {
    for raw in [json!(null), json!(42), json!("vendor"), json!([1, 2, 3])] {
        let v = normalize_vendor("odd", &raw);
        assert_eq!(v.id, "odd");
        assert!(!v.online);
        assert_eq!(v.location, None);
        assert_eq!(v.last_online_at, 0);
    }
}

#[test]
fn snapshot_keeps_bad_records_and_order() {
    let docs = vec![
        RawVendorDocument::new("a", json!({ "name": "A", "online": true })),
        RawVendorDocument::new("b", json!("garbage")),
        RawVendorDocument::new("c", json!({ "name": "C" })),
    ];
    let ids: Vec<_> = normalize_snapshot(&docs).into_iter().map(|v| v.id).collect();
    assert_eq!(ids, ["a", "b", "c"]);
}

#[test]
fn inline_ids_are_extracted() {
    assert_eq!(RawVendorDocument::from_inline(0, json!({ "id": "v9" })).id, "v9");
    assert_eq!(RawVendorDocument::from_inline(0, json!({ "id": 17 })).id, "17");
    assert_eq!(
        RawVendorDocument::from_inline(3, json!({ "name": "x" })).id,
        "unidentified-3"
    );
}
