//! SQL generation for the CRUD statements. No database needed.

use schema_crud::error::ErrorKind;
use schema_crud::storage::sql::builder;
use schema_crud::{ColumnDescriptor, DeleteStrategy, ProcedureWrite};
use serde_json::{json, Value};

#[test]
fn test_insert_lists_columns_in_caller_order() {
    let query = builder::insert("employee", &["name", "role"], &[json!("Ana"), json!("Chef")])
        .expect("aligned insert");
    assert_eq!(query.sql, "INSERT INTO `employee` (`name`, `role`) VALUES (?, ?)");
    assert_eq!(query.params, vec![json!("Ana"), json!("Chef")]);
}

#[test]
fn test_insert_binds_values_as_given() {
    // Only update normalizes; an empty string is inserted as an empty string.
    let query = builder::insert("employee", &["name"], &[json!("")]).expect("aligned insert");
    assert_eq!(query.params, vec![json!("")]);
}

#[test]
fn test_insert_without_columns_uses_defaults() {
    let columns: [&str; 0] = [];
    let query = builder::insert("audit_log", &columns, &[]).expect("empty insert");
    assert_eq!(query.sql, "INSERT INTO `audit_log` () VALUES ()");
    assert!(query.params.is_empty());
}

#[test]
fn test_insert_rejects_misaligned_values() {
    let err = builder::insert("employee", &["name", "role"], &[json!("Ana")]).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
    assert!(err.to_string().contains("2 columns but 1 values"), "{}", err);
}

#[test]
fn test_update_turns_empty_input_into_null() {
    let query = builder::update(
        "shipment",
        &["note", "weight"],
        &[json!(""), json!(3)],
        "shipment_id",
        &json!(7),
    )
    .expect("aligned update");
    assert_eq!(
        query.sql,
        "UPDATE `shipment` SET `note` = ?, `weight` = ? WHERE `shipment_id` = ?"
    );
    assert_eq!(query.params, vec![Value::Null, json!(3), json!(7)]);
}

#[test]
fn test_update_binds_key_value_unchanged() {
    let query = builder::update("tag", &["label"], &[json!("x")], "code", &json!("")).expect("update");
    assert_eq!(query.params, vec![json!("x"), json!("")]);
}

#[test]
fn test_update_needs_a_column() {
    let columns: [&str; 0] = [];
    let err = builder::update("tag", &columns, &[], "code", &json!(1)).unwrap_err();
    assert_eq!(err.kind(), ErrorKind::InvalidInput);
}

#[test]
fn test_delete_by_primary_key() {
    let strategy = DeleteStrategy::ByPrimaryKey {
        column: "shipment_id".to_string(),
        value: json!(4),
    };
    let query = builder::delete("shipment", &strategy, &[]).expect("delete");
    assert_eq!(query.sql, "DELETE FROM `shipment` WHERE `shipment_id` = ?");
    assert_eq!(query.params, vec![json!(4)]);
}

#[test]
fn test_delete_by_full_row_matches_nulls_and_limits_to_one() {
    let strategy = DeleteStrategy::ByFullRowMatch {
        columns: vec!["a".to_string(), "b".to_string(), "c".to_string()],
        values: vec![json!(1), Value::Null, json!("x")],
    };
    let query = builder::delete("pairs", &strategy, &[]).expect("delete");
    assert_eq!(
        query.sql,
        "DELETE FROM `pairs` WHERE `a` = ? AND `b` IS NULL AND `c` = ? LIMIT 1"
    );
    assert_eq!(query.params, vec![json!(1), json!("x")]);
}

#[test]
fn test_delete_full_row_all_null() {
    let strategy = DeleteStrategy::ByFullRowMatch {
        columns: vec!["a".to_string()],
        values: vec![Value::Null],
    };
    let query = builder::delete("pairs", &strategy, &[]).expect("delete");
    assert_eq!(query.sql, "DELETE FROM `pairs` WHERE `a` IS NULL LIMIT 1");
    assert!(query.params.is_empty());
}

fn descriptor(name: &str, data_type: &str) -> ColumnDescriptor {
    ColumnDescriptor {
        name: name.to_string(),
        data_type: data_type.to_string(),
        is_nullable: true,
        is_auto_generated: false,
        is_primary_key: false,
    }
}

#[test]
fn test_delete_compares_binary_and_json_cells_as_read() {
    let descriptors = vec![
        descriptor("id", "int"),
        descriptor("payload", "blob"),
        descriptor("meta", "json"),
    ];
    let strategy = DeleteStrategy::ByFullRowMatch {
        columns: vec!["id".to_string(), "payload".to_string(), "meta".to_string()],
        values: vec![json!(1), json!("deadbeef"), json!({"k": "v"})],
    };
    let query = builder::delete("blobs", &strategy, &descriptors).expect("delete");
    assert_eq!(
        query.sql,
        "DELETE FROM `blobs` WHERE `id` = ? AND `payload` = UNHEX(?) AND `meta` = CAST(? AS JSON) LIMIT 1"
    );
    assert_eq!(
        query.params,
        vec![json!(1), json!("deadbeef"), json!("{\"k\":\"v\"}")]
    );

    // A JSON string scalar is sent as JSON text, quotes included.
    let strategy = DeleteStrategy::ByPrimaryKey {
        column: "meta".to_string(),
        value: json!("abc"),
    };
    let query = builder::delete("blobs", &strategy, &descriptors).expect("delete");
    assert_eq!(query.sql, "DELETE FROM `blobs` WHERE `meta` = CAST(? AS JSON)");
    assert_eq!(query.params, vec![json!("\"abc\"")]);
}

#[test]
fn test_identifiers_are_quoted() {
    assert_eq!(builder::quote_ident("order"), "`order`");
    assert_eq!(builder::quote_ident("we`ird"), "`we``ird`");
    assert_eq!(builder::select_all("order"), "SELECT * FROM `order`");
    assert_eq!(
        builder::select_distinct("shop", "sender", "sender_id"),
        "SELECT DISTINCT `sender_id` FROM `shop`.`sender`"
    );
}

#[test]
fn test_call_binds_arguments_positionally() {
    let write = ProcedureWrite::new("add_order", vec![json!(1), json!("2024-01-01")]);
    let query = builder::call(&write);
    assert_eq!(query.sql, "CALL `add_order`(?, ?)");
    assert_eq!(query.params, vec![json!(1), json!("2024-01-01")]);

    let query = builder::call(&ProcedureWrite::new("refresh", Vec::new()));
    assert_eq!(query.sql, "CALL `refresh`()");
}
