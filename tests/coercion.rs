use chrono::{TimeZone, Utc};
use rowscan::coerce::{CoercedRow, ColumnKind, RowConverter};
use rowscan::probe::probe_schema;
use rowscan::tokenizer::ParseOptions;
use rowscan::types::TypedValue;
use rowscan::parse_all;

fn owned(row: &[&str]) -> Vec<String> {
    row.iter().map(|s| s.to_string()).collect()
}

#[test]
fn empty_is_missing_and_null_text_is_null() {
    let samples = vec![owned(&["x"])];
    let converter = RowConverter::build(["a"], &samples, false);

    assert_eq!(converter.convert_values(&owned(&[""]))[0], TypedValue::Missing);
    assert_eq!(converter.convert_values(&owned(&["null"]))[0], TypedValue::Null);
    assert_ne!(TypedValue::Missing, TypedValue::Null);
}

#[test]
fn classification_covers_all_five_kinds() {
    let samples = vec![owned(&[
        "2024-05-01T08:30:00Z",
        "12.5",
        "TRUE",
        "[1,2,3]",
        "plain",
    ])];
    let converter = RowConverter::build(["ts", "n", "b", "j", "s"], &samples, false);

    let kinds: Vec<ColumnKind> = converter.columns().iter().map(|c| c.kind).collect();
    assert_eq!(
        kinds,
        vec![
            ColumnKind::Timestamp,
            ColumnKind::Number,
            ColumnKind::Boolean,
            ColumnKind::Json,
            ColumnKind::Utf8,
        ]
    );
}

#[test]
fn converts_typed_values_per_kind() {
    let samples = vec![owned(&["2024-05-01T08:30:00Z", "1", "true", "{\"k\":1}"])];
    let converter = RowConverter::build(["ts", "n", "b", "j"], &samples, false);

    let out = converter.convert_values(&owned(&[
        "2024-05-01T08:30:00+02:00",
        "41.25",
        "False",
        "{\"k\":[true,null]}",
    ]));

    let expected_ts = Utc.with_ymd_and_hms(2024, 5, 1, 6, 30, 0).unwrap();
    assert_eq!(out[0], TypedValue::Timestamp(expected_ts));
    assert_eq!(out[1], TypedValue::Number(41.25));
    assert_eq!(out[2], TypedValue::Bool(false));
    assert_eq!(
        out[3],
        TypedValue::Json(serde_json::json!({"k": [true, null]}))
    );
}

#[test]
fn record_output_pairs_names_with_values_in_column_order() {
    let samples = vec![owned(&["1", "Ada"])];
    let converter = RowConverter::build(["id", "name"], &samples, true);

    match converter.convert(&owned(&["7", "Grace"])) {
        CoercedRow::Record(pairs) => {
            assert_eq!(pairs[0].0, "id");
            assert_eq!(pairs[0].1, TypedValue::Number(7.0));
            assert_eq!(pairs[1].0, "name");
            assert_eq!(pairs[1].1, TypedValue::Utf8("Grace".to_string()));
        }
        CoercedRow::Values(_) => panic!("expected record output"),
    }
}

#[test]
fn positional_output_is_the_default_shape() {
    let samples = vec![owned(&["1"])];
    let converter = RowConverter::build(["a"], &samples, false);
    assert!(matches!(
        converter.convert(&owned(&["2"])),
        CoercedRow::Values(_)
    ));
}

#[test]
fn non_boolean_in_boolean_column_passes_through_as_string() {
    let samples = vec![owned(&["true"])];
    let converter = RowConverter::build(["b"], &samples, false);

    let out = converter.convert_values(&owned(&["maybe"]));
    assert_eq!(out[0], TypedValue::Utf8("maybe".to_string()));
    assert_eq!(converter.fallback_count(), 1);
}

#[test]
fn probe_then_coerce_concrete_scenario() {
    let text = "id,name,active\n1,Alice,true\n2,\"Bob, Jr.\",false\n";

    let probed = probe_schema(text).unwrap();
    let converter = RowConverter::build(probed.schema.field_names(), &probed.samples, false);

    let rows = parse_all(text, &probed.schema, &ParseOptions::default()).unwrap();
    let typed: Vec<Vec<TypedValue>> = rows[1..]
        .iter()
        .map(|row| converter.convert_values(row))
        .collect();

    assert_eq!(
        typed[0],
        vec![
            TypedValue::Number(1.0),
            TypedValue::Utf8("Alice".to_string()),
            TypedValue::Bool(true),
        ]
    );
    assert_eq!(
        typed[1],
        vec![
            TypedValue::Number(2.0),
            TypedValue::Utf8("Bob, Jr.".to_string()),
            TypedValue::Bool(false),
        ]
    );
}
