#![allow(missing_docs, unused_results)]

use std::path::Path;

use assert_matches::assert_matches;
use testdb::rusqlite::params;
use testdb::{SchemaKind, TestDatabase, TestDbError, Value, init_test_tracing};

const CREATE_CHECK: &str = r#"CREATE TABLE "check" ( id INTEGER PRIMARY KEY NOT NULL, value TEXT )"#;
const CREATE_CHECK_INDEX: &str = r#"CREATE INDEX "check_value" ON "check" ( "value" )"#;

fn check_db() -> TestDatabase {
    init_test_tracing("debug");
    let db = TestDatabase::with_path("").unwrap();
    let conn = db.connection().unwrap();
    conn.execute(CREATE_CHECK, []).unwrap();
    conn.execute(r#"INSERT INTO "check" ("value") VALUES ('yes')"#, [])
        .unwrap();
    db
}

#[test]
fn fresh_database_has_empty_catalog() {
    let db = TestDatabase::in_memory().unwrap();
    assert!(db.tables().is_empty());
    assert!(db.indexes().is_empty());
    assert!(!db.has_table("nope"));
    assert!(!db.has_index("nope"));
    assert_eq!(db.table_schema("nope"), "");
    assert_eq!(db.index_schema("nope"), "");
}

#[test]
fn check_table_scenario() {
    let db = check_db();

    assert_eq!(db.resolved_file_path(), "");
    assert_eq!(db.tables(), ["check"]);
    assert!(db.has_table("check"));
    assert!(!db.has_index("check"));
    assert_eq!(db.table_schema("check"), CREATE_CHECK);

    let value = db.select_one("value", r#"SELECT * FROM "check""#, []).unwrap();
    assert_eq!(value, Some(Value::Text("yes".into())));

    let values = db.select_list("value", r#"SELECT * FROM "check""#, []).unwrap();
    assert_eq!(values, [Value::Text("yes".into())]);
}

#[test]
fn index_catalog() {
    let db = check_db();
    db.connection().unwrap().execute(CREATE_CHECK_INDEX, []).unwrap();

    assert_eq!(db.indexes(), ["check_value"]);
    assert!(db.has_index("check_value"));
    assert!(!db.has_table("check_value"));
    assert_eq!(db.index_schema("check_value"), CREATE_CHECK_INDEX);
    assert_eq!(
        db.object_schema(SchemaKind::Index, "check_value"),
        db.index_schema("check_value")
    );
}

#[test]
fn missing_column_is_distinct_from_query_failure() {
    let db = check_db();

    let err = db.select_one("nope", r#"SELECT 1 FROM "check""#, []).unwrap_err();
    assert_matches!(err, TestDbError::ColumnNotFound(ref c) if c == "nope");

    let err = db.select_list("nope", r#"SELECT 1 FROM "check""#, []).unwrap_err();
    assert!(err.is_column_not_found());

    let err = db.select_one("value", "SELECT * FROM missing_table", []).unwrap_err();
    assert_matches!(err, TestDbError::Query(_));
}

#[test]
fn empty_results_are_not_errors() {
    let db = check_db();
    let query = r#"SELECT value FROM "check" WHERE id = ?1"#;

    assert_eq!(db.select_one("value", query, params![42]).unwrap(), None);
    assert!(db.select_list("value", query, params![42]).unwrap().is_empty());
    assert!(db.select(query, params![42]).unwrap().is_empty());
}

#[test]
fn select_keeps_row_and_column_order() {
    let db = check_db();
    let conn = db.connection().unwrap();
    for value in ["b", "c"] {
        conn.execute(r#"INSERT INTO "check" (value) VALUES (?1)"#, [value])
            .unwrap();
    }

    let rows = db
        .select(r#"SELECT value, id FROM "check" ORDER BY id"#, [])
        .unwrap();
    assert_eq!(rows.len(), 3);
    assert_eq!(rows[0].columns().collect::<Vec<_>>(), ["value", "id"]);
    let values: Vec<_> = rows.iter().filter_map(|r| r.get("value").cloned()).collect();
    assert_eq!(
        values,
        [
            Value::Text("yes".into()),
            Value::Text("b".into()),
            Value::Text("c".into()),
        ]
    );
    assert_eq!(
        rows[2].to_json(),
        serde_json::json!({ "value": "c", "id": 3 })
    );
}

#[test]
fn file_database_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("test.db");
    let mut db = TestDatabase::with_path(path.to_str().unwrap()).unwrap();

    let resolved = db.resolved_file_path();
    assert_eq!(
        Path::new(&resolved).canonicalize().unwrap(),
        path.canonicalize().unwrap()
    );

    db.connection().unwrap().execute(CREATE_CHECK, []).unwrap();
    assert_eq!(db.tables(), ["check"]);

    db.close();
    assert!(!path.exists());
    assert!(dir.path().read_dir().unwrap().next().is_none());
}
