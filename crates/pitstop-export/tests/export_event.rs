//! End-to-end tests: event payload in, JSON file out.

use std::fs;
use std::path::{Path, PathBuf};

use pitstop_export::{extract_table, write_records, ExportError};
use serde_json::{json, Value};

fn payload() -> Value {
    json!({
        "htmlList": {
            "table": "<table><thead><tr><th>Pos</th><th>Team</th><th>Time</th></tr></thead>\
                      <tbody><tr><td>1</td><td>McLaren</td><td>2.04</td></tr>\
                      <tr><td>2</td><td>Ferrari</td><td>2.10</td></tr></tbody></table>"
        }
    })
}

fn export(payload: &Value, dir: &Path, race_name: &str) -> Option<Result<PathBuf, ExportError>> {
    let table = extract_table(payload)?;
    Some(write_records(&table.to_records(), dir, race_name))
}

#[test]
fn writes_records_under_race_name() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("2025");

    let path = export(&payload(), &out, "Monaco Grand Prix")
        .expect("table found")
        .expect("file written");
    assert_eq!(path, out.join("Monaco Grand Prix.json"));

    let written: Value = serde_json::from_str(&fs::read_to_string(&path).unwrap()).unwrap();
    assert_eq!(
        written,
        json!([
            {"Pos": 1, "Team": "McLaren", "Time": 2.04},
            {"Pos": 2, "Team": "Ferrari", "Time": 2.1}
        ])
    );
}

#[test]
fn rerun_produces_identical_bytes() {
    let dir = tempfile::tempdir().unwrap();
    let first = export(&payload(), dir.path(), "Monaco Grand Prix").unwrap().unwrap();
    let first_bytes = fs::read(&first).unwrap();

    let second = export(&payload(), dir.path(), "Monaco Grand Prix").unwrap().unwrap();
    assert_eq!(first, second);
    assert_eq!(fs::read(&second).unwrap(), first_bytes);
}

#[test]
fn payload_without_table_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("2025");

    assert!(export(&json!({"data": {"chart": []}}), &out, "Monaco Grand Prix").is_none());
    assert!(!out.exists());
}

#[test]
fn unusable_race_name_writes_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let result = export(&payload(), dir.path(), "../escape").expect("table found");
    assert!(matches!(result, Err(ExportError::InvalidFileName(_))));
    assert_eq!(fs::read_dir(dir.path()).unwrap().count(), 0);
}
