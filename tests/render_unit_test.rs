//! Unit tests for the bulk-insert serializer and artifact writer.

use tooldb_seeder::render::{render_insert, write_artifact};
use tooldb_seeder::schema;
use tooldb_seeder::table::Table;
use tooldb_seeder::value::Value;

use tempfile::TempDir;

fn bridge_rows() -> Table {
    let mut table = Table::new(schema::build());
    for (m_id, t_id) in [(1, 1), (1, 2), (2, 4)] {
        table
            .push_row(vec![Value::Int(m_id), Value::Int(t_id)])
            .unwrap();
    }
    table
}

#[test]
fn test_header_and_row_separators() {
    let rendered = render_insert(&bridge_rows()).unwrap();
    assert_eq!(
        rendered,
        "INSERT INTO build VALUES\n(1, 1),\n(1, 2),\n(2, 4);\n"
    );
}

#[test]
fn test_only_last_row_carries_semicolon() {
    let rendered = render_insert(&bridge_rows()).unwrap();
    assert_eq!(rendered.matches(";").count(), 1);
    assert!(rendered.ends_with(";\n"));
    assert_eq!(rendered.matches(",\n").count(), 2);
}

#[test]
fn test_null_renders_unquoted() {
    let mut table = Table::new(schema::retailers());
    table
        .push_row(vec![
            Value::Int(4),
            Value::Str("Grafton Supply Co".into()),
            Value::Int(826),
            Value::Str("United Kingdom".into()),
            Value::Int(1),
            Value::Int(104),
            Value::Str("9 Foundry Lane".into()),
            Value::Null,
        ])
        .unwrap();
    let rendered = render_insert(&table).unwrap();
    assert!(rendered.contains("\"9 Foundry Lane\", NULL)"));
    assert!(!rendered.contains("\"NULL\""));
}

#[test]
fn test_artifact_matches_rendered_string() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("load_build_data.sql");

    let table = bridge_rows();
    write_artifact(&table, &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_insert(&table).unwrap());
}

#[test]
fn test_empty_table_writes_empty_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("load_build_data.sql");

    write_artifact(&Table::new(schema::build()), &path).unwrap();
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "");
}

#[test]
fn test_rerun_overwrites_artifact() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("load_build_data.sql");

    let mut big = Table::new(schema::build());
    for i in 1..=100 {
        big.push_row(vec![Value::Int(1), Value::Int(i)]).unwrap();
    }
    write_artifact(&big, &path).unwrap();
    write_artifact(&bridge_rows(), &path).unwrap();

    let written = std::fs::read_to_string(&path).unwrap();
    assert_eq!(written, render_insert(&bridge_rows()).unwrap());
}
