//! Bulk INSERT serialization of finished tables.
//!
//! One statement per table: a header naming the target, one parenthesized
//! literal list per row in table row order, rows joined by `,` and a
//! newline, the last row terminated by `;`. Literal encoding is dispatched
//! per cell through the value variants. A table with no rows produces an
//! empty artifact.

use std::path::Path;

use crate::error::PipelineError;
use crate::table::{Row, Table};
use crate::value::Value;
use crate::writer::ArtifactWriter;

/// Render the full bulk-insert statement as a string.
pub fn render_insert(table: &Table) -> Result<String, PipelineError> {
    if table.is_empty() {
        return Ok(String::new());
    }
    let mut out = String::new();
    out.push_str(&header(table));
    out.push('\n');
    let last = table.len() - 1;
    for (i, row) in table.rows().iter().enumerate() {
        out.push_str(&render_row(table, row)?);
        out.push_str(terminator(i == last));
        out.push('\n');
    }
    Ok(out)
}

/// Write the artifact for `table` to `path` in a single pass, streaming
/// row by row so large tables never materialize a second time as text.
pub fn write_artifact(table: &Table, path: &Path) -> Result<(), PipelineError> {
    let mut writer = ArtifactWriter::create(path)?;
    if !table.is_empty() {
        writer.write_line(&header(table))?;
        let last = table.len() - 1;
        let mut line = String::new();
        for (i, row) in table.rows().iter().enumerate() {
            line.clear();
            line.push_str(&render_row(table, row)?);
            line.push_str(terminator(i == last));
            writer.write_line(&line)?;
        }
    }
    writer.finish()
}

fn header(table: &Table) -> String {
    format!("INSERT INTO {} VALUES", table.name())
}

fn terminator(is_last: bool) -> &'static str {
    if is_last {
        ";"
    } else {
        ","
    }
}

fn render_row(table: &Table, row: &Row) -> Result<String, PipelineError> {
    let mut line = String::with_capacity(row.len() * 8 + 2);
    line.push('(');
    for (i, cell) in row.iter().enumerate() {
        if i > 0 {
            line.push_str(", ");
        }
        check_encodable(table, i, cell)?;
        line.push_str(&cell.render());
    }
    line.push(')');
    Ok(line)
}

/// Strings are emitted raw between double quotes, so a string holding a
/// quote or a newline cannot round-trip. Reject it rather than emit a
/// corrupt artifact.
fn check_encodable(table: &Table, column: usize, cell: &Value) -> Result<(), PipelineError> {
    if let Value::Str(s) = cell {
        if s.contains('"') || s.contains('\n') {
            return Err(PipelineError::mismatch(
                table.name(),
                table.schema().columns[column].name,
                format!("string {:?} cannot be encoded as a bulk-insert literal", s),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;
    use chrono::NaiveDate;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn sample_orders() -> Table {
        let mut table = Table::new(schema::orders());
        table
            .push_row(vec![
                Value::Int(1),
                Value::Date(date(2022, 8, 1)),
                Value::Int(0),
                Value::Date(date(2022, 8, 9)),
                Value::Int(7),
                Value::Int(3),
                Value::Decimal(4321.0),
            ])
            .unwrap();
        table
            .push_row(vec![
                Value::Int(2),
                Value::Date(date(2022, 9, 14)),
                Value::Int(1),
                Value::Null,
                Value::Int(7),
                Value::Int(12),
                Value::Decimal(4321.0),
            ])
            .unwrap();
        table
    }

    #[test]
    fn test_statement_shape() {
        let rendered = render_insert(&sample_orders()).unwrap();
        assert_eq!(
            rendered,
            "INSERT INTO orders VALUES\n\
             (1, \"2022-08-01\", 0, \"2022-08-09\", 7, 3, 4321.00),\n\
             (2, \"2022-09-14\", 1, NULL, 7, 12, 4321.00);\n"
        );
    }

    #[test]
    fn test_empty_table_renders_nothing() {
        let table = Table::new(schema::orders());
        assert_eq!(render_insert(&table).unwrap(), "");
    }

    #[test]
    fn test_unencodable_string_is_rejected() {
        let mut table = Table::new(schema::customers());
        table
            .push_row(vec![
                Value::Int(1_234_567),
                Value::Str("Jo \"Quotes\" Smith".into()),
                Value::Str("1 Main St".into()),
                Value::Str("P".into()),
            ])
            .unwrap();
        let err = render_insert(&table).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }
}
