//! Reference dimension loader.
//!
//! The three pre-authored dimension tables (manufacturers, tools,
//! retailers) come from CSV sections of a codebook. A default codebook is
//! embedded so generation works standalone; `--codebook <dir>` points at
//! user-authored sections named `<table>.csv`.
//!
//! A section that cannot be read is `SourceUnavailable`; a field that
//! cannot be coerced to its declared column type is `SchemaMismatch`.
//! Both abort the run.

use std::path::Path;

use chrono::NaiveDate;

use crate::error::PipelineError;
use crate::schema::{self, Column, ColumnType, TableSchema};
use crate::table::Table;
use crate::value::Value;

const MANUFACTURERS_CSV: &str = include_str!("../assets/manufacturers.csv");
const TOOLS_CSV: &str = include_str!("../assets/tools.csv");
const RETAILERS_CSV: &str = include_str!("../assets/retailers.csv");

/// The three reference tables, loaded once and immutable afterwards.
#[derive(Debug, Clone)]
pub struct Codebook {
    pub manufacturers: Table,
    pub tools: Table,
    pub retailers: Table,
}

impl Codebook {
    /// Load the embedded default codebook.
    pub fn embedded() -> Result<Self, PipelineError> {
        Ok(Self {
            manufacturers: parse_section(schema::manufacturers(), MANUFACTURERS_CSV)?,
            tools: parse_section(schema::tools(), TOOLS_CSV)?,
            retailers: parse_section(schema::retailers(), RETAILERS_CSV)?,
        })
    }

    /// Load codebook sections from `<dir>/<table>.csv`.
    pub fn from_dir(dir: &Path) -> Result<Self, PipelineError> {
        Ok(Self {
            manufacturers: load_section(schema::manufacturers(), dir)?,
            tools: load_section(schema::tools(), dir)?,
            retailers: load_section(schema::retailers(), dir)?,
        })
    }
}

fn load_section(schema: TableSchema, dir: &Path) -> Result<Table, PipelineError> {
    let path = dir.join(format!("{}.csv", schema.name));
    let text = std::fs::read_to_string(&path).map_err(|e| {
        PipelineError::SourceUnavailable(format!(
            "cannot read codebook section {}: {}",
            path.display(),
            e
        ))
    })?;
    parse_section(schema, &text)
}

fn parse_section(schema: TableSchema, text: &str) -> Result<Table, PipelineError> {
    let name = schema.name;
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(text.as_bytes());

    let headers = reader
        .headers()
        .map_err(|e| {
            PipelineError::SourceUnavailable(format!("section {}: unreadable header: {}", name, e))
        })?
        .clone();

    // Sections may order columns freely; the schema decides storage order.
    let mut indices = Vec::with_capacity(schema.columns.len());
    for column in &schema.columns {
        let idx = headers.iter().position(|h| h == column.name).ok_or_else(|| {
            PipelineError::SourceUnavailable(format!(
                "section {} is missing column {}",
                name, column.name
            ))
        })?;
        indices.push(idx);
    }

    let mut table = Table::new(schema.clone());
    for record in reader.records() {
        let record = record.map_err(|e| {
            PipelineError::SourceUnavailable(format!("section {}: unreadable row: {}", name, e))
        })?;
        let mut row = Vec::with_capacity(indices.len());
        for (column, &idx) in schema.columns.iter().zip(&indices) {
            row.push(coerce_field(name, column, record.get(idx).unwrap_or(""))?);
        }
        table.push_row(row)?;
    }

    if table.is_empty() {
        return Err(PipelineError::SourceUnavailable(format!(
            "section {} has no rows",
            name
        )));
    }
    Ok(table)
}

fn coerce_field(table: &str, column: &Column, raw: &str) -> Result<Value, PipelineError> {
    if raw.is_empty() {
        return if column.nullable {
            Ok(Value::Null)
        } else {
            Err(PipelineError::mismatch(
                table,
                column.name,
                "empty value in a non-nullable column",
            ))
        };
    }
    match column.col_type {
        ColumnType::Int => raw.parse::<i64>().map(Value::Int).map_err(|_| {
            PipelineError::mismatch(table, column.name, format!("{:?} is not an integer", raw))
        }),
        ColumnType::BoolInt => match raw {
            "0" => Ok(Value::Int(0)),
            "1" => Ok(Value::Int(1)),
            _ => Err(PipelineError::mismatch(
                table,
                column.name,
                format!("{:?} is not a 0/1 flag", raw),
            )),
        },
        ColumnType::Decimal => raw.parse::<f64>().map(Value::Decimal).map_err(|_| {
            PipelineError::mismatch(table, column.name, format!("{:?} is not a decimal", raw))
        }),
        ColumnType::Text => Ok(Value::Str(raw.to_string())),
        ColumnType::Date => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .map(Value::Date)
            .map_err(|_| {
                PipelineError::mismatch(
                    table,
                    column.name,
                    format!("{:?} is not a YYYY-MM-DD date", raw),
                )
            }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_embedded_codebook_loads() {
        let codebook = Codebook::embedded().unwrap();
        assert_eq!(codebook.manufacturers.len(), 8);
        assert_eq!(codebook.tools.len(), 24);
        assert_eq!(codebook.retailers.len(), 10);
    }

    #[test]
    fn test_embedded_tools_reference_manufacturers() {
        let codebook = Codebook::embedded().unwrap();
        let m_ids = codebook.manufacturers.int_column("m_id").unwrap();
        for m_id in codebook.tools.int_column("m_id").unwrap() {
            assert!(m_ids.contains(&m_id), "tool references unknown m_id {}", m_id);
        }
    }

    #[test]
    fn test_nullable_fields_coerce_to_null() {
        let codebook = Codebook::embedded().unwrap();
        let voltage = codebook.tools.column_index("voltage").unwrap();
        assert!(codebook
            .tools
            .rows()
            .iter()
            .any(|row| row[voltage].is_null()));
    }

    #[test]
    fn test_bad_integer_is_schema_mismatch() {
        let text = "m_id,t_id\nseven,1\n";
        let schema = schema::build();
        let err = parse_section(schema, text).unwrap_err();
        assert!(matches!(err, PipelineError::SchemaMismatch { .. }));
    }

    #[test]
    fn test_missing_column_is_source_unavailable() {
        let text = "m_id\n1\n";
        let err = parse_section(schema::build(), text).unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable(_)));
    }

    #[test]
    fn test_empty_section_is_source_unavailable() {
        let text = "m_id,t_id\n";
        let err = parse_section(schema::build(), text).unwrap_err();
        assert!(matches!(err, PipelineError::SourceUnavailable(_)));
    }
}
