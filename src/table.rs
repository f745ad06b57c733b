//! Schema-checked table values flowing through the pipeline.
//!
//! A `Table` is an ordered collection of rows conforming to a fixed
//! schema. Pushing a row validates every cell against its declared
//! column contract, so type drift surfaces at the stage that caused it.

use crate::error::PipelineError;
use crate::schema::{Column, ColumnType, TableSchema};
use crate::value::Value;

pub type Row = Vec<Value>;

#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    schema: TableSchema,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(schema: TableSchema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn with_capacity(schema: TableSchema, rows: usize) -> Self {
        Self {
            schema,
            rows: Vec::with_capacity(rows),
        }
    }

    pub fn schema(&self) -> &TableSchema {
        &self.schema
    }

    pub fn name(&self) -> &'static str {
        self.schema.name
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    /// Append a row, validating each cell against its column contract.
    pub fn push_row(&mut self, row: Row) -> Result<(), PipelineError> {
        if row.len() != self.schema.columns.len() {
            return Err(PipelineError::mismatch(
                self.schema.name,
                "*",
                format!(
                    "row has {} cells, schema has {} columns",
                    row.len(),
                    self.schema.columns.len()
                ),
            ));
        }
        for (cell, column) in row.iter().zip(&self.schema.columns) {
            if let Err(message) = check_cell(cell, column) {
                return Err(PipelineError::mismatch(self.schema.name, column.name, message));
            }
        }
        self.rows.push(row);
        Ok(())
    }

    pub fn column_index(&self, name: &str) -> Result<usize, PipelineError> {
        self.schema.column_index(name).ok_or_else(|| {
            PipelineError::mismatch(self.schema.name, name, "no such column")
        })
    }

    /// Non-null integer values of one column, in row order.
    pub fn int_column(&self, name: &str) -> Result<Vec<i64>, PipelineError> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .map(|row| {
                row[idx].as_int().ok_or_else(|| {
                    PipelineError::mismatch(self.schema.name, name, "expected an integer value")
                })
            })
            .collect()
    }

    /// Non-null decimal values of one column, in row order.
    pub fn decimal_column(&self, name: &str) -> Result<Vec<f64>, PipelineError> {
        let idx = self.column_index(name)?;
        self.rows
            .iter()
            .map(|row| {
                row[idx].as_decimal().ok_or_else(|| {
                    PipelineError::mismatch(self.schema.name, name, "expected a decimal value")
                })
            })
            .collect()
    }
}

fn check_cell(cell: &Value, column: &Column) -> Result<(), String> {
    match (cell, column.col_type) {
        (Value::Null, _) if column.nullable => Ok(()),
        (Value::Null, _) => Err("NULL in a non-nullable column".to_string()),
        (Value::Int(_), ColumnType::Int) => Ok(()),
        (Value::Int(n), ColumnType::BoolInt) if *n == 0 || *n == 1 => Ok(()),
        (Value::Int(n), ColumnType::BoolInt) => {
            Err(format!("boolean-as-integer value {} outside {{0, 1}}", n))
        }
        (Value::Decimal(_), ColumnType::Decimal) => Ok(()),
        (Value::Str(_), ColumnType::Text) => Ok(()),
        (Value::Date(_), ColumnType::Date) => Ok(()),
        (cell, expected) => Err(format!("{:?} does not fit column type {:?}", cell, expected)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema;

    #[test]
    fn test_push_row_validates_arity() {
        let mut table = Table::new(schema::build());
        let err = table.push_row(vec![Value::Int(1)]).unwrap_err();
        assert!(err.to_string().contains("row has 1 cells"));
    }

    #[test]
    fn test_push_row_validates_types() {
        let mut table = Table::new(schema::build());
        table.push_row(vec![Value::Int(1), Value::Int(2)]).unwrap();
        assert!(table
            .push_row(vec![Value::Str("x".into()), Value::Int(2)])
            .is_err());
        assert_eq!(table.len(), 1);
    }

    #[test]
    fn test_null_only_in_nullable_columns() {
        let mut customers = Table::new(schema::customers());
        assert!(customers
            .push_row(vec![
                Value::Int(1),
                Value::Null,
                Value::Str("a".into()),
                Value::Str("P".into()),
            ])
            .is_err());

        let mut tools = Table::new(schema::tools());
        tools
            .push_row(vec![
                Value::Int(1),
                Value::Int(1),
                Value::Str("CW-TQ05".into()),
                Value::Str("Calloway TQ05 Torque Wrench".into()),
                Value::Str("HND".into()),
                Value::Int(1),
                Value::Int(1),
                Value::Null,
                Value::Int(2012),
            ])
            .unwrap();
    }

    #[test]
    fn test_bool_int_domain() {
        let mut table = Table::new(schema::orders());
        let err = table
            .push_row(vec![
                Value::Int(1),
                Value::Date(chrono::NaiveDate::from_ymd_opt(2022, 8, 1).unwrap()),
                Value::Int(2),
                Value::Null,
                Value::Int(7),
                Value::Int(3),
                Value::Decimal(100.0),
            ])
            .unwrap_err();
        assert!(err.to_string().contains("outside {0, 1}"));
    }

    #[test]
    fn test_int_column() {
        let mut table = Table::new(schema::build());
        table.push_row(vec![Value::Int(1), Value::Int(10)]).unwrap();
        table.push_row(vec![Value::Int(2), Value::Int(20)]).unwrap();
        assert_eq!(table.int_column("t_id").unwrap(), vec![10, 20]);
        assert!(table.int_column("missing").is_err());
    }
}
