//! Bulk-insert artifact reader.
//!
//! Parses an artifact produced by the serializer back into a typed table
//! against its schema: `NULL` unquoted, strings and dates between double
//! quotes, numerals bare. Structural problems are `SourceUnavailable`;
//! cell-level coercion failures are `SchemaMismatch`.

use std::path::Path;

use chrono::NaiveDate;

use crate::error::PipelineError;
use crate::schema::{Column, ColumnType, TableSchema};
use crate::table::Table;
use crate::value::Value;

/// Read and parse one artifact file.
pub fn read_artifact(path: &Path, schema: TableSchema) -> Result<Table, PipelineError> {
    let text = std::fs::read_to_string(path).map_err(|e| {
        PipelineError::SourceUnavailable(format!("cannot read artifact {}: {}", path.display(), e))
    })?;
    parse_artifact(&text, schema)
}

/// Parse an artifact's text into a typed table.
pub fn parse_artifact(text: &str, schema: TableSchema) -> Result<Table, PipelineError> {
    let mut cursor = Cursor::new(text.as_bytes(), schema.name);
    let mut table = Table::new(schema.clone());

    cursor.skip_whitespace();
    if cursor.at_end() {
        // An empty artifact is an empty table.
        return Ok(table);
    }

    cursor.expect_keyword("INSERT")?;
    cursor.expect_keyword("INTO")?;
    let target = cursor.read_identifier()?;
    if target != schema.name {
        return Err(PipelineError::SourceUnavailable(format!(
            "artifact targets table {:?}, expected {:?}",
            target, schema.name
        )));
    }
    cursor.expect_keyword("VALUES")?;

    loop {
        cursor.skip_whitespace();
        let row = cursor.read_row(&schema)?;
        table.push_row(row)?;

        cursor.skip_whitespace();
        match cursor.next_byte()? {
            b',' => continue,
            b';' => break,
            other => {
                return Err(cursor.structural(format!(
                    "expected ',' or ';' after a row, found {:?}",
                    other as char
                )))
            }
        }
    }

    cursor.skip_whitespace();
    if !cursor.at_end() {
        return Err(cursor.structural("trailing content after the statement terminator"));
    }
    Ok(table)
}

struct Cursor<'a> {
    bytes: &'a [u8],
    pos: usize,
    table: &'static str,
}

impl<'a> Cursor<'a> {
    fn new(bytes: &'a [u8], table: &'static str) -> Self {
        Self {
            bytes,
            pos: 0,
            table,
        }
    }

    fn at_end(&self) -> bool {
        self.pos >= self.bytes.len()
    }

    fn structural(&self, message: impl Into<String>) -> PipelineError {
        PipelineError::SourceUnavailable(format!(
            "artifact for {}: {} (offset {})",
            self.table,
            message.into(),
            self.pos
        ))
    }

    fn skip_whitespace(&mut self) {
        while self.pos < self.bytes.len() && self.bytes[self.pos].is_ascii_whitespace() {
            self.pos += 1;
        }
    }

    fn next_byte(&mut self) -> Result<u8, PipelineError> {
        if self.at_end() {
            return Err(self.structural("unexpected end of artifact"));
        }
        let b = self.bytes[self.pos];
        self.pos += 1;
        Ok(b)
    }

    fn expect_keyword(&mut self, keyword: &str) -> Result<(), PipelineError> {
        self.skip_whitespace();
        let end = self.pos + keyword.len();
        if end > self.bytes.len() || &self.bytes[self.pos..end] != keyword.as_bytes() {
            return Err(self.structural(format!("expected keyword {}", keyword)));
        }
        self.pos = end;
        Ok(())
    }

    fn read_identifier(&mut self) -> Result<String, PipelineError> {
        self.skip_whitespace();
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b.is_ascii_alphanumeric() || b == b'_' {
                self.pos += 1;
            } else {
                break;
            }
        }
        if self.pos == start {
            return Err(self.structural("expected a table name"));
        }
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }

    /// Read one `(v1, v2, ...)` row against the schema's column order.
    fn read_row(&mut self, schema: &TableSchema) -> Result<Vec<Value>, PipelineError> {
        if self.next_byte()? != b'(' {
            return Err(self.structural("expected '(' to open a row"));
        }
        let mut row = Vec::with_capacity(schema.columns.len());
        for (i, column) in schema.columns.iter().enumerate() {
            self.skip_whitespace();
            row.push(self.read_cell(column)?);
            self.skip_whitespace();
            let expected = if i + 1 == schema.columns.len() {
                b')'
            } else {
                b','
            };
            let found = self.next_byte()?;
            if found != expected {
                return Err(self.structural(format!(
                    "expected {:?} after column {}, found {:?}",
                    expected as char, column.name, found as char
                )));
            }
        }
        Ok(row)
    }

    fn read_cell(&mut self, column: &Column) -> Result<Value, PipelineError> {
        if self.bytes[self.pos..].starts_with(b"NULL") {
            self.pos += 4;
            return Ok(Value::Null);
        }
        if self.bytes.get(self.pos) == Some(&b'"') {
            let raw = self.read_quoted()?;
            return match column.col_type {
                ColumnType::Text => Ok(Value::Str(raw)),
                ColumnType::Date => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
                    .map(Value::Date)
                    .map_err(|_| {
                        PipelineError::mismatch(
                            self.table,
                            column.name,
                            format!("{:?} is not a YYYY-MM-DD date", raw),
                        )
                    }),
                _ => Err(PipelineError::mismatch(
                    self.table,
                    column.name,
                    format!("quoted literal {:?} in a numeric column", raw),
                )),
            };
        }
        let raw = self.read_bare()?;
        match column.col_type {
            ColumnType::Int | ColumnType::BoolInt => {
                raw.parse::<i64>().map(Value::Int).map_err(|_| {
                    PipelineError::mismatch(
                        self.table,
                        column.name,
                        format!("{:?} is not an integer", raw),
                    )
                })
            }
            ColumnType::Decimal => raw.parse::<f64>().map(Value::Decimal).map_err(|_| {
                PipelineError::mismatch(
                    self.table,
                    column.name,
                    format!("{:?} is not a decimal", raw),
                )
            }),
            ColumnType::Text | ColumnType::Date => Err(PipelineError::mismatch(
                self.table,
                column.name,
                format!("bare literal {:?} in a quoted column", raw),
            )),
        }
    }

    fn read_quoted(&mut self) -> Result<String, PipelineError> {
        self.pos += 1; // opening quote
        let start = self.pos;
        while self.pos < self.bytes.len() && self.bytes[self.pos] != b'"' {
            self.pos += 1;
        }
        if self.at_end() {
            return Err(self.structural("unterminated string literal"));
        }
        let raw = String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned();
        self.pos += 1; // closing quote
        Ok(raw)
    }

    fn read_bare(&mut self) -> Result<String, PipelineError> {
        let start = self.pos;
        while self.pos < self.bytes.len() {
            let b = self.bytes[self.pos];
            if b == b',' || b == b')' || b.is_ascii_whitespace() {
                break;
            }
            self.pos += 1;
        }
        if self.pos == start {
            return Err(self.structural("expected a literal"));
        }
        Ok(String::from_utf8_lossy(&self.bytes[start..self.pos]).into_owned())
    }
}
