//! Typed cell values and their bulk-insert literal forms.

use chrono::NaiveDate;

/// A single cell in a generated table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Int(i64),
    Decimal(f64),
    Str(String),
    Date(NaiveDate),
}

impl Value {
    /// Literal form of this value in a bulk-insert statement.
    pub fn render(&self) -> String {
        match self {
            Value::Null => render_null(),
            Value::Int(n) => render_int(*n),
            Value::Decimal(d) => render_decimal(*d),
            Value::Str(s) => render_str(s),
            Value::Date(d) => render_date(*d),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn as_int(&self) -> Option<i64> {
        match self {
            Value::Int(n) => Some(*n),
            _ => None,
        }
    }

    pub fn as_decimal(&self) -> Option<f64> {
        match self {
            Value::Decimal(d) => Some(*d),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            Value::Str(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_date(&self) -> Option<NaiveDate> {
        match self {
            Value::Date(d) => Some(*d),
            _ => None,
        }
    }
}

fn render_null() -> String {
    "NULL".to_string()
}

fn render_int(n: i64) -> String {
    n.to_string()
}

fn render_decimal(d: f64) -> String {
    format!("{:.2}", d)
}

fn render_str(s: &str) -> String {
    format!("\"{}\"", s)
}

fn render_date(d: NaiveDate) -> String {
    format!("\"{}\"", d.format("%Y-%m-%d"))
}

/// Round a monetary amount to two decimal places.
pub fn round2(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
