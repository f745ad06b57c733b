//! The fixed eleven-table ToolDB schema.
//!
//! Column order here is artifact column order; the serializer never
//! reorders. Reference tables (manufacturers, tools, retailers) are
//! pre-authored; the rest are generated or derived by the pipeline.

/// Cell type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    /// Boolean stored as an integer restricted to {0, 1}.
    BoolInt,
    Decimal,
    Text,
    Date,
}

/// Column definition: name, type, nullability.
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: &'static str,
    pub col_type: ColumnType,
    pub nullable: bool,
}

impl Column {
    pub fn new(name: &'static str, col_type: ColumnType) -> Self {
        Self {
            name,
            col_type,
            nullable: false,
        }
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }
}

/// A foreign-key-like reference from one column to another table's column.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ForeignKey {
    pub column: &'static str,
    pub to_table: &'static str,
    pub to_column: &'static str,
}

/// Table definition.
#[derive(Debug, Clone, PartialEq)]
pub struct TableSchema {
    pub name: &'static str,
    pub columns: Vec<Column>,
    /// Primary key columns (empty for pure bridge tables).
    pub key: Vec<&'static str>,
    pub foreign_keys: Vec<ForeignKey>,
}

impl TableSchema {
    fn new(name: &'static str, columns: Vec<Column>) -> Self {
        Self {
            name,
            columns,
            key: Vec::new(),
            foreign_keys: Vec::new(),
        }
    }

    fn key(mut self, columns: &[&'static str]) -> Self {
        self.key = columns.to_vec();
        self
    }

    fn references(
        mut self,
        column: &'static str,
        to_table: &'static str,
        to_column: &'static str,
    ) -> Self {
        self.foreign_keys.push(ForeignKey {
            column,
            to_table,
            to_column,
        });
        self
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c.name == name)
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }
}

use ColumnType::{BoolInt, Date, Decimal, Int, Text};

pub fn manufacturers() -> TableSchema {
    TableSchema::new(
        "manufacturers",
        vec![
            Column::new("m_id", Int),
            Column::new("m_name", Text),
            Column::new("country_code", Int),
            Column::new("country_name", Text),
            Column::new("eu_member", BoolInt),
            Column::new("imprint", BoolInt),
            Column::new("parent_id", Int).nullable(),
            Column::new("parent_name", Text).nullable(),
        ],
    )
    .key(&["m_id"])
    .references("parent_id", "manufacturers", "m_id")
}

pub fn tools() -> TableSchema {
    TableSchema::new(
        "tools",
        vec![
            Column::new("m_id", Int),
            Column::new("t_id", Int),
            Column::new("t_name_trunc", Text),
            Column::new("t_name_full", Text),
            Column::new("t_type_code", Text),
            Column::new("active", BoolInt),
            Column::new("eu_comp", BoolInt),
            Column::new("voltage", Int).nullable(),
            Column::new("init_yom", Int),
        ],
    )
    .key(&["t_id"])
    .references("m_id", "manufacturers", "m_id")
}

pub fn retailers() -> TableSchema {
    TableSchema::new(
        "retailers",
        vec![
            Column::new("r_id", Int),
            Column::new("r_name", Text),
            Column::new("country_code", Int),
            Column::new("country_name", Text),
            Column::new("indep", BoolInt),
            Column::new("loc_id", Int).nullable(),
            Column::new("loc_address", Text),
            Column::new("loc_zip", Int).nullable(),
        ],
    )
    .key(&["r_id"])
}

pub fn build() -> TableSchema {
    TableSchema::new(
        "build",
        vec![Column::new("m_id", Int), Column::new("t_id", Int)],
    )
    .key(&["m_id", "t_id"])
    .references("m_id", "manufacturers", "m_id")
    .references("t_id", "tools", "t_id")
}

pub fn orders() -> TableSchema {
    TableSchema::new(
        "orders",
        vec![
            Column::new("order_id", Int),
            Column::new("order_date", Date),
            Column::new("pending", BoolInt),
            Column::new("ship_date", Date).nullable(),
            Column::new("t_id", Int),
            Column::new("t_quant", Int),
            Column::new("r_price", Decimal),
        ],
    )
    .key(&["order_id"])
    .references("t_id", "tools", "t_id")
}

pub fn comprise() -> TableSchema {
    TableSchema::new(
        "comprise",
        vec![Column::new("t_id", Int), Column::new("order_id", Int)],
    )
    .key(&["t_id", "order_id"])
    .references("t_id", "tools", "t_id")
    .references("order_id", "orders", "order_id")
}

pub fn place() -> TableSchema {
    TableSchema::new(
        "place",
        vec![Column::new("order_id", Int), Column::new("r_id", Int)],
    )
    .key(&["order_id", "r_id"])
    .references("order_id", "orders", "order_id")
    .references("r_id", "retailers", "r_id")
}

pub fn stock() -> TableSchema {
    TableSchema::new(
        "stock",
        vec![
            Column::new("r_id", Int),
            Column::new("t_id", Int),
            Column::new("quantity", Int),
            Column::new("stock_date", Date),
        ],
    )
    .key(&["r_id", "t_id", "stock_date"])
    .references("r_id", "retailers", "r_id")
}

pub fn inventory() -> TableSchema {
    TableSchema::new(
        "inventory",
        vec![
            Column::new("r_id", Int),
            Column::new("t_id", Int),
            Column::new("quantity", Int),
            Column::new("c_price", Decimal),
        ],
    )
    .key(&["r_id", "t_id"])
    .references("r_id", "retailers", "r_id")
}

pub fn sales() -> TableSchema {
    TableSchema::new(
        "sales",
        vec![
            Column::new("sale_id", Int),
            Column::new("r_id", Int),
            Column::new("c_id", Int),
            Column::new("sale_date", Date),
            Column::new("t_id", Int),
            Column::new("quantity", Int),
            Column::new("c_price", Decimal),
        ],
    )
    .key(&["sale_id"])
    .references("r_id", "retailers", "r_id")
}

pub fn customers() -> TableSchema {
    TableSchema::new(
        "customers",
        vec![
            Column::new("c_id", Int),
            Column::new("c_name", Text),
            Column::new("c_address", Text),
            Column::new("c_type", Text),
        ],
    )
    .key(&["c_id"])
}

/// All eleven tables in dependency order (reference tables first, then
/// generated tables in the order the pipeline materializes them).
pub fn all() -> Vec<TableSchema> {
    vec![
        manufacturers(),
        tools(),
        retailers(),
        orders(),
        build(),
        comprise(),
        place(),
        stock(),
        inventory(),
        sales(),
        customers(),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_eleven_tables() {
        let tables = all();
        assert_eq!(tables.len(), 11);
        let names: Vec<&str> = tables.iter().map(|t| t.name).collect();
        for name in [
            "manufacturers",
            "tools",
            "retailers",
            "build",
            "orders",
            "comprise",
            "place",
            "stock",
            "inventory",
            "sales",
            "customers",
        ] {
            assert!(names.contains(&name), "missing table {}", name);
        }
    }

    #[test]
    fn test_column_lookup() {
        let orders = orders();
        assert_eq!(orders.column_index("order_id"), Some(0));
        assert_eq!(orders.column_index("r_price"), Some(6));
        assert_eq!(orders.column_index("nope"), None);
        assert!(orders.column("ship_date").unwrap().nullable);
        assert!(!orders.column("order_date").unwrap().nullable);
    }

    #[test]
    fn test_bridge_keys() {
        assert_eq!(build().key, vec!["m_id", "t_id"]);
        assert_eq!(comprise().key, vec!["t_id", "order_id"]);
        assert_eq!(place().key, vec!["order_id", "r_id"]);
    }
}
