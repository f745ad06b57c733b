//! Bridge tables.
//!
//! `build` and `comprise` are pure projections of columns that already
//! exist upstream; `place` assigns each order to a retailer.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::PipelineError;
use crate::schema::{self, TableSchema};
use crate::table::Table;
use crate::value::Value;

/// Project the target schema's columns out of `source`, row for row.
pub(crate) fn project(source: &Table, target: TableSchema) -> Result<Table, PipelineError> {
    let mut indices = Vec::with_capacity(target.columns.len());
    for column in &target.columns {
        indices.push(source.column_index(column.name)?);
    }

    let mut table = Table::with_capacity(target, source.len());
    for row in source.rows() {
        table.push_row(indices.iter().map(|&i| row[i].clone()).collect())?;
    }
    Ok(table)
}

/// Randomly place each order with a retailer.
pub(crate) fn place(
    orders: &Table,
    retailers: &Table,
    rng: &mut ChaCha8Rng,
) -> Result<Table, PipelineError> {
    let r_ids = retailers.int_column("r_id")?;

    let mut table = Table::with_capacity(schema::place(), orders.len());
    for order_id in orders.int_column("order_id")? {
        let r_id = r_ids[rng.random_range(0..r_ids.len())];
        table.push_row(vec![Value::Int(order_id), Value::Int(r_id)])?;
    }
    Ok(table)
}
