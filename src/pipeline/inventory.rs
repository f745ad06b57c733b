//! inventory derived table.
//!
//! Row for row from stock: the stocking date drops out and a consumer
//! price comes in, marked up from the tool's base price in orders.

use ahash::AHashMap;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::GenerateConfig;
use crate::error::PipelineError;
use crate::schema;
use crate::table::Table;
use crate::value::{round2, Value};

/// First price seen per tool id in orders. Well-defined because orders
/// carries exactly one price per tool for the whole run.
fn base_prices(orders: &Table) -> Result<AHashMap<i64, f64>, PipelineError> {
    let t_ids = orders.int_column("t_id")?;
    let prices = orders.decimal_column("r_price")?;
    let mut map = AHashMap::new();
    for (t_id, price) in t_ids.into_iter().zip(prices) {
        map.entry(t_id).or_insert(price);
    }
    Ok(map)
}

pub(crate) fn derive(
    stock: &Table,
    orders: &Table,
    config: &GenerateConfig,
    rng: &mut ChaCha8Rng,
) -> Result<Table, PipelineError> {
    let prices = base_prices(orders)?;
    let r_idx = stock.column_index("r_id")?;
    let t_idx = stock.column_index("t_id")?;
    let q_idx = stock.column_index("quantity")?;

    let mut table = Table::with_capacity(schema::inventory(), stock.len());
    for row in stock.rows() {
        let t_id = row[t_idx].as_int().ok_or_else(|| {
            PipelineError::mismatch("stock", "t_id", "expected an integer value")
        })?;
        let base = prices.get(&t_id).copied().ok_or_else(|| {
            PipelineError::mismatch(
                "inventory",
                "c_price",
                format!("no base price in orders for tool {}", t_id),
            )
        })?;
        let markup = rng.random_range(config.markup.min..config.markup.max);
        let c_price = round2(base * (1.0 + markup));

        table.push_row(vec![
            row[r_idx].clone(),
            row[t_idx].clone(),
            row[q_idx].clone(),
            Value::Decimal(c_price),
        ])?;
    }
    Ok(table)
}
