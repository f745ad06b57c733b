//! stock fact generator.
//!
//! Stocking records are independent of any specific order, but only tools
//! that actually appear in orders are ever stocked.

use ahash::AHashSet;
use chrono::Days;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::GenerateConfig;
use crate::error::PipelineError;
use crate::schema;
use crate::table::Table;
use crate::value::Value;

const QUANTITY_MAX: i64 = 50;
const REPORT_EVERY: u64 = 10_000;

pub(crate) fn generate(
    retailers: &Table,
    orders: &Table,
    config: &GenerateConfig,
    rng: &mut ChaCha8Rng,
    report: &dyn Fn(u64),
) -> Result<Table, PipelineError> {
    let r_ids = retailers.int_column("r_id")?;
    let t_ids = distinct_in_order(orders.int_column("t_id")?);
    let window_days = config.stock_window.days() as u64;

    let mut table = Table::with_capacity(schema::stock(), config.stock);
    for row in 1..=config.stock as u64 {
        let r_id = r_ids[rng.random_range(0..r_ids.len())];
        let t_id = t_ids[rng.random_range(0..t_ids.len())];
        let quantity = rng.random_range(1..=QUANTITY_MAX);
        let stock_date = config.stock_window.start + Days::new(rng.random_range(0..window_days));

        table.push_row(vec![
            Value::Int(r_id),
            Value::Int(t_id),
            Value::Int(quantity),
            Value::Date(stock_date),
        ])?;

        if row % REPORT_EVERY == 0 {
            report(row);
        }
    }
    Ok(table)
}

/// Distinct values in first-seen order, so downstream sampling is
/// deterministic without relying on hash iteration order.
pub(crate) fn distinct_in_order(values: Vec<i64>) -> Vec<i64> {
    let mut seen = AHashSet::new();
    let mut distinct = Vec::new();
    for value in values {
        if seen.insert(value) {
            distinct.push(value);
        }
    }
    distinct
}
