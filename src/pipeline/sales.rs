//! sales fact generator.
//!
//! Historical sale records: independent of current stock levels, but tool
//! ids and consumer prices come from inventory so every sale is sellable.

use ahash::AHashMap;
use chrono::Days;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::GenerateConfig;
use crate::error::PipelineError;
use crate::schema;
use crate::table::Table;
use crate::value::Value;

use super::stock::distinct_in_order;

const QUANTITY_MAX: i64 = 20;
const REPORT_EVERY: u64 = 10_000;

/// Consumer price per tool id from inventory. A tool stocked by several
/// retailers appears with several prices; the last one wins here, which
/// keeps each generation pass internally consistent.
fn consumer_prices(inventory: &Table) -> Result<AHashMap<i64, f64>, PipelineError> {
    let t_ids = inventory.int_column("t_id")?;
    let prices = inventory.decimal_column("c_price")?;
    let mut map = AHashMap::new();
    for (t_id, price) in t_ids.into_iter().zip(prices) {
        map.insert(t_id, price);
    }
    Ok(map)
}

pub(crate) fn generate(
    inventory: &Table,
    retailers: &Table,
    config: &GenerateConfig,
    rng: &mut ChaCha8Rng,
    report: &dyn Fn(u64),
) -> Result<Table, PipelineError> {
    let r_ids = retailers.int_column("r_id")?;
    let t_ids = distinct_in_order(inventory.int_column("t_id")?);
    let prices = consumer_prices(inventory)?;
    let window_days = config.sales_window.days() as u64;

    let mut table = Table::with_capacity(schema::sales(), config.sales);
    for sale_id in 1..=config.sales as i64 {
        let r_id = r_ids[rng.random_range(0..r_ids.len())];
        let t_id = t_ids[rng.random_range(0..t_ids.len())];
        let c_id = rng.random_range(config.customer_id_min..=config.customer_id_max);
        let sale_date = config.sales_window.start + Days::new(rng.random_range(0..window_days));
        let quantity = rng.random_range(1..=QUANTITY_MAX);

        table.push_row(vec![
            Value::Int(sale_id),
            Value::Int(r_id),
            Value::Int(c_id),
            Value::Date(sale_date),
            Value::Int(t_id),
            Value::Int(quantity),
            Value::Decimal(prices[&t_id]),
        ])?;

        if sale_id as u64 % REPORT_EVERY == 0 {
            report(sale_id as u64);
        }
    }
    Ok(table)
}
