//! orders fact generator.
//!
//! Samples tool ids with replacement and routes every price through a
//! per-tool price book, so all rows for a tool carry the same base price.

use ahash::AHashMap;
use chrono::Days;
use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::config::GenerateConfig;
use crate::error::PipelineError;
use crate::schema;
use crate::table::Table;
use crate::value::{round2, Value};

const QUANTITY_MAX: i64 = 50;
const SHIP_DELAY_DAYS_MAX: u64 = 14;
const REPORT_EVERY: u64 = 10_000;

/// One base price per distinct tool id, fixed for the run.
pub(crate) fn price_book(
    tools: &Table,
    config: &GenerateConfig,
    rng: &mut ChaCha8Rng,
) -> Result<AHashMap<i64, f64>, PipelineError> {
    let mut book = AHashMap::new();
    for t_id in tools.int_column("t_id")? {
        book.entry(t_id)
            .or_insert_with(|| round2(rng.random_range(config.base_price.min..config.base_price.max)));
    }
    Ok(book)
}

pub(crate) fn generate(
    tools: &Table,
    config: &GenerateConfig,
    rng: &mut ChaCha8Rng,
    report: &dyn Fn(u64),
) -> Result<Table, PipelineError> {
    let t_ids = tools.int_column("t_id")?;
    let book = price_book(tools, config, rng)?;
    let window_days = config.order_window.days() as u64;

    let mut table = Table::with_capacity(schema::orders(), config.orders);
    for order_id in 1..=config.orders as i64 {
        let t_id = t_ids[rng.random_range(0..t_ids.len())];
        let order_date = config.order_window.start + Days::new(rng.random_range(0..window_days));
        let pending = rng.random_bool(0.5);
        // Shipped orders leave within two weeks; pending orders have no
        // ship date at all.
        let ship_date = if pending {
            Value::Null
        } else {
            Value::Date(order_date + Days::new(rng.random_range(1..=SHIP_DELAY_DAYS_MAX)))
        };
        let quantity = rng.random_range(1..=QUANTITY_MAX);

        table.push_row(vec![
            Value::Int(order_id),
            Value::Date(order_date),
            Value::Int(pending as i64),
            ship_date,
            Value::Int(t_id),
            Value::Int(quantity),
            Value::Decimal(book[&t_id]),
        ])?;

        if order_id as u64 % REPORT_EVERY == 0 {
            report(order_id as u64);
        }
    }
    Ok(table)
}
