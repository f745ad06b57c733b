//! customers derived table.
//!
//! One row per distinct customer id observed in sales, in first-appearance
//! order, with a synthesized identity and a weighted category.

use rand::Rng;
use rand_chacha::ChaCha8Rng;

use crate::error::PipelineError;
use crate::persona::NameAddressSource;
use crate::schema;
use crate::table::Table;
use crate::value::Value;

use super::stock::distinct_in_order;

/// Private / business / government split.
const TYPE_WEIGHTS: [(&str, f64); 3] = [("P", 0.50), ("B", 0.35), ("G", 0.15)];

pub(crate) fn derive(
    sales: &Table,
    source: &mut dyn NameAddressSource,
    rng: &mut ChaCha8Rng,
) -> Result<Table, PipelineError> {
    let c_ids = distinct_in_order(sales.int_column("c_id")?);

    let mut table = Table::with_capacity(schema::customers(), c_ids.len());
    for c_id in c_ids {
        let name = source.produce_name();
        let address = source.produce_address();
        table.push_row(vec![
            Value::Int(c_id),
            Value::Str(name),
            Value::Str(address),
            Value::Str(customer_type(rng).to_string()),
        ])?;
    }
    Ok(table)
}

fn customer_type(rng: &mut ChaCha8Rng) -> &'static str {
    let mut roll = rng.random_range(0.0..1.0);
    for (label, weight) in TYPE_WEIGHTS {
        if roll < weight {
            return label;
        }
        roll -= weight;
    }
    // Unreachable in exact arithmetic; floating-point tails land on the
    // last category.
    TYPE_WEIGHTS[TYPE_WEIGHTS.len() - 1].0
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::SeedableRng;

    #[test]
    fn test_weights_cover_unit_interval() {
        let total: f64 = TYPE_WEIGHTS.iter().map(|(_, w)| w).sum();
        assert!((total - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_customer_type_domain() {
        let mut rng = ChaCha8Rng::seed_from_u64(44);
        for _ in 0..1000 {
            assert!(["P", "B", "G"].contains(&customer_type(&mut rng)));
        }
    }
}
