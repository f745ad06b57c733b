//! Verifies generated artifacts against the schema and invariants.
//!
//! Parses every artifact back into a typed table, then checks row counts,
//! the pending/ship-date rule, per-tool price consistency, the consumer
//! markup band, referential integrity, and the customers/sales contract.

use ahash::{AHashMap, AHashSet};
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::config::GenerateConfig;
use crate::parser::read_artifact;
use crate::schema;
use crate::table::Table;
use crate::value::round2;

const MAX_ISSUES: usize = 100;

#[derive(Debug, Serialize)]
struct CheckIssue {
    code: &'static str,
    message: String,
}

#[derive(Serialize)]
struct CheckJsonOutput {
    output_dir: String,
    tables_checked: usize,
    issues: Vec<CheckIssue>,
}

struct Report {
    issues: Vec<CheckIssue>,
}

impl Report {
    fn new() -> Self {
        Self { issues: Vec::new() }
    }

    fn push(&mut self, code: &'static str, message: impl Into<String>) {
        if self.issues.len() < MAX_ISSUES {
            self.issues.push(CheckIssue {
                code,
                message: message.into(),
            });
        }
    }
}

pub fn run(output: PathBuf, config: Option<PathBuf>, json: bool) -> anyhow::Result<()> {
    let cfg = match config {
        Some(path) => GenerateConfig::load(&path)?,
        None => GenerateConfig::default(),
    };

    let mut report = Report::new();
    let mut tables: AHashMap<&'static str, Table> = AHashMap::new();

    for table_schema in schema::all() {
        let name = table_schema.name;
        let path = artifact_path(&output, name);
        match read_artifact(&path, table_schema) {
            Ok(table) => {
                tables.insert(name, table);
            }
            Err(e) => report.push("artifact_unreadable", e.to_string()),
        }
    }
    let tables_checked = tables.len();

    check_counts(&tables, &cfg, &mut report);
    check_orders(&tables, &mut report);
    check_projections(&tables, &mut report);
    check_references(&tables, &mut report);
    check_inventory(&tables, &cfg, &mut report);
    check_customers(&tables, &mut report);

    if json {
        let output_json = CheckJsonOutput {
            output_dir: output.display().to_string(),
            tables_checked,
            issues: report.issues,
        };
        let failed = !output_json.issues.is_empty();
        println!("{}", serde_json::to_string_pretty(&output_json)?);
        if failed {
            anyhow::bail!("check failed");
        }
        return Ok(());
    }

    println!("Checked {} artifacts in {}", tables_checked, output.display());
    if report.issues.is_empty() {
        println!("✓ All checks passed");
        return Ok(());
    }
    println!("\nIssues:");
    for issue in &report.issues {
        println!("  [{}] {}", issue.code, issue.message);
    }
    anyhow::bail!("{} checks failed", report.issues.len());
}

fn artifact_path(dir: &Path, table: &str) -> PathBuf {
    dir.join(format!("load_{}_data.sql", table))
}

fn check_counts(tables: &AHashMap<&str, Table>, cfg: &GenerateConfig, report: &mut Report) {
    for (name, expected) in [
        ("orders", cfg.orders),
        ("stock", cfg.stock),
        ("sales", cfg.sales),
    ] {
        if let Some(table) = tables.get(name) {
            if table.len() != expected {
                report.push(
                    "row_count",
                    format!("{} has {} rows, expected {}", name, table.len(), expected),
                );
            }
        }
    }
    if let (Some(stock), Some(inventory)) = (tables.get("stock"), tables.get("inventory")) {
        if stock.len() != inventory.len() {
            report.push(
                "row_count",
                format!(
                    "inventory has {} rows but stock has {}",
                    inventory.len(),
                    stock.len()
                ),
            );
        }
    }
}

fn check_orders(tables: &AHashMap<&str, Table>, report: &mut Report) {
    let Some(orders) = tables.get("orders") else {
        return;
    };
    let Ok(order_idx) = orders.column_index("order_date") else {
        return;
    };
    let Ok(pending_idx) = orders.column_index("pending") else {
        return;
    };
    let Ok(ship_idx) = orders.column_index("ship_date") else {
        return;
    };
    let Ok(t_idx) = orders.column_index("t_id") else {
        return;
    };
    let Ok(price_idx) = orders.column_index("r_price") else {
        return;
    };

    let mut prices: AHashMap<i64, u64> = AHashMap::new();
    for (i, row) in orders.rows().iter().enumerate() {
        let pending = row[pending_idx].as_int().unwrap_or(-1);
        match (pending, row[ship_idx].as_date()) {
            (1, Some(_)) => report.push("ship_date", format!("row {}: pending order has a ship date", i + 1)),
            (0, None) => report.push("ship_date", format!("row {}: shipped order has no ship date", i + 1)),
            (0, Some(ship)) => {
                if let Some(ordered) = row[order_idx].as_date() {
                    let delay = (ship - ordered).num_days();
                    if delay < 1 || delay > 14 {
                        report.push(
                            "ship_window",
                            format!("row {}: ship date {} days after order", i + 1, delay),
                        );
                    }
                }
            }
            _ => {}
        }

        if let (Some(t_id), Some(price)) = (row[t_idx].as_int(), row[price_idx].as_decimal()) {
            let bits = price.to_bits();
            if *prices.entry(t_id).or_insert(bits) != bits {
                report.push(
                    "price_consistency",
                    format!("row {}: tool {} priced differently elsewhere", i + 1, t_id),
                );
            }
        }
    }
}

/// build and comprise must be row-for-row projections of their sources.
fn check_projections(tables: &AHashMap<&str, Table>, report: &mut Report) {
    let pairs = [
        ("build", "tools", ["m_id", "t_id"]),
        ("comprise", "orders", ["t_id", "order_id"]),
    ];
    for (bridge_name, source_name, columns) in pairs {
        let (Some(bridge), Some(source)) = (tables.get(bridge_name), tables.get(source_name))
        else {
            continue;
        };
        if bridge.len() != source.len() {
            report.push(
                "projection",
                format!(
                    "{} has {} rows but {} has {}",
                    bridge_name,
                    bridge.len(),
                    source_name,
                    source.len()
                ),
            );
            continue;
        }
        let indices: Vec<(usize, usize)> = columns
            .iter()
            .filter_map(|name| {
                Some((
                    bridge.column_index(name).ok()?,
                    source.column_index(name).ok()?,
                ))
            })
            .collect();
        for (i, (bridge_row, source_row)) in bridge.rows().iter().zip(source.rows()).enumerate() {
            for &(b, s) in &indices {
                if bridge_row[b] != source_row[s] {
                    report.push(
                        "projection",
                        format!("{} row {} diverges from {}", bridge_name, i + 1, source_name),
                    );
                    break;
                }
            }
        }
    }
}

fn check_references(tables: &AHashMap<&str, Table>, report: &mut Report) {
    // (from table, column, to table, key column)
    let references = [
        ("tools", "m_id", "manufacturers", "m_id"),
        ("orders", "t_id", "tools", "t_id"),
        ("place", "order_id", "orders", "order_id"),
        ("place", "r_id", "retailers", "r_id"),
        ("stock", "r_id", "retailers", "r_id"),
        ("stock", "t_id", "orders", "t_id"),
        ("sales", "r_id", "retailers", "r_id"),
        ("sales", "t_id", "inventory", "t_id"),
    ];
    for (from, column, to, key) in references {
        let (Some(from_table), Some(to_table)) = (tables.get(from), tables.get(to)) else {
            continue;
        };
        let (Ok(values), Ok(keys)) = (from_table.int_column(column), to_table.int_column(key))
        else {
            continue;
        };
        let keys: AHashSet<i64> = keys.into_iter().collect();
        let mut missing: AHashSet<i64> = AHashSet::new();
        for value in values {
            if !keys.contains(&value) {
                missing.insert(value);
            }
        }
        if !missing.is_empty() {
            report.push(
                "referential_integrity",
                format!(
                    "{}.{} has {} values absent from {}.{}",
                    from,
                    column,
                    missing.len(),
                    to,
                    key
                ),
            );
        }
    }
}

fn check_inventory(tables: &AHashMap<&str, Table>, cfg: &GenerateConfig, report: &mut Report) {
    let (Some(inventory), Some(orders)) = (tables.get("inventory"), tables.get("orders")) else {
        return;
    };
    let (Ok(order_tools), Ok(order_prices)) =
        (orders.int_column("t_id"), orders.decimal_column("r_price"))
    else {
        return;
    };
    let mut base: AHashMap<i64, f64> = AHashMap::new();
    for (t_id, price) in order_tools.into_iter().zip(order_prices) {
        base.entry(t_id).or_insert(price);
    }

    let (Ok(inv_tools), Ok(inv_prices)) = (
        inventory.int_column("t_id"),
        inventory.decimal_column("c_price"),
    ) else {
        return;
    };
    for (i, (t_id, c_price)) in inv_tools.into_iter().zip(inv_prices).enumerate() {
        let Some(&base_price) = base.get(&t_id) else {
            report.push(
                "markup",
                format!("inventory row {}: tool {} has no base price in orders", i + 1, t_id),
            );
            continue;
        };
        let floor = round2(base_price * (1.0 + cfg.markup.min));
        let ceiling = round2(base_price * (1.0 + cfg.markup.max));
        if c_price <= base_price || c_price < floor || c_price > ceiling {
            report.push(
                "markup",
                format!(
                    "inventory row {}: consumer price {:.2} outside ({:.2}, {:.2}] for base {:.2}",
                    i + 1,
                    c_price,
                    floor,
                    ceiling,
                    base_price
                ),
            );
        }
    }
}

fn check_customers(tables: &AHashMap<&str, Table>, report: &mut Report) {
    let (Some(customers), Some(sales)) = (tables.get("customers"), tables.get("sales")) else {
        return;
    };
    let (Ok(customer_ids), Ok(sale_customers)) =
        (customers.int_column("c_id"), sales.int_column("c_id"))
    else {
        return;
    };

    let customer_set: AHashSet<i64> = customer_ids.iter().copied().collect();
    if customer_set.len() != customer_ids.len() {
        report.push("customers", "duplicate customer ids".to_string());
    }
    let sale_set: AHashSet<i64> = sale_customers.into_iter().collect();
    if customer_set != sale_set {
        report.push(
            "customers",
            format!(
                "customers has {} ids, sales references {} distinct ids",
                customer_set.len(),
                sale_set.len()
            ),
        );
    }

    if let Ok(type_idx) = customers.column_index("c_type") {
        for (i, row) in customers.rows().iter().enumerate() {
            let c_type = row[type_idx].as_str().unwrap_or("");
            if !matches!(c_type, "P" | "B" | "G") {
                report.push(
                    "customers",
                    format!("row {}: customer type {:?} outside {{P, B, G}}", i + 1, c_type),
                );
            }
        }
    }
}
