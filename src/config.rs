//! Generation parameters: baked-in defaults plus YAML and CLI overrides.

use std::path::Path;

use anyhow::Context;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Half-open date window `[start, end)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DateWindow {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateWindow {
    pub fn days(&self) -> i64 {
        (self.end - self.start).num_days()
    }
}

/// Half-open uniform range `[min, max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct UniformRange {
    pub min: f64,
    pub max: f64,
}

/// Everything the pipeline needs to know. Every field has a default
/// matching the reference dataset; a YAML file overrides any subset and
/// CLI flags override seed and row counts on top of that.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateConfig {
    /// Run seed; every stage derives its own sub-stream from it.
    pub seed: u64,
    pub orders: usize,
    pub stock: usize,
    pub sales: usize,
    pub order_window: DateWindow,
    pub stock_window: DateWindow,
    pub sales_window: DateWindow,
    /// Base price drawn once per distinct tool id.
    pub base_price: UniformRange,
    /// Consumer markup fraction applied per inventory row.
    pub markup: UniformRange,
    /// Inclusive customer id range sampled per sale, no collision avoidance.
    pub customer_id_min: i64,
    pub customer_id_max: i64,
}

impl Default for GenerateConfig {
    fn default() -> Self {
        Self {
            seed: 44,
            orders: 20_000,
            stock: 10_000,
            sales: 1_000_000,
            order_window: DateWindow {
                start: ymd(2022, 7, 10),
                end: ymd(2023, 7, 10),
            },
            stock_window: DateWindow {
                start: ymd(2020, 7, 10),
                end: ymd(2023, 7, 10),
            },
            sales_window: DateWindow {
                start: ymd(2018, 7, 10),
                end: ymd(2023, 7, 10),
            },
            base_price: UniformRange {
                min: 100.0,
                max: 8001.0,
            },
            markup: UniformRange {
                min: 0.10,
                max: 0.40,
            },
            customer_id_min: 1_000_000,
            customer_id_max: 9_999_999,
        }
    }
}

impl GenerateConfig {
    /// Load overrides from a YAML file on top of the defaults.
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("cannot read config file {}", path.display()))?;
        let config: GenerateConfig = serde_yaml::from_str(&content)
            .with_context(|| format!("cannot parse config file {}", path.display()))?;
        Ok(config)
    }

    /// Reject parameter combinations no stage can sample from.
    pub fn validate(&self) -> anyhow::Result<()> {
        if self.orders == 0 || self.stock == 0 || self.sales == 0 {
            anyhow::bail!("row counts must be positive");
        }
        for (name, window) in [
            ("order_window", &self.order_window),
            ("stock_window", &self.stock_window),
            ("sales_window", &self.sales_window),
        ] {
            if window.days() <= 0 {
                anyhow::bail!("{} must end after it starts", name);
            }
        }
        if self.base_price.min <= 0.0 || self.base_price.max <= self.base_price.min {
            anyhow::bail!("base_price must be a positive, non-empty range");
        }
        if self.markup.min <= 0.0 || self.markup.max <= self.markup.min {
            anyhow::bail!("markup must be a positive, non-empty range");
        }
        if self.customer_id_max < self.customer_id_min || self.customer_id_min <= 0 {
            anyhow::bail!("customer id range must be positive and non-empty");
        }
        Ok(())
    }
}

fn ymd(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).expect("valid calendar date")
}
