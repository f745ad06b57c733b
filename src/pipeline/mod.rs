//! The dependency-ordered generation pipeline.
//!
//! Each stage is a pure function from upstream tables (plus a stage-local
//! random stream) to a new immutable table; the orchestrator threads the
//! materialized tables forward. No stage mutates another stage's output.

mod customers;
mod inventory;
mod links;
mod orders;
mod sales;
mod stock;

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

use crate::codebook::Codebook;
use crate::config::GenerateConfig;
use crate::error::PipelineError;
use crate::persona::{FakerSource, NameAddressSource};
use crate::table::Table;

/// Stages that consume randomness. Each gets an independent, reproducible
/// sub-stream derived from the run seed plus its fixed offset, so adding
/// rows to one stage never shifts another stage's draws across runs with
/// different counts of *earlier* stages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stage {
    Orders = 1,
    Place = 2,
    Stock = 3,
    Inventory = 4,
    Sales = 5,
    Customers = 6,
    Persona = 7,
}

/// Derive the reproducible random stream for one stage.
pub fn stage_rng(seed: u64, stage: Stage) -> ChaCha8Rng {
    ChaCha8Rng::seed_from_u64(seed.wrapping_add(stage as u64))
}

/// All eleven materialized tables, in artifact order.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset {
    pub manufacturers: Table,
    pub tools: Table,
    pub retailers: Table,
    pub orders: Table,
    pub build: Table,
    pub comprise: Table,
    pub place: Table,
    pub stock: Table,
    pub inventory: Table,
    pub sales: Table,
    pub customers: Table,
}

impl Dataset {
    /// Tables in the order their artifacts are emitted.
    pub fn tables(&self) -> [&Table; 11] {
        [
            &self.manufacturers,
            &self.tools,
            &self.retailers,
            &self.orders,
            &self.build,
            &self.comprise,
            &self.place,
            &self.stock,
            &self.inventory,
            &self.sales,
            &self.customers,
        ]
    }
}

/// Runs the stages in dependency order against one codebook and config.
pub struct Pipeline {
    codebook: Codebook,
    config: GenerateConfig,
    progress: Option<Box<dyn Fn(&'static str, u64)>>,
    name_source: Option<Box<dyn NameAddressSource>>,
}

impl Pipeline {
    pub fn new(codebook: Codebook, config: GenerateConfig) -> Self {
        Self {
            codebook,
            config,
            progress: None,
            name_source: None,
        }
    }

    /// Report `(stage, fact rows generated so far)` while the three large
    /// fact tables are being built.
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(&'static str, u64) + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Substitute the customer identity source (tests inject a stub here).
    pub fn with_name_source(mut self, source: Box<dyn NameAddressSource>) -> Self {
        self.name_source = Some(source);
        self
    }

    /// Run every stage to completion, in dependency order.
    pub fn run(mut self) -> Result<Dataset, PipelineError> {
        let config = self.config;
        let seed = config.seed;
        let progress = self.progress.take();
        let report = |stage: &'static str, base: u64| {
            let progress = &progress;
            move |rows: u64| {
                if let Some(callback) = progress {
                    callback(stage, base + rows);
                }
            }
        };

        let mut name_source = self
            .name_source
            .take()
            .unwrap_or_else(|| Box::new(FakerSource::seeded(seed.wrapping_add(Stage::Persona as u64))));

        let orders = orders::generate(
            &self.codebook.tools,
            &config,
            &mut stage_rng(seed, Stage::Orders),
            &report("orders", 0),
        )?;
        let build = links::project(&self.codebook.tools, crate::schema::build())?;
        let comprise = links::project(&orders, crate::schema::comprise())?;
        let place = links::place(
            &orders,
            &self.codebook.retailers,
            &mut stage_rng(seed, Stage::Place),
        )?;
        let stock = stock::generate(
            &self.codebook.retailers,
            &orders,
            &config,
            &mut stage_rng(seed, Stage::Stock),
            &report("stock", config.orders as u64),
        )?;
        let inventory = inventory::derive(
            &stock,
            &orders,
            &config,
            &mut stage_rng(seed, Stage::Inventory),
        )?;
        let sales = sales::generate(
            &inventory,
            &self.codebook.retailers,
            &config,
            &mut stage_rng(seed, Stage::Sales),
            &report("sales", (config.orders + config.stock) as u64),
        )?;
        let customers = customers::derive(
            &sales,
            name_source.as_mut(),
            &mut stage_rng(seed, Stage::Customers),
        )?;

        Ok(Dataset {
            manufacturers: self.codebook.manufacturers,
            tools: self.codebook.tools,
            retailers: self.codebook.retailers,
            orders,
            build,
            comprise,
            place,
            stock,
            inventory,
            sales,
            customers,
        })
    }
}
