use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;

use crate::codebook::Codebook;
use crate::config::GenerateConfig;
use crate::pipeline::Pipeline;
use crate::render;

/// JSON output for the generate command
#[derive(Serialize)]
struct GenerateJsonOutput {
    output_dir: String,
    seed: u64,
    dry_run: bool,
    elapsed_secs: f64,
    tables: Vec<TableResult>,
}

#[derive(Serialize)]
struct TableResult {
    table: String,
    rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    artifact: Option<String>,
    status: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    error: Option<String>,
}

#[allow(clippy::too_many_arguments)]
pub fn run(
    output: PathBuf,
    seed: Option<u64>,
    codebook: Option<PathBuf>,
    config: Option<PathBuf>,
    orders: Option<usize>,
    stock: Option<usize>,
    sales: Option<usize>,
    progress: bool,
    dry_run: bool,
    json: bool,
) -> anyhow::Result<()> {
    let mut cfg = match config {
        Some(path) => GenerateConfig::load(&path)?,
        None => GenerateConfig::default(),
    };
    if let Some(seed) = seed {
        cfg.seed = seed;
    }
    if let Some(orders) = orders {
        cfg.orders = orders;
    }
    if let Some(stock) = stock {
        cfg.stock = stock;
    }
    if let Some(sales) = sales {
        cfg.sales = sales;
    }
    cfg.validate()?;

    let codebook = match codebook {
        Some(dir) => Codebook::from_dir(&dir)?,
        None => Codebook::embedded()?,
    };

    if !json {
        if dry_run {
            println!("Dry run: generating dataset with seed {}", cfg.seed);
        } else {
            println!("Generating dataset with seed {}", cfg.seed);
            println!("Output directory: {}", output.display());
        }
        println!(
            "Fact rows: {} orders, {} stock, {} sales\n",
            cfg.orders, cfg.stock, cfg.sales
        );
    }

    let start = Instant::now();
    let mut pipeline = Pipeline::new(codebook, cfg.clone());

    let bar = if progress && !json {
        let total = (cfg.orders + cfg.stock + cfg.sales) as u64;
        let pb = ProgressBar::new(total);
        pb.set_style(
            ProgressStyle::with_template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} rows {msg}",
            )
            .unwrap()
            .progress_chars("█▓▒░  "),
        );
        pb.enable_steady_tick(std::time::Duration::from_millis(100));

        let pb_clone = pb.clone();
        pipeline = pipeline.with_progress(move |stage, rows| {
            pb_clone.set_message(stage);
            pb_clone.set_position(rows);
        });
        Some(pb)
    } else {
        None
    };

    let dataset = pipeline.run()?;
    if let Some(pb) = bar {
        pb.finish_with_message("done");
    }

    let mut results: Vec<TableResult> = Vec::new();
    let mut failures = 0usize;

    if dry_run {
        for table in dataset.tables() {
            results.push(TableResult {
                table: table.name().to_string(),
                rows: table.len(),
                artifact: None,
                status: "skipped".to_string(),
                error: None,
            });
        }
    } else {
        std::fs::create_dir_all(&output)?;
        for table in dataset.tables() {
            let path = output.join(format!("load_{}_data.sql", table.name()));
            // A failed artifact is fatal for that table only; keep going so
            // the other ten still land on disk.
            match render::write_artifact(table, &path) {
                Ok(()) => results.push(TableResult {
                    table: table.name().to_string(),
                    rows: table.len(),
                    artifact: Some(path.display().to_string()),
                    status: "written".to_string(),
                    error: None,
                }),
                Err(e) => {
                    failures += 1;
                    results.push(TableResult {
                        table: table.name().to_string(),
                        rows: table.len(),
                        artifact: Some(path.display().to_string()),
                        status: "failed".to_string(),
                        error: Some(e.to_string()),
                    });
                }
            }
        }
    }

    let elapsed = start.elapsed();

    if json {
        let output_json = GenerateJsonOutput {
            output_dir: output.display().to_string(),
            seed: cfg.seed,
            dry_run,
            elapsed_secs: elapsed.as_secs_f64(),
            tables: results,
        };
        println!("{}", serde_json::to_string_pretty(&output_json)?);
    } else {
        if dry_run {
            println!("✓ Dry run completed, nothing written");
        } else if failures == 0 {
            println!("✓ Generation completed successfully");
        } else {
            println!("Generation completed with {} failed artifacts", failures);
        }

        println!("\nTables:");
        for result in &results {
            match &result.error {
                Some(error) => println!("  {:<14} {:>9} rows  FAILED: {}", result.table, result.rows, error),
                None => println!("  {:<14} {:>9} rows", result.table, result.rows),
            }
        }
        println!("\nElapsed time: {:.3?}", elapsed);
    }

    if failures > 0 {
        anyhow::bail!("{} artifacts could not be written", failures);
    }
    Ok(())
}
