mod check;
mod generate;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::{generate as emit_completions, Shell};
use std::io;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "tooldb-seeder")]
#[command(version)]
#[command(about = "Generate deterministic seed data for the ToolDB schema", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Generate the eleven-table dataset and write one bulk INSERT script per table
    Generate {
        /// Output directory for the per-table scripts
        #[arg(short, long, default_value = "seed_scripts")]
        output: PathBuf,

        /// Random seed for the run (overrides the config file)
        #[arg(long)]
        seed: Option<u64>,

        /// Directory of codebook CSV sections (embedded codebook if omitted)
        #[arg(long)]
        codebook: Option<PathBuf>,

        /// YAML file overriding generation parameters
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Number of order records
        #[arg(long)]
        orders: Option<usize>,

        /// Number of stocking records
        #[arg(long)]
        stock: Option<usize>,

        /// Number of sale records
        #[arg(long)]
        sales: Option<usize>,

        /// Show progress during generation
        #[arg(short, long)]
        progress: bool,

        /// Run the pipeline without writing artifacts
        #[arg(long)]
        dry_run: bool,

        /// Print a JSON summary instead of text
        #[arg(long)]
        json: bool,
    },

    /// Verify previously generated scripts against the schema and invariants
    Check {
        /// Directory containing the generated scripts
        #[arg(short, long, default_value = "seed_scripts")]
        output: PathBuf,

        /// YAML config the scripts were generated with (for expected row counts)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Print results as JSON instead of text
        #[arg(long)]
        json: bool,
    },

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: Shell,
    },
}

pub fn run(cli: Cli) -> anyhow::Result<()> {
    match cli.command {
        Commands::Generate {
            output,
            seed,
            codebook,
            config,
            orders,
            stock,
            sales,
            progress,
            dry_run,
            json,
        } => generate::run(
            output, seed, codebook, config, orders, stock, sales, progress, dry_run, json,
        ),
        Commands::Check {
            output,
            config,
            json,
        } => check::run(output, config, json),
        Commands::Completions { shell } => {
            emit_completions(
                shell,
                &mut Cli::command(),
                "tooldb-seeder",
                &mut io::stdout(),
            );
            Ok(())
        }
    }
}
