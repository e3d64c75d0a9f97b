use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use rusty_stitch::config::RunConfig;
use rusty_stitch::dark;
use rusty_stitch::data::loader::{load_matrix, load_windows};
use rusty_stitch::run::stitch_runs;
use rusty_stitch::stitch::{MergeStrategy, OverlapPolicy};

#[derive(Parser)]
#[command(name = "rusty-stitch")]
#[command(about = "Stitch overlapping spectral scan windows into one spectrum", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Stitch the windows of a .json, .csv or .parquet file and print the
    /// result as JSON
    Stitch {
        /// Window file
        #[arg(value_name = "WINDOWS")]
        input: PathBuf,

        /// JSON run configuration; flags below override it
        #[arg(short, long, value_name = "FILE")]
        config: Option<PathBuf>,

        /// Overlap merge: linear_average, weighted_ramp or simple_cut
        #[arg(short, long, value_name = "NAME")]
        strategy: Option<MergeStrategy>,

        /// Overlap location: boundary_value or index_anchored
        #[arg(short, long, value_name = "NAME")]
        overlap: Option<OverlapPolicy>,

        /// Concatenate windows that do not overlap instead of failing
        #[arg(long)]
        allow_gaps: bool,

        /// Stitch each value of this metadata column as a separate run
        #[arg(short, long, value_name = "COLUMN")]
        group_by: Option<String>,

        /// Order windows by this metadata column before stitching
        #[arg(short = 'O', long, value_name = "COLUMN")]
        order_by: Option<String>,

        /// Name of the wavelength column
        #[arg(long, value_name = "COLUMN")]
        x_column: Option<String>,

        /// Name of the intensity column
        #[arg(long, value_name = "COLUMN")]
        y_column: Option<String>,
    },

    /// Subtract a dark-count matrix from a signal matrix (JSON arrays of
    /// rows) and print the result
    Dark {
        #[arg(value_name = "SIGNAL.JSON")]
        signal: PathBuf,

        #[arg(value_name = "DARK.JSON")]
        dark: PathBuf,
    },
}

fn main() -> Result<()> {
    env_logger::init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Stitch {
            input,
            config,
            strategy,
            overlap,
            allow_gaps,
            group_by,
            order_by,
            x_column,
            y_column,
        } => {
            let mut cfg = match config {
                Some(path) => RunConfig::from_file(&path)?,
                None => RunConfig::default(),
            };
            if let Some(strategy) = strategy {
                cfg.stitch.strategy = strategy;
            }
            if let Some(overlap) = overlap {
                cfg.stitch.overlap = overlap;
            }
            cfg.stitch.allow_gaps |= allow_gaps;
            if group_by.is_some() {
                cfg.group_by = group_by;
            }
            if order_by.is_some() {
                cfg.order_by = order_by;
            }
            if let Some(x) = x_column {
                cfg.columns.x = x;
            }
            if let Some(y) = y_column {
                cfg.columns.y = y;
            }
            log::debug!("run configuration: {cfg:?}");

            let set = load_windows(&input, &cfg.columns)?;
            let runs = stitch_runs(&set, &cfg)
                .with_context(|| format!("stitching {}", input.display()))?;
            print_json(&runs)
        }
        Commands::Dark {
            signal: signal_path,
            dark: dark_path,
        } => {
            let signal = load_matrix(&signal_path)?;
            let dark_counts = load_matrix(&dark_path)?;
            let corrected = dark::subtract(&signal, &dark_counts).with_context(|| {
                format!("subtracting {} from {}", dark_path.display(), signal_path.display())
            })?;
            print_json(&corrected)
        }
    }
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    serde_json::to_writer(&mut out, value).context("writing JSON to stdout")?;
    writeln!(out).context("writing JSON to stdout")?;
    Ok(())
}
