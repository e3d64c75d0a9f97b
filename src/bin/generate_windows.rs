use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Float64Array, Float64Builder, Int64Array, ListArray, ListBuilder};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Write a synthetic range scan: overlapping windows at shifted centers.
#[derive(Parser)]
#[command(name = "generate-windows", version)]
struct Args {
    /// Output file, .parquet or .json
    #[arg(value_name = "OUT", default_value = "sample_windows.parquet")]
    output: PathBuf,

    /// Windows per run
    #[arg(short, long, default_value_t = 8)]
    windows: usize,

    /// Independent runs (distinguished by the `run` column)
    #[arg(short, long, default_value_t = 2)]
    runs: usize,

    /// Samples per window
    #[arg(short, long, default_value_t = 200)]
    pixels: usize,

    /// Window width in nm
    #[arg(long, default_value_t = 40.0)]
    width: f64,

    /// Center step between windows in nm; less than width for overlap
    #[arg(long, default_value_t = 30.0)]
    step: f64,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

#[derive(Serialize)]
struct WindowRecord {
    x: Vec<f64>,
    y: Vec<f64>,
    center: f64,
    run: i64,
    window: i64,
}

fn gaussian(x: f64, mu: f64, sigma: f64, amplitude: f64) -> f64 {
    amplitude * (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5)).rotate_left(7).wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// Emission lines of the simulated source: (center nm, sigma nm, counts).
const LINES: [(f64, f64, f64); 4] = [
    (435.8, 1.2, 900.0),
    (546.1, 1.5, 1400.0),
    (577.0, 1.0, 600.0),
    (579.1, 1.0, 650.0),
];

fn scan(args: &Args) -> Vec<WindowRecord> {
    let mut rng = SimpleRng::new(args.seed);
    let first_center = 420.0 + args.width / 2.0;
    let pitch = args.width / args.pixels as f64;
    let mut records = Vec::with_capacity(args.runs * args.windows);

    for run in 0..args.runs {
        let baseline = 40.0 + 10.0 * run as f64;
        for w in 0..args.windows {
            let center = first_center + w as f64 * args.step;
            let lo = center - args.width / 2.0;
            // each detector read-out lands on a slightly different grid
            let offset = rng.next_f64() * pitch;

            let mut points: Vec<(f64, f64)> = (0..args.pixels)
                .map(|i| {
                    let x = lo + offset + i as f64 * pitch;
                    let signal: f64 = LINES.iter().map(|&(mu, sigma, amp)| gaussian(x, mu, sigma, amp)).sum();
                    (x, baseline + signal + rng.gauss(0.0, 3.0))
                })
                .collect();
            // odd windows read out in descending wavelength order
            if w % 2 == 1 {
                points.reverse();
            }

            let (x, y) = points.into_iter().unzip();
            records.push(WindowRecord {
                x,
                y,
                center,
                run: run as i64,
                window: w as i64,
            });
        }
    }
    records
}

fn write_json(path: &Path, records: &[WindowRecord]) -> Result<()> {
    let file = std::fs::File::create(path).context("creating output file")?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), records).context("writing JSON")
}

fn float_lists<'a>(rows: impl Iterator<Item = &'a Vec<f64>>) -> ListArray {
    let mut builder = ListBuilder::new(Float64Builder::new());
    for row in rows {
        builder.values().append_slice(row);
        builder.append(true);
    }
    builder.finish()
}

fn write_parquet(path: &Path, records: &[WindowRecord]) -> Result<()> {
    let x_array = float_lists(records.iter().map(|r| &r.x));
    let y_array = float_lists(records.iter().map(|r| &r.y));
    let center_array = Float64Array::from_iter_values(records.iter().map(|r| r.center));
    let run_array = Int64Array::from_iter_values(records.iter().map(|r| r.run));
    let window_array = Int64Array::from_iter_values(records.iter().map(|r| r.window));

    let item = Arc::new(Field::new("item", DataType::Float64, true));
    let schema = Arc::new(Schema::new(vec![
        Field::new("x", DataType::List(item.clone()), false),
        Field::new("y", DataType::List(item), false),
        Field::new("center", DataType::Float64, false),
        Field::new("run", DataType::Int64, false),
        Field::new("window", DataType::Int64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(x_array),
            Arc::new(y_array),
            Arc::new(center_array),
            Arc::new(run_array),
            Arc::new(window_array),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating output file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing record batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let args = Args::parse();
    if args.step >= args.width {
        log::warn!("step {} >= width {}: windows will not overlap", args.step, args.width);
    }

    let records = scan(&args);
    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "parquet" | "pq" => write_parquet(&args.output, &records)?,
        "json" => write_json(&args.output, &records)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!(
        "Wrote {} windows ({} runs × {}, {} samples each) to {}",
        records.len(),
        args.runs,
        args.windows,
        args.pixels,
        args.output.display()
    );
    Ok(())
}
