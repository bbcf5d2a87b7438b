use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use clap::Parser;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

/// Write a synthetic launch table for trying the dashboard offline.
#[derive(Debug, Parser)]
struct Args {
    /// Output file; the extension picks the format (.csv, .json or .parquet).
    #[arg(long, default_value = "sample_launches.csv")]
    output: PathBuf,

    /// Number of launches to generate.
    #[arg(long, default_value_t = 56)]
    rows: usize,

    #[arg(long, default_value_t = 42)]
    seed: u64,
}

/// One row, with the column names the dashboard expects.
#[derive(Debug, Serialize)]
struct Row {
    #[serde(rename = "Flight Number")]
    flight_number: i64,
    #[serde(rename = "Launch Site")]
    launch_site: &'static str,
    #[serde(rename = "class")]
    class: i64,
    #[serde(rename = "Payload Mass (kg)")]
    payload_mass_kg: f64,
    #[serde(rename = "Booster Version Category")]
    booster_version_category: &'static str,
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
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
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
}

const SITES: [&str; 4] = ["CCAFS LC-40", "VAFB SLC-4E", "KSC LC-39A", "CCAFS SLC-40"];

/// Booster generations in flight order with their success probability.
const BOOSTERS: [(&str, f64); 5] = [
    ("v1.0", 0.1),
    ("v1.1", 0.3),
    ("FT", 0.65),
    ("B4", 0.55),
    ("B5", 0.9),
];

fn generate(rows: usize, seed: u64) -> Vec<Row> {
    let mut rng = SimpleRng::new(seed);

    (0..rows)
        .map(|i| {
            // Later flights use later boosters.
            let generation = (i * BOOSTERS.len() / rows.max(1)).min(BOOSTERS.len() - 1);
            let (booster, p_success) = BOOSTERS[generation];
            let site = SITES[(rng.next_u64() % SITES.len() as u64) as usize];
            let payload = (rng.next_f64() * 9600.0).round();
            let success = rng.next_f64() < p_success;

            Row {
                flight_number: i as i64 + 1,
                launch_site: site,
                class: success as i64,
                payload_mass_kg: payload,
                booster_version_category: booster,
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush()?;
    Ok(())
}

fn write_json(path: &Path, rows: &[Row]) -> Result<()> {
    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(file, rows)?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.flight_number))),
            Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.launch_site))),
            Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.class))),
            Arc::new(Float64Array::from_iter_values(rows.iter().map(|r| r.payload_mass_kg))),
            Arc::new(StringArray::from_iter_values(
                rows.iter().map(|r| r.booster_version_category),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating Parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let args = Args::parse();
    let rows = generate(args.rows, args.seed);

    let ext = args
        .output
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => write_csv(&args.output, &rows)?,
        "json" => write_json(&args.output, &rows)?,
        "parquet" | "pq" => write_parquet(&args.output, &rows)?,
        other => bail!("Unsupported output extension: .{other}"),
    }

    println!("Wrote {} launches to {}", rows.len(), args.output.display());
    Ok(())
}
