//! Writes a synthetic wheel dataset and a matching model artifact:
//!
//! * `sample_wheels.xlsx` / `sample_wheels.parquet` – 36 temperature columns
//!   plus a `wheel_id` column
//! * `sample_model.json` – logistic regression that flags a hot sector

use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rust_xlsxwriter::Workbook;

use thermo_wheel::data::features::FEATURE_COUNT;
use thermo_wheel::model::{ARTIFACT_FORMAT_VERSION, ModelArtifact, ModelSpec};

const N_WHEELS: usize = 120;
const BASE_TEMPERATURE: f64 = 80.0;
/// Sensor positions 12..24 form the sector that overheats on faulty wheels.
const HOT_SECTOR: std::ops::Range<usize> = 12..24;

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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

/// One thermal profile: ambient drift, sensor noise and an optional hot sector.
fn generate_profile(rng: &mut SimpleRng) -> Vec<f64> {
    let drift = rng.gauss(0.0, 3.0);
    let hot_spot = if rng.next_f64() < 0.35 {
        rng.next_f64() * 20.0
    } else {
        0.0
    };

    (0..FEATURE_COUNT)
        .map(|pos| {
            let sector = if HOT_SECTOR.contains(&pos) { hot_spot } else { 0.0 };
            BASE_TEMPERATURE + drift + sector + rng.gauss(0.0, 0.8)
        })
        .collect()
}

/// Weights sum to zero, so a uniform temperature shift leaves the score alone.
fn sample_model() -> ModelArtifact {
    let hot = HOT_SECTOR.len() as f64;
    let cold = (FEATURE_COUNT - HOT_SECTOR.len()) as f64;
    let coefficients = (0..FEATURE_COUNT)
        .map(|pos| {
            if HOT_SECTOR.contains(&pos) {
                0.08
            } else {
                -0.08 * hot / cold
            }
        })
        .collect();

    ModelArtifact {
        format_version: ARTIFACT_FORMAT_VERSION,
        name: "sample_hot_sector".to_string(),
        n_features: FEATURE_COUNT,
        model: ModelSpec::LogisticRegression {
            coefficients,
            intercept: -6.0,
        },
    }
}

fn column_names() -> Vec<String> {
    (0..FEATURE_COUNT)
        .map(|i| format!("t_{i:02}"))
        .chain(["wheel_id".to_string()])
        .collect()
}

fn write_xlsx(path: &str, profiles: &[Vec<f64>]) -> Result<()> {
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in column_names().iter().enumerate() {
        sheet.write_string(0, col as u16, name)?;
    }
    for (i, profile) in profiles.iter().enumerate() {
        let row = (i + 1) as u32;
        for (col, &t) in profile.iter().enumerate() {
            sheet.write_number(row, col as u16, (t * 100.0).round() / 100.0)?;
        }
        sheet.write_number(row, FEATURE_COUNT as u16, i as f64)?;
    }
    workbook.save(path).with_context(|| format!("writing {path}"))?;
    Ok(())
}

fn write_parquet(path: &str, profiles: &[Vec<f64>]) -> Result<()> {
    let names = column_names();
    let mut fields: Vec<Field> = names[..FEATURE_COUNT]
        .iter()
        .map(|name| Field::new(name, DataType::Float64, false))
        .collect();
    fields.push(Field::new("wheel_id", DataType::Int64, false));
    let schema = Arc::new(Schema::new(fields));

    let mut columns: Vec<ArrayRef> = (0..FEATURE_COUNT)
        .map(|col| {
            let values: Vec<f64> = profiles.iter().map(|p| p[col]).collect();
            Arc::new(Float64Array::from(values)) as ArrayRef
        })
        .collect();
    columns.push(Arc::new(Int64Array::from(
        (0..profiles.len() as i64).collect::<Vec<_>>(),
    )));

    let batch = RecordBatch::try_new(schema.clone(), columns).context("building record batch")?;
    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let profiles: Vec<Vec<f64>> = (0..N_WHEELS).map(|_| generate_profile(&mut rng)).collect();

    write_xlsx("sample_wheels.xlsx", &profiles)?;
    write_parquet("sample_wheels.parquet", &profiles)?;

    let model_json = serde_json::to_string_pretty(&sample_model())?;
    std::fs::write("sample_model.json", model_json).context("writing sample_model.json")?;

    println!(
        "Wrote {N_WHEELS} wheels ({FEATURE_COUNT} sensors each) to sample_wheels.xlsx / \
         sample_wheels.parquet and the matching model to sample_model.json"
    );
    Ok(())
}
