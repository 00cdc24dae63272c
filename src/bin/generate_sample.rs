use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, BooleanArray, Date32Array, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

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

    fn below(&mut self, n: usize) -> usize {
        (self.next_f64() * n as f64) as usize % n
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

const ROWS: usize = 200;
const CITIES: [&str; 5] = ["Oslo", "Lima", "Pune", "Kobe", "Accra"];

struct Row {
    id: i64,
    age: i64,
    income: Option<f64>,
    city: String,
    member: bool,
    signup: NaiveDate,
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    (0..ROWS)
        .map(|i| {
            let age = rng.gauss(41.0, 12.0).clamp(18.0, 90.0).round() as i64;
            // Roughly one income in twenty is missing.
            let income = (rng.next_f64() > 0.05)
                .then(|| (rng.gauss(52_000.0, 15_000.0) + age as f64 * 300.0).max(0.0).round());
            Row {
                id: i as i64 + 1,
                age,
                income,
                city: CITIES[rng.below(CITIES.len())].to_string(),
                member: rng.next_f64() < 0.4,
                signup: NaiveDate::from_ymd_opt(2024, rng.below(12) as u32 + 1, rng.below(28) as u32 + 1)
                    .unwrap_or_default(),
            }
        })
        .collect()
}

fn write_csv(rows: &[Row], path: &str) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).with_context(|| format!("creating {path}"))?;
    writer.write_record(["id", "age", "income", "city", "member", "signup"])?;
    for r in rows {
        writer.write_record([
            r.id.to_string(),
            r.age.to_string(),
            r.income.map(|v| format!("{v:?}")).unwrap_or_default(),
            r.city.clone(),
            if r.member { "True" } else { "False" }.to_string(),
            r.signup.format("%Y-%m-%d").to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(rows: &[Row], path: &str) -> Result<()> {
    let epoch = NaiveDate::default();
    let schema = Arc::new(Schema::new(vec![
        Field::new("id", DataType::Int64, false),
        Field::new("age", DataType::Int64, false),
        Field::new("income", DataType::Float64, true),
        Field::new("city", DataType::Utf8, false),
        Field::new("member", DataType::Boolean, false),
        Field::new("signup", DataType::Date32, false),
    ]));

    let columns: Vec<ArrayRef> = vec![
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.id))),
        Arc::new(Int64Array::from_iter_values(rows.iter().map(|r| r.age))),
        Arc::new(Float64Array::from(
            rows.iter().map(|r| r.income).collect::<Vec<_>>(),
        )),
        Arc::new(StringArray::from_iter_values(rows.iter().map(|r| r.city.as_str()))),
        Arc::new(BooleanArray::from(
            rows.iter().map(|r| r.member).collect::<Vec<_>>(),
        )),
        Arc::new(Date32Array::from_iter_values(
            rows.iter().map(|r| (r.signup - epoch).num_days() as i32),
        )),
    ];
    let batch = RecordBatch::try_new(schema.clone(), columns)?;

    let file = std::fs::File::create(path).with_context(|| format!("creating {path}"))?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_csv(&rows, "sample_data.csv")?;
    write_parquet(&rows, "sample_data.parquet")?;

    println!("Wrote {} rows to sample_data.csv and sample_data.parquet", rows.len());
    Ok(())
}
