//! Writes a synthetic progress dataset as `avance.parquet`, `avance.csv` and
//! `avance.json` into the given directory (default: current directory).

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{ArrayRef, Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use serde::Serialize;

const DEPARTMENTS: [&str; 6] = ["LIMA", "AREQUIPA", "CUSCO", "PIURA", "LA LIBERTAD", "JUNIN"];
const CLUSTERS: [&str; 3] = ["A", "B", "C"];
const CHANNELS: [&str; 2] = ["PDV", "TIENDA"];
const FIRST_NAMES: [&str; 8] = ["Ana", "Luis", "Rosa", "Jorge", "Carmen", "Pedro", "Lucia", "Diego"];
const LAST_NAMES: [&str; 6] = ["Quispe", "Flores", "Torres", "Ramos", "Huaman", "Mendoza"];
const ROWS: usize = 150;
const WINNERS: usize = 15;

#[derive(Debug, Clone, Serialize)]
struct SampleRow {
    #[serde(rename = "HC")]
    id: String,
    #[serde(rename = "NOMBRE")]
    name: String,
    #[serde(rename = "DEPARTAMENTO")]
    department: String,
    #[serde(rename = "CANAL")]
    channel: String,
    #[serde(rename = "CLUSTER")]
    cluster: String,
    #[serde(rename = "Ranking")]
    rank: Option<f64>,
    #[serde(rename = "Ganadores")]
    winner: i64,
    #[serde(rename = "Avance PP Total")]
    progress_pp: f64,
    #[serde(rename = "Avance SS Total")]
    progress_ss: f64,
    #[serde(rename = "Avance Eqv Total")]
    progress_equivalent: f64,
    #[serde(rename = "PROY TOTAL PP")]
    total_pp: f64,
    #[serde(rename = "PROY TOTAL SS")]
    total_ss: f64,
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

    fn pick<'a>(&mut self, items: &[&'a str]) -> &'a str {
        items[(self.next_u64() % items.len() as u64) as usize]
    }

    /// Progress ratio around `center`, never negative.
    fn ratio(&mut self, center: f64) -> f64 {
        let r = center + (self.next_f64() - 0.5) * 0.6;
        (r.max(0.0) * 1000.0).round() / 1000.0
    }
}

fn generate_rows(rng: &mut SimpleRng) -> Vec<SampleRow> {
    let mut rows: Vec<SampleRow> = (0..ROWS)
        .map(|i| {
            let department = rng.pick(&DEPARTMENTS);
            // Each department gets its own typical performance level.
            let level = DEPARTMENTS.iter().position(|d| *d == department).unwrap_or(0);
            let center = 0.7 + 0.05 * level as f64;
            let progress_pp = rng.ratio(center);
            let progress_ss = rng.ratio(center - 0.1);
            SampleRow {
                id: format!("{:06}", 1000 + i * 7),
                name: format!("{} {}", rng.pick(&FIRST_NAMES), rng.pick(&LAST_NAMES)),
                department: department.to_string(),
                channel: rng.pick(&CHANNELS).to_string(),
                cluster: rng.pick(&CLUSTERS).to_string(),
                rank: None,
                winner: 0,
                progress_pp,
                progress_ss,
                progress_equivalent: ((progress_pp * 0.6 + progress_ss * 0.4) * 1000.0).round() / 1000.0,
                total_pp: (rng.next_f64() * 20_000.0).round(),
                total_ss: (rng.next_f64() * 8_000.0).round(),
            }
        })
        .collect();

    // Rank by equivalent progress; a few participants stay unranked.
    let mut order: Vec<usize> = (0..rows.len()).collect();
    order.sort_by(|&a, &b| {
        rows[b]
            .progress_equivalent
            .total_cmp(&rows[a].progress_equivalent)
    });
    let mut next_rank = 1;
    for idx in order {
        if rng.next_f64() < 0.05 {
            continue;
        }
        rows[idx].rank = Some(next_rank as f64);
        rows[idx].winner = i64::from(next_rank <= WINNERS);
        next_rank += 1;
    }
    rows
}

fn write_parquet(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let text = |f: fn(&SampleRow) -> &str| -> ArrayRef {
        Arc::new(StringArray::from(rows.iter().map(f).collect::<Vec<_>>()))
    };
    let float = |f: fn(&SampleRow) -> Option<f64>| -> ArrayRef {
        Arc::new(Float64Array::from(rows.iter().map(f).collect::<Vec<_>>()))
    };

    let schema = Arc::new(Schema::new(vec![
        Field::new("HC", DataType::Utf8, false),
        Field::new("NOMBRE", DataType::Utf8, false),
        Field::new("DEPARTAMENTO", DataType::Utf8, false),
        Field::new("CANAL", DataType::Utf8, false),
        Field::new("CLUSTER", DataType::Utf8, false),
        Field::new("Ranking", DataType::Float64, true),
        Field::new("Ganadores", DataType::Int64, false),
        Field::new("Avance PP Total", DataType::Float64, true),
        Field::new("Avance SS Total", DataType::Float64, true),
        Field::new("Avance Eqv Total", DataType::Float64, true),
        Field::new("PROY TOTAL PP", DataType::Float64, true),
        Field::new("PROY TOTAL SS", DataType::Float64, true),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            text(|r| r.id.as_str()),
            text(|r| r.name.as_str()),
            text(|r| r.department.as_str()),
            text(|r| r.channel.as_str()),
            text(|r| r.cluster.as_str()),
            float(|r| r.rank),
            Arc::new(Int64Array::from(rows.iter().map(|r| r.winner).collect::<Vec<_>>())) as ArrayRef,
            float(|r| Some(r.progress_pp)),
            float(|r| Some(r.progress_ss)),
            float(|r| Some(r.progress_equivalent)),
            float(|r| Some(r.total_pp)),
            float(|r| Some(r.total_ss)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn write_csv(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for row in rows {
        writer.serialize(row).context("writing CSV row")?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_json(path: &Path, rows: &[SampleRow]) -> Result<()> {
    let file = std::fs::File::create(path).context("creating JSON file")?;
    serde_json::to_writer_pretty(std::io::BufWriter::new(file), rows).context("writing JSON")?;
    Ok(())
}

fn main() -> Result<()> {
    env_logger::init();
    let out_dir = std::env::args()
        .nth(1)
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("."));
    std::fs::create_dir_all(&out_dir)
        .with_context(|| format!("creating {}", out_dir.display()))?;

    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_parquet(&out_dir.join("avance.parquet"), &rows)?;
    write_csv(&out_dir.join("avance.csv"), &rows)?;
    write_json(&out_dir.join("avance.json"), &rows)?;

    log::info!("Wrote {} rows to {}", rows.len(), out_dir.display());
    println!(
        "Wrote {} participants ({} ranked winners) to {}",
        rows.len(),
        rows.iter().filter(|r| r.winner == 1).count(),
        out_dir.display()
    );
    Ok(())
}
