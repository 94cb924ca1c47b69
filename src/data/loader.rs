use std::collections::BTreeSet;
use std::path::Path;

use anyhow::{Context, Result, bail};
use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int32Type, Int64Type};
use calamine::{Data, Reader, open_workbook_auto};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::Value as JsonValue;

use super::model::{Cell, Dataset, Record, columns};

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.xlsx` / `.xlsm` / `.xlsb` / `.xls` / `.ods` – first worksheet, header in the first row
/// * `.csv`     – header row, every cell kept as text until coercion
/// * `.json`    – `[{ "HC": "001", "NOMBRE": "...", ... }, ...]`
/// * `.parquet` – one column per field of the column contract
///
/// The result is ordered by rank, absent ranks last.
pub fn load_file(path: &Path) -> Result<Dataset> {
    let table = read_table(path)?;
    let dataset = normalize(&table)
        .with_context(|| format!("normalizing rows of {}", path.display()))?;
    Ok(dataset.sorted_by_rank())
}

/// Read the raw header + cell grid of a file without interpreting columns.
pub fn read_table(path: &Path) -> Result<RawTable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => read_workbook(path),
        "csv" => read_csv(path),
        "json" => read_json(path),
        "parquet" | "pq" => read_parquet(path),
        other => bail!("Unsupported file extension: .{other}"),
    }
}

// ---------------------------------------------------------------------------
// RawTable – untyped grid shared by every format
// ---------------------------------------------------------------------------

/// Header names plus rows of cells, as read from the source.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<Cell>>,
}

/// Position of each contract column within a [`RawTable`] row.
struct ColumnIndex {
    id: usize,
    name: usize,
    department: usize,
    channel: usize,
    cluster: usize,
    rank: usize,
    winner: usize,
    progress_pp: usize,
    progress_ss: usize,
    progress_equivalent: usize,
    total_pp: usize,
    total_ss: usize,
}

static EMPTY: Cell = Cell::Empty;

impl ColumnIndex {
    fn resolve(headers: &[String]) -> Result<Self> {
        let mut missing = Vec::new();
        let mut find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h.trim() == name)
                .unwrap_or_else(|| {
                    missing.push(name);
                    0
                })
        };

        let index = ColumnIndex {
            id: find(columns::ID),
            name: find(columns::NAME),
            department: find(columns::DEPARTMENT),
            channel: find(columns::CHANNEL),
            cluster: find(columns::CLUSTER),
            rank: find(columns::RANK),
            winner: find(columns::WINNER),
            progress_pp: find(columns::PROGRESS_PP),
            progress_ss: find(columns::PROGRESS_SS),
            progress_equivalent: find(columns::PROGRESS_EQUIVALENT),
            total_pp: find(columns::TOTAL_PP),
            total_ss: find(columns::TOTAL_SS),
        };

        if !missing.is_empty() {
            bail!("missing required column(s): {}", missing.join(", "));
        }
        Ok(index)
    }

    fn record(&self, row: &[Cell]) -> Record {
        let cell = |idx: usize| row.get(idx).unwrap_or(&EMPTY);
        let category = |idx: usize| cell(idx).as_text().trim().to_string();

        Record {
            id: cell(self.id).as_text(),
            name: cell(self.name).as_text(),
            department: category(self.department),
            channel: category(self.channel),
            cluster: category(self.cluster),
            rank: cell(self.rank).as_f64(),
            is_winner: cell(self.winner).as_flag(),
            progress_pp: cell(self.progress_pp).as_f64(),
            progress_ss: cell(self.progress_ss).as_f64(),
            progress_equivalent: cell(self.progress_equivalent).as_f64(),
            total_pp: cell(self.total_pp).as_f64(),
            total_ss: cell(self.total_ss).as_f64(),
        }
    }
}

/// Coerce a raw table into typed records. Fully blank rows are skipped; row
/// order is kept.
pub fn normalize(table: &RawTable) -> Result<Dataset> {
    let index = ColumnIndex::resolve(&table.headers)?;
    Ok(table
        .rows
        .iter()
        .filter(|row| !row.iter().all(Cell::is_empty))
        .map(|row| index.record(row))
        .collect())
}

// ---------------------------------------------------------------------------
// Spreadsheet loader
// ---------------------------------------------------------------------------

fn read_workbook(path: &Path) -> Result<RawTable> {
    let mut workbook = open_workbook_auto(path)
        .with_context(|| format!("opening workbook {}", path.display()))?;
    let sheet = workbook
        .sheet_names()
        .first()
        .cloned()
        .context("workbook has no worksheets")?;
    let range = workbook
        .worksheet_range(&sheet)
        .with_context(|| format!("reading worksheet '{sheet}'"))?;

    let mut rows = range.rows();
    let headers = rows
        .next()
        .with_context(|| format!("worksheet '{sheet}' is empty"))?
        .iter()
        .map(|c| data_to_cell(c).as_text().trim().to_string())
        .collect();
    let rows = rows
        .map(|r| r.iter().map(data_to_cell).collect())
        .collect();

    Ok(RawTable { headers, rows })
}

fn data_to_cell(data: &Data) -> Cell {
    match data {
        Data::String(s) => Cell::Text(s.clone()),
        Data::Int(i) => Cell::Integer(*i),
        Data::Float(f) => Cell::Float(*f),
        Data::Bool(b) => Cell::Bool(*b),
        Data::Empty | Data::Error(_) => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with the contract column names.
/// Cells stay text so identifiers such as `00123` keep their leading zeros.
fn read_csv(path: &Path) -> Result<RawTable> {
    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .from_path(path)
        .context("opening CSV")?;
    let headers: Vec<String> = reader
        .headers()
        .context("reading CSV headers")?
        .iter()
        .map(|h| h.trim_start_matches('\u{feff}').trim().to_string())
        .collect();

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result.with_context(|| format!("CSV row {row_no}"))?;
        rows.push(record.iter().map(text_cell).collect());
    }

    Ok(RawTable { headers, rows })
}

fn text_cell(s: &str) -> Cell {
    if s.trim().is_empty() {
        Cell::Empty
    } else {
        Cell::Text(s.to_string())
    }
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "HC": "00123", "NOMBRE": "Ana", "DEPARTAMENTO": "LIMA", "Ranking": 1, ... },
///   ...
/// ]
/// ```
fn read_json(path: &Path) -> Result<RawTable> {
    let text = std::fs::read_to_string(path).context("reading JSON file")?;
    let root: JsonValue = serde_json::from_str(&text).context("parsing JSON")?;

    let records = root.as_array().context("Expected top-level JSON array")?;

    let objects = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .with_context(|| format!("Row {i} is not a JSON object"))
        })
        .collect::<Result<Vec<_>>>()?;

    let headers: Vec<String> = objects
        .iter()
        .flat_map(|obj| obj.keys().cloned())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect();

    let rows = objects
        .iter()
        .map(|obj| {
            headers
                .iter()
                .map(|h| obj.get(h).map(json_to_cell).unwrap_or(Cell::Empty))
                .collect()
        })
        .collect();

    Ok(RawTable { headers, rows })
}

fn json_to_cell(val: &JsonValue) -> Cell {
    match val {
        JsonValue::String(s) => text_cell(s),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                Cell::Integer(i)
            } else if let Some(f) = n.as_f64() {
                Cell::Float(f)
            } else {
                Cell::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => Cell::Bool(*b),
        JsonValue::Null => Cell::Empty,
        other => Cell::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one scalar column per contract field.
///
/// Works with files written by both **Pandas** (`df.to_parquet()`) and
/// **Polars** (`df.write_parquet()`).
fn read_parquet(path: &Path) -> Result<RawTable> {
    let file = std::fs::File::open(path).context("opening parquet file")?;
    let builder =
        ParquetRecordBatchReaderBuilder::try_new(file).context("reading parquet metadata")?;
    let headers: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().trim().to_string())
        .collect();
    let reader = builder.build().context("building parquet reader")?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result.context("reading parquet record batch")?;
        for row in 0..batch.num_rows() {
            rows.push(
                batch
                    .columns()
                    .iter()
                    .map(|col| extract_cell(col, row))
                    .collect(),
            );
        }
    }

    Ok(RawTable { headers, rows })
}

/// Extract a single cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> Cell {
    if col.is_null(row) {
        return Cell::Empty;
    }
    match col.data_type() {
        DataType::Utf8 => text_cell(col.as_string::<i32>().value(row)),
        DataType::LargeUtf8 => text_cell(col.as_string::<i64>().value(row)),
        DataType::Int32 => Cell::Integer(col.as_primitive::<Int32Type>().value(row) as i64),
        DataType::Int64 => Cell::Integer(col.as_primitive::<Int64Type>().value(row)),
        DataType::Float32 => Cell::Float(col.as_primitive::<Float32Type>().value(row) as f64),
        DataType::Float64 => Cell::Float(col.as_primitive::<Float64Type>().value(row)),
        DataType::Boolean => Cell::Bool(col.as_boolean().value(row)),
        _ => arrow::util::display::array_value_to_string(col, row)
            .map(|s| text_cell(&s))
            .unwrap_or(Cell::Empty),
    }
}
