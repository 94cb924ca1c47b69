use std::path::Path;

use anyhow::{Context, Result};
use serde::Serialize;

use crate::error::{DashboardError, DashboardResult};

use super::departments::DepartmentSummary;
use super::ranking::RankedRow;

/// Write the ranking table as CSV with the dashboard's column headers.
pub fn write_ranking_csv(path: &Path, rows: &[RankedRow]) -> DashboardResult<()> {
    write_rows(path, rows)
}

/// Write the department table as CSV. Percentages are written as numbers.
pub fn write_departments_csv(path: &Path, rows: &[DepartmentSummary]) -> DashboardResult<()> {
    write_rows(path, rows)
}

fn write_rows<T: Serialize>(path: &Path, rows: &[T]) -> DashboardResult<()> {
    try_write_rows(path, rows).map_err(|e| {
        log::error!("CSV export to {} failed: {e:#}", path.display());
        DashboardError::Export {
            path: path.to_path_buf(),
            message: format!("{e:#}"),
        }
    })?;
    log::info!("Exported {} rows to {}", rows.len(), path.display());
    Ok(())
}

fn try_write_rows<T: Serialize>(path: &Path, rows: &[T]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    for (i, row) in rows.iter().enumerate() {
        writer
            .serialize(row)
            .with_context(|| format!("writing row {i}"))?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}
