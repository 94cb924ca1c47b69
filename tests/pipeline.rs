//! End-to-end: source file → cache → filter → KPIs, ranking and department summary.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use pretty_assertions::assert_eq;
use ranking_dashboard::data::cache::{DEFAULT_TTL, DatasetCache, FileSource};
use ranking_dashboard::data::filter::{self, Constraint, FilterSelection, TopN};
use ranking_dashboard::data::model::{Dataset, columns};
use ranking_dashboard::report::{DashboardView, departments, kpi, ranking};
use ranking_dashboard::DashboardError;
use rust_xlsxwriter::Workbook;
use tempfile::tempdir;

enum Value {
    Text(&'static str),
    Number(f64),
    Blank,
}

use Value::{Blank, Number, Text};

/// Write a single-sheet workbook with the contract header and `rows`.
fn write_workbook(dir: &Path, rows: &[[Value; 12]]) -> PathBuf {
    let path = dir.join("avance.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    for (col, name) in columns::REQUIRED.iter().enumerate() {
        sheet.write_string(0, col as u16, *name).unwrap();
    }
    for (r, row) in rows.iter().enumerate() {
        let r = r as u32 + 1;
        for (c, value) in row.iter().enumerate() {
            let c = c as u16;
            match value {
                Text(s) => {
                    sheet.write_string(r, c, *s).unwrap();
                }
                Number(n) => {
                    sheet.write_number(r, c, *n).unwrap();
                }
                Blank => {}
            }
        }
    }
    workbook.save(&path).unwrap();
    path
}

/// The three-row dataset used by the worked examples.
fn example_workbook(dir: &Path) -> PathBuf {
    write_workbook(
        dir,
        &[
            [
                Text("00123"), Text("Ana"), Text("A"), Text("PDV"), Text("C1"), Number(2.0),
                Number(0.0), Number(0.70), Number(0.60), Number(0.80), Number(1000.0), Number(400.0),
            ],
            [
                Number(456.0), Text("Rosa"), Text(" A "), Text("PDV"), Text("C2"), Number(1.0),
                Number(1.0), Number(0.95), Number(0.80), Number(0.90), Number(1500.0), Number(600.0),
            ],
            [
                Text("00789"), Text("Luis"), Text("B"), Text("TIENDA"), Text("C1"), Text("s/r"),
                Number(1.0), Number(0.40), Blank, Number(0.50), Number(700.0), Blank,
            ],
        ],
    )
}

fn load(path: PathBuf) -> Arc<Dataset> {
    DatasetCache::new(FileSource::new(path), DEFAULT_TTL)
        .load()
        .unwrap()
}

#[test]
fn workbook_rows_are_normalized() {
    let dir = tempdir().unwrap();
    let ds = load(example_workbook(dir.path()));

    let ids: Vec<&str> = ds.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, ["456", "00123", "00789"]);
    assert_eq!(ds.records()[0].department, "A");
    assert_eq!(ds.records()[2].rank, None);
    assert_eq!(ds.records()[2].progress_ss, None);
    assert_eq!(ds.records()[2].total_ss, None);
}

#[test]
fn worked_example_with_top_two() {
    let dir = tempdir().unwrap();
    let ds = load(example_workbook(dir.path()));
    let selection = FilterSelection {
        top_n: TopN::new(2).unwrap(),
        ..FilterSelection::default()
    };

    let view = DashboardView::compute(&ds, &selection);

    let ranking: Vec<(&str, &str, &str)> = view
        .ranking
        .iter()
        .map(|r| (r.rank_label.as_str(), r.department.as_str(), r.equivalent_pct.as_str()))
        .collect();
    assert_eq!(ranking, [("🥇 1", "A", "90.0%"), ("🥈 2", "A", "80.0%")]);

    let summary: Vec<(&str, Option<f64>)> = view
        .departments
        .iter()
        .map(|d| (d.department.as_str(), d.equivalent_pct))
        .collect();
    assert_eq!(summary, [("A", Some(85.0)), ("B", Some(50.0))]);

    assert_eq!(view.kpis.count, 3);
    assert_eq!(view.kpis.winners, 2);
}

#[test]
fn filtering_department_b() {
    let dir = tempdir().unwrap();
    let ds = load(example_workbook(dir.path()));
    let selection = FilterSelection {
        department: Constraint::Equals("B".into()),
        ..FilterSelection::default()
    };

    let view = DashboardView::compute(&ds, &selection);
    assert_eq!(view.kpis.count, 1);
    assert_eq!(view.kpis.winners, 1);
    assert_eq!(view.kpis.mean_progress_ss, None);
    assert_eq!(view.ranking.len(), 1);
    assert_eq!(view.ranking[0].id, "00789");
    assert_eq!(view.ranking[0].rank_label, "");
    // Department summary always covers the full dataset.
    assert_eq!(view.departments.len(), 2);
}

#[test]
fn winners_and_cluster_combine() {
    let dir = tempdir().unwrap();
    let ds = load(example_workbook(dir.path()));
    let selection = FilterSelection {
        cluster: Constraint::Equals("C1".into()),
        winners_only: true,
        ..FilterSelection::default()
    };

    let filtered = filter::apply(&ds, &selection);
    assert_eq!(filtered.len(), 1);
    assert_eq!(filtered.records()[0].name, "Luis");
}

#[test]
fn empty_selection_result_is_not_an_error() {
    let dir = tempdir().unwrap();
    let ds = load(example_workbook(dir.path()));
    let selection = FilterSelection {
        department: Constraint::Equals("B".into()),
        cluster: Constraint::Equals("C2".into()),
        ..FilterSelection::default()
    };

    let filtered = filter::apply(&ds, &selection);
    assert!(filtered.is_empty());
    assert_eq!(kpi::summarize(&filtered), kpi::KpiSet::default());
    assert!(ranking::build(&filtered, TopN::default()).is_empty());
    assert_eq!(departments::build(&ds).len(), 2);
}

#[test]
fn filtered_rows_are_an_ordered_subset() {
    let dir = tempdir().unwrap();
    let ds = load(example_workbook(dir.path()));

    for department in [Constraint::Any, Constraint::Equals("A".into())] {
        for winners_only in [false, true] {
            let selection = FilterSelection {
                department: department.clone(),
                winners_only,
                ..FilterSelection::default()
            };
            let filtered = filter::apply(&ds, &selection);
            let mut source = ds.iter();
            for record in &filtered {
                assert!(source.any(|r| r == record), "{record:?} out of order");
            }
        }
    }
}

#[test]
fn workbook_missing_a_column_fails_to_load() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("broken.xlsx");
    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.write_string(0, 0, "HC").unwrap();
    sheet.write_string(0, 1, "NOMBRE").unwrap();
    sheet.write_string(1, 0, "001").unwrap();
    workbook.save(&path).unwrap();

    let err = DatasetCache::new(FileSource::new(&path), DEFAULT_TTL)
        .load()
        .unwrap_err();
    assert!(matches!(err, DashboardError::SourceLoad { .. }));
    assert!(err.to_string().contains("Avance Eqv Total"), "{err}");
}
