//! Aggregation and presentation tables built from a [`Dataset`].
//!
//! KPIs and the ranking use the filtered dataset; the department summary
//! always uses the full one.

pub mod departments;
pub mod export;
pub mod format;
pub mod kpi;
pub mod ranking;

use crate::data::filter::{self, FilterSelection};
use crate::data::model::Dataset;

use departments::DepartmentSummary;
use kpi::KpiSet;
use ranking::RankedRow;

/// Arithmetic mean of the present values. `None` when there are none.
pub fn mean(values: impl IntoIterator<Item = Option<f64>>) -> Option<f64> {
    let (sum, n) = values
        .into_iter()
        .flatten()
        .fold((0.0, 0usize), |(sum, n), v| (sum + v, n + 1));
    (n > 0).then(|| sum / n as f64)
}

/// Everything the dashboard renders for one dataset and selection.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardView {
    pub kpis: KpiSet,
    pub ranking: Vec<RankedRow>,
    pub departments: Vec<DepartmentSummary>,
    /// Rows left after filtering.
    pub filtered_count: usize,
}

impl DashboardView {
    pub fn compute(dataset: &Dataset, selection: &FilterSelection) -> Self {
        let filtered = filter::apply(dataset, selection);
        DashboardView {
            kpis: kpi::summarize(&filtered),
            ranking: ranking::build(&filtered, selection.top_n),
            departments: departments::build(dataset),
            filtered_count: filtered.len(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::filter::Constraint;
    use crate::data::model::Record;

    #[test]
    fn mean_ignores_absent_values() {
        assert_eq!(mean([Some(1.0), None, Some(0.5)]), Some(0.75));
        assert_eq!(mean([None, None]), None);
        assert_eq!(mean(std::iter::empty()), None);
        assert_eq!(mean([Some(0.0)]), Some(0.0));
    }

    #[test]
    fn department_summary_ignores_the_selection() {
        let rec = |dep: &str, eqv: f64| Record {
            department: dep.into(),
            progress_equivalent: Some(eqv),
            ..Record::default()
        };
        let ds = Dataset::from_records(vec![rec("A", 0.5), rec("B", 0.7)]);
        let sel = FilterSelection {
            department: Constraint::Equals("A".into()),
            ..FilterSelection::default()
        };

        let view = DashboardView::compute(&ds, &sel);
        assert_eq!(view.filtered_count, 1);
        assert_eq!(view.kpis.count, 1);
        assert_eq!(view.ranking.len(), 1);
        assert_eq!(view.departments.len(), 2);
    }
}
