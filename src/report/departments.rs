use std::cmp::Ordering;
use std::collections::BTreeMap;

use serde::Serialize;

use crate::data::model::{Dataset, Record};

use super::format::ratio_to_pct;
use super::mean;

/// Column headers of the department table, in display order.
pub const HEADERS: [&str; 4] = [
    "DEPARTAMENTO",
    "Proyección PP Total",
    "Proyección SS Total",
    "Proyección Eqv Total",
];

/// Per-department means, already expressed as percentages rounded to one
/// decimal. The numeric value is kept because it drives the color scale.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DepartmentSummary {
    #[serde(rename = "DEPARTAMENTO")]
    pub department: String,
    #[serde(skip)]
    pub records: usize,
    #[serde(rename = "Proyección PP Total")]
    pub pp_pct: Option<f64>,
    #[serde(rename = "Proyección SS Total")]
    pub ss_pct: Option<f64>,
    #[serde(rename = "Proyección Eqv Total")]
    pub equivalent_pct: Option<f64>,
}

/// Group the full dataset by department and sort by mean equivalent progress,
/// highest first. Departments without equivalent data go last.
pub fn build(dataset: &Dataset) -> Vec<DepartmentSummary> {
    let mut groups: BTreeMap<&str, Vec<&Record>> = BTreeMap::new();
    for r in dataset {
        groups.entry(r.department.as_str()).or_default().push(r);
    }

    let mut rows: Vec<(Option<f64>, DepartmentSummary)> = groups
        .into_iter()
        .map(|(department, members)| {
            let avg = |field: fn(&Record) -> Option<f64>| mean(members.iter().map(|r| field(r)));
            let equivalent = avg(|r| r.progress_equivalent);
            let summary = DepartmentSummary {
                department: department.to_string(),
                records: members.len(),
                pp_pct: avg(|r| r.progress_pp).map(ratio_to_pct),
                ss_pct: avg(|r| r.progress_ss).map(ratio_to_pct),
                equivalent_pct: equivalent.map(ratio_to_pct),
            };
            (equivalent, summary)
        })
        .collect();

    // Sort on the unrounded mean so near-ties keep their true order.
    rows.sort_by(|(a, _), (b, _)| match (a, b) {
        (Some(a), Some(b)) => b.total_cmp(a),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    });
    rows.into_iter().map(|(_, summary)| summary).collect()
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn rec(dep: &str, pp: Option<f64>, ss: Option<f64>, eqv: Option<f64>) -> Record {
        Record {
            department: dep.into(),
            progress_pp: pp,
            progress_ss: ss,
            progress_equivalent: eqv,
            ..Record::default()
        }
    }

    #[test]
    fn groups_sorted_by_equivalent_descending() {
        let ds = Dataset::from_records(vec![
            rec("LIMA", Some(0.5), Some(0.5), Some(0.6)),
            rec("CUSCO", Some(0.9), None, Some(0.9)),
            rec("LIMA", Some(0.7), Some(0.3), Some(0.8)),
            rec("PIURA", None, None, None),
        ]);

        let summary = build(&ds);
        assert_eq!(
            summary,
            vec![
                DepartmentSummary {
                    department: "CUSCO".into(),
                    records: 1,
                    pp_pct: Some(90.0),
                    ss_pct: None,
                    equivalent_pct: Some(90.0),
                },
                DepartmentSummary {
                    department: "LIMA".into(),
                    records: 2,
                    pp_pct: Some(60.0),
                    ss_pct: Some(40.0),
                    equivalent_pct: Some(70.0),
                },
                DepartmentSummary {
                    department: "PIURA".into(),
                    records: 1,
                    pp_pct: None,
                    ss_pct: None,
                    equivalent_pct: None,
                },
            ]
        );
    }

    #[test]
    fn groups_partition_the_dataset() {
        let deps = ["A", "B", "", "C", "A", "", "B", "A"];
        let ds: Dataset = deps
            .iter()
            .map(|d| rec(d, None, None, Some(0.5)))
            .collect();

        let summary = build(&ds);
        assert_eq!(summary.len(), 4);
        assert_eq!(summary.iter().map(|s| s.records).sum::<usize>(), ds.len());
    }

    #[test]
    fn ties_keep_department_order() {
        let ds = Dataset::from_records(vec![
            rec("Z", None, None, Some(0.5)),
            rec("M", None, None, Some(0.5)),
            rec("A", None, None, Some(0.5)),
        ]);
        let names: Vec<String> = build(&ds).into_iter().map(|s| s.department).collect();
        assert_eq!(names, ["A", "M", "Z"]);
    }

    #[test]
    fn percentages_round_halves_to_even() {
        let ds = Dataset::from_records(vec![rec("LIMA", Some(0.8125), Some(0.0625), Some(0.3125))]);
        let summary = &build(&ds)[0];
        assert_eq!(summary.pp_pct, Some(81.2));
        assert_eq!(summary.ss_pct, Some(6.2));
        assert_eq!(summary.equivalent_pct, Some(31.2));
    }

    #[test]
    fn empty_dataset_has_no_groups() {
        assert!(build(&Dataset::default()).is_empty());
    }
}
