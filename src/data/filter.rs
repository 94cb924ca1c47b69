use std::collections::BTreeSet;
use std::fmt;

use crate::error::{DashboardError, DashboardResult};

use super::model::{Dataset, Record};

/// Label the UI shows for "no constraint on this dimension".
pub const ALL_LABEL: &str = "Todos";

// ---------------------------------------------------------------------------
// Constraint – one categorical predicate
// ---------------------------------------------------------------------------

/// Equality predicate on one categorical column, or no constraint at all.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub enum Constraint {
    #[default]
    Any,
    Equals(String),
}

impl Constraint {
    pub fn matches(&self, value: &str) -> bool {
        match self {
            Constraint::Any => true,
            Constraint::Equals(expected) => expected == value,
        }
    }

    pub fn is_any(&self) -> bool {
        matches!(self, Constraint::Any)
    }

    /// Dropdown text. Blank values and values spelled like [`ALL_LABEL`]
    /// get a label that cannot be confused with the sentinel.
    pub fn label(&self) -> String {
        match self {
            Constraint::Equals(v) if v.is_empty() => "(vacío)".to_string(),
            Constraint::Equals(v) if v == ALL_LABEL => format!("\"{v}\""),
            other => other.to_string(),
        }
    }
}

impl fmt::Display for Constraint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Constraint::Any => write!(f, "{ALL_LABEL}"),
            Constraint::Equals(v) => write!(f, "{v}"),
        }
    }
}

// ---------------------------------------------------------------------------
// TopN – bounded size of the ranking table
// ---------------------------------------------------------------------------

/// Number of rows in the ranking table, always within `MIN..=MAX`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct TopN(u8);

impl TopN {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 50;

    /// Reject values outside `MIN..=MAX`.
    pub fn new(n: i64) -> DashboardResult<Self> {
        if (Self::MIN as i64..=Self::MAX as i64).contains(&n) {
            Ok(TopN(n as u8))
        } else {
            Err(DashboardError::InvalidSelection(format!(
                "top_n must be within {}..={}, got {n}",
                Self::MIN,
                Self::MAX
            )))
        }
    }

    /// Clamp into `MIN..=MAX`, logging when the input was out of range.
    pub fn clamped(n: i64) -> Self {
        let clamped = n.clamp(Self::MIN as i64, Self::MAX as i64);
        if clamped != n {
            log::warn!("top_n {n} out of range, using {clamped}");
        }
        TopN(clamped as u8)
    }

    pub fn get(self) -> usize {
        self.0 as usize
    }
}

impl Default for TopN {
    fn default() -> Self {
        TopN(10)
    }
}

// ---------------------------------------------------------------------------
// FilterSelection
// ---------------------------------------------------------------------------

/// Current sidebar selection. Built fresh from user input, never persisted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FilterSelection {
    pub department: Constraint,
    pub cluster: Constraint,
    pub winners_only: bool,
    pub top_n: TopN,
}

impl FilterSelection {
    /// Whether `record` passes every active constraint.
    pub fn accepts(&self, record: &Record) -> bool {
        self.department.matches(&record.department)
            && self.cluster.matches(&record.cluster)
            && (!self.winners_only || record.is_winner)
    }

    /// Drop constraints naming values the dataset does not contain, e.g. a
    /// department that disappeared after a reload.
    pub fn reconcile(mut self, options: &FilterOptions) -> Self {
        if let Constraint::Equals(dep) = &self.department {
            if !options.departments.contains(dep) {
                log::warn!("unknown department {dep:?}, filter ignored");
                self.department = Constraint::Any;
            }
        }
        if let Constraint::Equals(cluster) = &self.cluster {
            if !options.clusters.contains(cluster) {
                log::warn!("unknown cluster {cluster:?}, filter ignored");
                self.cluster = Constraint::Any;
            }
        }
        self
    }
}

/// Produce the subset of `dataset` accepted by `selection`, keeping row order.
pub fn apply(dataset: &Dataset, selection: &FilterSelection) -> Dataset {
    dataset
        .iter()
        .filter(|r| selection.accepts(r))
        .cloned()
        .collect()
}

// ---------------------------------------------------------------------------
// FilterOptions – dropdown contents
// ---------------------------------------------------------------------------

/// Sorted unique values offered by the department and cluster dropdowns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FilterOptions {
    pub departments: BTreeSet<String>,
    pub clusters: BTreeSet<String>,
}

impl FilterOptions {
    pub fn from_dataset(dataset: &Dataset) -> Self {
        let mut options = FilterOptions::default();
        for r in dataset {
            options.departments.insert(r.department.clone());
            options.clusters.insert(r.cluster.clone());
        }
        options
    }

    /// Department choices with the "all" sentinel first.
    pub fn department_choices(&self) -> Vec<Constraint> {
        with_any(&self.departments)
    }

    /// Cluster choices with the "all" sentinel first.
    pub fn cluster_choices(&self) -> Vec<Constraint> {
        with_any(&self.clusters)
    }
}

fn with_any(values: &BTreeSet<String>) -> Vec<Constraint> {
    std::iter::once(Constraint::Any)
        .chain(values.iter().cloned().map(Constraint::Equals))
        .collect()
}
