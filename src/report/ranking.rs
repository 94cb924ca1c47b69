use serde::Serialize;

use crate::data::filter::TopN;
use crate::data::model::{Dataset, Record, cmp_rank};

use super::format::percent_label;

/// Column headers of the ranking table, in display order.
pub const HEADERS: [&str; 9] = [
    "Ranking 🏅",
    "HC",
    "NOMBRE",
    "DEPARTAMENTO",
    "CLUSTER",
    "Proyección Eqv Total %",
    "Proyección PP Total %",
    "PROY TOTAL PP",
    "PROY TOTAL SS",
];

/// One row of the ranking table: display labels plus the untouched totals.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedRow {
    #[serde(rename = "Ranking 🏅")]
    pub rank_label: String,
    #[serde(rename = "HC")]
    pub id: String,
    #[serde(rename = "NOMBRE")]
    pub name: String,
    #[serde(rename = "DEPARTAMENTO")]
    pub department: String,
    #[serde(rename = "CLUSTER")]
    pub cluster: String,
    #[serde(rename = "Proyección Eqv Total %")]
    pub equivalent_pct: String,
    #[serde(rename = "Proyección PP Total %")]
    pub pp_pct: String,
    #[serde(rename = "PROY TOTAL PP")]
    pub total_pp: Option<f64>,
    #[serde(rename = "PROY TOTAL SS")]
    pub total_ss: Option<f64>,
}

impl RankedRow {
    fn from_record(record: &Record) -> Self {
        RankedRow {
            rank_label: rank_label(record.rank),
            id: record.id.clone(),
            name: record.name.clone(),
            department: record.department.clone(),
            cluster: record.cluster.clone(),
            equivalent_pct: percent_label(record.progress_equivalent).unwrap_or_default(),
            pp_pct: percent_label(record.progress_pp).unwrap_or_default(),
            total_pp: record.total_pp,
            total_ss: record.total_ss,
        }
    }
}

/// Medal for the podium, the plain number otherwise, empty when unranked.
pub fn rank_label(rank: Option<f64>) -> String {
    let Some(rank) = rank else {
        return String::new();
    };
    match rank as i64 {
        1 => "🥇 1".to_string(),
        2 => "🥈 2".to_string(),
        3 => "🥉 3".to_string(),
        n => n.to_string(),
    }
}

/// The `top_n` best-ranked rows, ascending by rank with unranked rows last.
/// Ties keep their dataset order.
pub fn build(dataset: &Dataset, top_n: TopN) -> Vec<RankedRow> {
    let mut rows: Vec<&Record> = dataset.iter().collect();
    rows.sort_by(|a, b| cmp_rank(a.rank, b.rank));
    rows.into_iter()
        .take(top_n.get())
        .map(RankedRow::from_record)
        .collect()
}
