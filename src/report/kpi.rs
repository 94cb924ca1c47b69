use crate::data::model::Dataset;

use super::format::{self, NO_DATA};
use super::mean;

/// Scalar summary of a (filtered) dataset.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct KpiSet {
    pub count: usize,
    pub winners: usize,
    /// `None` means no data, which is distinct from a real 0%.
    pub mean_progress_pp: Option<f64>,
    pub mean_progress_ss: Option<f64>,
    pub mean_progress_equivalent: Option<f64>,
}

impl KpiSet {
    /// Title and display value of each summary tile, in display order.
    pub fn tiles(&self) -> [(&'static str, String); 5] {
        let pct = |m: Option<f64>| format::percent_label(m).unwrap_or_else(|| NO_DATA.to_string());
        [
            ("👥 Participantes", format::format_count(self.count)),
            ("🏆 Ganadores", format::format_count(self.winners)),
            ("📈 Proyección PP", pct(self.mean_progress_pp)),
            ("📊 Proyección SS", pct(self.mean_progress_ss)),
            ("⚡ Proyección Eqv", pct(self.mean_progress_equivalent)),
        ]
    }
}

pub fn summarize(dataset: &Dataset) -> KpiSet {
    KpiSet {
        count: dataset.len(),
        winners: dataset.iter().filter(|r| r.is_winner).count(),
        mean_progress_pp: mean(dataset.iter().map(|r| r.progress_pp)),
        mean_progress_ss: mean(dataset.iter().map(|r| r.progress_ss)),
        mean_progress_equivalent: mean(dataset.iter().map(|r| r.progress_equivalent)),
    }
}
