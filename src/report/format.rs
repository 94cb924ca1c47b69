//! Display formatting shared by the KPI tiles and the tables.

/// Shown in place of a statistic that has no data behind it.
pub const NO_DATA: &str = "Sin datos";

/// Round to one decimal place, halves to even.
pub fn round1(value: f64) -> f64 {
    (value * 10.0).round_ties_even() / 10.0
}

/// Ratio expressed as a percentage rounded to one decimal.
pub fn ratio_to_pct(ratio: f64) -> f64 {
    round1(ratio * 100.0)
}

/// `0.853` → `"85.3%"`. Absent ratios give `None`.
pub fn percent_label(ratio: Option<f64>) -> Option<String> {
    ratio.map(|r| format!("{:.1}%", ratio_to_pct(r)))
}

/// Format a count with comma separators.
pub fn format_count(n: usize) -> String {
    let s = n.to_string();
    let mut result = String::with_capacity(s.len() + s.len() / 3);
    for (i, ch) in s.chars().enumerate() {
        if i > 0 && (s.len() - i) % 3 == 0 {
            result.push(',');
        }
        result.push(ch);
    }
    result
}

/// Totals as shown in the tables: integral values without decimals.
pub fn format_total(value: Option<f64>) -> String {
    match value {
        Some(v) if v.fract() == 0.0 => format!("{v:.0}"),
        Some(v) => format!("{v:.2}"),
        None => String::new(),
    }
}
