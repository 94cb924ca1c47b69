use std::cmp::Ordering;
use std::fmt;

// ---------------------------------------------------------------------------
// Column contract of the source table
// ---------------------------------------------------------------------------

/// Header names expected in the source table. Matching is exact after trimming.
pub mod columns {
    pub const ID: &str = "HC";
    pub const NAME: &str = "NOMBRE";
    pub const DEPARTMENT: &str = "DEPARTAMENTO";
    pub const CHANNEL: &str = "CANAL";
    pub const CLUSTER: &str = "CLUSTER";
    pub const RANK: &str = "Ranking";
    pub const WINNER: &str = "Ganadores";
    pub const PROGRESS_PP: &str = "Avance PP Total";
    pub const PROGRESS_SS: &str = "Avance SS Total";
    pub const PROGRESS_EQUIVALENT: &str = "Avance Eqv Total";
    pub const TOTAL_PP: &str = "PROY TOTAL PP";
    pub const TOTAL_SS: &str = "PROY TOTAL SS";

    pub const REQUIRED: [&str; 12] = [
        ID,
        NAME,
        DEPARTMENT,
        CHANNEL,
        CLUSTER,
        RANK,
        WINNER,
        PROGRESS_PP,
        PROGRESS_SS,
        PROGRESS_EQUIVALENT,
        TOTAL_PP,
        TOTAL_SS,
    ];
}

// ---------------------------------------------------------------------------
// Cell – a single raw value as read from the source file
// ---------------------------------------------------------------------------

/// A dynamically-typed cell, before coercion into a [`Record`] field.
#[derive(Debug, Clone, PartialEq)]
pub enum Cell {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Empty,
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Cell::Text(s) => write!(f, "{s}"),
            Cell::Integer(i) => write!(f, "{i}"),
            // Spreadsheets store integral codes as floats; print them without `.0`.
            Cell::Float(v) if v.is_finite() && v.fract() == 0.0 && v.abs() < 1e15 => {
                write!(f, "{v:.0}")
            }
            Cell::Float(v) => write!(f, "{v}"),
            Cell::Bool(b) => write!(f, "{b}"),
            Cell::Empty => Ok(()),
        }
    }
}

impl Cell {
    /// Text form of the cell. Empty cells become the empty string.
    pub fn as_text(&self) -> String {
        self.to_string()
    }

    /// Numeric coercion: numbers pass through, text is parsed, anything else
    /// (including NaN and infinities) is absent.
    pub fn as_f64(&self) -> Option<f64> {
        let value = match self {
            Cell::Integer(i) => *i as f64,
            Cell::Float(v) => *v,
            Cell::Text(s) => s.trim().parse::<f64>().ok()?,
            Cell::Bool(_) | Cell::Empty => return None,
        };
        value.is_finite().then_some(value)
    }

    /// Boolean-like 0/1 flag. Only `1` (or boolean true) counts as set.
    pub fn as_flag(&self) -> bool {
        match self {
            Cell::Bool(b) => *b,
            Cell::Text(s) if s.trim().eq_ignore_ascii_case("true") => true,
            other => other.as_f64() == Some(1.0),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Cell::Empty => true,
            Cell::Text(s) => s.trim().is_empty(),
            _ => false,
        }
    }
}

// ---------------------------------------------------------------------------
// Record – one row of the dataset
// ---------------------------------------------------------------------------

/// One participant row with typed fields.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Record {
    /// Opaque identifier; kept as text so leading zeros survive.
    pub id: String,
    pub name: String,
    pub department: String,
    pub channel: String,
    pub cluster: String,
    /// Ordinal position, 1 = best. `None` when the source was not numeric.
    pub rank: Option<f64>,
    pub is_winner: bool,
    pub progress_pp: Option<f64>,
    pub progress_ss: Option<f64>,
    pub progress_equivalent: Option<f64>,
    pub total_pp: Option<f64>,
    pub total_ss: Option<f64>,
}

/// Ascending rank order with absent ranks after every numeric rank.
pub fn cmp_rank(a: Option<f64>, b: Option<f64>) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => a.total_cmp(&b),
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered, immutable sequence of records.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Dataset {
    records: Vec<Record>,
}

impl Dataset {
    pub fn from_records(records: Vec<Record>) -> Self {
        Dataset { records }
    }

    pub fn records(&self) -> &[Record] {
        &self.records
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Record> {
        self.records.iter()
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    /// Reorder by rank (stable, absent ranks last).
    pub fn sorted_by_rank(mut self) -> Self {
        self.records.sort_by(|a, b| cmp_rank(a.rank, b.rank));
        self
    }
}

impl FromIterator<Record> for Dataset {
    fn from_iter<I: IntoIterator<Item = Record>>(iter: I) -> Self {
        Dataset::from_records(iter.into_iter().collect())
    }
}

impl<'a> IntoIterator for &'a Dataset {
    type Item = &'a Record;
    type IntoIter = std::slice::Iter<'a, Record>;

    fn into_iter(self) -> Self::IntoIter {
        self.records.iter()
    }
}
