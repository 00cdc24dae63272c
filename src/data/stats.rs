use std::collections::HashMap;

use super::model::{Column, ColumnKind, DType, Dataset, Value};

/// Rows shown in the dataset preview.
pub const PREVIEW_ROWS: usize = 5;

/// The first `n` rows of the dataset.
pub fn preview(dataset: &Dataset, n: usize) -> Dataset {
    dataset.head(n)
}

// ---------------------------------------------------------------------------
// Dataset information
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct ColumnInfo {
    pub position: usize,
    pub name: String,
    pub non_null: usize,
    pub dtype: DType,
}

/// Structure of a dataset: size, index range and per-column dtypes.
#[derive(Debug, Clone, PartialEq)]
pub struct DatasetInfo {
    pub rows: usize,
    /// First and last index label, `None` for an empty dataset.
    pub index_range: Option<(usize, usize)>,
    pub columns: Vec<ColumnInfo>,
}

impl DatasetInfo {
    /// `dtype(count)` pairs in order of first appearance, e.g. `int64(2), object(1)`.
    pub fn dtype_summary(&self) -> String {
        let mut counts: Vec<(DType, usize)> = Vec::new();
        for c in &self.columns {
            match counts.iter_mut().find(|(d, _)| *d == c.dtype) {
                Some((_, n)) => *n += 1,
                None => counts.push((c.dtype, 1)),
            }
        }
        counts
            .iter()
            .map(|(d, n)| format!("{}({n})", d.label()))
            .collect::<Vec<_>>()
            .join(", ")
    }
}

pub fn info(dataset: &Dataset) -> DatasetInfo {
    DatasetInfo {
        rows: dataset.len(),
        index_range: dataset
            .index
            .first()
            .zip(dataset.index.last())
            .map(|(a, b)| (*a, *b)),
        columns: dataset
            .columns
            .iter()
            .enumerate()
            .map(|(position, c)| ColumnInfo {
                position,
                name: c.name.clone(),
                non_null: c.non_null_count(),
                dtype: c.dtype,
            })
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Value counts
// ---------------------------------------------------------------------------

/// Occurrences of each distinct non-missing value, in order of first appearance.
pub fn value_counts(column: &Column) -> Vec<(Value, usize)> {
    let mut slots: HashMap<&Value, usize> = HashMap::new();
    let mut counts: Vec<(Value, usize)> = Vec::new();
    for v in column.values.iter().filter(|v| !v.is_null()) {
        match slots.get(v) {
            Some(&slot) => counts[slot].1 += 1,
            None => {
                slots.insert(v, counts.len());
                counts.push((v.clone(), 1));
            }
        }
    }
    counts
}

// ---------------------------------------------------------------------------
// Describe
// ---------------------------------------------------------------------------

/// Row labels of the summary statistics table.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Stat {
    Count,
    Unique,
    Top,
    Freq,
    Mean,
    Std,
    Min,
    Q25,
    Q50,
    Q75,
    Max,
}

impl Stat {
    pub fn label(self) -> &'static str {
        match self {
            Stat::Count => "count",
            Stat::Unique => "unique",
            Stat::Top => "top",
            Stat::Freq => "freq",
            Stat::Mean => "mean",
            Stat::Std => "std",
            Stat::Min => "min",
            Stat::Q25 => "25%",
            Stat::Q50 => "50%",
            Stat::Q75 => "75%",
            Stat::Max => "max",
        }
    }
}

const FREQUENCY_STATS: [Stat; 3] = [Stat::Unique, Stat::Top, Stat::Freq];
const NUMERIC_STATS: [Stat; 7] = [
    Stat::Mean,
    Stat::Std,
    Stat::Min,
    Stat::Q25,
    Stat::Q50,
    Stat::Q75,
    Stat::Max,
];

#[derive(Debug, Clone, PartialEq)]
pub struct NumericSummary {
    pub count: usize,
    pub mean: f64,
    /// Sample standard deviation (ddof = 1).
    pub std: f64,
    pub min: f64,
    pub q25: f64,
    pub q50: f64,
    pub q75: f64,
    pub max: f64,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FrequencySummary {
    pub count: usize,
    pub unique: usize,
    /// Most frequent value; ties go to the value seen first.
    pub top: Option<Value>,
    pub freq: usize,
}

#[derive(Debug, Clone, PartialEq)]
pub enum Summary {
    Numeric(NumericSummary),
    Frequency(FrequencySummary),
}

impl Summary {
    pub fn of(column: &Column) -> Self {
        match column.kind() {
            ColumnKind::Numeric => Summary::Numeric(numeric_summary(&column.numeric_values())),
            ColumnKind::Categorical | ColumnKind::Other => {
                Summary::Frequency(frequency_summary(column))
            }
        }
    }

    /// Display text of one statistic; `NaN` where it does not apply.
    pub fn cell(&self, stat: Stat) -> String {
        match (self, stat) {
            (Summary::Numeric(s), Stat::Count) => s.count.to_string(),
            (Summary::Numeric(s), Stat::Mean) => format_stat(s.mean),
            (Summary::Numeric(s), Stat::Std) => format_stat(s.std),
            (Summary::Numeric(s), Stat::Min) => format_stat(s.min),
            (Summary::Numeric(s), Stat::Q25) => format_stat(s.q25),
            (Summary::Numeric(s), Stat::Q50) => format_stat(s.q50),
            (Summary::Numeric(s), Stat::Q75) => format_stat(s.q75),
            (Summary::Numeric(s), Stat::Max) => format_stat(s.max),
            (Summary::Frequency(s), Stat::Count) => s.count.to_string(),
            (Summary::Frequency(s), Stat::Unique) => s.unique.to_string(),
            (Summary::Frequency(s), Stat::Top) => s
                .top
                .as_ref()
                .map_or_else(|| "NaN".to_string(), Value::to_string),
            (Summary::Frequency(s), Stat::Freq) if s.top.is_some() => s.freq.to_string(),
            _ => "NaN".to_string(),
        }
    }
}

fn format_stat(v: f64) -> String {
    if v.is_nan() {
        "NaN".to_string()
    } else {
        format!("{v:.6}")
    }
}

/// Summary statistics of every column.
#[derive(Debug, Clone, PartialEq)]
pub struct Describe {
    pub stats: Vec<Stat>,
    pub columns: Vec<(String, Summary)>,
}

/// Describe every column: numeric columns get moments and quartiles, all
/// others get frequency information. Statistic rows that apply to no column
/// are left out.
pub fn describe(dataset: &Dataset) -> Describe {
    let columns: Vec<(String, Summary)> = dataset
        .columns
        .iter()
        .map(|c| (c.name.clone(), Summary::of(c)))
        .collect();

    let any_numeric = columns
        .iter()
        .any(|(_, s)| matches!(s, Summary::Numeric(_)));
    let any_frequency = columns
        .iter()
        .any(|(_, s)| matches!(s, Summary::Frequency(_)));

    let mut stats = vec![Stat::Count];
    if any_frequency {
        stats.extend(FREQUENCY_STATS);
    }
    if any_numeric {
        stats.extend(NUMERIC_STATS);
    }
    Describe { stats, columns }
}

pub fn numeric_summary(values: &[f64]) -> NumericSummary {
    let count = values.len();
    if count == 0 {
        return NumericSummary {
            count,
            mean: f64::NAN,
            std: f64::NAN,
            min: f64::NAN,
            q25: f64::NAN,
            q50: f64::NAN,
            q75: f64::NAN,
            max: f64::NAN,
        };
    }

    let mean = values.iter().sum::<f64>() / count as f64;
    let std = if count > 1 {
        let ss: f64 = values.iter().map(|v| (v - mean).powi(2)).sum();
        (ss / (count - 1) as f64).sqrt()
    } else {
        f64::NAN
    };

    let mut sorted = values.to_vec();
    sorted.sort_by(f64::total_cmp);

    NumericSummary {
        count,
        mean,
        std,
        min: sorted[0],
        q25: quantile(&sorted, 0.25),
        q50: quantile(&sorted, 0.50),
        q75: quantile(&sorted, 0.75),
        max: sorted[count - 1],
    }
}

/// Linearly interpolated quantile of sorted, non-empty values.
pub fn quantile(sorted: &[f64], p: f64) -> f64 {
    let pos = p * (sorted.len() - 1) as f64;
    let lo = pos.floor() as usize;
    let hi = pos.ceil() as usize;
    let frac = pos - lo as f64;
    sorted[lo] + (sorted[hi] - sorted[lo]) * frac
}

fn frequency_summary(column: &Column) -> FrequencySummary {
    let counts = value_counts(column);
    // First maximum wins, so ties resolve to the earliest value.
    let top = counts
        .iter()
        .fold(None::<&(Value, usize)>, |best, entry| match best {
            Some(b) if b.1 >= entry.1 => Some(b),
            _ => Some(entry),
        });
    FrequencySummary {
        count: column.non_null_count(),
        unique: counts.len(),
        top: top.map(|(v, _)| v.clone()),
        freq: top.map_or(0, |(_, n)| *n),
    }
}
