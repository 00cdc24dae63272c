use std::collections::BTreeMap;

use super::model::Dataset;

// ---------------------------------------------------------------------------
// Range predicate: the selected [lo, hi] per numeric column
// ---------------------------------------------------------------------------

/// Selected range of one numeric column, bounded by the column's actual
/// `(min, max)` at load time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColumnRange {
    pub min: f64,
    pub max: f64,
    pub lo: f64,
    pub hi: f64,
}

impl ColumnRange {
    /// Full range over `[min, max]`.
    pub fn full(min: f64, max: f64) -> Self {
        ColumnRange {
            min,
            max,
            lo: min,
            hi: max,
        }
    }

    /// Select `[lo, hi]`, clamped into `[min, max]` and reordered if needed.
    pub fn select(&mut self, lo: f64, hi: f64) {
        let (lo, hi) = if lo <= hi { (lo, hi) } else { (hi, lo) };
        self.lo = lo.clamp(self.min, self.max);
        self.hi = hi.clamp(self.min, self.max);
    }

    pub fn contains(&self, v: f64) -> bool {
        self.lo <= v && v <= self.hi
    }

    /// The column holds a single distinct value, so there is nothing to slide.
    pub fn is_fixed(&self) -> bool {
        self.min == self.max
    }

    /// An infinite bound needs a logarithmic slider to stay draggable.
    pub fn is_unbounded(&self) -> bool {
        !(self.min.is_finite() && self.max.is_finite())
    }
}

/// Per-column range selections: column_name → range.
/// Numeric columns without any values have no entry and are not filtered.
pub type RangeState = BTreeMap<String, ColumnRange>;

/// Initialise a [`RangeState`] with every numeric column at its full range.
pub fn init_ranges(dataset: &Dataset) -> RangeState {
    dataset
        .numeric_columns()
        .filter_map(|col| {
            col.min_max()
                .map(|(min, max)| (col.name.clone(), ColumnRange::full(min, max)))
        })
        .collect()
}

/// Return positions of rows that pass every range.
///
/// Columns are applied one after the other over the narrowing row set. A row
/// fails a column when its value is outside `[lo, hi]` or missing.
pub fn filtered_indices(dataset: &Dataset, ranges: &RangeState) -> Vec<usize> {
    let mut rows: Vec<usize> = (0..dataset.len()).collect();
    for col in dataset.numeric_columns() {
        let Some(range) = ranges.get(&col.name) else {
            continue;
        };
        let before = rows.len();
        let mut missing = 0usize;
        rows.retain(|&r| match col.values[r].as_f64() {
            Some(v) => range.contains(v),
            None => {
                missing += 1;
                false
            }
        });
        if missing > 0 {
            log::debug!(
                "{missing} row(s) dropped for missing '{}' values ({before} -> {})",
                col.name,
                rows.len()
            );
        }
    }
    rows
}

/// The filtered dataset: same columns and dtypes, surviving rows only.
pub fn apply_filters(dataset: &Dataset, ranges: &RangeState) -> Dataset {
    dataset.take(&filtered_indices(dataset, ranges))
}
