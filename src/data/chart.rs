use super::model::{Column, ColumnKind, Dataset};
use super::stats::{numeric_summary, value_counts};

/// Points on which the density curve is evaluated.
pub const KDE_GRID_POINTS: usize = 200;

/// Upper bound on histogram bins; wider outliers fall back to Sturges.
pub const MAX_BINS: usize = 1000;

// ---------------------------------------------------------------------------
// Single-column visualization
// ---------------------------------------------------------------------------

/// Row-ordered values of a numeric column, x = index label.
#[derive(Debug, Clone, PartialEq)]
pub struct LineData {
    pub column: String,
    pub points: Vec<[f64; 2]>,
}

/// Occurrences per category, in order of first appearance.
#[derive(Debug, Clone, PartialEq)]
pub struct CountData {
    pub column: String,
    pub categories: Vec<(String, usize)>,
}

#[derive(Debug, Clone, PartialEq)]
pub enum ChartData {
    Line(LineData),
    Count(CountData),
}

/// Chart for one column: a line chart for numeric columns, a count plot for
/// categorical ones, nothing for anything else (or an unknown column).
pub fn single_column_chart(dataset: &Dataset, column: &str) -> Option<ChartData> {
    let col = dataset.column(column)?;
    match col.kind() {
        ColumnKind::Numeric => Some(ChartData::Line(line_data(dataset, col))),
        ColumnKind::Categorical => Some(ChartData::Count(count_data(col))),
        ColumnKind::Other => {
            log::debug!("no chart for '{}' ({})", col.name, col.dtype.label());
            None
        }
    }
}

fn line_data(dataset: &Dataset, col: &Column) -> LineData {
    let points = dataset
        .index
        .iter()
        .zip(&col.values)
        .filter_map(|(&label, v)| v.as_f64().map(|y| [label as f64, y]))
        .collect();
    LineData {
        column: col.name.clone(),
        points,
    }
}

fn count_data(col: &Column) -> CountData {
    CountData {
        column: col.name.clone(),
        categories: value_counts(col)
            .into_iter()
            .map(|(v, n)| (v.to_string(), n))
            .collect(),
    }
}

// ---------------------------------------------------------------------------
// Histogram with density curve
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bin {
    pub left: f64,
    pub right: f64,
    pub count: usize,
}

impl Bin {
    pub fn center(&self) -> f64 {
        (self.left + self.right) / 2.0
    }

    pub fn width(&self) -> f64 {
        self.right - self.left
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct HistogramData {
    pub column: String,
    pub bins: Vec<Bin>,
    /// Gaussian KDE scaled to counts; empty when it cannot be estimated.
    pub kde: Vec<[f64; 2]>,
}

impl HistogramData {
    pub fn title(&self) -> String {
        format!("Distribution of {}", self.column)
    }
}

/// Histograms for the chosen columns. Non-numeric columns are skipped.
pub fn histograms(dataset: &Dataset, columns: &[String]) -> Vec<HistogramData> {
    columns
        .iter()
        .filter_map(|name| dataset.column(name))
        .filter_map(histogram)
        .collect()
}

/// Histogram of a numeric column; `None` for any other column.
pub fn histogram(col: &Column) -> Option<HistogramData> {
    if col.kind() != ColumnKind::Numeric {
        log::debug!("skipping histogram for non-numeric column '{}'", col.name);
        return None;
    }
    let values = finite_values(col);
    let bins = bin_values(&values);
    let kde = match bins.first() {
        Some(first) => kde_curve(&values, first.width()),
        None => Vec::new(),
    };
    Some(HistogramData {
        column: col.name.clone(),
        bins,
        kde,
    })
}

/// Non-missing values of a column that are neither infinite nor NaN.
fn finite_values(col: &Column) -> Vec<f64> {
    let values = col.numeric_values();
    let total = values.len();
    let finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if finite.len() < total {
        log::debug!(
            "{} non-finite value(s) left out of the '{}' histogram",
            total - finite.len(),
            col.name
        );
    }
    finite
}

/// Bin edges picked with the "auto" rule: the narrower of the Sturges and
/// Freedman-Diaconis widths (Sturges alone when the IQR is zero, or when the
/// Freedman-Diaconis width would need more than [`MAX_BINS`] bins).
///
/// `values` must be finite.
pub fn auto_bin_edges(values: &[f64]) -> Vec<f64> {
    if values.is_empty() {
        return Vec::new();
    }
    let s = numeric_summary(values);
    let (min, max) = (s.min, s.max);
    if min == max {
        return vec![min - 0.5, max + 0.5];
    }
    let range = max - min;
    if !range.is_finite() {
        return vec![min, max];
    }

    let n = values.len() as f64;
    let sturges_bins = (n.log2() + 1.0).ceil();
    let fd = 2.0 * (s.q75 - s.q25) * n.powf(-1.0 / 3.0);
    let fd_bins = if fd > 0.0 { (range / fd).ceil() } else { 0.0 };
    let bins = if fd_bins > sturges_bins && fd_bins <= MAX_BINS as f64 {
        fd_bins
    } else {
        sturges_bins
    };
    let n_bins = (bins as usize).clamp(1, MAX_BINS);

    (0..=n_bins)
        .map(|i| min + range * (i as f64 / n_bins as f64))
        .collect()
}

/// Count values per bin. The last bin is closed on the right.
pub fn bin_values(values: &[f64]) -> Vec<Bin> {
    let edges = auto_bin_edges(values);
    if edges.len() < 2 {
        return Vec::new();
    }
    let n_bins = edges.len() - 1;
    let (lo, hi) = (edges[0], edges[n_bins]);
    let mut counts = vec![0usize; n_bins];
    for &v in values {
        let idx = (((v - lo) / (hi - lo)) * n_bins as f64) as usize;
        counts[idx.min(n_bins - 1)] += 1;
    }
    edges
        .windows(2)
        .zip(counts)
        .map(|(w, count)| Bin {
            left: w[0],
            right: w[1],
            count,
        })
        .collect()
}

/// Gaussian KDE with Scott's bandwidth over `[min, max]`, scaled so that it
/// overlays a count histogram with the given bin width.
pub fn kde_curve(values: &[f64], bin_width: f64) -> Vec<[f64; 2]> {
    let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
    if values.len() < 2 {
        return Vec::new();
    }
    let s = numeric_summary(&values);
    if !s.std.is_finite() || s.std <= 0.0 || !bin_width.is_finite() {
        return Vec::new();
    }
    let n = s.count as f64;
    let bandwidth = s.std * n.powf(-0.2);
    let norm = 1.0 / (n * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
    let scale = n * bin_width;

    let step = (s.max - s.min) / (KDE_GRID_POINTS - 1) as f64;
    (0..KDE_GRID_POINTS)
        .map(|i| {
            let x = s.min + step * i as f64;
            let density: f64 = values
                .iter()
                .map(|&xi| gaussian(x, xi, bandwidth))
                .sum::<f64>()
                * norm;
            [x, density * scale]
        })
        .collect()
}

fn gaussian(x: f64, mu: f64, sigma: f64) -> f64 {
    (-(x - mu).powi(2) / (2.0 * sigma.powi(2))).exp()
}
