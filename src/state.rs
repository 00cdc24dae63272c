use std::path::Path;

use anyhow::{Context, Result};

use crate::data::chart::{histograms, single_column_chart, ChartData, HistogramData};
use crate::data::export::write_csv;
use crate::data::filter::{apply_filters, init_ranges, RangeState};
use crate::data::loader::load_file;
use crate::data::model::Dataset;
use crate::data::stats::{describe, info, preview, Describe, DatasetInfo, PREVIEW_ROWS};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// Message shown in the top bar.
#[derive(Debug, Clone, PartialEq)]
pub enum Status {
    Success(String),
    Error(String),
}

/// Summaries of the dataset as loaded, before any filtering.
#[derive(Debug, Clone)]
pub struct Overview {
    pub source: String,
    pub preview: Dataset,
    pub info: DatasetInfo,
    pub describe: Describe,
}

/// The full UI state, independent of rendering.
///
/// Every input (new file, slider, column selector) goes through a method
/// that ends in [`AppState::refresh`], which rebuilds all derived state from
/// the raw dataset and the current selections.
#[derive(Default)]
pub struct AppState {
    /// Loaded dataset (None until user loads a file).
    pub dataset: Option<Dataset>,

    /// Preview, information and statistics of the loaded dataset.
    pub overview: Option<Overview>,

    /// Per-column range selections.
    pub ranges: RangeState,

    /// Rows of the dataset passing the current ranges (derived).
    pub filtered: Dataset,

    /// Column chosen for the single-column chart.
    pub single_column: Option<String>,

    /// Columns chosen for histograms, in selection order.
    pub multi_columns: Vec<String>,

    /// Chart of `single_column` over the filtered rows (derived).
    pub chart: Option<ChartData>,

    /// Histograms of the numeric `multi_columns` (derived).
    pub histograms: Vec<HistogramData>,

    /// Status / error message shown in the UI.
    pub status: Option<Status>,
}

impl AppState {
    /// Ingest a newly loaded dataset, replacing everything derived from the
    /// previous one.
    pub fn set_dataset(&mut self, dataset: Dataset, source: impl Into<String>) {
        self.ranges = init_ranges(&dataset);
        self.single_column = dataset.columns.first().map(|c| c.name.clone());
        self.multi_columns.clear();
        self.overview = Some(Overview {
            source: source.into(),
            preview: preview(&dataset, PREVIEW_ROWS),
            info: info(&dataset),
            describe: describe(&dataset),
        });
        self.dataset = Some(dataset);
        self.status = Some(Status::Success("File uploaded successfully!".into()));
        self.refresh();
    }

    /// Drop the dataset and everything derived from it, keeping the error.
    pub fn clear_with_error(&mut self, message: impl Into<String>) {
        *self = AppState {
            status: Some(Status::Error(message.into())),
            ..AppState::default()
        };
    }

    /// Load a file from disk into the state.
    pub fn open_path(&mut self, path: &Path) -> Result<()> {
        let dataset = load_file(path).with_context(|| format!("loading {}", path.display()))?;
        log::info!(
            "Loaded {} rows with columns {:?}",
            dataset.len(),
            dataset.column_names()
        );
        let source = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        self.set_dataset(dataset, source);
        Ok(())
    }

    /// Recompute the filtered dataset and the charts from scratch.
    pub fn refresh(&mut self) {
        let Some(dataset) = &self.dataset else {
            return;
        };
        self.filtered = apply_filters(dataset, &self.ranges);
        self.chart = self
            .single_column
            .as_deref()
            .and_then(|col| single_column_chart(&self.filtered, col));
        self.histograms = histograms(&self.filtered, &self.multi_columns);
    }

    /// Select `[lo, hi]` for a numeric column (clamped to its data range).
    pub fn set_range(&mut self, column: &str, lo: f64, hi: f64) {
        if let Some(range) = self.ranges.get_mut(column) {
            range.select(lo, hi);
            self.refresh();
        }
    }

    /// Choose the column for the single-column chart.
    pub fn select_column(&mut self, column: Option<String>) {
        self.single_column = column;
        self.refresh();
    }

    /// Add or remove a column from the histogram selection.
    pub fn toggle_histogram_column(&mut self, column: &str) {
        if let Some(pos) = self.multi_columns.iter().position(|c| c == column) {
            self.multi_columns.remove(pos);
        } else {
            self.multi_columns.push(column.to_string());
        }
        self.refresh();
    }

    /// Write the filtered dataset to `path`.
    pub fn export_to(&self, path: &Path) -> Result<()> {
        write_csv(path, &self.filtered)
            .with_context(|| format!("writing {}", path.display()))?;
        log::info!(
            "Exported {} rows to {}",
            self.filtered.len(),
            path.display()
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::loader::load_csv_bytes;

    fn loaded(csv: &str) -> AppState {
        let mut state = AppState::default();
        state.set_dataset(load_csv_bytes(csv.as_bytes()).unwrap(), "test.csv");
        state
    }

    #[test]
    fn new_dataset_resets_selections() {
        let mut state = loaded("age,city\n10,Oslo\n20,Lima\n");
        state.toggle_histogram_column("age");
        state.set_range("age", 15.0, 20.0);
        assert_eq!(state.filtered.len(), 1);

        state.set_dataset(load_csv_bytes(b"x\n1\n").unwrap(), "other.csv");
        assert_eq!(state.single_column.as_deref(), Some("x"));
        assert!(state.multi_columns.is_empty());
        assert_eq!(state.filtered.len(), 1);
        assert_eq!(state.status, Some(Status::Success("File uploaded successfully!".into())));
    }

    #[test]
    fn range_change_rebuilds_charts() {
        let mut state = loaded("age,city\n10,Oslo\n20,Lima\n30,Pune\n");
        state.toggle_histogram_column("age");
        state.toggle_histogram_column("city");
        assert_eq!(state.histograms.len(), 1);

        state.set_range("age", 20.0, 30.0);
        match &state.chart {
            Some(ChartData::Line(line)) => assert_eq!(line.points, vec![[1.0, 20.0], [2.0, 30.0]]),
            other => panic!("expected line chart, got {other:?}"),
        }
        let counted: usize = state.histograms[0].bins.iter().map(|b| b.count).sum();
        assert_eq!(counted, 2);
    }

    #[test]
    fn toggling_twice_deselects() {
        let mut state = loaded("a,b\n1,2\n");
        state.toggle_histogram_column("b");
        state.toggle_histogram_column("a");
        state.toggle_histogram_column("b");
        assert_eq!(state.multi_columns, vec!["a".to_string()]);
    }

    #[test]
    fn error_clears_dataset() {
        let mut state = loaded("a\n1\n");
        state.clear_with_error("Error: bad file");
        assert!(state.dataset.is_none());
        assert!(state.overview.is_none());
        assert!(state.filtered.is_empty());
        assert!(matches!(state.status, Some(Status::Error(_))));
    }
}
