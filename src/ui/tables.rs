use eframe::egui::{Grid, ScrollArea, Ui};

use crate::data::model::Dataset;
use crate::data::stats::{DatasetInfo, Describe};

/// Rows of a dataset with its index labels in the first column.
pub fn preview_table(ui: &mut Ui, dataset: &Dataset) {
    ScrollArea::horizontal()
        .id_salt("preview_scroll")
        .show(ui, |ui: &mut Ui| {
            Grid::new("preview_table")
                .striped(true)
                .num_columns(dataset.n_columns() + 1)
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for col in &dataset.columns {
                        ui.strong(col.name.as_str());
                    }
                    ui.end_row();

                    for row in 0..dataset.len() {
                        ui.label(dataset.index[row].to_string());
                        for value in dataset.row(row) {
                            ui.label(value.to_string());
                        }
                        ui.end_row();
                    }
                });
        });
}

/// Size, index range and per-column dtypes.
pub fn info_table(ui: &mut Ui, info: &DatasetInfo) {
    match info.index_range {
        Some((first, last)) => {
            ui.monospace(format!("RangeIndex: {} entries, {first} to {last}", info.rows))
        }
        None => ui.monospace("RangeIndex: 0 entries"),
    };
    ui.monospace(format!(
        "Data columns (total {} columns):",
        info.columns.len()
    ));

    Grid::new("info_table")
        .striped(true)
        .num_columns(4)
        .show(ui, |ui: &mut Ui| {
            for header in ["#", "Column", "Non-Null Count", "Dtype"] {
                ui.strong(header);
            }
            ui.end_row();

            for col in &info.columns {
                ui.monospace(col.position.to_string());
                ui.monospace(col.name.as_str());
                ui.monospace(format!("{} non-null", col.non_null));
                ui.monospace(col.dtype.label());
                ui.end_row();
            }
        });
    ui.monospace(format!("dtypes: {}", info.dtype_summary()));
}

/// Summary statistics, one row per statistic and one column per data column.
pub fn describe_table(ui: &mut Ui, describe: &Describe) {
    ScrollArea::horizontal()
        .id_salt("describe_scroll")
        .show(ui, |ui: &mut Ui| {
            Grid::new("describe_table")
                .striped(true)
                .num_columns(describe.columns.len() + 1)
                .show(ui, |ui: &mut Ui| {
                    ui.label("");
                    for (name, _) in &describe.columns {
                        ui.strong(name.as_str());
                    }
                    ui.end_row();

                    for &stat in &describe.stats {
                        ui.strong(stat.label());
                        for (_, summary) in &describe.columns {
                            ui.monospace(summary.cell(stat));
                        }
                        ui.end_row();
                    }
                });
        });
}
