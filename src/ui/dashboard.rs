use eframe::egui::{self, CollapsingHeader, ScrollArea, Ui};

use crate::state::AppState;
use crate::ui::{panels, plot, tables};

// ---------------------------------------------------------------------------
// Central panel
// ---------------------------------------------------------------------------

/// Render the dashboard body: overview, statistics, charts and download.
pub fn central_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Interactive Data Dashboard");

    if state.overview.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.label("Please upload a CSV file to start!  (File → Open…)");
        });
        return;
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            overview_sections(ui, state);
            ui.separator();
            column_selectors(ui, state);
            ui.separator();
            charts(ui, state);
            ui.separator();
            download(ui, state);
        });
}

fn overview_sections(ui: &mut Ui, state: &AppState) {
    let Some(overview) = &state.overview else {
        return;
    };

    CollapsingHeader::new("Dataset Overview")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            ui.strong(format!("Dataset Preview ({})", overview.source));
            tables::preview_table(ui, &overview.preview);
            ui.add_space(8.0);
            ui.strong("Dataset Information");
            tables::info_table(ui, &overview.info);
        });

    CollapsingHeader::new("Summary Statistics")
        .default_open(false)
        .show(ui, |ui: &mut Ui| {
            tables::describe_table(ui, &overview.describe);
        });
}

fn column_selectors(ui: &mut Ui, state: &mut AppState) {
    let Some(dataset) = &state.dataset else {
        return;
    };
    let columns = dataset.column_names();

    ui.heading("Select Columns for Visualization");

    let mut selected = state.single_column.clone();
    egui::ComboBox::from_label("Single Column Visualization")
        .selected_text(selected.clone().unwrap_or_default())
        .show_ui(ui, |ui: &mut Ui| {
            for name in &columns {
                ui.selectable_value(&mut selected, Some(name.clone()), name.as_str());
            }
        });
    if selected != state.single_column {
        state.select_column(selected);
    }

    ui.label("Select Multiple Columns for Analysis");
    ui.horizontal_wrapped(|ui: &mut Ui| {
        for name in &columns {
            let mut checked = state.multi_columns.contains(name);
            if ui.checkbox(&mut checked, name.as_str()).changed() {
                state.toggle_histogram_column(name);
            }
        }
    });
}

fn charts(ui: &mut Ui, state: &AppState) {
    if let Some(col) = &state.single_column {
        ui.heading(format!("Visualization for {col}"));
        if let Some(chart) = &state.chart {
            plot::column_chart(ui, chart);
        }
    }

    if !state.multi_columns.is_empty() {
        ui.heading("Histogram for Selected Columns");
        for hist in &state.histograms {
            plot::histogram_chart(ui, hist);
            ui.add_space(8.0);
        }
    }
}

fn download(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Download Filtered Dataset");
    if ui.button("Download Filtered CSV").clicked() {
        panels::save_file_dialog(state);
    }
}
