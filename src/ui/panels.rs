use eframe::egui::{self, Color32, RichText, ScrollArea, Slider, Ui};

use crate::data::export::EXPORT_FILE_NAME;
use crate::state::{AppState, Status};

// ---------------------------------------------------------------------------
// Left side panel – numeric range filters
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filter Options");
    ui.separator();

    let dataset = match &state.dataset {
        Some(ds) => ds,
        None => {
            ui.label("No dataset loaded.");
            return;
        }
    };

    // Ranged numeric columns in table order; nothing to show without any.
    let columns: Vec<String> = dataset
        .numeric_columns()
        .filter(|c| state.ranges.contains_key(&c.name))
        .map(|c| c.name.clone())
        .collect();
    if columns.is_empty() {
        return;
    }

    ui.strong("Filter by Numeric Columns");
    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for col in &columns {
                let Some(range) = state.ranges.get(col).copied() else {
                    continue;
                };
                ui.label(RichText::new(format!("{col} Range")).strong());
                if range.is_fixed() {
                    ui.label(format!("single value: {}", range.min));
                    ui.add_space(6.0);
                    continue;
                }

                let log_scale = range.is_unbounded();
                let (mut lo, mut hi) = (range.lo, range.hi);
                let mut changed = ui
                    .add(
                        Slider::new(&mut lo, range.min..=range.max)
                            .logarithmic(log_scale)
                            .text("min"),
                    )
                    .changed();
                changed |= ui
                    .add(
                        Slider::new(&mut hi, range.min..=range.max)
                            .logarithmic(log_scale)
                            .text("max"),
                    )
                    .changed();

                if changed {
                    // The handle being dragged pushes the other one along.
                    if lo > hi {
                        if lo != range.lo {
                            hi = lo;
                        } else {
                            lo = hi;
                        }
                    }
                    state.set_range(col, lo, hi);
                }
                ui.add_space(6.0);
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open…").clicked() {
                open_file_dialog(state);
                ui.close_menu();
            }
            let loaded = state.dataset.is_some();
            if ui
                .add_enabled(loaded, egui::Button::new("Download filtered CSV…"))
                .clicked()
            {
                save_file_dialog(state);
                ui.close_menu();
            }
        });

        ui.separator();

        if let Some(ds) = &state.dataset {
            ui.label(format!(
                "{} rows loaded, {} after filters",
                ds.len(),
                state.filtered.len()
            ));
            ui.separator();
        }

        match &state.status {
            Some(Status::Success(msg)) => {
                ui.label(RichText::new(msg).color(Color32::GREEN));
            }
            Some(Status::Error(msg)) => {
                ui.label(RichText::new(msg).color(Color32::RED));
            }
            None => {}
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

pub fn open_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Upload your CSV file")
        .add_filter("CSV", &["csv"])
        .add_filter("Supported files", &["csv", "txt", "json", "parquet", "pq"])
        .pick_file();

    if let Some(path) = file {
        if let Err(e) = state.open_path(&path) {
            log::error!("Failed to load file: {e:#}");
            state.clear_with_error(format!("Error: {e:#}"));
        }
    }
}

pub fn save_file_dialog(state: &mut AppState) {
    let file = rfd::FileDialog::new()
        .set_title("Download Filtered CSV")
        .set_file_name(EXPORT_FILE_NAME)
        .add_filter("CSV", &["csv"])
        .save_file();

    if let Some(path) = file {
        if let Err(e) = state.export_to(&path) {
            log::error!("Failed to export: {e:#}");
            state.status = Some(Status::Error(format!("Error: {e:#}")));
        }
    }
}
