use std::ops::RangeInclusive;

use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, GridMark, Line, Plot, PlotPoints};

use crate::color::{generate_palette, HISTOGRAM_FILL, KDE_STROKE, LINE_STROKE};
use crate::data::chart::{ChartData, CountData, HistogramData, LineData};

const CHART_HEIGHT: f32 = 260.0;

// ---------------------------------------------------------------------------
// Single-column chart
// ---------------------------------------------------------------------------

pub fn column_chart(ui: &mut Ui, chart: &ChartData) {
    match chart {
        ChartData::Line(data) => line_chart(ui, data),
        ChartData::Count(data) => count_chart(ui, data),
    }
}

/// Values against their index labels.
fn line_chart(ui: &mut Ui, data: &LineData) {
    let points: PlotPoints = data.points.iter().copied().collect();

    Plot::new(("line_chart", data.column.as_str()))
        .height(CHART_HEIGHT)
        .x_axis_label("index")
        .y_axis_label(data.column.clone())
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            let line = Line::new(points)
                .name(&data.column)
                .color(LINE_STROKE)
                .width(1.5);
            plot_ui.line(line);
        });
}

/// One bar per category, labelled on the x axis.
fn count_chart(ui: &mut Ui, data: &CountData) {
    let palette = generate_palette(data.categories.len());
    let bars: Vec<Bar> = data
        .categories
        .iter()
        .zip(palette)
        .enumerate()
        .map(|(i, ((label, count), color))| {
            Bar::new(i as f64, *count as f64)
                .width(0.8)
                .name(label)
                .fill(color)
        })
        .collect();
    let labels: Vec<String> = data.categories.iter().map(|(l, _)| l.clone()).collect();

    Plot::new(("count_chart", data.column.as_str()))
        .height(CHART_HEIGHT)
        .x_axis_label(data.column.clone())
        .y_axis_label("count")
        .x_axis_formatter(move |mark: GridMark, _range: &RangeInclusive<f64>| {
            category_label(&labels, mark.value)
        })
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("count"));
        });
}

/// Axis label for category positions `0, 1, 2, ...`; blank between them.
fn category_label(labels: &[String], x: f64) -> String {
    let slot = x.round();
    if (x - slot).abs() > 1e-6 || slot < 0.0 {
        return String::new();
    }
    labels.get(slot as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Histogram with density curve
// ---------------------------------------------------------------------------

pub fn histogram_chart(ui: &mut Ui, hist: &HistogramData) {
    ui.label(RichText::new(hist.title()).strong());

    let bars: Vec<Bar> = hist
        .bins
        .iter()
        .map(|b| {
            Bar::new(b.center(), b.count as f64)
                .width(b.width())
                .fill(HISTOGRAM_FILL)
        })
        .collect();
    let kde: PlotPoints = hist.kde.iter().copied().collect();
    let has_kde = !hist.kde.is_empty();

    Plot::new(("histogram", hist.column.as_str()))
        .height(CHART_HEIGHT)
        .x_axis_label(hist.column.clone())
        .y_axis_label("Count")
        .allow_scroll(false)
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).name("count").color(HISTOGRAM_FILL));
            if has_kde {
                plot_ui.line(Line::new(kde).name("density").color(KDE_STROKE).width(2.0));
            }
        });
}
