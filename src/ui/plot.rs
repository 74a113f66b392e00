use eframe::egui::{Color32, RichText, Stroke, Ui};
use egui_plot::{
    Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Legend, Plot, PlotPoint, PlotPoints,
    Points, Polygon, Text,
};

use crate::color::{self, ColorMap};
use crate::data::model::{ATTENDANCE_RATE, FINAL_EXAM_SCORE, PARENTAL_EDUCATION, STUDY_HOURS};
use crate::state::AppState;
use crate::view::chart::{
    BoxChart, Chart, GroupedBarChart, HeatmapChart, HistogramChart, ScatterChart,
};

/// Radius of the marker with the largest size value.
const MAX_MARKER_RADIUS: f32 = 9.0;
const MIN_MARKER_RADIUS: f32 = 1.5;

// ---------------------------------------------------------------------------
// Central panel – heading, text and chart of the current view
// ---------------------------------------------------------------------------

/// Render the current view in the central panel.
pub fn view_panel(ui: &mut Ui, state: &AppState) {
    let view = &state.view;

    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(view.heading);
    });
    ui.add_space(4.0);
    ui.label(view.description);
    ui.add_space(8.0);

    if view.chart.is_empty() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading(empty_message(state.visible_rows));
        });
        return;
    }

    let colors = &state.color_map;
    match &view.chart {
        Chart::Histogram(chart) => histogram_plot(ui, chart, colors),
        Chart::Scatter(chart) => scatter_plot(ui, chart, colors),
        Chart::GroupedBar(chart) => grouped_bar_plot(ui, chart, colors),
        Chart::Box(chart) => box_plot(ui, chart, colors),
        Chart::Heatmap(chart) => heatmap_plot(ui, chart),
    }
}

/// Placeholder for a chart with nothing to draw.
fn empty_message(visible_rows: usize) -> &'static str {
    if visible_rows == 0 {
        "No students match the current selection"
    } else {
        "The selected students have no values for this chart"
    }
}

/// Axis label for integer positions used as categories.
fn category_label(labels: &[String], value: f64) -> String {
    let idx = value.round();
    if (value - idx).abs() > 1e-6 || idx < 0.0 {
        return String::new();
    }
    labels.get(idx as usize).cloned().unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

fn histogram_plot(ui: &mut Ui, chart: &HistogramChart, colors: &ColorMap) {
    let width = chart.bin_width();

    Plot::new("score_histogram")
        .legend(Legend::default())
        .x_axis_label(FINAL_EXAM_SCORE)
        .y_axis_label("count")
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for series in &chart.series {
                let color = colors.color_for(&series.gender);
                let bars: Vec<Bar> = series
                    .counts
                    .iter()
                    .zip(&chart.edges)
                    .map(|(&count, &left)| Bar::new(left + width / 2.0, count as f64).width(width))
                    .collect();

                // Overlaid series stay readable through each other.
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(&series.gender)
                        .color(color.gamma_multiply(0.6)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

/// Marker radius such that marker area is proportional to `size`.
pub fn marker_radius(size: f64, max_size: f64) -> f32 {
    if max_size <= 0.0 || size <= 0.0 {
        return MIN_MARKER_RADIUS;
    }
    let r = MAX_MARKER_RADIUS * (size / max_size).sqrt() as f32;
    r.max(MIN_MARKER_RADIUS)
}

fn scatter_plot(ui: &mut Ui, chart: &ScatterChart, colors: &ColorMap) {
    let max_size = chart.max_size();
    let lookup = chart.clone();

    Plot::new("study_vs_score")
        .legend(Legend::default())
        .x_axis_label(STUDY_HOURS)
        .y_axis_label(FINAL_EXAM_SCORE)
        .label_formatter(move |name: &str, value: &PlotPoint| {
            match lookup.nearest(name, value.x, value.y) {
                Some(p) if !name.is_empty() => format!(
                    "{name}\n{STUDY_HOURS}: {:.1}\n{FINAL_EXAM_SCORE}: {:.1}\n\
                     {ATTENDANCE_RATE}: {:.1}\n{PARENTAL_EDUCATION}: {}",
                    p.study_hours_per_week,
                    p.final_exam_score,
                    p.attendance_rate,
                    p.parental_education_level.as_deref().unwrap_or("n/a")
                ),
                _ => format!("x = {:.1}\ny = {:.1}", value.x, value.y),
            }
        })
        .show(ui, |plot_ui| {
            for p in &chart.points {
                let point = Points::new(vec![[p.study_hours_per_week, p.final_exam_score]])
                    .radius(marker_radius(p.attendance_rate, max_size))
                    .color(colors.color_for(&p.gender).gamma_multiply(0.8))
                    .filled(true)
                    .name(&p.gender);
                plot_ui.points(point);
            }
        });
}

// ---------------------------------------------------------------------------
// Grouped bar
// ---------------------------------------------------------------------------

/// Share of a category slot covered by its group of bars.
const GROUP_WIDTH: f64 = 0.8;

fn grouped_bar_plot(ui: &mut Ui, chart: &GroupedBarChart, colors: &ColorMap) {
    let categories = chart.categories.clone();
    let bar_width = GROUP_WIDTH / chart.series.len().max(1) as f64;

    Plot::new("attendance_by_education")
        .legend(Legend::default())
        .x_axis_label(PARENTAL_EDUCATION)
        .y_axis_label(format!("{ATTENDANCE_RATE} (mean)"))
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&categories, mark.value))
        .show(ui, |plot_ui| {
            for (k, series) in chart.series.iter().enumerate() {
                let offset = -GROUP_WIDTH / 2.0 + bar_width * (k as f64 + 0.5);
                let bars: Vec<Bar> = series
                    .values
                    .iter()
                    .enumerate()
                    .filter_map(|(i, value)| {
                        value.map(|v| Bar::new(i as f64 + offset, v).width(bar_width))
                    })
                    .collect();
                plot_ui.bar_chart(
                    BarChart::new(bars)
                        .name(&series.gender)
                        .color(colors.color_for(&series.gender)),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

/// Horizontal spread of the individual points drawn beside each box.
fn jitter(i: usize) -> f64 {
    ((i * 7919) % 97) as f64 / 97.0 * 0.2
}

fn box_plot(ui: &mut Ui, chart: &BoxChart, colors: &ColorMap) {
    let genders: Vec<String> = chart.boxes.iter().map(|b| b.gender.clone()).collect();

    Plot::new("score_by_gender")
        .legend(Legend::default())
        .x_axis_label("Gender")
        .y_axis_label(FINAL_EXAM_SCORE)
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&genders, mark.value))
        .show(ui, |plot_ui| {
            for (i, series) in chart.boxes.iter().enumerate() {
                let x = i as f64;
                let color = colors.color_for(&series.gender);
                let s = &series.summary;

                let elem = BoxElem::new(
                    x + 0.1,
                    BoxSpread::new(s.lower_whisker, s.q1, s.median, s.q3, s.upper_whisker),
                )
                .name(&series.gender)
                .box_width(0.4)
                .whisker_width(0.2);
                plot_ui.box_plot(BoxPlot::new(vec![elem]).name(&series.gender).color(color));

                let points: PlotPoints = series
                    .points
                    .iter()
                    .enumerate()
                    .map(|(j, &score)| [x - 0.35 + jitter(j), score])
                    .collect();
                plot_ui.points(
                    Points::new(points)
                        .radius(2.0)
                        .color(color)
                        .filled(true)
                        .name(&series.gender),
                );
            }
        });
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

fn heatmap_plot(ui: &mut Ui, chart: &HeatmapChart) {
    let n = chart.labels.len();
    let labels: Vec<String> = chart.labels.iter().map(|l| l.to_string()).collect();
    // Row 0 is drawn at the top.
    let row_labels: Vec<String> = labels.iter().rev().cloned().collect();

    ui.label(
        RichText::new("Pearson correlation: blue is negative, white is zero, red is positive.")
            .italics(),
    );

    Plot::new("correlation_heatmap")
        .data_aspect(1.0)
        .show_grid(false)
        .allow_boxed_zoom(false)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .x_axis_formatter(move |mark: GridMark, _range| category_label(&labels, mark.value))
        .y_axis_formatter(move |mark: GridMark, _range| category_label(&row_labels, mark.value))
        .show(ui, |plot_ui| {
            for (i, row) in chart.matrix.iter().enumerate() {
                for (j, &value) in row.iter().enumerate() {
                    let x = j as f64;
                    let y = (n - 1 - i) as f64;
                    let fill = color::diverging(value);

                    let cell = vec![
                        [x - 0.5, y - 0.5],
                        [x + 0.5, y - 0.5],
                        [x + 0.5, y + 0.5],
                        [x - 0.5, y + 0.5],
                    ];
                    plot_ui.polygon(
                        Polygon::new(PlotPoints::from(cell))
                            .fill_color(fill)
                            .stroke(Stroke::new(1.0, Color32::WHITE)),
                    );

                    let text = if value.is_nan() {
                        "NaN".to_string()
                    } else {
                        format!("{value:.2}")
                    };
                    plot_ui.text(Text::new(
                        PlotPoint::new(x, y),
                        RichText::new(text).color(color::contrast_text(fill)).strong(),
                    ));
                }
            }
        });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_area_tracks_size() {
        let big = marker_radius(100.0, 100.0);
        let quarter = marker_radius(25.0, 100.0);
        assert_eq!(big, MAX_MARKER_RADIUS);
        assert!((quarter - MAX_MARKER_RADIUS / 2.0).abs() < 1e-5);
        assert_eq!(marker_radius(0.0, 100.0), MIN_MARKER_RADIUS);
        assert_eq!(marker_radius(5.0, 0.0), MIN_MARKER_RADIUS);
    }

    #[test]
    fn categories_label_integer_ticks_only() {
        let labels = vec!["HS".to_string(), "College".to_string()];
        assert_eq!(category_label(&labels, 1.0), "College");
        assert_eq!(category_label(&labels, 0.5), "");
        assert_eq!(category_label(&labels, 2.0), "");
        assert_eq!(category_label(&labels, -1.0), "");
    }

    #[test]
    fn placeholder_tells_no_match_from_no_values() {
        assert_eq!(empty_message(0), "No students match the current selection");
        assert_eq!(
            empty_message(3),
            "The selected students have no values for this chart"
        );
    }

    #[test]
    fn jitter_stays_beside_the_box() {
        assert!((0..500).map(jitter).all(|j| (0.0..0.2).contains(&j)));
    }
}
