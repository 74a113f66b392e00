//! View rendering: one pure function from (tab, gender filter) to the
//! fragment shown in the content area.

pub mod chart;

use std::str::FromStr;

use log::debug;
use serde::Serialize;

use crate::data::filter::{filter_records, GenderFilter};
use crate::data::model::Dataset;
use crate::error::{DashboardError, Result};

use self::chart::{BoxChart, Chart, GroupedBarChart, HeatmapChart, HistogramChart, ScatterChart};

// ---------------------------------------------------------------------------
// Tab
// ---------------------------------------------------------------------------

/// The five fixed chart views, in tab-bar order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum Tab {
    Histogram,
    Scatter,
    GroupedBar,
    Box,
    Heatmap,
}

impl Tab {
    pub const ALL: [Tab; 5] = [
        Tab::Histogram,
        Tab::Scatter,
        Tab::GroupedBar,
        Tab::Box,
        Tab::Heatmap,
    ];

    /// Stable identifier of the tab.
    pub fn id(self) -> &'static str {
        match self {
            Tab::Histogram => "tab-hist",
            Tab::Scatter => "tab-scatter",
            Tab::GroupedBar => "tab-bar",
            Tab::Box => "tab-box",
            Tab::Heatmap => "tab-heatmap",
        }
    }

    /// Text shown on the tab bar.
    pub fn label(self) -> &'static str {
        match self {
            Tab::Histogram => "Score Histogram",
            Tab::Scatter => "Study Hours vs Score",
            Tab::GroupedBar => "Attendance by Parental Education",
            Tab::Box => "Attendance and Score (Box)",
            Tab::Heatmap => "Variable Correlation",
        }
    }

    fn heading(self) -> &'static str {
        match self {
            Tab::Histogram => "Distribution of final exam scores",
            Tab::Scatter => "Study hours and academic performance",
            Tab::GroupedBar => "Parental education and attendance",
            Tab::Box => "Final exam scores by gender",
            Tab::Heatmap => "Correlation between academic variables",
        }
    }

    fn description(self) -> &'static str {
        match self {
            Tab::Histogram => {
                "This histogram shows how final exam scores are distributed across students. \
                 It shows whether most students reach a satisfactory level and whether there \
                 are relevant differences between genders."
            }
            Tab::Scatter => {
                "This scatter plot shows how weekly study hours relate to final exam scores. \
                 It also highlights differences between genders and the effect of attendance, \
                 drawn as marker size."
            }
            Tab::GroupedBar => {
                "This bar chart shows how the education level of the parents relates to the \
                 attendance of their children. It is useful to explore factors outside \
                 individual performance."
            }
            Tab::Box => {
                "This box plot shows the distribution of final exam scores per gender. \
                 Medians and spread are easy to compare, and every individual score is drawn \
                 next to its box to reveal outliers."
            }
            Tab::Heatmap => {
                "This heatmap shows the correlations between weekly study hours, attendance \
                 and final exam scores. It helps to identify which factors are most associated \
                 with academic performance."
            }
        }
    }
}

impl FromStr for Tab {
    type Err = DashboardError;

    fn from_str(id: &str) -> Result<Self> {
        Tab::ALL
            .into_iter()
            .find(|tab| tab.id() == id)
            .ok_or_else(|| DashboardError::UnknownTab(id.to_string()))
    }
}

// ---------------------------------------------------------------------------
// View
// ---------------------------------------------------------------------------

/// The fragment displayed for one selection: heading, fixed text and chart.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct View {
    pub tab: Tab,
    pub heading: &'static str,
    pub description: &'static str,
    pub chart: Chart,
}

impl View {
    pub fn to_json(&self) -> serde_json::Result<String> {
        serde_json::to_string_pretty(self)
    }
}

/// Build the view of `tab` over the records accepted by `gender`.
pub fn render(dataset: &Dataset, tab: Tab, gender: &GenderFilter) -> View {
    let rows = filter_records(dataset, gender);
    debug!(
        "rendering {} for {gender}: {} of {} rows",
        tab.id(),
        rows.len(),
        dataset.len()
    );

    let chart = match tab {
        Tab::Histogram => Chart::Histogram(HistogramChart::build(&rows)),
        Tab::Scatter => Chart::Scatter(ScatterChart::build(&rows)),
        Tab::GroupedBar => Chart::GroupedBar(GroupedBarChart::build(&rows)),
        Tab::Box => Chart::Box(BoxChart::build(&rows)),
        Tab::Heatmap => Chart::Heatmap(HeatmapChart::build(&rows)),
    };

    View {
        tab,
        heading: tab.heading(),
        description: tab.description(),
        chart,
    }
}

/// [`render`] driven by raw control values, as sent by a tab bar and a
/// dropdown. Unknown tab identifiers are rejected.
pub fn render_by_id(dataset: &Dataset, tab_id: &str, gender: &str) -> Result<View> {
    let tab: Tab = tab_id.parse()?;
    Ok(render(dataset, tab, &GenderFilter::from_value(gender)))
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::chart::HISTOGRAM_BINS;
    use super::*;
    use crate::data::model::RawRecord;

    fn row(gender: &str, hours: f64, attendance: f64, score: f64, edu: &str) -> RawRecord {
        RawRecord {
            gender: Some(gender.to_string()),
            study_hours_per_week: Some(hours),
            attendance_rate: Some(attendance),
            final_exam_score: Some(score),
            parental_education_level: Some(edu.to_string()),
            extra: BTreeMap::new(),
        }
    }

    fn sample() -> Dataset {
        Dataset::from_raw(
            Vec::new(),
            vec![
                row("F", 5.0, 90.0, 70.0, "HS"),
                row("M", 8.0, 80.0, 60.0, "College"),
                row("F", 12.0, 95.0, 88.0, "College"),
                row("M", 3.0, 60.0, 45.0, "HS"),
                row("F", 9.0, 85.0, 75.0, "Masters"),
                row("M", 15.0, 99.0, 93.0, "Masters"),
                row("F", 7.0, 70.0, 64.0, "HS"),
            ],
        )
        .unwrap()
    }

    #[test]
    fn tab_ids_round_trip() {
        for tab in Tab::ALL {
            assert_eq!(tab.id().parse::<Tab>().unwrap(), tab);
        }
    }

    #[test]
    fn unknown_tab_fails_loudly() {
        let err = render_by_id(&sample(), "tab-pie", "All").unwrap_err();
        assert!(matches!(err, DashboardError::UnknownTab(id) if id == "tab-pie"));
    }

    #[test]
    fn bar_height_is_group_mean() {
        let ds = Dataset::from_raw(
            Vec::new(),
            vec![
                row("F", 1.0, 80.0, 50.0, "HS"),
                row("F", 2.0, 100.0, 60.0, "HS"),
            ],
        )
        .unwrap();
        let view = render_by_id(&ds, "tab-bar", "Todos").unwrap();
        let Chart::GroupedBar(bars) = view.chart else {
            panic!("expected a grouped bar chart");
        };
        assert_eq!(bars.value("HS", "F"), Some(90.0));
    }

    #[test]
    fn grouped_bar_has_gaps_for_empty_groups() {
        let ds = Dataset::from_raw(
            Vec::new(),
            vec![row("F", 1.0, 80.0, 50.0, "HS"), row("M", 2.0, 70.0, 60.0, "PhD")],
        )
        .unwrap();
        let Chart::GroupedBar(bars) = render(&ds, Tab::GroupedBar, &GenderFilter::All).chart else {
            panic!("expected a grouped bar chart");
        };
        assert_eq!(bars.categories, vec!["HS", "PhD"]);
        assert_eq!(bars.value("HS", "M"), None);
        assert_eq!(bars.value("PhD", "M"), Some(70.0));
    }

    #[test]
    fn box_for_one_gender_has_one_box() {
        let view = render_by_id(&sample(), "tab-box", "F").unwrap();
        let Chart::Box(chart) = view.chart else {
            panic!("expected a box chart");
        };
        assert_eq!(chart.boxes.len(), 1);
        assert_eq!(chart.boxes[0].gender, "F");
        assert_eq!(chart.boxes[0].points, vec![70.0, 88.0, 75.0, 64.0]);
    }

    #[test]
    fn box_for_all_has_one_box_per_gender() {
        let Chart::Box(chart) = render(&sample(), Tab::Box, &GenderFilter::All).chart else {
            panic!("expected a box chart");
        };
        let genders: Vec<&str> = chart.boxes.iter().map(|b| b.gender.as_str()).collect();
        assert_eq!(genders, vec!["F", "M"]);
    }

    #[test]
    fn histogram_bins_every_score() {
        let ds = sample();
        let Chart::Histogram(hist) = render(&ds, Tab::Histogram, &GenderFilter::All).chart else {
            panic!("expected a histogram");
        };
        assert_eq!(hist.edges.len(), HISTOGRAM_BINS + 1);
        assert_eq!(hist.edges[0], 45.0);
        assert_eq!(hist.edges[HISTOGRAM_BINS], 93.0);
        assert_eq!(hist.series.len(), 2);
        let total: usize = hist.series.iter().flat_map(|s| s.counts.iter()).sum();
        assert_eq!(total, ds.len());
    }

    #[test]
    fn scatter_carries_size_and_hover_fields() {
        let Chart::Scatter(scatter) = render(&sample(), Tab::Scatter, &GenderFilter::All).chart
        else {
            panic!("expected a scatter chart");
        };
        assert_eq!(scatter.points.len(), 7);
        assert_eq!(scatter.max_size(), 99.0);
        let p = scatter.nearest("M", 8.2, 61.0).unwrap();
        assert_eq!(p.parental_education_level.as_deref(), Some("College"));
        assert_eq!(p.attendance_rate, 80.0);
        assert!(scatter.nearest("X", 0.0, 0.0).is_none());
    }

    #[test]
    fn heatmap_is_symmetric_with_unit_diagonal() {
        let Chart::Heatmap(heat) = render(&sample(), Tab::Heatmap, &GenderFilter::All).chart
        else {
            panic!("expected a heatmap");
        };
        for i in 0..3 {
            assert_eq!(heat.matrix[i][i], 1.0);
            for j in 0..3 {
                assert_eq!(heat.matrix[i][j], heat.matrix[j][i]);
                assert!((-1.0..=1.0).contains(&heat.matrix[i][j]));
            }
        }
        // Study hours and score rise together in the sample.
        assert!(heat.matrix[0][2] > 0.8);
    }

    #[test]
    fn heatmap_of_constant_column_is_nan_not_error() {
        let ds = Dataset::from_raw(
            Vec::new(),
            vec![
                row("F", 5.0, 90.0, 70.0, "HS"),
                row("F", 5.0, 80.0, 75.0, "HS"),
                row("F", 5.0, 85.0, 72.0, "HS"),
            ],
        )
        .unwrap();
        let Chart::Heatmap(heat) = render(&ds, Tab::Heatmap, &GenderFilter::All).chart else {
            panic!("expected a heatmap");
        };
        assert!(heat.matrix[0][0].is_nan());
        assert!(heat.matrix[0][1].is_nan());
        assert!(heat.matrix[2][0].is_nan());
        assert_eq!(heat.matrix[1][1], 1.0);
        assert!(heat.matrix[1][2].is_finite());
    }

    #[test]
    fn heatmap_of_inexact_constant_column_is_nan() {
        let ds = Dataset::from_raw(
            Vec::new(),
            vec![
                row("F", 0.1, 90.0, 70.0, "HS"),
                row("F", 0.1, 80.0, 75.0, "HS"),
                row("F", 0.1, 85.0, 72.0, "HS"),
            ],
        )
        .unwrap();
        let Chart::Heatmap(heat) = render(&ds, Tab::Heatmap, &GenderFilter::All).chart else {
            panic!("expected a heatmap");
        };
        for k in 0..3 {
            assert!(heat.matrix[0][k].is_nan());
            assert!(heat.matrix[k][0].is_nan());
        }
        assert!(heat.matrix[1][2].is_finite());
    }

    #[test]
    fn rows_without_score_are_skipped_by_score_charts() {
        let mut unscored = row("M", 20.0, 50.0, 0.0, "PhD");
        unscored.final_exam_score = None;
        let mut raw: Vec<RawRecord> = vec![
            row("F", 5.0, 90.0, 70.0, "HS"),
            row("M", 8.0, 80.0, 60.0, "College"),
            row("F", 12.0, 95.0, 88.0, "College"),
            row("M", 3.0, 60.0, 45.0, "HS"),
        ];
        raw.push(unscored);
        let ds = Dataset::from_raw(Vec::new(), raw).unwrap();

        let Chart::Histogram(hist) = render(&ds, Tab::Histogram, &GenderFilter::All).chart else {
            panic!("expected a histogram");
        };
        let total: usize = hist.series.iter().flat_map(|s| s.counts.iter()).sum();
        assert_eq!(total, 4);

        let Chart::Scatter(scatter) = render(&ds, Tab::Scatter, &GenderFilter::All).chart else {
            panic!("expected a scatter chart");
        };
        assert_eq!(scatter.points.len(), 4);

        let Chart::Box(boxes) = render(&ds, Tab::Box, &GenderFilter::Only("M".into())).chart
        else {
            panic!("expected a box chart");
        };
        assert_eq!(boxes.boxes[0].points, vec![60.0, 45.0]);

        // Study hours and attendance use every row, the unscored one included.
        let Chart::Heatmap(heat) = render(&ds, Tab::Heatmap, &GenderFilter::All).chart else {
            panic!("expected a heatmap");
        };
        let hours: Vec<f64> = ds.records.iter().map(|r| r.study_hours_per_week).collect();
        let attendance: Vec<f64> = ds.records.iter().map(|r| r.attendance_rate).collect();
        assert_eq!(heat.matrix[0][1], crate::stats::pearson(&hours, &attendance));
        assert_eq!(heat.rows, 5);

        // The bar chart does not need a score.
        assert!(!render(&ds, Tab::GroupedBar, &GenderFilter::All).chart.is_empty());
    }

    #[test]
    fn rows_with_unknown_categories_form_no_group() {
        let mut no_gender = row("F", 6.0, 70.0, 66.0, "HS");
        no_gender.gender = None;
        let mut no_education = row("M", 7.0, 75.0, 68.0, "HS");
        no_education.parental_education_level = None;
        let ds = Dataset::from_raw(
            Vec::new(),
            vec![row("F", 5.0, 90.0, 70.0, "HS"), no_gender, no_education],
        )
        .unwrap();

        let Chart::Box(boxes) = render(&ds, Tab::Box, &GenderFilter::All).chart else {
            panic!("expected a box chart");
        };
        let genders: Vec<&str> = boxes.boxes.iter().map(|b| b.gender.as_str()).collect();
        assert_eq!(genders, vec!["F", "M"]);
        assert_eq!(boxes.boxes[0].points, vec![70.0]);

        let Chart::Scatter(scatter) = render(&ds, Tab::Scatter, &GenderFilter::All).chart else {
            panic!("expected a scatter chart");
        };
        assert_eq!(scatter.points.len(), 2);
        assert_eq!(scatter.points[1].parental_education_level, None);

        let Chart::GroupedBar(bars) = render(&ds, Tab::GroupedBar, &GenderFilter::All).chart
        else {
            panic!("expected a grouped bar chart");
        };
        assert_eq!(bars.categories, vec!["HS"]);
        assert_eq!(bars.value("HS", "F"), Some(90.0));
        assert_eq!(bars.value("HS", "M"), None);

        // Unknown genders still count towards the unfiltered heatmap.
        let Chart::Heatmap(heat) = render(&ds, Tab::Heatmap, &GenderFilter::All).chart else {
            panic!("expected a heatmap");
        };
        assert_eq!(heat.rows, 3);
    }

    #[test]
    fn empty_selection_renders_empty_charts() {
        let ds = sample();
        let nobody = GenderFilter::Only("Nobody".into());
        for tab in Tab::ALL {
            let view = render(&ds, tab, &nobody);
            assert!(view.chart.is_empty(), "{} should be empty", tab.id());
            assert_eq!(view.heading, tab.heading());
        }
    }

    #[test]
    fn rendering_is_deterministic() {
        let ds = sample();
        for tab in Tab::ALL {
            for gender in [GenderFilter::All, GenderFilter::Only("M".into())] {
                let first = render(&ds, tab, &gender);
                let second = render(&ds, tab, &gender);
                assert_eq!(first, second);
                assert_eq!(first.to_json().unwrap(), second.to_json().unwrap());
            }
        }
    }

    #[test]
    fn description_is_independent_of_filter() {
        let ds = sample();
        let all = render(&ds, Tab::Scatter, &GenderFilter::All);
        let only = render(&ds, Tab::Scatter, &GenderFilter::Only("F".into()));
        assert_eq!(all.description, only.description);
        assert_ne!(all.chart, only.chart);
    }

    #[test]
    fn json_export_names_the_chart_kind() {
        let json = render(&sample(), Tab::GroupedBar, &GenderFilter::All)
            .to_json()
            .unwrap();
        assert!(json.contains("\"kind\": \"grouped_bar\""));
        assert!(json.contains("\"tab\": \"GroupedBar\""));
    }
}
