use serde::Serialize;

use crate::data::model::{
    distinct_in_order, Record, ATTENDANCE_RATE, FINAL_EXAM_SCORE, STUDY_HOURS,
};
use crate::stats::{self, BoxSummary};

/// Number of equal-width bins of the score histogram.
pub const HISTOGRAM_BINS: usize = 20;

/// Chart data produced by one view. Drawing is left to the UI layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Chart {
    Histogram(HistogramChart),
    Scatter(ScatterChart),
    GroupedBar(GroupedBarChart),
    Box(BoxChart),
    Heatmap(HeatmapChart),
}

impl Chart {
    /// Whether there is nothing to draw for the current selection.
    pub fn is_empty(&self) -> bool {
        match self {
            Chart::Histogram(h) => h.series.is_empty(),
            Chart::Scatter(s) => s.points.is_empty(),
            Chart::GroupedBar(b) => b.categories.is_empty(),
            Chart::Box(b) => b.boxes.is_empty(),
            Chart::Heatmap(h) => h.rows == 0,
        }
    }
}

fn scored<'a, 'b>(rows: &'b [&'a Record]) -> impl Iterator<Item = (&'a Record, f64)> + 'b {
    rows.iter()
        .filter_map(|r| r.final_exam_score.map(|score| (*r, score)))
}

/// Scores of rows with a known gender, as `(gender, score)`.
fn scored_by_gender<'a, 'b>(rows: &'b [&'a Record]) -> impl Iterator<Item = (&'a str, f64)> + 'b {
    scored(rows).filter_map(|(r, score)| Some((r.gender.as_deref()?, score)))
}

// ---------------------------------------------------------------------------
// Histogram
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramSeries {
    pub gender: String,
    /// One count per bin.
    pub counts: Vec<usize>,
}

/// Final exam scores binned over their observed range, one overlaid series
/// per gender. Every series shares the same `edges`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HistogramChart {
    pub edges: Vec<f64>,
    pub series: Vec<HistogramSeries>,
}

impl HistogramChart {
    pub fn build(rows: &[&Record]) -> Self {
        let scores: Vec<f64> = scored_by_gender(rows).map(|(_, s)| s).collect();
        let Some((min, max)) = stats::value_range(&scores) else {
            return HistogramChart {
                edges: Vec::new(),
                series: Vec::new(),
            };
        };
        let edges = stats::equal_width_edges(min, max, HISTOGRAM_BINS);

        let genders = distinct_in_order(scored_by_gender(rows).map(|(g, _)| g));
        let series = genders
            .into_iter()
            .map(|gender| {
                let values: Vec<f64> = scored_by_gender(rows)
                    .filter(|(g, _)| *g == gender)
                    .map(|(_, s)| s)
                    .collect();
                HistogramSeries {
                    counts: stats::bin_counts(&edges, &values),
                    gender,
                }
            })
            .collect();

        HistogramChart { edges, series }
    }

    pub fn bin_width(&self) -> f64 {
        match (self.edges.first(), self.edges.last()) {
            (Some(lo), Some(hi)) if self.edges.len() > 1 => {
                (hi - lo) / (self.edges.len() - 1) as f64
            }
            _ => 0.0,
        }
    }
}

// ---------------------------------------------------------------------------
// Scatter
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterPoint {
    pub gender: String,
    pub study_hours_per_week: f64,
    pub final_exam_score: f64,
    /// Marker size; the drawn area is proportional to it.
    pub attendance_rate: f64,
    /// Shown on hover.
    pub parental_education_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScatterChart {
    pub genders: Vec<String>,
    pub points: Vec<ScatterPoint>,
}

impl ScatterChart {
    pub fn build(rows: &[&Record]) -> Self {
        let points: Vec<ScatterPoint> = scored(rows)
            .filter_map(|(r, score)| {
                Some(ScatterPoint {
                    gender: r.gender.clone()?,
                    study_hours_per_week: r.study_hours_per_week,
                    final_exam_score: score,
                    attendance_rate: r.attendance_rate,
                    parental_education_level: r.parental_education_level.clone(),
                })
            })
            .collect();
        let genders = distinct_in_order(points.iter().map(|p| p.gender.as_str()));
        ScatterChart { genders, points }
    }

    /// Largest marker size value, used to normalise marker areas.
    pub fn max_size(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.attendance_rate)
            .fold(0.0, f64::max)
    }

    /// The point of `gender` closest to plot coordinates `(x, y)`.
    pub fn nearest(&self, gender: &str, x: f64, y: f64) -> Option<&ScatterPoint> {
        self.points
            .iter()
            .filter(|p| p.gender == gender)
            .min_by(|a, b| {
                let da = (a.study_hours_per_week - x).powi(2) + (a.final_exam_score - y).powi(2);
                let db = (b.study_hours_per_week - x).powi(2) + (b.final_exam_score - y).powi(2);
                da.total_cmp(&db)
            })
    }
}

// ---------------------------------------------------------------------------
// Grouped bar
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BarSeries {
    pub gender: String,
    /// Mean attendance per category, `None` when the group has no rows.
    pub values: Vec<Option<f64>>,
}

/// Mean attendance rate per (parental education level, gender) group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GroupedBarChart {
    pub categories: Vec<String>,
    pub series: Vec<BarSeries>,
}

impl GroupedBarChart {
    pub fn build(rows: &[&Record]) -> Self {
        // Rows missing either key belong to no group.
        let grouped: Vec<(&str, &str, f64)> = rows
            .iter()
            .filter_map(|r| {
                Some((
                    r.parental_education_level.as_deref()?,
                    r.gender.as_deref()?,
                    r.attendance_rate,
                ))
            })
            .collect();
        let categories = distinct_in_order(grouped.iter().map(|(c, _, _)| *c));
        let genders = distinct_in_order(grouped.iter().map(|(_, g, _)| *g));

        let series = genders
            .into_iter()
            .map(|gender| {
                let values = categories
                    .iter()
                    .map(|category| {
                        let group: Vec<f64> = grouped
                            .iter()
                            .filter(|(c, g, _)| *c == category.as_str() && *g == gender)
                            .map(|(_, _, rate)| *rate)
                            .collect();
                        stats::mean(&group)
                    })
                    .collect();
                BarSeries { gender, values }
            })
            .collect();

        GroupedBarChart { categories, series }
    }

    /// Bar height of one group.
    pub fn value(&self, category: &str, gender: &str) -> Option<f64> {
        let idx = self.categories.iter().position(|c| c == category)?;
        self.series
            .iter()
            .find(|s| s.gender == gender)
            .and_then(|s| s.values.get(idx).copied().flatten())
    }
}

// ---------------------------------------------------------------------------
// Box plot
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxSeries {
    pub gender: String,
    pub summary: BoxSummary,
    /// Every score of the group, drawn next to the box.
    pub points: Vec<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BoxChart {
    pub boxes: Vec<BoxSeries>,
}

impl BoxChart {
    pub fn build(rows: &[&Record]) -> Self {
        let genders = distinct_in_order(scored_by_gender(rows).map(|(g, _)| g));
        let boxes = genders
            .into_iter()
            .filter_map(|gender| {
                let points: Vec<f64> = scored_by_gender(rows)
                    .filter(|(g, _)| *g == gender)
                    .map(|(_, s)| s)
                    .collect();
                let summary = BoxSummary::from_values(&points)?;
                Some(BoxSeries {
                    gender,
                    summary,
                    points,
                })
            })
            .collect();
        BoxChart { boxes }
    }
}

// ---------------------------------------------------------------------------
// Correlation heatmap
// ---------------------------------------------------------------------------

pub const HEATMAP_COLUMNS: [&str; 3] = [STUDY_HOURS, ATTENDANCE_RATE, FINAL_EXAM_SCORE];

/// Pearson correlation between the three numeric columns.
/// `matrix[i][j]` is NaN where the correlation is undefined.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeatmapChart {
    pub labels: [&'static str; 3],
    pub matrix: [[f64; 3]; 3],
    /// Rows the matrix was computed from.
    pub rows: usize,
}

fn numeric(record: &Record, column: usize) -> Option<f64> {
    match column {
        0 => Some(record.study_hours_per_week),
        1 => Some(record.attendance_rate),
        _ => record.final_exam_score,
    }
}

impl HeatmapChart {
    pub fn build(rows: &[&Record]) -> Self {
        let mut matrix = [[f64::NAN; 3]; 3];
        for i in 0..3 {
            let column: Vec<f64> = rows.iter().filter_map(|r| numeric(r, i)).collect();
            matrix[i][i] = if stats::has_variance(&column) {
                1.0
            } else {
                f64::NAN
            };
            for j in (i + 1)..3 {
                // Pairwise complete observations.
                let (xs, ys): (Vec<f64>, Vec<f64>) = rows
                    .iter()
                    .filter_map(|r| Some((numeric(r, i)?, numeric(r, j)?)))
                    .unzip();
                let r = stats::pearson(&xs, &ys);
                matrix[i][j] = r;
                matrix[j][i] = r;
            }
        }
        HeatmapChart {
            labels: HEATMAP_COLUMNS,
            matrix,
            rows: rows.len(),
        }
    }
}
