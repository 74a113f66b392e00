use std::collections::BTreeMap;

use log::warn;
use serde::Serialize;

use crate::error::{DashboardError, Result};
use crate::stats;

// ---------------------------------------------------------------------------
// Column names
// ---------------------------------------------------------------------------

pub const GENDER: &str = "Gender";
pub const STUDY_HOURS: &str = "Study_Hours_per_Week";
pub const ATTENDANCE_RATE: &str = "Attendance_Rate";
pub const FINAL_EXAM_SCORE: &str = "Final_Exam_Score";
pub const PARENTAL_EDUCATION: &str = "Parental_Education_Level";

/// Columns every input file must provide.
pub const REQUIRED_COLUMNS: [&str; 5] = [
    GENDER,
    STUDY_HOURS,
    ATTENDANCE_RATE,
    FINAL_EXAM_SCORE,
    PARENTAL_EDUCATION,
];

// ---------------------------------------------------------------------------
// CellValue – a pass-through cell of a column the dashboard does not chart
// ---------------------------------------------------------------------------

/// A dynamically-typed cell mirroring common DataFrame dtypes.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CellValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Bool(bool),
    Null,
}

// ---------------------------------------------------------------------------
// Record – one student
// ---------------------------------------------------------------------------

/// A row as read from the source, before missing values are filled.
#[derive(Debug, Clone, PartialEq)]
pub struct RawRecord {
    pub gender: Option<String>,
    pub study_hours_per_week: Option<f64>,
    pub attendance_rate: Option<f64>,
    pub final_exam_score: Option<f64>,
    pub parental_education_level: Option<String>,
    pub extra: BTreeMap<String, CellValue>,
}

/// One student's measured attributes.
///
/// A missing gender never matches a gender selection and forms no series;
/// a missing education level belongs to no bar group.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Record {
    pub gender: Option<String>,
    pub study_hours_per_week: f64,
    pub attendance_rate: f64,
    /// Passed through as read; rows without a score are skipped by charts.
    pub final_exam_score: Option<f64>,
    pub parental_education_level: Option<String>,
    /// Every other source column, unmodified.
    pub extra: BTreeMap<String, CellValue>,
}

// ---------------------------------------------------------------------------
// Fill report
// ---------------------------------------------------------------------------

/// How one numeric column was completed at load time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct ColumnFill {
    /// Median of the observed values, `None` when the column has no observation.
    pub median: Option<f64>,
    /// Number of missing cells replaced by the median.
    pub filled: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct FillReport {
    pub study_hours_per_week: ColumnFill,
    pub attendance_rate: ColumnFill,
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The full loaded dataset. Immutable once built.
#[derive(Debug, Clone)]
pub struct Dataset {
    /// All records in source order.
    pub records: Vec<Record>,
    /// Column names in source order.
    pub column_names: Vec<String>,
    /// Distinct known genders in the order they are first encountered.
    pub genders: Vec<String>,
    pub fill_report: FillReport,
}

impl Dataset {
    /// Complete the raw rows: every missing study-hours or attendance cell
    /// takes the median of the observed values of its column.
    pub fn from_raw(column_names: Vec<String>, raw: Vec<RawRecord>) -> Result<Self> {
        let study = fill_for(STUDY_HOURS, raw.iter().map(|r| r.study_hours_per_week))?;
        let attendance = fill_for(ATTENDANCE_RATE, raw.iter().map(|r| r.attendance_rate))?;

        let records: Vec<Record> = raw
            .into_iter()
            .map(|r| Record {
                gender: r.gender,
                study_hours_per_week: r
                    .study_hours_per_week
                    .or(study.median)
                    .unwrap_or_default(),
                attendance_rate: r.attendance_rate.or(attendance.median).unwrap_or_default(),
                final_exam_score: r.final_exam_score,
                parental_education_level: r.parental_education_level,
                extra: r.extra,
            })
            .collect();

        let genders = distinct_in_order(records.iter().filter_map(|r| r.gender.as_deref()));

        Ok(Dataset {
            records,
            column_names,
            genders,
            fill_report: FillReport {
                study_hours_per_week: study,
                attendance_rate: attendance,
            },
        })
    }

    /// Number of records.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    /// Whether the dataset is empty.
    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

/// Distinct values in the order they are first encountered.
pub fn distinct_in_order<'a>(values: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen: Vec<String> = Vec::new();
    for value in values {
        if !seen.iter().any(|s| s == value) {
            seen.push(value.to_string());
        }
    }
    seen
}

fn fill_for(column: &'static str, cells: impl Iterator<Item = Option<f64>>) -> Result<ColumnFill> {
    let mut observed = Vec::new();
    let mut missing = 0usize;
    for cell in cells {
        match cell {
            Some(v) => observed.push(v),
            None => missing += 1,
        }
    }
    let median = stats::median(&observed);
    if missing > 0 {
        let Some(m) = median else {
            return Err(DashboardError::NoObservedValues(column));
        };
        warn!("{column}: filled {missing} missing value(s) with median {m}");
    }
    Ok(ColumnFill {
        median,
        filled: missing,
    })
}
