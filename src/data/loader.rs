use std::collections::BTreeMap;
use std::fs::File;
use std::path::Path;

use arrow::array::{
    Array, ArrayRef, BooleanArray, Float32Array, Float64Array, Int32Array, Int64Array,
    LargeStringArray, StringArray,
};
use arrow::datatypes::DataType;
use arrow::record_batch::RecordBatch;
use log::info;
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{
    CellValue, Dataset, RawRecord, ATTENDANCE_RATE, FINAL_EXAM_SCORE, GENDER, PARENTAL_EDUCATION,
    REQUIRED_COLUMNS, STUDY_HOURS,
};
use crate::error::{DashboardError, Result};

/// CSV cell spellings read as a missing value, matching the usual DataFrame
/// defaults. Matched exactly; text cells are never trimmed.
const MISSING_TOKENS: [&str; 10] = [
    "", "NA", "N/A", "n/a", "<NA>", "NaN", "nan", "null", "NULL", "None",
];

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load the student dataset from a file and fill its missing numeric cells.
/// Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one student per line
/// * `.json`    – `[{ "Gender": "Female", "Attendance_Rate": 91.0, ... }, ...]`
/// * `.parquet` – flat columns as written by `df.to_parquet()`
pub fn load_file(path: &Path) -> Result<Dataset> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    let dataset = match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DashboardError::UnsupportedFormat(other.to_string())),
    }?;

    info!(
        "Loaded {} students from {} with columns {:?}",
        dataset.len(),
        path.display(),
        dataset.column_names
    );
    Ok(dataset)
}

fn check_required(column_names: &[String]) -> Result<()> {
    match REQUIRED_COLUMNS
        .iter()
        .copied()
        .find(|c| !column_names.iter().any(|n| n == c))
    {
        Some(missing) => Err(DashboardError::MissingColumn(missing)),
        None => Ok(()),
    }
}

fn open(path: &Path) -> Result<File> {
    File::open(path).map_err(|source| DashboardError::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// Positions of the charted columns inside a header row.
struct ColumnIndex {
    gender: usize,
    study_hours: usize,
    attendance: usize,
    final_score: usize,
    education: usize,
}

impl ColumnIndex {
    fn locate(headers: &[String]) -> Result<Self> {
        let find = |name: &'static str| {
            headers
                .iter()
                .position(|h| h == name)
                .ok_or(DashboardError::MissingColumn(name))
        };
        Ok(ColumnIndex {
            gender: find(GENDER)?,
            study_hours: find(STUDY_HOURS)?,
            attendance: find(ATTENDANCE_RATE)?,
            final_score: find(FINAL_EXAM_SCORE)?,
            education: find(PARENTAL_EDUCATION)?,
        })
    }

    fn contains(&self, idx: usize) -> bool {
        [
            self.gender,
            self.study_hours,
            self.attendance,
            self.final_score,
            self.education,
        ]
        .contains(&idx)
    }
}

fn load_csv(path: &Path) -> Result<Dataset> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers: Vec<String> = reader
        .headers()?
        .iter()
        .map(|h| h.trim().to_string())
        .collect();
    let index = ColumnIndex::locate(&headers)?;

    let mut rows = Vec::new();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| record.get(idx).unwrap_or("");

        let mut extra = BTreeMap::new();
        for (col_idx, value) in record.iter().enumerate() {
            if index.contains(col_idx) {
                continue;
            }
            if let Some(name) = headers.get(col_idx) {
                extra.insert(name.clone(), guess_cell_type(value));
            }
        }

        rows.push(RawRecord {
            gender: text_cell(cell(index.gender)),
            study_hours_per_week: parse_number(cell(index.study_hours), row_no, STUDY_HOURS)?,
            attendance_rate: parse_number(cell(index.attendance), row_no, ATTENDANCE_RATE)?,
            final_exam_score: parse_number(cell(index.final_score), row_no, FINAL_EXAM_SCORE)?,
            parental_education_level: text_cell(cell(index.education)),
            extra,
        });
    }

    Dataset::from_raw(headers, rows)
}

fn is_missing(s: &str) -> bool {
    MISSING_TOKENS.contains(&s)
}

fn parse_number(s: &str, row: usize, column: &'static str) -> Result<Option<f64>> {
    if is_missing(s.trim()) {
        return Ok(None);
    }
    s.trim()
        .parse::<f64>()
        .map(Some)
        .map_err(|_| DashboardError::InvalidNumber {
            row,
            column,
            value: s.to_string(),
        })
}

fn text_cell(s: &str) -> Option<String> {
    (!is_missing(s)).then(|| s.to_string())
}

fn guess_cell_type(s: &str) -> CellValue {
    if s.is_empty() {
        return CellValue::Null;
    }
    if let Ok(i) = s.parse::<i64>() {
        return CellValue::Integer(i);
    }
    if let Ok(f) = s.parse::<f64>() {
        return CellValue::Float(f);
    }
    if s == "true" || s == "false" {
        return CellValue::Bool(s == "true");
    }
    CellValue::Text(s.to_string())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, the default `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "Gender": "Female", "Study_Hours_per_Week": 12.0, "Attendance_Rate": null, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<Dataset> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;
    let records = root.as_array().ok_or_else(|| DashboardError::Malformed {
        row: 0,
        message: "expected a top-level JSON array".to_string(),
    })?;

    let mut column_names: Vec<String> = Vec::new();
    let mut objects: Vec<&Map<String, JsonValue>> = Vec::with_capacity(records.len());
    for (i, rec) in records.iter().enumerate() {
        let obj = rec.as_object().ok_or_else(|| DashboardError::Malformed {
            row: i,
            message: "row is not a JSON object".to_string(),
        })?;
        for key in obj.keys() {
            if !column_names.contains(key) {
                column_names.push(key.clone());
            }
        }
        objects.push(obj);
    }

    // An empty array has no columns at all.
    check_required(&column_names)?;

    let mut rows = Vec::with_capacity(objects.len());
    for (row_no, obj) in objects.into_iter().enumerate() {
        let extra = obj
            .iter()
            .filter(|(key, _)| !REQUIRED_COLUMNS.contains(&key.as_str()))
            .map(|(key, val)| (key.clone(), json_to_cell(val)))
            .collect();

        rows.push(RawRecord {
            gender: json_text(obj.get(GENDER)),
            study_hours_per_week: json_number(obj.get(STUDY_HOURS), row_no, STUDY_HOURS)?,
            attendance_rate: json_number(obj.get(ATTENDANCE_RATE), row_no, ATTENDANCE_RATE)?,
            final_exam_score: json_number(obj.get(FINAL_EXAM_SCORE), row_no, FINAL_EXAM_SCORE)?,
            parental_education_level: json_text(obj.get(PARENTAL_EDUCATION)),
            extra,
        });
    }

    Dataset::from_raw(column_names, rows)
}

fn json_number(val: Option<&JsonValue>, row: usize, column: &'static str) -> Result<Option<f64>> {
    match val {
        None | Some(JsonValue::Null) => Ok(None),
        Some(JsonValue::Number(n)) => Ok(n.as_f64()),
        Some(JsonValue::String(s)) => parse_number(s, row, column),
        Some(other) => Err(DashboardError::InvalidNumber {
            row,
            column,
            value: other.to_string(),
        }),
    }
}

/// JSON strings are taken as written; only `null` or an absent key is missing.
fn json_text(val: Option<&JsonValue>) -> Option<String> {
    match val {
        Some(JsonValue::String(s)) => Some(s.clone()),
        Some(JsonValue::Number(n)) => Some(n.to_string()),
        Some(JsonValue::Bool(b)) => Some(b.to_string()),
        _ => None,
    }
}

fn json_to_cell(val: &JsonValue) -> CellValue {
    match val {
        JsonValue::String(s) => CellValue::Text(s.clone()),
        JsonValue::Number(n) => {
            if let Some(i) = n.as_i64() {
                CellValue::Integer(i)
            } else if let Some(f) = n.as_f64() {
                CellValue::Float(f)
            } else {
                CellValue::Text(n.to_string())
            }
        }
        JsonValue::Bool(b) => CellValue::Bool(*b),
        JsonValue::Null => CellValue::Null,
        other => CellValue::Text(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one flat column per attribute.
///
/// Numeric columns may be Int32, Int64, Float32 or Float64 (nulls are missing
/// values); text columns Utf8 or LargeUtf8. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<Dataset> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let column_names: Vec<String> = builder
        .schema()
        .fields()
        .iter()
        .map(|f| f.name().clone())
        .collect();
    check_required(&column_names)?;
    let reader = builder.build()?;

    let mut rows = Vec::new();
    for batch_result in reader {
        let batch = batch_result?;
        let schema = batch.schema();

        let gender = batch_column(&batch, GENDER)?;
        let study = batch_column(&batch, STUDY_HOURS)?;
        let attendance = batch_column(&batch, ATTENDANCE_RATE)?;
        let score = batch_column(&batch, FINAL_EXAM_SCORE)?;
        let education = batch_column(&batch, PARENTAL_EDUCATION)?;

        let extra_cols: Vec<(usize, &String)> = schema
            .fields()
            .iter()
            .enumerate()
            .filter(|(_, f)| !REQUIRED_COLUMNS.contains(&f.name().as_str()))
            .map(|(i, f)| (i, f.name()))
            .collect();

        for row in 0..batch.num_rows() {
            let row_no = rows.len();
            let extra = extra_cols
                .iter()
                .map(|(idx, name)| ((*name).clone(), extract_cell(batch.column(*idx), row)))
                .collect();

            rows.push(RawRecord {
                gender: arrow_text(gender, row, row_no, GENDER)?,
                study_hours_per_week: arrow_number(study, row, row_no, STUDY_HOURS)?,
                attendance_rate: arrow_number(attendance, row, row_no, ATTENDANCE_RATE)?,
                final_exam_score: arrow_number(score, row, row_no, FINAL_EXAM_SCORE)?,
                parental_education_level: arrow_text(education, row, row_no, PARENTAL_EDUCATION)?,
                extra,
            });
        }
    }

    Dataset::from_raw(column_names, rows)
}

// -- Parquet / Arrow helpers --

fn batch_column<'b>(batch: &'b RecordBatch, name: &'static str) -> Result<&'b ArrayRef> {
    let idx = batch
        .schema()
        .index_of(name)
        .map_err(|_| DashboardError::MissingColumn(name))?;
    Ok(batch.column(idx))
}

/// Read a numeric cell, accepting any common integer or float width.
fn arrow_number(
    col: &ArrayRef,
    row: usize,
    row_no: usize,
    column: &'static str,
) -> Result<Option<f64>> {
    if col.is_null(row) {
        return Ok(None);
    }
    let any = col.as_any();
    let value = if let Some(arr) = any.downcast_ref::<Float64Array>() {
        arr.value(row)
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        arr.value(row) as f64
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        arr.value(row) as f64
    } else if let Some(text) = string_value(col, row) {
        return parse_number(&text, row_no, column);
    } else {
        return Err(DashboardError::InvalidNumber {
            row: row_no,
            column,
            value: format!("{:?}", col.data_type()),
        });
    };
    // Pandas writes missing floats as NaN rather than null.
    Ok(if value.is_nan() { None } else { Some(value) })
}

fn arrow_text(
    col: &ArrayRef,
    row: usize,
    row_no: usize,
    column: &'static str,
) -> Result<Option<String>> {
    if col.is_null(row) {
        return Ok(None);
    }
    match string_value(col, row) {
        Some(s) => Ok(Some(s)),
        None => Err(DashboardError::Malformed {
            row: row_no,
            message: format!(
                "column '{column}' has type {:?}, expected text",
                col.data_type()
            ),
        }),
    }
}

fn string_value(col: &ArrayRef, row: usize) -> Option<String> {
    match col.data_type() {
        DataType::Utf8 => col
            .as_any()
            .downcast_ref::<StringArray>()
            .map(|s| s.value(row).to_string()),
        DataType::LargeUtf8 => col
            .as_any()
            .downcast_ref::<LargeStringArray>()
            .map(|s| s.value(row).to_string()),
        _ => None,
    }
}

/// Extract a single pass-through cell from an Arrow column at a given row.
fn extract_cell(col: &ArrayRef, row: usize) -> CellValue {
    if col.is_null(row) {
        return CellValue::Null;
    }
    let any = col.as_any();
    if let Some(s) = string_value(col, row) {
        CellValue::Text(s)
    } else if let Some(arr) = any.downcast_ref::<Int32Array>() {
        CellValue::Integer(arr.value(row) as i64)
    } else if let Some(arr) = any.downcast_ref::<Int64Array>() {
        CellValue::Integer(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<Float32Array>() {
        CellValue::Float(arr.value(row) as f64)
    } else if let Some(arr) = any.downcast_ref::<Float64Array>() {
        CellValue::Float(arr.value(row))
    } else if let Some(arr) = any.downcast_ref::<BooleanArray>() {
        CellValue::Bool(arr.value(row))
    } else {
        CellValue::Text(format!("{:?}", col.data_type()))
    }
}
