use std::fmt;

use serde::Serialize;

use super::model::{Dataset, Record};

/// Label of the dropdown option that disables the gender filter.
pub const ALL_LABEL: &str = "All";

// ---------------------------------------------------------------------------
// Filter predicate: which gender is shown
// ---------------------------------------------------------------------------

/// Gender selection. `All` is the sentinel meaning "no filter".
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize)]
pub enum GenderFilter {
    #[default]
    All,
    Only(String),
}

impl GenderFilter {
    /// Interpret a dropdown value. The sentinel label (and its Spanish
    /// spelling, used by exports of the original dashboard) selects everything.
    pub fn from_value(value: &str) -> Self {
        if value == ALL_LABEL || value == "Todos" {
            GenderFilter::All
        } else {
            GenderFilter::Only(value.to_string())
        }
    }

    /// Whether a record passes the filter.
    pub fn accepts(&self, record: &Record) -> bool {
        match self {
            GenderFilter::All => true,
            GenderFilter::Only(gender) => record.gender.as_deref() == Some(gender.as_str()),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            GenderFilter::All => ALL_LABEL,
            GenderFilter::Only(gender) => gender,
        }
    }
}

impl fmt::Display for GenderFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Records passing the filter, in dataset order.
pub fn filter_records<'a>(dataset: &'a Dataset, filter: &GenderFilter) -> Vec<&'a Record> {
    dataset
        .records
        .iter()
        .filter(|record| filter.accepts(record))
        .collect()
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::RawRecord;

    fn dataset(genders: &[&str]) -> Dataset {
        let raw = genders
            .iter()
            .enumerate()
            .map(|(i, g)| RawRecord {
                gender: Some(g.to_string()),
                study_hours_per_week: Some(i as f64),
                attendance_rate: Some(80.0),
                final_exam_score: Some(50.0 + i as f64),
                parental_education_level: Some("HS".to_string()),
                extra: BTreeMap::new(),
            })
            .collect();
        Dataset::from_raw(Vec::new(), raw).unwrap()
    }

    #[test]
    fn all_keeps_every_row() {
        let ds = dataset(&["F", "M", "F", "Other"]);
        assert_eq!(filter_records(&ds, &GenderFilter::All).len(), ds.len());
    }

    #[test]
    fn gender_keeps_matching_rows_in_order() {
        let ds = dataset(&["F", "M", "F", "Other", "F"]);
        let rows = filter_records(&ds, &GenderFilter::Only("F".into()));

        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.gender.as_deref() == Some("F")));
        let hours: Vec<f64> = rows.iter().map(|r| r.study_hours_per_week).collect();
        assert_eq!(hours, vec![0.0, 2.0, 4.0]);
    }

    #[test]
    fn unmatched_gender_is_empty() {
        let ds = dataset(&["F", "M"]);
        assert!(filter_records(&ds, &GenderFilter::Only("X".into())).is_empty());
    }

    #[test]
    fn unknown_gender_only_passes_all() {
        let row = |gender: Option<&str>| RawRecord {
            gender: gender.map(str::to_string),
            study_hours_per_week: Some(1.0),
            attendance_rate: Some(80.0),
            final_exam_score: Some(50.0),
            parental_education_level: None,
            extra: BTreeMap::new(),
        };
        let ds = Dataset::from_raw(Vec::new(), vec![row(None), row(Some("F"))]).unwrap();

        assert_eq!(filter_records(&ds, &GenderFilter::All).len(), 2);
        let only = filter_records(&ds, &GenderFilter::Only("F".into()));
        assert_eq!(only.len(), 1);
        assert_eq!(only[0].gender.as_deref(), Some("F"));
    }

    #[test]
    fn sentinel_values_parse_to_all() {
        assert_eq!(GenderFilter::from_value("All"), GenderFilter::All);
        assert_eq!(GenderFilter::from_value("Todos"), GenderFilter::All);
        assert_eq!(
            GenderFilter::from_value("Female"),
            GenderFilter::Only("Female".into())
        );
        assert_eq!(GenderFilter::All.to_string(), "All");
    }
}
