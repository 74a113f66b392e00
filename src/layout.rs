use crate::data::filter::GenderFilter;
use crate::data::model::Dataset;
use crate::view::Tab;

pub const TITLE: &str = "Student Performance Dashboard";

/// Static page description, built once from the loaded dataset.
#[derive(Debug, Clone, PartialEq)]
pub struct Layout {
    pub title: &'static str,
    /// Dropdown entries: each gender in encountered order, then "All".
    pub gender_options: Vec<GenderFilter>,
    pub default_gender: GenderFilter,
    pub tabs: [Tab; 5],
    pub default_tab: Tab,
}

impl Layout {
    pub fn build(dataset: &Dataset) -> Self {
        let mut gender_options: Vec<GenderFilter> = dataset
            .genders
            .iter()
            .map(|g| GenderFilter::Only(g.clone()))
            .collect();
        gender_options.push(GenderFilter::All);

        Layout {
            title: TITLE,
            gender_options,
            default_gender: GenderFilter::All,
            tabs: Tab::ALL,
            default_tab: Tab::Histogram,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::RawRecord;

    #[test]
    fn dropdown_lists_genders_then_all() {
        let raw = ["Female", "Male", "Female", "Other"]
            .iter()
            .map(|g| RawRecord {
                gender: Some(g.to_string()),
                study_hours_per_week: Some(1.0),
                attendance_rate: Some(1.0),
                final_exam_score: Some(1.0),
                parental_education_level: Some("HS".to_string()),
                extra: BTreeMap::new(),
            })
            .collect();
        let ds = Dataset::from_raw(Vec::new(), raw).unwrap();
        let layout = Layout::build(&ds);

        let labels: Vec<&str> = layout.gender_options.iter().map(|g| g.label()).collect();
        assert_eq!(labels, vec!["Female", "Male", "Other", "All"]);
        assert_eq!(layout.default_gender, GenderFilter::All);
        assert_eq!(layout.default_tab, Tab::Histogram);
        assert_eq!(
            layout.tabs.map(|t| t.id()),
            ["tab-hist", "tab-scatter", "tab-bar", "tab-box", "tab-heatmap"]
        );
    }
}
