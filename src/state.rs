use crate::color::ColorMap;
use crate::data::filter::{filter_records, GenderFilter};
use crate::data::model::Dataset;
use crate::layout::Layout;
use crate::view::{render, Tab, View};

// ---------------------------------------------------------------------------
// Application state
// ---------------------------------------------------------------------------

/// The full UI state, independent of rendering.
pub struct AppState {
    /// Dataset loaded at startup; never modified afterwards.
    pub dataset: Dataset,

    /// Static page description.
    pub layout: Layout,

    /// Gender colours, fixed for the whole session.
    pub color_map: ColorMap,

    /// Currently selected tab.
    pub tab: Tab,

    /// Currently selected gender filter.
    pub gender: GenderFilter,

    /// View for the current selection (cached).
    pub view: View,

    /// Number of records passing the current filter (cached).
    pub visible_rows: usize,

    /// Status / error message shown in the UI.
    pub status_message: Option<String>,
}

impl AppState {
    /// Build the layout and the initial view from a freshly loaded dataset.
    pub fn new(dataset: Dataset) -> Self {
        let layout = Layout::build(&dataset);
        let color_map = ColorMap::new(&dataset.genders);
        let tab = layout.default_tab;
        let gender = layout.default_gender.clone();
        let view = render(&dataset, tab, &gender);
        let visible_rows = dataset.len();

        Self {
            dataset,
            layout,
            color_map,
            tab,
            gender,
            view,
            visible_rows,
            status_message: None,
        }
    }

    /// Switch tab, re-rendering only on an actual change.
    pub fn select_tab(&mut self, tab: Tab) {
        if tab != self.tab {
            self.tab = tab;
            self.rerender();
        }
    }

    /// Switch gender filter, re-rendering only on an actual change.
    pub fn select_gender(&mut self, gender: GenderFilter) {
        if gender != self.gender {
            self.gender = gender;
            self.rerender();
        }
    }

    fn rerender(&mut self) {
        self.view = render(&self.dataset, self.tab, &self.gender);
        self.visible_rows = filter_records(&self.dataset, &self.gender).len();
        self.status_message = None;
    }

    /// Current view as pretty JSON, or `None` (with a status message) on failure.
    pub fn view_json(&mut self) -> Option<String> {
        match self.view.to_json() {
            Ok(json) => Some(json),
            Err(e) => {
                log::error!("Failed to serialize view: {e}");
                self.status_message = Some(format!("Error: {e}"));
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use super::*;
    use crate::data::model::RawRecord;
    use crate::view::chart::Chart;

    fn state() -> AppState {
        let raw = [("F", 70.0), ("M", 60.0), ("F", 80.0)]
            .iter()
            .map(|(g, score)| RawRecord {
                gender: Some(g.to_string()),
                study_hours_per_week: Some(score / 10.0),
                attendance_rate: Some(*score),
                final_exam_score: Some(*score),
                parental_education_level: Some("HS".to_string()),
                extra: BTreeMap::new(),
            })
            .collect();
        AppState::new(Dataset::from_raw(Vec::new(), raw).unwrap())
    }

    #[test]
    fn starts_on_histogram_for_everyone() {
        let s = state();
        assert_eq!(s.tab, Tab::Histogram);
        assert_eq!(s.gender, GenderFilter::All);
        assert_eq!(s.visible_rows, 3);
        assert!(matches!(s.view.chart, Chart::Histogram(_)));
    }

    #[test]
    fn selection_changes_rerender() {
        let mut s = state();
        s.select_tab(Tab::Box);
        assert!(matches!(s.view.chart, Chart::Box(_)));

        s.select_gender(GenderFilter::Only("F".into()));
        assert_eq!(s.visible_rows, 2);
        let Chart::Box(chart) = &s.view.chart else {
            panic!("expected a box chart");
        };
        assert_eq!(chart.boxes.len(), 1);
    }

    #[test]
    fn view_json_is_available() {
        let mut s = state();
        let json = s.view_json().unwrap();
        assert!(json.contains("histogram"));
        assert!(s.status_message.is_none());
    }
}
