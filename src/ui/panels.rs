use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use crate::data::model::{ColumnFill, ATTENDANCE_RATE, REQUIRED_COLUMNS, STUDY_HOURS};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Top bar – title, gender dropdown and tab bar
// ---------------------------------------------------------------------------

/// Render the title row and the two selection controls.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    ui.vertical_centered(|ui: &mut Ui| {
        ui.heading(state.layout.title);
    });
    ui.add_space(4.0);

    egui::menu::bar(ui, |ui: &mut Ui| {
        gender_filter(ui, state);

        ui.separator();
        ui.label(format!(
            "{} students loaded, {} visible",
            state.dataset.len(),
            state.visible_rows
        ));

        ui.separator();
        if ui
            .button("Copy chart data")
            .on_hover_text("Copy the current view as JSON")
            .clicked()
        {
            if let Some(json) = state.view_json() {
                ui.ctx().copy_text(json);
            }
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });

    ui.add_space(4.0);
    tab_bar(ui, state);
    ui.add_space(4.0);
}

fn gender_filter(ui: &mut Ui, state: &mut AppState) {
    ui.label("Select gender:");
    // Clone what we need so we can mutate state inside the dropdown.
    let options = state.layout.gender_options.clone();
    let current = state.gender.clone();
    egui::ComboBox::from_id_salt("gender_filter")
        .selected_text(current.label())
        .show_ui(ui, |ui: &mut Ui| {
            for option in options {
                if ui.selectable_label(current == option, option.label()).clicked() {
                    state.select_gender(option);
                }
            }
        });
}

fn tab_bar(ui: &mut Ui, state: &mut AppState) {
    let tabs = state.layout.tabs;
    ui.horizontal(|ui: &mut Ui| {
        for tab in tabs {
            let text = RichText::new(tab.label()).strong();
            if ui
                .selectable_label(state.tab == tab, text)
                .on_hover_text(tab.id())
                .clicked()
            {
                state.select_tab(tab);
            }
        }
    });
}

// ---------------------------------------------------------------------------
// Left side panel – dataset summary
// ---------------------------------------------------------------------------

/// Render the dataset summary: fill report and column list.
pub fn side_panel(ui: &mut Ui, state: &AppState) {
    ui.heading("Dataset");
    ui.separator();

    let dataset = &state.dataset;
    if dataset.is_empty() {
        ui.label("The dataset has no rows.");
    }

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            ui.strong("Missing values filled");
            fill_row(ui, STUDY_HOURS, &dataset.fill_report.study_hours_per_week);
            fill_row(ui, ATTENDANCE_RATE, &dataset.fill_report.attendance_rate);
            ui.separator();

            egui::CollapsingHeader::new(
                RichText::new(format!("Columns  ({})", dataset.column_names.len())).strong(),
            )
            .id_salt("columns")
            .default_open(false)
            .show(ui, |ui: &mut Ui| {
                for col in &dataset.column_names {
                    let text = if REQUIRED_COLUMNS.contains(&col.as_str()) {
                        RichText::new(col).strong()
                    } else {
                        RichText::new(col)
                    };
                    ui.label(text);
                }
            });

            egui::CollapsingHeader::new(RichText::new("Genders").strong())
                .id_salt("genders")
                .default_open(true)
                .show(ui, |ui: &mut Ui| {
                    for gender in &dataset.genders {
                        let count = dataset
                            .records
                            .iter()
                            .filter(|r| r.gender.as_deref() == Some(gender.as_str()))
                            .count();
                        let color = state.color_map.color_for(gender);
                        ui.label(RichText::new(format!("{gender}  ({count})")).color(color));
                    }
                });
        });
}

fn fill_row(ui: &mut Ui, column: &str, fill: &ColumnFill) {
    let median = fill
        .median
        .map(|m| format!("{m:.2}"))
        .unwrap_or_else(|| "n/a".to_string());
    ui.label(format!("{column}: {} (median {median})", fill.filled));
}
