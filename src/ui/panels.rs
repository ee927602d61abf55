use std::path::PathBuf;

use eframe::egui::{self, Color32, RichText, ScrollArea, Ui};

use neuro_cohort::data::{Attribute, AttributeValue, GroupBy, SortKey};
use neuro_cohort::stats::Measure;

use crate::state::{AppState, View};

/// Attributes offered as drop-down filters, in display order.
const FILTER_ATTRIBUTES: [Attribute; 6] = [
    Attribute::Sex,
    Attribute::CognitiveStatus,
    Attribute::EducationLevel,
    Attribute::HeadInjury,
    Attribute::NeuropathologyScore,
    Attribute::DeathAge,
];

// ---------------------------------------------------------------------------
// Left side panel – filter widgets
// ---------------------------------------------------------------------------

/// Render the left filter panel.
pub fn side_panel(ui: &mut Ui, state: &mut AppState) {
    ui.heading("Filters");
    ui.separator();

    let Some(records) = &state.records else {
        ui.label("No biomarker table loaded.");
        return;
    };

    // Snapshot the choices so we can mutate state inside the loop.
    let choices: Vec<(Attribute, Vec<AttributeValue>)> = FILTER_ATTRIBUTES
        .iter()
        .map(|&attr| (attr, records.distinct_values(attr).into_iter().collect()))
        .collect();

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            for (attr, values) in &choices {
                ui.strong(attr.label());
                let current = state.criteria.get(*attr).cloned();
                let mut selected = current.clone();
                let text = current
                    .as_ref()
                    .map(|v| v.to_string())
                    .unwrap_or_else(|| "Any".to_string());
                egui::ComboBox::from_id_salt(attr.name())
                    .selected_text(text)
                    .show_ui(ui, |ui: &mut Ui| {
                        ui.selectable_value(&mut selected, None, "Any");
                        for val in values {
                            ui.selectable_value(&mut selected, Some(val.clone()), val.to_string());
                        }
                    });
                if selected != current {
                    state.set_constraint(*attr, selected);
                }
            }

            ui.add_space(4.0);
            if ui
                .checkbox(&mut state.dementia_only, "Dementia or unknown status only")
                .changed()
            {
                state.refilter();
            }
            if ui.small_button("Clear filters").clicked() {
                state.clear_filters();
            }
            ui.separator();

            // ---- Chart / table settings ----
            ui.strong("Group by");
            let mut group_by = state.group_by;
            egui::ComboBox::from_id_salt("group_by")
                .selected_text(group_by.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for g in GroupBy::ALL {
                        ui.selectable_value(&mut group_by, g, g.label());
                    }
                });
            if group_by != state.group_by {
                state.set_group_by(group_by);
            }

            ui.strong("Measure");
            egui::ComboBox::from_id_salt("measure")
                .selected_text(state.measure.label())
                .show_ui(ui, |ui: &mut Ui| {
                    for m in Measure::ALL {
                        ui.selectable_value(&mut state.measure, m, m.label());
                    }
                });

            ui.strong("Sort records by");
            egui::ComboBox::from_id_salt("sort_key")
                .selected_text(state.sort_key.name())
                .show_ui(ui, |ui: &mut Ui| {
                    for k in SortKey::ALL {
                        ui.selectable_value(&mut state.sort_key, k, k.name());
                    }
                });

            if !state.warnings.is_empty() {
                ui.separator();
                egui::CollapsingHeader::new(
                    RichText::new(format!("Skipped rows ({})", state.warnings.len())).strong(),
                )
                .default_open(false)
                .show(ui, |ui: &mut Ui| {
                    for w in &state.warnings {
                        ui.label(w.to_string());
                    }
                });
            }
        });
}

// ---------------------------------------------------------------------------
// Top bar
// ---------------------------------------------------------------------------

/// Render the top menu / toolbar.
pub fn top_bar(ui: &mut Ui, state: &mut AppState) {
    egui::menu::bar(ui, |ui: &mut Ui| {
        ui.menu_button("File", |ui: &mut Ui| {
            if ui.button("Open biomarker table…").clicked() {
                if let Some(path) = pick_table("Open biomarker table") {
                    report(state, "biomarker table", |s| s.load_biomarkers(&path));
                }
                ui.close_menu();
            }
            let has_records = state.records.is_some();
            if ui
                .add_enabled(has_records, egui::Button::new("Open metadata table…"))
                .clicked()
            {
                if let Some(path) = pick_table("Open clinical metadata") {
                    report(state, "metadata table", |s| s.load_metadata(&path));
                }
                ui.close_menu();
            }
            if ui.button("Load column config…").clicked() {
                let file = rfd::FileDialog::new()
                    .set_title("Load column config")
                    .add_filter("JSON", &["json"])
                    .pick_file();
                if let Some(path) = file {
                    report(state, "column config", |s| s.load_columns(&path));
                }
                ui.close_menu();
            }
            ui.separator();
            if ui.button("Reload").clicked() {
                report(state, "tables", AppState::reload);
                ui.close_menu();
            }
        });

        ui.separator();
        ui.selectable_value(&mut state.view, View::Chart, "Chart");
        ui.selectable_value(&mut state.view, View::Records, "Records");
        ui.separator();

        if let Some(records) = &state.records {
            ui.label(format!(
                "{} donors loaded, {} visible, {} rows skipped",
                records.len(),
                state.visible_indices.len(),
                state.warnings.len()
            ));
        }

        if let Some(msg) = &state.status_message {
            ui.label(RichText::new(msg).color(Color32::RED));
        }
    });
}

// ---------------------------------------------------------------------------
// File dialogs
// ---------------------------------------------------------------------------

fn pick_table(title: &str) -> Option<PathBuf> {
    rfd::FileDialog::new()
        .set_title(title)
        .add_filter("Supported files", &["csv", "tsv", "txt", "json", "parquet", "pq"])
        .add_filter("CSV", &["csv"])
        .add_filter("TSV", &["tsv", "txt"])
        .add_filter("JSON", &["json"])
        .add_filter("Parquet", &["parquet", "pq"])
        .pick_file()
}

/// Run a load step and surface its outcome in the status line.
fn report(
    state: &mut AppState,
    what: &str,
    load: impl FnOnce(&mut AppState) -> anyhow::Result<()>,
) {
    match load(state) {
        Ok(()) => {
            log::info!(
                "Loaded {what}: {} donors, {} visible",
                state.records.as_ref().map_or(0, |r| r.len()),
                state.visible_indices.len()
            );
            state.status_message = None;
        }
        Err(e) => {
            log::error!("Failed to load {what}: {e:#}");
            state.status_message = Some(format!("Error: {e:#}"));
        }
    }
}
