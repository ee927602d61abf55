use eframe::egui::Ui;
use egui_extras::{Column, TableBuilder};

use neuro_cohort::data::{sort_records, Record};

use crate::state::AppState;

const HEADERS: [&str; 10] = [
    "Donor ID",
    "Sex",
    "Education",
    "Cognitive status",
    "Age at death",
    "Thal",
    "ABeta40",
    "ABeta42",
    "tTau",
    "pTau",
];

fn cells(r: &Record) -> [String; 10] {
    let text = |v: &Option<String>| v.clone().unwrap_or_default();
    let int = |v: Option<i64>| v.map(|v| v.to_string()).unwrap_or_default();
    let b = r.biomarkers();
    [
        r.id().to_string(),
        text(&r.sex),
        text(&r.education_level),
        text(&r.cognitive_status),
        int(r.death_age),
        int(r.neuropathology_score),
        format!("{:.3}", b.amyloid_beta_40),
        format!("{:.3}", b.amyloid_beta_42),
        format!("{:.3}", b.total_tau),
        format!("{:.3}", b.phospho_tau),
    ]
}

/// Visible records as a table, ordered by the selected sort key.
pub fn record_table(ui: &mut Ui, state: &AppState) {
    if state.records.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("No records loaded.");
        });
        return;
    }

    let mut rows = state.visible_records();
    sort_records(&mut rows, state.sort_key);

    TableBuilder::new(ui)
        .striped(true)
        .resizable(true)
        .column(Column::auto().at_least(90.0))
        .columns(Column::auto().at_least(60.0), HEADERS.len() - 1)
        .header(20.0, |mut header| {
            for title in HEADERS {
                header.col(|ui| {
                    ui.strong(title);
                });
            }
        })
        .body(|body| {
            body.rows(18.0, rows.len(), |mut row| {
                let record = rows[row.index()];
                for text in cells(record) {
                    row.col(|ui| {
                        ui.label(text);
                    });
                }
            });
        });
}
