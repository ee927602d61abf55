use eframe::egui::{RichText, Ui};
use egui_plot::{Bar, BarChart, Legend, Line, Plot, PlotPoints};

use neuro_cohort::data::UNKNOWN_GROUP;
use neuro_cohort::stats::{summarize_groups, two_sample_t_test};

use crate::state::AppState;

/// Half the width of the whisker cap, in bar units.
const CAP_HALF_WIDTH: f64 = 0.12;

// ---------------------------------------------------------------------------
// Group bar chart (central panel)
// ---------------------------------------------------------------------------

/// Mean of the chosen biomarker per group, with a one-sided stdev whisker.
pub fn group_chart(ui: &mut Ui, state: &AppState) {
    if state.records.is_none() {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a biomarker table to begin  (File → Open biomarker table…)");
        });
        return;
    }

    let groups = state.groups();
    let summaries = summarize_groups(&groups, state.measure);

    // Two known groups (e.g. Female / Male): show the t-test.
    let known: Vec<_> = groups
        .iter()
        .filter(|(label, _)| label.as_str() != UNKNOWN_GROUP)
        .collect();
    if let [(la, a), (lb, b)] = known.as_slice() {
        let va = state.measure.values(a.iter().copied());
        let vb = state.measure.values(b.iter().copied());
        let text = match two_sample_t_test(&va, &vb) {
            Some(t) => format!(
                "{la} vs {lb}: t = {:.3}, p = {:.4} (df = {})",
                t.statistic, t.p_value, t.degrees_of_freedom
            ),
            None => format!("{la} vs {lb}: t-test unavailable (need ≥ 2 donors per group)"),
        };
        ui.label(RichText::new(text).monospace());
    }

    let whisker_color = ui.visuals().text_color();

    Plot::new("group_chart")
        .legend(Legend::default())
        .x_axis_label(state.group_by.label())
        .y_axis_label(format!("{} (pg/µg)", state.measure.label()))
        .allow_boxed_zoom(true)
        .allow_drag(true)
        .allow_scroll(true)
        .allow_zoom(true)
        .show(ui, |plot_ui| {
            for (i, group) in summaries.iter().enumerate() {
                let Some(mean) = group.summary.mean else {
                    continue;
                };
                let x = i as f64;
                let color = state.color_map.color_for(&group.label);
                let name = format!("{} (n = {})", group.label, group.summary.n);

                let bar = Bar::new(x, mean).width(0.6).fill(color).name(&name);
                plot_ui.bar_chart(BarChart::new(vec![bar]).color(color).name(&name));

                if let Some(sd) = group.summary.std_dev {
                    let top = mean + sd;
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![[x, mean], [x, top]]))
                            .color(whisker_color)
                            .width(1.5),
                    );
                    plot_ui.line(
                        Line::new(PlotPoints::from(vec![
                            [x - CAP_HALF_WIDTH, top],
                            [x + CAP_HALF_WIDTH, top],
                        ]))
                        .color(whisker_color)
                        .width(1.5),
                    );
                }
            }
        });
}
