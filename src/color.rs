use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use neuro_cohort::data::UNKNOWN_GROUP;

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<Color32> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.55);
            let rgb: Srgb = hsl.into_color();
            Color32::from_rgb(
                (rgb.red * 255.0) as u8,
                (rgb.green * 255.0) as u8,
                (rgb.blue * 255.0) as u8,
            )
        })
        .collect()
}

// ---------------------------------------------------------------------------
// Color mapping: group label → Color32
// ---------------------------------------------------------------------------

/// Maps group labels to distinct colours. The "Unknown" group is always grey.
#[derive(Debug, Clone, Default)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
}

impl ColorMap {
    pub fn new<'a>(labels: impl IntoIterator<Item = &'a str>) -> Self {
        let known: Vec<&str> = labels.into_iter().filter(|l| *l != UNKNOWN_GROUP).collect();
        let mapping = known
            .iter()
            .zip(generate_palette(known.len()))
            .map(|(label, c)| (label.to_string(), c))
            .collect();
        ColorMap { mapping }
    }

    pub fn color_for(&self, label: &str) -> Color32 {
        self.mapping.get(label).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_has_requested_size() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(5);
        assert_eq!(p.len(), 5);
        assert_ne!(p[0], p[1]);
    }

    #[test]
    fn unknown_group_is_grey() {
        let cm = ColorMap::new(["Female", "Male", UNKNOWN_GROUP]);
        assert_eq!(cm.color_for(UNKNOWN_GROUP), Color32::GRAY);
        assert_ne!(cm.color_for("Female"), cm.color_for("Male"));
    }
}
