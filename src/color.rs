use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

// ---------------------------------------------------------------------------
// Color palette generator
// ---------------------------------------------------------------------------

/// Line colour of the combined series.
pub const COMBINED_COLOR: Color32 = Color32::from_rgb(230, 230, 230);

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
// Source name → Color32
// ---------------------------------------------------------------------------

/// Distinct chart colours for the opened sources, assigned in open order.
#[derive(Debug, Clone, Default)]
pub struct SourceColors {
    mapping: BTreeMap<String, Color32>,
}

impl SourceColors {
    pub fn new<'a>(names: impl Iterator<Item = &'a str>) -> Self {
        let mut unique: Vec<&str> = Vec::new();
        for name in names {
            if !unique.contains(&name) {
                unique.push(name);
            }
        }
        let mapping = unique
            .iter()
            .zip(generate_palette(unique.len()))
            .map(|(name, c)| (name.to_string(), c))
            .collect();
        SourceColors { mapping }
    }

    pub fn color_for(&self, name: &str) -> Color32 {
        self.mapping.get(name).copied().unwrap_or(Color32::GRAY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_size_matches() {
        assert!(generate_palette(0).is_empty());
        let p = generate_palette(4);
        assert_eq!(p.len(), 4);
        assert_ne!(p[0], p[2]);
    }

    #[test]
    fn duplicate_names_share_a_colour() {
        let colors = SourceColors::new(["2024.csv", "2025.csv", "2024.csv"].into_iter());
        assert_ne!(colors.color_for("2024.csv"), colors.color_for("2025.csv"));
        assert_eq!(colors.color_for("missing.csv"), Color32::GRAY);
    }
}
