use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use thermo_wheel::Label;

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
// Label → Color32
// ---------------------------------------------------------------------------

/// Colours used for the two labels in the table and charts.
#[derive(Debug, Clone, Copy)]
pub struct LabelColors {
    pub positive: Color32,
    pub negative: Color32,
}

impl Default for LabelColors {
    fn default() -> Self {
        // Hue 0 (red) for positive, the opposite side of the wheel for negative.
        let palette = generate_palette(2);
        Self {
            positive: palette.first().copied().unwrap_or(Color32::RED),
            negative: palette.get(1).copied().unwrap_or(Color32::LIGHT_BLUE),
        }
    }
}

impl LabelColors {
    pub fn color_for(&self, label: Label) -> Color32 {
        match label {
            Label::Positive => self.positive,
            Label::Negative => self.negative,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_palette_size() {
        assert!(generate_palette(0).is_empty());
        assert_eq!(generate_palette(3).len(), 3);
    }

    #[test]
    fn test_label_colors_differ() {
        let colors = LabelColors::default();
        assert_ne!(colors.color_for(Label::Positive), colors.color_for(Label::Negative));
    }
}
