use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};

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
            to_color32(rgb)
        })
        .collect()
}

fn to_color32(rgb: Srgb) -> Color32 {
    Color32::from_rgb(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Color mapping: gender → Color32
// ---------------------------------------------------------------------------

/// Maps each gender of the dataset to a distinct colour, so a gender keeps
/// its colour whichever filter is active.
#[derive(Debug, Clone)]
pub struct ColorMap {
    mapping: BTreeMap<String, Color32>,
    default_color: Color32,
}

impl ColorMap {
    /// Build a colour map from the distinct genders, in encountered order.
    pub fn new(genders: &[String]) -> Self {
        let palette = generate_palette(genders.len());
        let mapping: BTreeMap<String, Color32> = genders
            .iter()
            .cloned()
            .zip(palette)
            .collect();

        ColorMap {
            mapping,
            default_color: Color32::GRAY,
        }
    }

    /// Look up the colour for a given gender.
    pub fn color_for(&self, gender: &str) -> Color32 {
        self.mapping
            .get(gender)
            .copied()
            .unwrap_or(self.default_color)
    }
}

// ---------------------------------------------------------------------------
// Diverging scale for correlations
// ---------------------------------------------------------------------------

/// Reversed red-blue scale: -1 is dark blue, 0 white, +1 dark red.
/// NaN maps to grey.
pub fn diverging(value: f64) -> Color32 {
    if value.is_nan() {
        return Color32::from_gray(160);
    }
    let t = value.clamp(-1.0, 1.0) as f32;
    let white: LinSrgb = Srgb::new(0.97f32, 0.97, 0.97).into_linear();
    let end: LinSrgb = if t < 0.0 {
        Srgb::new(0.020f32, 0.188, 0.380).into_linear()
    } else {
        Srgb::new(0.404f32, 0.0, 0.122).into_linear()
    };
    let mixed = white.mix(end, t.abs());
    to_color32(Srgb::from_linear(mixed))
}

/// Dark text on light cells, light text on dark cells.
pub fn contrast_text(background: Color32) -> Color32 {
    let [r, g, b, _] = background.to_array();
    let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
    if luma > 140.0 {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn palette_is_distinct() {
        let colors = generate_palette(3);
        assert_eq!(colors.len(), 3);
        assert_ne!(colors[0], colors[1]);
        assert_ne!(colors[1], colors[2]);
        assert!(generate_palette(0).is_empty());
    }

    #[test]
    fn unknown_gender_is_grey() {
        let map = ColorMap::new(&["F".to_string(), "M".to_string()]);
        assert_ne!(map.color_for("F"), map.color_for("M"));
        assert_eq!(map.color_for("X"), Color32::GRAY);
    }

    #[test]
    fn diverging_scale_is_centred_on_white() {
        let zero = diverging(0.0);
        let [r, g, b, _] = zero.to_array();
        assert!(r > 240 && g > 240 && b > 240);

        let [r, _, b, _] = diverging(1.0).to_array();
        assert!(r > b);
        let [r, _, b, _] = diverging(-1.0).to_array();
        assert!(b > r);
        assert_eq!(diverging(f64::NAN), Color32::from_gray(160));
    }

    #[test]
    fn text_contrasts_with_cell() {
        assert_eq!(contrast_text(diverging(0.0)), Color32::BLACK);
        assert_eq!(contrast_text(diverging(1.0)), Color32::WHITE);
    }
}
