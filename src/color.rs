use std::collections::BTreeMap;

use eframe::egui::Color32;
use palette::{Hsl, IntoColor, Srgb};

use crate::data::phone::Carrier;

pub const VALID_PHONE: Color32 = Color32::from_rgb(46, 160, 67);
pub const INVALID_PHONE: Color32 = Color32::from_rgb(218, 54, 51);

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
// Carrier colours: network operator → Color32
// ---------------------------------------------------------------------------

/// One distinct tag colour per network operator.
#[derive(Debug, Clone)]
pub struct CarrierColors {
    mapping: BTreeMap<Carrier, Color32>,
    default_color: Color32,
}

impl Default for CarrierColors {
    fn default() -> Self {
        let mapping = Carrier::ALL
            .into_iter()
            .zip(generate_palette(Carrier::ALL.len()))
            .collect();
        CarrierColors {
            mapping,
            default_color: Color32::GRAY,
        }
    }
}

impl CarrierColors {
    pub fn color_for(&self, carrier: Carrier) -> Color32 {
        self.mapping
            .get(&carrier)
            .copied()
            .unwrap_or(self.default_color)
    }

    /// Legend entries (carrier name → colour) for the side panel.
    pub fn legend_entries(&self) -> Vec<(String, Color32)> {
        self.mapping
            .iter()
            .map(|(carrier, c)| (carrier.to_string(), *c))
            .collect()
    }
}

/// Cell text colour for a phone value.
pub fn validity_color(valid: bool) -> Color32 {
    if valid { VALID_PHONE } else { INVALID_PHONE }
}
