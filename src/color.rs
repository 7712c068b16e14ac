use palette::{Hsl, IntoColor, LinSrgb, Mix, Srgb};
use plotters::style::RGBColor;

// ---------------------------------------------------------------------------
// Series colours
// ---------------------------------------------------------------------------

/// Generates `n` visually distinct colours using evenly spaced hues.
pub fn generate_palette(n: usize) -> Vec<RGBColor> {
    if n == 0 {
        return Vec::new();
    }
    (0..n)
        .map(|i| {
            let hue = 210.0 + (i as f32 / n as f32) * 360.0;
            let hsl = Hsl::new(hue, 0.75, 0.5);
            to_rgb(hsl.into_color())
        })
        .collect()
}

/// Reference lines (y = x, zero residual).
pub const REFERENCE: RGBColor = RGBColor(214, 39, 40);
/// Cells whose value is undefined.
pub const UNDEFINED: RGBColor = RGBColor(200, 200, 200);

fn to_rgb(rgb: Srgb) -> RGBColor {
    RGBColor(
        (rgb.red.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.green.clamp(0.0, 1.0) * 255.0).round() as u8,
        (rgb.blue.clamp(0.0, 1.0) * 255.0).round() as u8,
    )
}

// ---------------------------------------------------------------------------
// Diverging colour map: value in [-1, 1] → RGBColor
// ---------------------------------------------------------------------------

/// Blue → light grey → red map for correlation heat maps, centred on zero.
#[derive(Debug, Clone)]
pub struct DivergingMap {
    cool: LinSrgb,
    neutral: LinSrgb,
    warm: LinSrgb,
}

impl Default for DivergingMap {
    fn default() -> Self {
        Self::coolwarm()
    }
}

impl DivergingMap {
    pub fn coolwarm() -> Self {
        let linear = |r: f32, g: f32, b: f32| -> LinSrgb { Srgb::new(r, g, b).into_color() };
        DivergingMap {
            cool: linear(0.230, 0.299, 0.754),
            neutral: linear(0.865, 0.865, 0.865),
            warm: linear(0.706, 0.016, 0.150),
        }
    }

    /// Colour for `value`, clamped to [-1, 1]. `NaN` maps to [`UNDEFINED`].
    pub fn color_for(&self, value: f64) -> RGBColor {
        if value.is_nan() {
            return UNDEFINED;
        }
        let t = value.clamp(-1.0, 1.0) as f32;
        let mixed = if t < 0.0 {
            self.neutral.mix(self.cool, -t)
        } else {
            self.neutral.mix(self.warm, t)
        };
        to_rgb(mixed.into_color())
    }

    /// Black or white, whichever reads better on top of `value`'s colour.
    pub fn text_color_for(&self, value: f64) -> RGBColor {
        let RGBColor(r, g, b) = self.color_for(value);
        let luma = 0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32;
        if luma > 140.0 {
            RGBColor(0, 0, 0)
        } else {
            RGBColor(255, 255, 255)
        }
    }
}
