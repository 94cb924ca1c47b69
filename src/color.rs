use eframe::egui::Color32;
use palette::{LinSrgb, Mix, Srgb};

// ---------------------------------------------------------------------------
// Red → yellow → green gradient
// ---------------------------------------------------------------------------

/// Low, middle and high stops of the RdYlGn diverging scale.
const LOW: (u8, u8, u8) = (0xa5, 0x00, 0x26);
const MID: (u8, u8, u8) = (0xff, 0xff, 0xbf);
const HIGH: (u8, u8, u8) = (0x00, 0x68, 0x37);

/// Relative luminance above which dark text reads better.
const TEXT_LUMINANCE_THRESHOLD: f32 = 0.408;

fn linear((r, g, b): (u8, u8, u8)) -> LinSrgb {
    Srgb::new(r, g, b).into_format::<f32>().into_linear()
}

fn to_color32(color: LinSrgb) -> Color32 {
    let rgb: Srgb = Srgb::from_linear(color);
    Color32::from_rgb(
        (rgb.red * 255.0).round() as u8,
        (rgb.green * 255.0).round() as u8,
        (rgb.blue * 255.0).round() as u8,
    )
}

/// Color at position `t` in `0.0..=1.0` (clamped) of the gradient.
pub fn gradient_color(t: f32) -> Color32 {
    let t = t.clamp(0.0, 1.0);
    let mixed = if t < 0.5 {
        linear(LOW).mix(linear(MID), t * 2.0)
    } else {
        linear(MID).mix(linear(HIGH), (t - 0.5) * 2.0)
    };
    to_color32(mixed)
}

/// Black or white, whichever contrasts with `background`.
pub fn text_color_for(background: Color32) -> Color32 {
    let lin = linear((background.r(), background.g(), background.b()));
    let luminance = 0.2126 * lin.red + 0.7152 * lin.green + 0.0722 * lin.blue;
    if luminance > TEXT_LUMINANCE_THRESHOLD {
        Color32::BLACK
    } else {
        Color32::WHITE
    }
}

// ---------------------------------------------------------------------------
// GradientScale: numeric column → Color32
// ---------------------------------------------------------------------------

/// Maps the values of one column onto the gradient, normalized over the
/// column's own min..max.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GradientScale {
    min: f64,
    max: f64,
}

impl GradientScale {
    /// Build from the column values; absent values are ignored. `None` when
    /// there is no value at all.
    pub fn from_values(values: impl IntoIterator<Item = Option<f64>>) -> Option<Self> {
        values.into_iter().flatten().fold(None, |acc, v| {
            Some(match acc {
                None => GradientScale { min: v, max: v },
                Some(s) => GradientScale {
                    min: s.min.min(v),
                    max: s.max.max(v),
                },
            })
        })
    }

    /// Position of `value` within the scale. A flat column maps to the low end.
    pub fn position(&self, value: f64) -> f32 {
        let range = self.max - self.min;
        if range.abs() < f64::EPSILON {
            0.0
        } else {
            ((value - self.min) / range).clamp(0.0, 1.0) as f32
        }
    }

    /// Look up the background color for a value. Absent values are uncolored.
    pub fn color_for(&self, value: Option<f64>) -> Option<Color32> {
        value.map(|v| gradient_color(self.position(v)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn endpoints_match_the_stops() {
        assert_eq!(gradient_color(0.0), Color32::from_rgb(0xa5, 0x00, 0x26));
        assert_eq!(gradient_color(0.5), Color32::from_rgb(0xff, 0xff, 0xbf));
        assert_eq!(gradient_color(1.0), Color32::from_rgb(0x00, 0x68, 0x37));
        assert_eq!(gradient_color(-3.0), gradient_color(0.0));
        assert_eq!(gradient_color(7.0), gradient_color(1.0));
    }

    #[test]
    fn scale_normalizes_over_present_values() {
        let scale = GradientScale::from_values([Some(50.0), None, Some(100.0), Some(75.0)]).unwrap();
        assert_eq!(scale.position(50.0), 0.0);
        assert_eq!(scale.position(75.0), 0.5);
        assert_eq!(scale.position(100.0), 1.0);
        assert_eq!(scale.color_for(Some(100.0)), Some(gradient_color(1.0)));
        assert_eq!(scale.color_for(None), None);
    }

    #[test]
    fn flat_or_empty_columns() {
        assert!(GradientScale::from_values([None, None]).is_none());
        let flat = GradientScale::from_values([Some(80.0), Some(80.0)]).unwrap();
        assert_eq!(flat.color_for(Some(80.0)), Some(gradient_color(0.0)));
    }

    #[test]
    fn text_contrast() {
        assert_eq!(text_color_for(gradient_color(0.0)), Color32::WHITE);
        assert_eq!(text_color_for(gradient_color(0.5)), Color32::BLACK);
        assert_eq!(text_color_for(gradient_color(1.0)), Color32::WHITE);
    }
}
