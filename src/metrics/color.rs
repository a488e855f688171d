//! Value normalization and the two-endpoint gradient used for
//! histogram-style edge coloring.

/// RGBA color — 0–255 channels, 0–1 alpha.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: f32,
}

impl Rgba {
    pub const fn new(r: u8, g: u8, b: u8, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// CSS `rgba(...)` string, consumed directly by web renderers.
    pub fn css(&self) -> String {
        format!("rgba({}, {}, {}, {})", self.r, self.g, self.b, self.a)
    }
}

/// Linear gradient between two endpoint colors.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ColorGradient {
    pub low: Rgba,
    pub high: Rgba,
}

impl ColorGradient {
    /// Blue-to-red heat ramp: small values cold, large values hot.
    pub const fn heat() -> Self {
        Self {
            low: Rgba::new(0, 100, 255, 0.7),
            high: Rgba::new(255, 100, 0, 0.7),
        }
    }

    /// One CSS color per value, min/max-normalized against the slice
    /// itself. All-equal distributions land mid-gradient.
    pub fn colors_for(&self, values: &[f64]) -> Vec<String> {
        normalize(values)
            .into_iter()
            .map(|t| self.at(t).css())
            .collect()
    }

    /// Color at position `t`, clamped to [0, 1].
    pub fn at(&self, t: f64) -> Rgba {
        let t = if t.is_nan() { 0.5 } else { t.clamp(0.0, 1.0) };
        let lerp = |a: u8, b: u8| (a as f64 + (b as f64 - a as f64) * t).round() as u8;
        Rgba {
            r: lerp(self.low.r, self.high.r),
            g: lerp(self.low.g, self.high.g),
            b: lerp(self.low.b, self.high.b),
            a: (self.low.a as f64 + (self.high.a as f64 - self.low.a as f64) * t) as f32,
        }
    }
}

impl Default for ColorGradient {
    fn default() -> Self {
        Self::heat()
    }
}

/// Scope over which link values are min/max-normalized when coloring a
/// frame sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorScope {
    /// Each frame normalized against its own links.
    #[default]
    PerFrame,
    /// One min/max across every frame of the sequence, so colors stay
    /// comparable through an animation.
    Global,
}

/// Min and max of `values`. `None` for an empty slice.
pub fn min_max(values: &[f64]) -> Option<(f64, f64)> {
    let first = *values.first()?;
    let mut min = first;
    let mut max = first;
    for &v in &values[1..] {
        min = min.min(v);
        max = max.max(v);
    }
    Some((min, max))
}

/// Position of `value` within [min, max]; 0.5 when the range is degenerate
/// (all-equal distribution).
pub fn normalize_value(value: f64, min: f64, max: f64) -> f64 {
    if max == min {
        0.5
    } else {
        (value - min) / (max - min)
    }
}

/// Normalize every value into [0, 1] against the slice's own min/max.
pub fn normalize(values: &[f64]) -> Vec<f64> {
    match min_max(values) {
        None => Vec::new(),
        Some((min, max)) => values
            .iter()
            .map(|&v| normalize_value(v, min, max))
            .collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_spread() {
        assert_eq!(normalize(&[10.0, 20.0, 30.0]), vec![0.0, 0.5, 1.0]);
    }

    #[test]
    fn test_normalize_degenerate() {
        assert_eq!(normalize(&[5.0, 5.0, 5.0]), vec![0.5, 0.5, 0.5]);
    }

    #[test]
    fn test_normalize_empty() {
        assert!(normalize(&[]).is_empty());
    }

    #[test]
    fn test_heat_endpoints() {
        let g = ColorGradient::heat();
        assert_eq!(g.at(0.0), Rgba::new(0, 100, 255, 0.7));
        assert_eq!(g.at(1.0), Rgba::new(255, 100, 0, 0.7));
    }

    #[test]
    fn test_gradient_midpoint() {
        let g = ColorGradient::heat();
        let mid = g.at(0.5);
        assert_eq!(mid.r, 128);
        assert_eq!(mid.g, 100);
        assert_eq!(mid.b, 128);
    }

    #[test]
    fn test_gradient_clamps() {
        let g = ColorGradient::heat();
        assert_eq!(g.at(-2.0), g.at(0.0));
        assert_eq!(g.at(7.0), g.at(1.0));
    }

    #[test]
    fn test_css_format() {
        assert_eq!(Rgba::new(255, 100, 0, 0.7).css(), "rgba(255, 100, 0, 0.7)");
    }

    #[test]
    fn test_colors_for() {
        let colors = ColorGradient::heat().colors_for(&[10.0, 20.0, 30.0]);
        assert_eq!(
            colors,
            vec![
                "rgba(0, 100, 255, 0.7)",
                "rgba(128, 100, 128, 0.7)",
                "rgba(255, 100, 0, 0.7)",
            ]
        );
        assert_eq!(
            ColorGradient::heat().colors_for(&[5.0, 5.0]),
            vec!["rgba(128, 100, 128, 0.7)"; 2]
        );
    }

    // Property-based tests using proptest
    use proptest::prelude::*;

    proptest! {
        #[test]
        fn test_normalized_values_stay_in_unit_range(
            values in prop::collection::vec(0.0f64..1e9, 1..100)
        ) {
            for v in normalize(&values) {
                prop_assert!((0.0..=1.0).contains(&v));
            }
        }

        #[test]
        fn test_min_maps_to_zero_and_max_to_one(
            values in prop::collection::vec(0.0f64..1e9, 2..100)
        ) {
            let (min, max) = min_max(&values).unwrap();
            prop_assume!(max > min);
            let normalized = normalize(&values);
            let lo = values.iter().position(|&v| v == min).unwrap();
            let hi = values.iter().position(|&v| v == max).unwrap();
            prop_assert_eq!(normalized[lo], 0.0);
            prop_assert_eq!(normalized[hi], 1.0);
        }
    }
}
