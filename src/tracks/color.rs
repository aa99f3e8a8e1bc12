//! Per-residue value → RGB color mapping.
//!
//! A [`FeatureScale`] anchors its bounds at zero so that a value of `0`
//! always maps to white: negative values tint toward red, positive values
//! toward green, each relative to the most extreme value on its side.
//! Colors come from a [`ColorRamp`] so callers can swap the palette.

use crate::options::ColorOptions;
use crate::source::ChainModel;

/// A color ramp defined by N evenly-spaced color stops.
/// `t = 0` maps to the first color, `t = 1` maps to the last.
#[derive(Debug, Clone, PartialEq)]
pub struct ColorRamp {
    stops: Vec<[f32; 3]>,
}

impl ColorRamp {
    /// Ramp through `stops`. Needs at least two stops.
    #[must_use]
    pub fn new(stops: Vec<[f32; 3]>) -> Option<Self> {
        (stops.len() >= 2).then_some(Self { stops })
    }

    /// Ramp through `#rrggbb` stops; `None` if any stop fails to parse.
    #[must_use]
    pub fn from_hex(stops: &[&str]) -> Option<Self> {
        let stops = stops
            .iter()
            .map(|s| ColorOptions::parse_hex(s))
            .collect::<Option<Vec<_>>>()?;
        Self::new(stops)
    }

    /// Interpolate the ramp at position `t` in [0, 1].
    #[must_use]
    pub fn sample(&self, t: f32) -> [f32; 3] {
        let t = t.clamp(0.0, 1.0);
        let n = self.stops.len() - 1;
        let scaled = t * n as f32;
        let idx = (scaled as usize).min(n - 1);
        let frac = scaled - idx as f32;

        let a = &self.stops[idx];
        let b = &self.stops[idx + 1];
        [
            a[0] + (b[0] - a[0]) * frac,
            a[1] + (b[1] - a[1]) * frac,
            a[2] + (b[2] - a[2]) * frac,
        ]
    }
}

impl Default for ColorRamp {
    /// Red → White → Green
    fn default() -> Self {
        Self {
            stops: vec![
                [1.0, 0.0, 0.0], // most negative
                [1.0, 1.0, 1.0], // zero
                [0.0, 1.0, 0.0], // most positive
            ],
        }
    }
}

/// Value bounds of one residue feature, anchored at zero.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FeatureScale {
    /// Smallest value, never above zero.
    pub min: f64,
    /// Largest value, never below zero.
    pub max: f64,
}

impl FeatureScale {
    /// Bounds over `values`. Non-finite values are ignored.
    #[must_use]
    pub fn from_values(values: &[f64]) -> Self {
        values
            .iter()
            .filter(|v| v.is_finite())
            .fold(Self::default(), |scale, &v| Self {
                min: scale.min.min(v),
                max: scale.max.max(v),
            })
    }

    /// Bounds of `feature` over the residues of `model`.
    #[must_use]
    pub fn for_feature(model: &ChainModel, feature: &str) -> Self {
        Self::from_values(&model.residue_feature(feature))
    }

    /// Map `value` into [0, 1] with zero at 0.5.
    #[must_use]
    pub fn normalize(&self, value: f64) -> f32 {
        let t = if value < 0.0 && self.min < 0.0 {
            0.5 - 0.5 * (value / self.min).min(1.0)
        } else if value > 0.0 && self.max > 0.0 {
            0.5 + 0.5 * (value / self.max).min(1.0)
        } else {
            0.5
        };
        t as f32
    }

    /// Color for `value` on the default red/white/green ramp.
    #[must_use]
    pub fn color(&self, value: f64) -> [f32; 3] {
        self.color_with_ramp(value, &ColorRamp::default())
    }

    /// Color for `value` on a custom ramp.
    #[must_use]
    pub fn color_with_ramp(&self, value: f64, ramp: &ColorRamp) -> [f32; 3] {
        ramp.sample(self.normalize(value))
    }
}

/// Color every residue of `model` by `feature`, in residue order.
#[must_use]
pub fn per_residue_feature_colors(
    model: &ChainModel,
    feature: &str,
) -> Vec<[f32; 3]> {
    let values = model.residue_feature(feature);
    let scale = FeatureScale::from_values(&values);
    log::debug!(
        "coloring by {feature}: {} residues, scale [{}, {}]",
        values.len(),
        scale.min,
        scale.max
    );
    values.iter().map(|&v| scale.color(v)).collect()
}
