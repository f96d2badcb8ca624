use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::error::{ChartError, ChartResult};

/// Tuning controls for zoom bounds around a chart's nominal scale.
///
/// All factors are ratios >= 1. The overzoom factor is the chart-specific
/// policy constant that widens the minimum bound when a caller permits
/// magnification past the designed scale.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ScalePolicyTuning {
    pub zoom_in_factor: f64,
    pub zoom_out_factor: f64,
    pub overzoom_factor: f64,
    pub reference_canvas_width_px: f64,
}

impl Default for ScalePolicyTuning {
    fn default() -> Self {
        Self {
            zoom_in_factor: 4.0,
            zoom_out_factor: 2.0,
            overzoom_factor: 8.0,
            reference_canvas_width_px: 1280.0,
        }
    }
}

impl ScalePolicyTuning {
    fn validate(self) -> ChartResult<Self> {
        for (name, value) in [
            ("zoom_in_factor", self.zoom_in_factor),
            ("zoom_out_factor", self.zoom_out_factor),
            ("overzoom_factor", self.overzoom_factor),
        ] {
            if !value.is_finite() || value < 1.0 {
                return Err(ChartError::InvalidData(format!(
                    "scale policy factor `{name}` must be finite and >= 1"
                )));
            }
        }
        if !self.reference_canvas_width_px.is_finite() || self.reference_canvas_width_px <= 0.0 {
            return Err(ChartError::InvalidData(
                "scale policy reference canvas width must be finite and > 0".to_owned(),
            ));
        }
        Ok(self)
    }
}

/// Zoom bounds and scale snapping for one chart.
///
/// Scales are natural-scale denominators (1:25000 is `25_000.0`). Every
/// method is a pure function of chart metadata and caller intent.
#[derive(Debug, Clone, PartialEq)]
pub struct ScalePolicy {
    native_scale: f64,
    preferred_scales: SmallVec<[f64; 8]>,
    tuning: ScalePolicyTuning,
}

impl ScalePolicy {
    pub fn new(native_scale: f64, preferred_scales: &[f64]) -> ChartResult<Self> {
        Self::new_tuned(native_scale, preferred_scales, ScalePolicyTuning::default())
    }

    pub fn new_tuned(
        native_scale: f64,
        preferred_scales: &[f64],
        tuning: ScalePolicyTuning,
    ) -> ChartResult<Self> {
        if !native_scale.is_finite() || native_scale <= 0.0 {
            return Err(ChartError::InvalidData(
                "native scale must be finite and > 0".to_owned(),
            ));
        }
        let mut preferred: SmallVec<[f64; 8]> = SmallVec::new();
        for &scale in preferred_scales {
            if !scale.is_finite() || scale <= 0.0 {
                return Err(ChartError::InvalidData(
                    "preferred scales must be finite and > 0".to_owned(),
                ));
            }
            preferred.push(scale);
        }
        preferred.sort_by_key(|&scale| OrderedFloat(scale));

        Ok(Self {
            native_scale,
            preferred_scales: preferred,
            tuning: tuning.validate()?,
        })
    }

    #[must_use]
    pub const fn native_scale(&self) -> f64 {
        self.native_scale
    }

    #[must_use]
    pub fn preferred_scales(&self) -> &[f64] {
        &self.preferred_scales
    }

    /// Smallest usable scale denominator (deepest zoom-in).
    ///
    /// `allow_overzoom` widens the bound by the tuned overzoom factor.
    #[must_use]
    pub fn min_scale(&self, canvas_scale_factor: f64, allow_overzoom: bool) -> f64 {
        let base = self.native_scale * canvas_scale_factor.max(0.0) / self.tuning.zoom_in_factor;
        if allow_overzoom {
            base / self.tuning.overzoom_factor
        } else {
            base
        }
    }

    /// Largest usable scale denominator (furthest zoom-out).
    ///
    /// Wider canvases tolerate more zoom-out before the chart dissolves into
    /// background, so the bound grows with width past the reference canvas.
    #[must_use]
    pub fn max_scale(&self, canvas_scale_factor: f64, canvas_width_px: u32) -> f64 {
        let width_ratio = f64::from(canvas_width_px) / self.tuning.reference_canvas_width_px;
        self.native_scale
            * canvas_scale_factor.max(0.0)
            * self.tuning.zoom_out_factor
            * width_ratio.max(1.0)
    }

    /// Snaps a requested scale to the closest preferred scale.
    ///
    /// A chart with no preferred scales returns the target unchanged.
    #[must_use]
    pub fn nearest_preferred_scale(&self, target: f64) -> f64 {
        if !target.is_finite() {
            return self.native_scale;
        }
        self.preferred_scales
            .iter()
            .copied()
            .min_by_key(|&scale| OrderedFloat((scale - target).abs()))
            .unwrap_or(target)
    }
}

#[cfg(test)]
mod tests {
    use super::{ScalePolicy, ScalePolicyTuning};

    #[test]
    fn overzoom_widens_the_minimum_bound() {
        let policy = ScalePolicy::new(25_000.0, &[]).expect("valid policy");
        let strict = policy.min_scale(1.0, false);
        let overzoomed = policy.min_scale(1.0, true);
        assert!(overzoomed < strict);
        assert!((strict / overzoomed - 8.0).abs() < 1e-9);
    }

    #[test]
    fn max_scale_grows_with_canvas_width() {
        let policy = ScalePolicy::new(25_000.0, &[]).expect("valid policy");
        let narrow = policy.max_scale(1.0, 1280);
        let wide = policy.max_scale(1.0, 2560);
        assert!((wide / narrow - 2.0).abs() < 1e-9);
    }

    #[test]
    fn nearest_preferred_scale_snaps_to_closest() {
        let policy =
            ScalePolicy::new(25_000.0, &[10_000.0, 25_000.0, 50_000.0]).expect("valid policy");
        assert_eq!(policy.nearest_preferred_scale(30_000.0), 25_000.0);
        assert_eq!(policy.nearest_preferred_scale(45_000.0), 50_000.0);
        assert_eq!(policy.nearest_preferred_scale(1.0), 10_000.0);
    }

    #[test]
    fn empty_preferred_list_returns_target() {
        let policy = ScalePolicy::new(25_000.0, &[]).expect("valid policy");
        assert_eq!(policy.nearest_preferred_scale(12_345.0), 12_345.0);
    }

    #[test]
    fn invalid_tuning_is_rejected() {
        let tuning = ScalePolicyTuning {
            overzoom_factor: 0.5,
            ..ScalePolicyTuning::default()
        };
        assert!(ScalePolicy::new_tuned(25_000.0, &[], tuning).is_err());
    }
}
