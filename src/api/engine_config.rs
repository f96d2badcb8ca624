use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{
    ChartFeatures, ChartKind, CoverageSet, GeoExtent, ProjectionParams, ScalePolicyTuning,
};
use crate::render::{ColorScheme, ContainmentPolicy, SceneStyle};

/// Public engine bootstrap configuration.
///
/// Everything here comes from the chart loader and is finalized before the
/// first render call. The type is serializable so host applications can
/// persist chart setup without inventing their own format.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ChartEngineConfig {
    pub kind: ChartKind,
    pub extent: GeoExtent,
    pub projection: ProjectionParams,
    pub native_scale: f64,
    #[serde(default)]
    pub coverage: CoverageSet,
    #[serde(default)]
    pub features: ChartFeatures,
    #[serde(default)]
    pub preferred_scales: Vec<f64>,
    #[serde(default)]
    pub scale_tuning: ScalePolicyTuning,
    #[serde(default)]
    pub containment: ContainmentPolicy,
    #[serde(default)]
    pub scene_style: SceneStyle,
    #[serde(default)]
    pub color_scheme: ColorScheme,
    #[serde(default)]
    pub metadata: IndexMap<String, String>,
}

impl ChartEngineConfig {
    /// Creates a minimal config; everything else takes its default.
    #[must_use]
    pub fn new(
        kind: ChartKind,
        extent: GeoExtent,
        projection: ProjectionParams,
        native_scale: f64,
    ) -> Self {
        Self {
            kind,
            extent,
            projection,
            native_scale,
            coverage: CoverageSet::default(),
            features: ChartFeatures::default(),
            preferred_scales: Vec::new(),
            scale_tuning: ScalePolicyTuning::default(),
            containment: ContainmentPolicy::default(),
            scene_style: SceneStyle::default(),
            color_scheme: ColorScheme::default(),
            metadata: IndexMap::new(),
        }
    }

    #[must_use]
    pub fn with_coverage(mut self, coverage: CoverageSet) -> Self {
        self.coverage = coverage;
        self
    }

    #[must_use]
    pub fn with_features(mut self, features: ChartFeatures) -> Self {
        self.features = features;
        self
    }

    #[must_use]
    pub fn with_preferred_scales(mut self, preferred_scales: Vec<f64>) -> Self {
        self.preferred_scales = preferred_scales;
        self
    }

    #[must_use]
    pub fn with_scale_tuning(mut self, scale_tuning: ScalePolicyTuning) -> Self {
        self.scale_tuning = scale_tuning;
        self
    }

    #[must_use]
    pub fn with_containment(mut self, containment: ContainmentPolicy) -> Self {
        self.containment = containment;
        self
    }

    #[must_use]
    pub fn with_scene_style(mut self, scene_style: SceneStyle) -> Self {
        self.scene_style = scene_style;
        self
    }

    #[must_use]
    pub fn with_color_scheme(mut self, color_scheme: ColorScheme) -> Self {
        self.color_scheme = color_scheme;
        self
    }

    #[must_use]
    pub fn with_metadata_entry(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
