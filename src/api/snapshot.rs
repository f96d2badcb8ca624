use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::core::{ChartKind, GeoExtent};
use crate::error::{ChartError, ChartResult};
use crate::render::{CacheState, CacheStats, ColorScheme, Rasterizer};

use super::ChartEngine;

/// Serializable deterministic state snapshot used by regression tests and
/// debugging tooling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EngineSnapshot {
    pub kind: ChartKind,
    pub color_scheme: ColorScheme,
    pub extent: GeoExtent,
    pub coverage_count: usize,
    pub contour_count: usize,
    pub sounding_count: usize,
    pub cache_state: CacheState,
    pub cache_stats: CacheStats,
    pub metadata: IndexMap<String, String>,
}

impl<R: Rasterizer> ChartEngine<R> {
    #[must_use]
    pub fn snapshot(&self) -> EngineSnapshot {
        EngineSnapshot {
            kind: self.chart_kind(),
            color_scheme: self.color_scheme(),
            extent: self.extent(),
            coverage_count: self.coverage().count(),
            contour_count: self.features().contours.len(),
            sounding_count: self.features().soundings.len(),
            cache_state: self.cache_state(),
            cache_stats: self.cache_stats(),
            metadata: self.metadata().clone(),
        }
    }

    pub fn snapshot_json_pretty(&self) -> ChartResult<String> {
        serde_json::to_string_pretty(&self.snapshot())
            .map_err(|err| ChartError::InvalidData(format!("snapshot serialization failed: {err}")))
    }
}
