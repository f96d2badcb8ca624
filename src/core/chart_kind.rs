use serde::{Deserialize, Serialize};

use crate::error::{ChartError, ChartResult};

/// Chart variants modeled as a closed tagged set.
///
/// Each kind declares the capability set it supports up front; composition
/// checks requests against the declaration instead of probing optional
/// overrides at call time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum ChartKind {
    #[default]
    Raster,
    Vector,
}

impl ChartKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Raster => "raster",
            Self::Vector => "vector",
        }
    }

    #[must_use]
    pub const fn capabilities(self) -> ChartCapabilities {
        match self {
            // Raster charts carry a fixed native raster: overzoom and
            // thumbnails come for free, rotation resamples the raster.
            Self::Raster => ChartCapabilities {
                thumbnails: true,
                overzoom: true,
                rotated_render: true,
            },
            // Vector charts re-symbolize at any scale, so overzoom is
            // meaningless and no precomputed thumbnail exists.
            Self::Vector => ChartCapabilities {
                thumbnails: false,
                overzoom: false,
                rotated_render: true,
            },
        }
    }

    /// Fails unless this kind declares the named capability.
    pub fn require(self, capability: Capability) -> ChartResult<()> {
        let declared = self.capabilities();
        let supported = match capability {
            Capability::Thumbnails => declared.thumbnails,
            Capability::Overzoom => declared.overzoom,
            Capability::RotatedRender => declared.rotated_render,
        };
        if supported {
            Ok(())
        } else {
            Err(ChartError::UnsupportedCapability {
                kind: self.name(),
                capability: capability.name(),
            })
        }
    }
}

/// Capability set a chart kind declares at composition time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChartCapabilities {
    pub thumbnails: bool,
    pub overzoom: bool,
    pub rotated_render: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Capability {
    Thumbnails,
    Overzoom,
    RotatedRender,
}

impl Capability {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Thumbnails => "thumbnails",
            Self::Overzoom => "overzoom",
            Self::RotatedRender => "rotated-render",
        }
    }
}
