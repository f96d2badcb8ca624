pub mod chart_kind;
pub mod coverage;
pub mod features;
pub mod projection;
pub mod scale_policy;
pub mod types;

pub use chart_kind::{Capability, ChartCapabilities, ChartKind};
pub use coverage::{CoverageArea, CoverageSet};
pub use features::{ChartFeatures, DepthContour, Sounding};
pub use projection::{EARTH_RADIUS_M, MercatorProjection, ProjectionParams, ViewTransform};
pub use scale_policy::{ScalePolicy, ScalePolicyTuning};
pub use types::{
    GeoExtent, GeoPoint, MERCATOR_LATITUDE_LIMIT_DEG, PixelPoint, ViewportState,
    normalize_longitude_deg,
};
