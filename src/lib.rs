//! geochart-rs: geo-referenced raster chart core.
//!
//! This crate provides the viewport-driven rendering core of a chart
//! provider: a Mercator coordinate transform, coverage geometry, zoom scale
//! policy, and a most-recent-render cache with lazy invalidation. Hosts
//! supply a viewport per render call and receive an RGB buffer plus a
//! valid-region mask.

pub mod api;
pub mod core;
pub mod error;
pub mod render;
pub mod telemetry;

pub use api::{ChartEngine, ChartEngineConfig};
pub use error::{ChartError, ChartResult};
