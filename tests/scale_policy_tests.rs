use geochart_rs::api::{ChartEngine, ChartEngineConfig};
use geochart_rs::core::{
    ChartKind, GeoExtent, GeoPoint, ProjectionParams, ScalePolicy, ScalePolicyTuning,
};
use geochart_rs::error::ChartError;
use geochart_rs::render::NullRasterizer;

fn config(kind: ChartKind) -> ChartEngineConfig {
    let extent = GeoExtent::new(48.0, 47.0, -122.0, -123.0).expect("valid extent");
    let projection = ProjectionParams::from_scale_ppm(GeoPoint::new(47.5, -122.5), 0.15)
        .expect("valid params");
    ChartEngineConfig::new(kind, extent, projection, 25_000.0)
        .with_preferred_scales(vec![10_000.0, 25_000.0, 50_000.0])
}

#[test]
fn overzoom_is_a_pure_widening_of_the_minimum_bound() {
    let policy = ScalePolicy::new(25_000.0, &[]).expect("valid policy");

    let strict = policy.min_scale(1.0, false);
    let widened = policy.min_scale(1.0, true);
    assert!(widened < strict);

    // Same inputs, same outputs; no hidden state.
    assert_eq!(policy.min_scale(1.0, true), widened);
    assert_eq!(policy.max_scale(1.0, 1280), policy.max_scale(1.0, 1280));
}

#[test]
fn tuned_overzoom_multiplier_is_respected() {
    let tuning = ScalePolicyTuning {
        overzoom_factor: 16.0,
        ..ScalePolicyTuning::default()
    };
    let policy = ScalePolicy::new_tuned(25_000.0, &[], tuning).expect("valid policy");

    let ratio = policy.min_scale(1.0, false) / policy.min_scale(1.0, true);
    assert!((ratio - 16.0).abs() < 1e-9);
}

#[test]
fn raster_engine_grants_overzoom() {
    let engine =
        ChartEngine::new(NullRasterizer::default(), config(ChartKind::Raster)).expect("engine");
    let bound = engine.min_scale(1.0, true).expect("overzoom supported");
    assert!(bound > 0.0);
}

#[test]
fn vector_engine_refuses_overzoom_at_the_capability_boundary() {
    let engine =
        ChartEngine::new(NullRasterizer::default(), config(ChartKind::Vector)).expect("engine");

    let result = engine.min_scale(1.0, true);
    assert!(matches!(
        result,
        Err(ChartError::UnsupportedCapability { .. })
    ));

    // Without overzoom the same query is fine.
    assert!(engine.min_scale(1.0, false).is_ok());
}

#[test]
fn engine_snaps_to_the_nearest_preferred_scale() {
    let engine =
        ChartEngine::new(NullRasterizer::default(), config(ChartKind::Raster)).expect("engine");
    assert_eq!(engine.nearest_preferred_scale(30_000.0), 25_000.0);
    assert_eq!(engine.nearest_preferred_scale(200_000.0), 50_000.0);
}
