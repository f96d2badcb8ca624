use geochart_rs::api::{ChartEngine, ChartEngineConfig};
use geochart_rs::core::{
    ChartKind, CoverageArea, CoverageSet, GeoExtent, GeoPoint, ProjectionParams, ViewportState,
};
use geochart_rs::error::ChartError;
use geochart_rs::render::SoftwareRasterizer;

fn config(kind: ChartKind) -> ChartEngineConfig {
    let extent = GeoExtent::new(48.0, 47.0, -122.0, -123.0).expect("valid extent");
    let projection = ProjectionParams::from_scale_ppm(GeoPoint::new(47.5, -122.5), 0.15)
        .expect("valid params");
    let coverage = CoverageSet::new(vec![
        CoverageArea::new(vec![
            GeoPoint::new(47.2, -122.8),
            GeoPoint::new(47.2, -122.2),
            GeoPoint::new(47.8, -122.2),
            GeoPoint::new(47.8, -122.8),
        ])
        .expect("valid polygon"),
    ]);
    ChartEngineConfig::new(kind, extent, projection, 25_000.0).with_coverage(coverage)
}

#[test]
fn thumbnail_matches_requested_dimensions_exactly() {
    let mut engine =
        ChartEngine::new(SoftwareRasterizer::new(), config(ChartKind::Raster)).expect("engine");

    let thumbnail = engine.thumbnail(120, 160).expect("thumbnail");
    assert_eq!(thumbnail.width(), 120);
    assert_eq!(thumbnail.height(), 160);
    assert!(thumbnail.data().iter().any(|&b| b != 0));
}

#[test]
fn thumbnail_leaves_the_render_cache_untouched() {
    let mut engine =
        ChartEngine::new(SoftwareRasterizer::new(), config(ChartKind::Raster)).expect("engine");

    let request = ViewportState::new(GeoPoint::new(47.5, -122.5), 100.0, 0.0, 200, 150)
        .expect("valid viewport");
    let _ = engine.render(request).expect("main render");
    let stats_before = engine.cache_stats();

    let _ = engine.thumbnail(64, 64).expect("thumbnail");

    assert_eq!(engine.cache_stats(), stats_before);
    let view = engine.render(request).expect("main render again");
    assert!(view.reused_cache);
}

#[test]
fn vector_charts_do_not_thumbnail() {
    let mut engine =
        ChartEngine::new(SoftwareRasterizer::new(), config(ChartKind::Vector)).expect("engine");
    let result = engine.thumbnail(64, 64);
    assert!(matches!(
        result,
        Err(ChartError::UnsupportedCapability { .. })
    ));
}
