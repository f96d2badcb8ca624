use criterion::{Criterion, criterion_group, criterion_main};
use geochart_rs::api::{ChartEngine, ChartEngineConfig};
use geochart_rs::core::{
    ChartKind, CoverageArea, CoverageSet, DepthContour, ChartFeatures, GeoExtent, GeoPoint,
    MercatorProjection, ProjectionParams, ViewportState,
};
use geochart_rs::render::SoftwareRasterizer;
use std::hint::black_box;

fn bench_projection_round_trip(c: &mut Criterion) {
    let params = ProjectionParams::from_scale_ppm(GeoPoint::new(47.5, -122.5), 0.15)
        .expect("valid params");
    let projection = MercatorProjection::new(params);

    c.bench_function("projection_round_trip", |b| {
        b.iter(|| {
            let pixel = projection
                .to_pixel(black_box(GeoPoint::new(47.9163, -122.01)))
                .expect("to pixel");
            let _ = projection.to_geo(pixel).expect("to geo");
        })
    });
}

fn bench_config() -> ChartEngineConfig {
    let extent = GeoExtent::new(48.0, 47.0, -122.0, -123.0).expect("valid extent");
    let projection = ProjectionParams::from_scale_ppm(GeoPoint::new(47.5, -122.5), 0.15)
        .expect("valid params");
    let coverage = CoverageSet::new(vec![
        CoverageArea::new(vec![
            GeoPoint::new(47.0, -123.0),
            GeoPoint::new(47.0, -122.0),
            GeoPoint::new(48.0, -122.0),
            GeoPoint::new(48.0, -123.0),
        ])
        .expect("valid polygon"),
    ]);

    let contours: Vec<DepthContour> = (0..100)
        .map(|i| {
            let offset = f64::from(i) * 0.005;
            DepthContour::new(
                f64::from(i % 40),
                vec![
                    GeoPoint::new(47.1 + offset, -122.9),
                    GeoPoint::new(47.1 + offset, -122.5),
                    GeoPoint::new(47.15 + offset, -122.1),
                ],
            )
            .expect("valid contour")
        })
        .collect();

    ChartEngineConfig::new(ChartKind::Raster, extent, projection, 25_000.0)
        .with_coverage(coverage)
        .with_features(ChartFeatures::new(contours, Vec::new()))
}

fn bench_render_pass_256(c: &mut Criterion) {
    let mut engine =
        ChartEngine::new(SoftwareRasterizer::new(), bench_config()).expect("engine init");
    let level = ViewportState::new(GeoPoint::new(47.5, -122.5), 0.001, 0.0, 256, 256)
        .expect("valid viewport");
    let rotated = ViewportState::new(GeoPoint::new(47.5, -122.5), 0.001, 10.0, 256, 256)
        .expect("valid viewport");

    c.bench_function("render_pass_256", |b| {
        let mut flip = false;
        b.iter(|| {
            // Alternate rotation so every iteration runs a full pass.
            flip = !flip;
            let viewport = if flip { rotated } else { level };
            let view = engine.render(black_box(viewport)).expect("render");
            assert!(!view.reused_cache);
        })
    });
}

fn bench_cache_hit(c: &mut Criterion) {
    let mut engine =
        ChartEngine::new(SoftwareRasterizer::new(), bench_config()).expect("engine init");
    let viewport = ViewportState::new(GeoPoint::new(47.5, -122.5), 0.001, 0.0, 256, 256)
        .expect("valid viewport");
    let _ = engine.render(viewport).expect("warm the cache");

    c.bench_function("cache_hit", |b| {
        b.iter(|| {
            let view = engine.render(black_box(viewport)).expect("render");
            assert!(view.reused_cache);
        })
    });
}

criterion_group!(
    benches,
    bench_projection_round_trip,
    bench_render_pass_256,
    bench_cache_hit
);
criterion_main!(benches);
