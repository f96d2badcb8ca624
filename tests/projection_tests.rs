use approx::assert_relative_eq;
use geochart_rs::core::{GeoPoint, MercatorProjection, PixelPoint, ProjectionParams};
use geochart_rs::error::ChartError;

fn projection_at(reference: GeoPoint) -> MercatorProjection {
    let params = ProjectionParams::from_scale_ppm(reference, 0.15).expect("valid params");
    MercatorProjection::new(params)
}

#[test]
fn round_trip_within_tolerance() {
    let projection = projection_at(GeoPoint::new(47.5, -122.5));

    for &(lat, lon) in &[
        (47.5, -122.5),
        (47.9163, -122.01),
        (0.0, 0.0),
        (-54.8, 68.3),
        (89.5, 179.5),
        (-89.5, -179.5),
    ] {
        let pixel = projection.to_pixel(GeoPoint::new(lat, lon)).expect("to pixel");
        let geo = projection.to_geo(pixel).expect("to geo");
        assert_relative_eq!(geo.lat, lat, epsilon = 1e-6);
        assert_relative_eq!(geo.lon, lon, epsilon = 1e-6);
    }
}

#[test]
fn pole_fails_with_out_of_domain() {
    let projection = projection_at(GeoPoint::new(47.5, -122.5));
    let result = projection.to_pixel(GeoPoint::new(90.0, 0.0));
    assert!(matches!(result, Err(ChartError::OutOfDomain { .. })));
}

#[test]
fn nothing_near_the_limit_produces_non_finite_values() {
    let projection = projection_at(GeoPoint::new(0.0, 0.0));
    let pixel = projection
        .to_pixel(GeoPoint::new(89.89, 0.0))
        .expect("just inside the band");
    assert!(pixel.x.is_finite());
    assert!(pixel.y.is_finite());
}

#[test]
fn nan_input_is_rejected_not_propagated() {
    let projection = projection_at(GeoPoint::new(0.0, 0.0));
    assert!(projection.to_pixel(GeoPoint::new(f64::NAN, 0.0)).is_err());
    assert!(projection.to_geo(PixelPoint::new(0.0, f64::INFINITY)).is_err());
}

#[test]
fn longitudes_wrap_across_the_antimeridian() {
    let projection = projection_at(GeoPoint::new(0.0, 179.8));

    let east = projection
        .to_pixel(GeoPoint::new(0.0, -180.0))
        .expect("far side of the seam");
    let west = projection
        .to_pixel(GeoPoint::new(0.0, 179.6))
        .expect("near side of the seam");

    // Both a fifth of a degree from the reference, opposite directions.
    assert_relative_eq!(east.x, -west.x, epsilon = 1e-6);
    assert!(east.x > 0.0);
}

#[test]
fn out_of_domain_reference_is_rejected_at_construction() {
    let result = ProjectionParams::from_scale_ppm(GeoPoint::new(89.95, 0.0), 0.15);
    assert!(result.is_err());
}
