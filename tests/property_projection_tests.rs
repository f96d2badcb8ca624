use geochart_rs::core::{GeoPoint, MercatorProjection, ProjectionParams};
use proptest::prelude::*;

proptest! {
    #[test]
    fn projection_round_trip_property(
        ref_lat in -80.0f64..80.0,
        ref_lon in -180.0f64..180.0,
        lat in -89.89f64..89.89,
        lon in -180.0f64..180.0
    ) {
        let params = ProjectionParams::from_scale_ppm(GeoPoint::new(ref_lat, ref_lon), 0.15)
            .expect("valid params");
        let projection = MercatorProjection::new(params);

        let pixel = projection.to_pixel(GeoPoint::new(lat, lon)).expect("to pixel");
        let geo = projection.to_geo(pixel).expect("to geo");

        prop_assert!((geo.lat - lat).abs() <= 1e-6);
        let lon_error = (geo.lon - lon).abs();
        prop_assert!(lon_error <= 1e-6 || (lon_error - 360.0).abs() <= 1e-6);
    }

    #[test]
    fn projected_coordinates_are_always_finite(
        lat in -89.89f64..89.89,
        lon in -720.0f64..720.0
    ) {
        let params = ProjectionParams::from_scale_ppm(GeoPoint::new(0.0, 0.0), 0.15)
            .expect("valid params");
        let projection = MercatorProjection::new(params);

        let pixel = projection.to_pixel(GeoPoint::new(lat, lon)).expect("to pixel");
        prop_assert!(pixel.x.is_finite());
        prop_assert!(pixel.y.is_finite());
    }
}
