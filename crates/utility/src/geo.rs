pub const EARTH_RADIUS_M: f64 = 6_371_000.0;

/// Kilometers per degree of longitude at the equator.
pub const KM_PER_DEGREE_LON: f64 = 111.32;

/// Kilometers per degree of latitude.
pub const KM_PER_DEGREE_LAT: f64 = 110.54;

/// Zoom level at which shape sizes are used unscaled.
pub const REFERENCE_ZOOM: f64 = 13.0;

fn to_radians(degrees: f64) -> f64 {
    degrees * std::f64::consts::PI / 180.0
}

/// Great-circle distance in meters between two points on a spherical earth.
///
/// Uses the `atan2` form of the haversine formula, which stays stable for
/// both coincident and antipodal points.
pub fn haversine_distance(
    latitude_1: f64,
    longitude_1: f64,
    latitude_2: f64,
    longitude_2: f64,
) -> f64 {
    let lat1_rad = to_radians(latitude_1);
    let lat2_rad = to_radians(latitude_2);

    let dlat = to_radians(latitude_2 - latitude_1);
    let dlon = to_radians(longitude_2 - longitude_1);

    let a = (dlat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (dlon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_M * c
}

/// Scale factor applied to sizes specified at the reference zoom.
/// Every zoom level in halves the size, every level out doubles it.
pub fn zoom_factor(zoom: f64) -> f64 {
    2f64.powf(REFERENCE_ZOOM - zoom)
}

/// Converts a distance in km into degrees of longitude at `latitude`.
pub fn km_to_longitude_degrees(distance_km: f64, latitude: f64) -> f64 {
    distance_km / (KM_PER_DEGREE_LON * to_radians(latitude).cos())
}

/// Converts a distance in km into degrees of latitude.
pub fn km_to_latitude_degrees(distance_km: f64) -> f64 {
    distance_km / KM_PER_DEGREE_LAT
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use proptest::prelude::*;

    #[test]
    fn test_haversine_same_point_is_zero() {
        assert_eq!(haversine_distance(40.6941, -74.0242, 40.6941, -74.0242), 0.0);
    }

    #[test]
    fn test_haversine_one_degree_of_latitude() {
        // one degree along a meridian is R * pi / 180
        let expected = EARTH_RADIUS_M * std::f64::consts::PI / 180.0;
        assert_relative_eq!(
            haversine_distance(0.0, 0.0, 1.0, 0.0),
            expected,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_haversine_antipodal() {
        let half_circumference = EARTH_RADIUS_M * std::f64::consts::PI;
        assert_relative_eq!(
            haversine_distance(0.0, 0.0, 0.0, 180.0),
            half_circumference,
            max_relative = 1e-12
        );
        assert_relative_eq!(
            haversine_distance(90.0, 0.0, -90.0, 0.0),
            half_circumference,
            max_relative = 1e-12
        );
    }

    #[test]
    fn test_zoom_factor() {
        assert_eq!(zoom_factor(13.0), 1.0);
        assert_eq!(zoom_factor(12.0), 2.0);
        assert_eq!(zoom_factor(15.0), 0.25);
    }

    #[test]
    fn test_degree_conversion() {
        assert_relative_eq!(km_to_longitude_degrees(111.32, 0.0), 1.0);
        assert_relative_eq!(km_to_longitude_degrees(111.32, 60.0), 2.0, max_relative = 1e-12);
        assert_relative_eq!(km_to_latitude_degrees(110.54), 1.0);
    }

    proptest! {
        #[test]
        fn test_haversine_is_symmetric(
            lat1 in -90.0f64..90.0,
            lon1 in -180.0f64..180.0,
            lat2 in -90.0f64..90.0,
            lon2 in -180.0f64..180.0,
        ) {
            let forward = haversine_distance(lat1, lon1, lat2, lon2);
            let backward = haversine_distance(lat2, lon2, lat1, lon1);
            prop_assert!((forward - backward).abs() <= 1e-6);
            prop_assert!(forward >= 0.0);
            prop_assert!(forward <= EARTH_RADIUS_M * std::f64::consts::PI + 1e-6);
        }
    }
}
