//! Great-circle distance on a spherical Earth.

/// Mean Earth radius in kilometers.
pub const EARTH_RADIUS_KM: f64 = 6371.0;

/// Haversine distance between two latitude/longitude pairs (degrees), in kilometers.
pub fn haversine_km(lat1: f64, lon1: f64, lat2: f64, lon2: f64) -> f64 {
    let lat1_rad = lat1.to_radians();
    let lat2_rad = lat2.to_radians();
    let delta_lat = (lat2 - lat1).to_radians();
    let delta_lon = (lon2 - lon1).to_radians();

    let a = (delta_lat / 2.0).sin().powi(2)
        + lat1_rad.cos() * lat2_rad.cos() * (delta_lon / 2.0).sin().powi(2);
    let c = 2.0 * a.sqrt().atan2((1.0 - a).sqrt());

    EARTH_RADIUS_KM * c
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_point_is_zero() {
        assert!(haversine_km(-32.05, 115.733, -32.05, 115.733).abs() < 1e-9);
    }

    #[test]
    fn test_one_degree_of_latitude() {
        // 2πR / 360
        let expected = EARTH_RADIUS_KM * std::f64::consts::PI / 180.0;
        let d = haversine_km(10.0, 20.0, 11.0, 20.0);
        assert!((d - expected).abs() < 1e-6, "got {d}");
    }

    #[test]
    fn test_symmetric() {
        let a = haversine_km(-31.817, 115.733, -32.517, 115.7);
        let b = haversine_km(-32.517, 115.7, -31.817, 115.733);
        assert!((a - b).abs() < 1e-9);
    }

    #[test]
    fn test_antimeridian_is_short() {
        // 179.5E to 179.5W is one degree of longitude on the equator
        let d = haversine_km(0.0, 179.5, 0.0, -179.5);
        assert!((d - 111.19).abs() < 0.1, "got {d}");
    }
}
