use crate::geo::LatLon;

/// Mean Earth radius (kilometers), used for great-circle distances.
pub const EARTH_MEAN_RADIUS_KM: f64 = 6_371.008_8;

/// Great-circle distance between two positions in kilometers (haversine).
pub fn haversine_km(a: LatLon, b: LatLon) -> f64 {
    let lat1 = a.lat.to_radians();
    let lat2 = b.lat.to_radians();
    let dlat = (b.lat - a.lat).to_radians();
    let dlon = (b.lon - a.lon).to_radians();

    let h = (dlat * 0.5).sin().powi(2) + lat1.cos() * lat2.cos() * (dlon * 0.5).sin().powi(2);
    2.0 * EARTH_MEAN_RADIUS_KM * h.sqrt().min(1.0).asin()
}

#[cfg(test)]
mod tests {
    use super::haversine_km;
    use crate::geo::LatLon;

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn zero_distance_to_self() {
        assert_close(haversine_km(LatLon::PUNE, LatLon::PUNE), 0.0, 1e-12);
    }

    #[test]
    fn one_degree_of_latitude() {
        let d = haversine_km(LatLon::new(0.0, 0.0), LatLon::new(1.0, 0.0));
        assert_close(d, 111.19, 0.01);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = LatLon::new(18.5314, 73.8446);
        let b = LatLon::new(18.5074, 73.8077);
        assert_close(haversine_km(a, b), haversine_km(b, a), 1e-12);
    }
}
