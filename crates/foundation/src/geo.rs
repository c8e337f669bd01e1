/// Geographic position in degrees.
///
/// The map SDK takes `[lon, lat]` pairs; everything else in the workspace uses
/// `(lat, lon)`. Convert at the SDK boundary with [`LatLon::to_lng_lat`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LatLon {
    pub lat: f64,
    pub lon: f64,
}

impl LatLon {
    /// Default city center (Pune).
    pub const PUNE: LatLon = LatLon {
        lat: 18.5204,
        lon: 73.8567,
    };

    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    pub fn to_lng_lat(self) -> [f64; 2] {
        [self.lon, self.lat]
    }

    pub fn offset(self, dlat: f64, dlon: f64) -> Self {
        Self::new(self.lat + dlat, self.lon + dlon)
    }

    /// `"18.5204, 73.8567"`, the form written into the location input.
    pub fn display_4dp(self) -> String {
        format!("{:.4}, {:.4}", self.lat, self.lon)
    }

    /// Parses `"lat, lon"`. Returns `None` for anything else, including
    /// out-of-range coordinates.
    pub fn parse(s: &str) -> Option<Self> {
        let (lat, lon) = s.split_once(',')?;
        let lat: f64 = lat.trim().parse().ok()?;
        let lon: f64 = lon.trim().parse().ok()?;
        if !(-90.0..=90.0).contains(&lat) || !(-180.0..=180.0).contains(&lon) {
            return None;
        }
        Some(Self::new(lat, lon))
    }
}

impl Default for LatLon {
    fn default() -> Self {
        Self::PUNE
    }
}

#[cfg(test)]
mod tests {
    use super::LatLon;

    #[test]
    fn sdk_order_is_lon_first() {
        assert_eq!(LatLon::PUNE.to_lng_lat(), [73.8567, 18.5204]);
    }

    #[test]
    fn display_and_parse_agree() {
        let p = LatLon::new(18.52041, 73.85669);
        let text = p.display_4dp();
        assert_eq!(text, "18.5204, 73.8567");
        let back = LatLon::parse(&text).unwrap();
        assert_eq!(back, LatLon::PUNE);
    }

    #[test]
    fn parse_rejects_garbage() {
        assert_eq!(LatLon::parse("FC Road"), None);
        assert_eq!(LatLon::parse("91.0, 10.0"), None);
        assert_eq!(LatLon::parse("10.0"), None);
    }
}
