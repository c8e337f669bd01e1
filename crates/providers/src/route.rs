use foundation::LatLon;
use foundation::math::haversine_km;

use crate::payload::{RoutePlan, RouteType};

/// Minutes per kilometre assumed by the offline planner.
const MINUTES_PER_KM: f64 = 4.0;
/// Eco routes avoid arterials and take this much longer.
const ECO_TIME_FACTOR: f64 = 1.1;
const ECO_POINTS_PER_KM: f64 = 5.0;
const FASTEST_POINTS_PER_KM: f64 = 2.0;
/// CO₂ saved per kilometre, credited to eco routes only.
const CO2_KG_PER_KM: f64 = 0.12;

/// Offline route estimate between two positions, scored the way the
/// dashboard API scores real routes.
pub fn estimate_route(from: LatLon, to: LatLon, route_type: RouteType) -> RoutePlan {
    let distance_km = haversine_km(from, to);

    let mut travel_secs = (distance_km * MINUTES_PER_KM * 60.0) as u64;
    if route_type == RouteType::Eco {
        travel_secs = (travel_secs as f64 * ECO_TIME_FACTOR) as u64;
    }
    score(distance_km, travel_secs, route_type)
}

/// Eco points and CO₂ credit for a route of known length and duration.
pub fn score(distance_km: f64, travel_secs: u64, route_type: RouteType) -> RoutePlan {
    let (eco_points_earned, co2_saved) = match route_type {
        RouteType::Eco => (
            (distance_km * ECO_POINTS_PER_KM) as u32,
            round2(distance_km * CO2_KG_PER_KM),
        ),
        RouteType::Fastest => ((distance_km * FASTEST_POINTS_PER_KM) as u32, 0.0),
    };
    RoutePlan {
        distance_km: round2(distance_km),
        travel_time_min: (travel_secs / 60) as u32,
        route_type,
        eco_points_earned,
        co2_saved,
    }
}

fn round2(v: f64) -> f64 {
    (v * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::{estimate_route, score};
    use crate::payload::RouteType;
    use foundation::LatLon;

    #[test]
    fn eco_route_earns_more_and_saves_co2() {
        let eco = score(10.0, 2640, RouteType::Eco);
        assert_eq!(eco.eco_points_earned, 50);
        assert_eq!(eco.co2_saved, 1.2);
        assert_eq!(eco.travel_time_min, 44);

        let fast = score(10.0, 2400, RouteType::Fastest);
        assert_eq!(fast.eco_points_earned, 20);
        assert_eq!(fast.co2_saved, 0.0);
    }

    #[test]
    fn eco_takes_longer_than_fastest() {
        let a = LatLon::new(18.5204, 73.8567);
        let b = LatLon::new(18.5362, 73.897);
        let eco = estimate_route(a, b, RouteType::Eco);
        let fast = estimate_route(a, b, RouteType::Fastest);
        assert_eq!(eco.distance_km, fast.distance_km);
        assert!(eco.travel_time_min >= fast.travel_time_min);
        assert!(eco.distance_km > 4.0 && eco.distance_km < 5.0);
    }
}
