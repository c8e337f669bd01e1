//! Request and response shapes exchanged with the data providers.
//!
//! Field names match the JSON the dashboard API speaks (snake_case).

use chrono::{DateTime, Utc};
use foundation::LatLon;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserStats {
    pub green_score: u32,
    pub co2_saved: f64,
    pub clean_trips: u32,
    pub eco_points: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AreaMetrics {
    pub aqi: u32,
    pub noise: u32,
    pub traffic: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Badge {
    pub badge_icon: String,
    pub badge_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardData {
    pub user: UserStats,
    pub metrics: AreaMetrics,
    pub streak: u32,
    pub insight: String,
    #[serde(default)]
    pub badges: Vec<Badge>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    pub lat: f64,
    pub lon: f64,
    /// Free text typed by the user.
    pub query: String,
}

impl AnalysisRequest {
    pub fn new(at: LatLon, query: impl Into<String>) -> Self {
        Self {
            lat: at.lat,
            lon: at.lon,
            query: query.into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LocationMetrics {
    pub aqi: u32,
    pub noise_level: u32,
    pub traffic_level: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TrafficPattern {
    pub pattern: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub busy_hours: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NearbyLocation {
    pub name: String,
    pub category: String,
    /// Absent when the API had too few places to cluster.
    #[serde(default)]
    pub zone_type: String,
    pub lat: f64,
    pub lon: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisData {
    pub insight: String,
    pub metrics: LocationMetrics,
    pub traffic_pattern: TrafficPattern,
    #[serde(default)]
    pub locations: Vec<NearbyLocation>,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RouteType {
    #[default]
    Eco,
    Fastest,
}

impl RouteType {
    /// Parses the value of the checked `route-type` radio button.
    pub fn parse(s: &str) -> Option<Self> {
        match s.trim() {
            "eco" => Some(RouteType::Eco),
            "fastest" => Some(RouteType::Fastest),
            _ => None,
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            RouteType::Eco => "Eco-Friendly 🌿",
            RouteType::Fastest => "Fastest ⚡",
        }
    }
}

/// Body of `POST /route/plan`.
///
/// The API routes between coordinates. A destination typed as a place name
/// travels in `destination` with no end coordinates; only providers that can
/// resolve names accept it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RouteRequest {
    pub start_lat: f64,
    pub start_lon: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_lat: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_lon: Option<f64>,
    pub route_type: RouteType,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub destination: String,
}

impl RouteRequest {
    /// `destination` is kept as typed; it also supplies the end point when
    /// it reads as `lat, lon`.
    pub fn new(start: LatLon, destination: impl Into<String>, route_type: RouteType) -> Self {
        let destination = destination.into();
        let end = LatLon::parse(&destination);
        Self {
            start_lat: start.lat,
            start_lon: start.lon,
            end_lat: end.map(|e| e.lat),
            end_lon: end.map(|e| e.lon),
            route_type,
            destination,
        }
    }

    pub fn start(&self) -> LatLon {
        LatLon::new(self.start_lat, self.start_lon)
    }

    pub fn end(&self) -> Option<LatLon> {
        Some(LatLon::new(self.end_lat?, self.end_lon?))
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RoutePlan {
    pub distance_km: f64,
    pub travel_time_min: u32,
    pub route_type: RouteType,
    pub eco_points_earned: u32,
    pub co2_saved: f64,
}

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PostType {
    EcoRoute,
    EcoZone,
    Alert,
    #[default]
    General,
}

impl PostType {
    pub fn as_str(self) -> &'static str {
        match self {
            PostType::EcoRoute => "eco_route",
            PostType::EcoZone => "eco_zone",
            PostType::Alert => "alert",
            PostType::General => "general",
        }
    }

    /// Unknown values fall back to `General`, as the API does.
    pub fn parse(s: &str) -> Self {
        match s.trim() {
            "eco_route" => PostType::EcoRoute,
            "eco_zone" => PostType::EcoZone,
            "alert" => PostType::Alert,
            _ => PostType::General,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Opaque; the API hands out database object ids.
    pub id: String,
    pub title: String,
    pub content: String,
    pub location: String,
    pub username: String,
    pub post_type: PostType,
    pub upvotes: u32,
    #[serde(with = "http_date")]
    pub created_at: DateTime<Utc>,
}

/// Timestamps as the API writes them: RFC 1123 (`Mon, 19 Oct 2026 10:00:00
/// GMT`) from the server, RFC 3339 elsewhere. Written back as RFC 3339.
pub mod http_date {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{Deserialize, Deserializer, Serializer, de};

    pub fn parse(s: &str) -> Option<DateTime<Utc>> {
        let s = s.trim();
        DateTime::parse_from_rfc3339(s)
            .or_else(|_| DateTime::parse_from_rfc2822(s))
            .map(|t| t.with_timezone(&Utc))
            .ok()
            .or_else(|| {
                NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
                    .ok()
                    .map(|t| t.and_utc())
            })
    }

    pub fn serialize<S: Serializer>(at: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&at.to_rfc3339())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<DateTime<Utc>, D::Error> {
        let s = String::deserialize(deserializer)?;
        parse(&s).ok_or_else(|| de::Error::custom(format!("unrecognised timestamp `{s}`")))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewPost {
    pub title: String,
    pub content: String,
    pub location: String,
    #[serde(default)]
    pub post_type: PostType,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostList {
    pub posts: Vec<Post>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LeaderboardRow {
    pub username: String,
    pub eco_points: u32,
    pub co2_saved: f64,
    pub green_score: u32,
    pub streak_days: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Leaderboard {
    pub leaderboard: Vec<LeaderboardRow>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatRequest {
    pub message: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatReply {
    pub response: String,
}
