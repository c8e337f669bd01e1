//! Offline providers serving fixed demo payloads.
//!
//! They resolve immediately; the community store keeps posts in memory for
//! the lifetime of the session.

use std::cell::RefCell;

use chrono::{DateTime, TimeZone, Utc};
use foundation::{IdSequence, LatLon};
use runtime::CancelToken;
use tracing::debug;

use crate::chat::rule_based_reply;
use crate::payload::{
    AnalysisData, AnalysisRequest, AreaMetrics, Badge, ChatReply, DashboardData, Leaderboard,
    LeaderboardRow, LocationMetrics, NearbyLocation, NewPost, Post, PostList, PostType,
    RoutePlan, RouteRequest, TrafficPattern, UserStats,
};
use crate::provider::{
    AnalysisProvider, ChatResponder, CommunityStore, DashboardProvider, LeaderboardProvider,
    ProviderError, ProviderResult, RoutePlanner, check_canceled,
};
use crate::route::estimate_route;

const DEMO_USERNAME: &str = "demo_user";

#[derive(Debug)]
pub struct DemoProviders {
    posts: RefCell<Vec<Post>>,
    post_ids: RefCell<IdSequence>,
    username: String,
}

impl Default for DemoProviders {
    fn default() -> Self {
        Self::new()
    }
}

impl DemoProviders {
    pub fn new() -> Self {
        let posts = seed_posts();
        let max_id = posts
            .iter()
            .filter_map(|p| p.id.parse::<u64>().ok())
            .max()
            .unwrap_or(0);
        Self {
            posts: RefCell::new(posts),
            post_ids: RefCell::new(IdSequence::starting_after(max_id)),
            username: DEMO_USERNAME.to_string(),
        }
    }
}

fn seeded_at() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 1, 15, 8, 30, 0)
        .single()
        .unwrap_or_default()
}

fn seed_posts() -> Vec<Post> {
    vec![
        Post {
            id: "1".to_string(),
            title: "Great bike path discovered!".to_string(),
            content: "Found an amazing new bike path that avoids all the traffic. Highly recommended!"
                .to_string(),
            location: "Downtown".to_string(),
            username: "EcoRider".to_string(),
            post_type: PostType::EcoRoute,
            upvotes: 12,
            created_at: seeded_at(),
        },
        Post {
            id: "2".to_string(),
            title: "Air quality improving".to_string(),
            content: "Noticed significant improvement in air quality near the park after the new green initiative."
                .to_string(),
            location: "Central Park".to_string(),
            username: "GreenObserver".to_string(),
            post_type: PostType::EcoZone,
            upvotes: 8,
            created_at: seeded_at(),
        },
    ]
}

pub fn demo_dashboard() -> DashboardData {
    DashboardData {
        user: UserStats {
            green_score: 85,
            co2_saved: 24.5,
            clean_trips: 12,
            eco_points: 450,
        },
        metrics: AreaMetrics {
            aqi: 65,
            noise: 42,
            traffic: 30,
        },
        streak: 7,
        insight: "Great job! You've saved 24.5kg CO₂ this month. 🌍".to_string(),
        badges: vec![
            badge("🌱", "Eco Starter"),
            badge("🚶", "Walk Warrior"),
            badge("⭐", "Green Star"),
        ],
    }
}

fn badge(icon: &str, name: &str) -> Badge {
    Badge {
        badge_icon: icon.to_string(),
        badge_name: name.to_string(),
    }
}

pub fn demo_analysis(at: LatLon) -> AnalysisData {
    let park = at.offset(0.001, 0.001);
    let street = at.offset(-0.001, -0.001);
    AnalysisData {
        insight: "This area shows moderate traffic patterns with good air quality. Perfect for eco-friendly commuting! 🌿"
            .to_string(),
        metrics: LocationMetrics {
            aqi: 65,
            noise_level: 45,
            traffic_level: 30,
        },
        traffic_pattern: TrafficPattern {
            pattern: "Low congestion during peak hours, ideal for cycling and walking.".to_string(),
            busy_hours: None,
        },
        locations: vec![
            NearbyLocation {
                name: "Local Park".to_string(),
                category: "Green Zone".to_string(),
                zone_type: "calm".to_string(),
                lat: park.lat,
                lon: park.lon,
            },
            NearbyLocation {
                name: "Main Street".to_string(),
                category: "Commercial".to_string(),
                zone_type: "moderate".to_string(),
                lat: street.lat,
                lon: street.lon,
            },
        ],
    }
}

/// Route used when the destination is a place name rather than coordinates.
pub fn demo_route(req: &RouteRequest) -> RoutePlan {
    RoutePlan {
        distance_km: 5.2,
        travel_time_min: 15,
        route_type: req.route_type,
        eco_points_earned: 25,
        co2_saved: 1.2,
    }
}

pub fn demo_leaderboard() -> Leaderboard {
    let row = |username: &str, eco_points, co2_saved, green_score, streak_days| LeaderboardRow {
        username: username.to_string(),
        eco_points,
        co2_saved,
        green_score,
        streak_days,
    };
    Leaderboard {
        leaderboard: vec![
            row("EcoChampion", 1250, 45.2, 95, 21),
            row("GreenCommuter", 980, 32.7, 88, 14),
            row("SustainableSarah", 750, 28.1, 82, 9),
        ],
    }
}

impl DashboardProvider for DemoProviders {
    fn dashboard(&self, cancel: CancelToken) -> ProviderResult<'_, DashboardData> {
        Box::pin(async move {
            check_canceled(&cancel)?;
            Ok(demo_dashboard())
        })
    }
}

impl AnalysisProvider for DemoProviders {
    fn analyze(
        &self,
        req: AnalysisRequest,
        cancel: CancelToken,
    ) -> ProviderResult<'_, AnalysisData> {
        Box::pin(async move {
            check_canceled(&cancel)?;
            Ok(demo_analysis(LatLon::new(req.lat, req.lon)))
        })
    }
}

impl RoutePlanner for DemoProviders {
    fn plan_route(&self, req: RouteRequest, cancel: CancelToken) -> ProviderResult<'_, RoutePlan> {
        Box::pin(async move {
            check_canceled(&cancel)?;
            match req.end() {
                Some(to) => Ok(estimate_route(req.start(), to, req.route_type)),
                None => Ok(demo_route(&req)),
            }
        })
    }
}

impl CommunityStore for DemoProviders {
    fn list_posts(&self, cancel: CancelToken) -> ProviderResult<'_, PostList> {
        Box::pin(async move {
            check_canceled(&cancel)?;
            // Newest first; equal timestamps list the later insert first.
            let mut posts: Vec<Post> = self.posts.borrow().iter().rev().cloned().collect();
            posts.sort_by(|a, b| b.created_at.cmp(&a.created_at));
            Ok(PostList { posts })
        })
    }

    fn create_post(&self, post: NewPost, cancel: CancelToken) -> ProviderResult<'_, Post> {
        Box::pin(async move {
            check_canceled(&cancel)?;
            if post.title.trim().is_empty()
                || post.content.trim().is_empty()
                || post.location.trim().is_empty()
            {
                return Err(ProviderError::Rejected(
                    "title, content and location are required".to_string(),
                ));
            }
            let id = self.post_ids.borrow_mut().next_id().get().to_string();
            let created = Post {
                id: id.clone(),
                title: post.title,
                content: post.content,
                location: post.location,
                username: self.username.clone(),
                post_type: post.post_type,
                upvotes: 0,
                created_at: Utc::now(),
            };
            debug!(%id, "post created");
            self.posts.borrow_mut().push(created.clone());
            Ok(created)
        })
    }

    fn upvote(&self, post_id: String, cancel: CancelToken) -> ProviderResult<'_, ()> {
        Box::pin(async move {
            check_canceled(&cancel)?;
            let mut posts = self.posts.borrow_mut();
            let post = posts
                .iter_mut()
                .find(|p| p.id == post_id)
                .ok_or_else(|| ProviderError::NotFound(format!("post {post_id}")))?;
            post.upvotes = post.upvotes.saturating_add(1);
            Ok(())
        })
    }
}

impl LeaderboardProvider for DemoProviders {
    fn leaderboard(&self, cancel: CancelToken) -> ProviderResult<'_, Leaderboard> {
        Box::pin(async move {
            check_canceled(&cancel)?;
            Ok(demo_leaderboard())
        })
    }
}

impl ChatResponder for DemoProviders {
    fn reply(&self, message: String, cancel: CancelToken) -> ProviderResult<'_, ChatReply> {
        Box::pin(async move {
            check_canceled(&cancel)?;
            Ok(ChatReply {
                response: rule_based_reply(&message).to_string(),
            })
        })
    }
}
