//! Placeholder and failure markup shown while a panel waits or after it fails.

pub const LOADING_DASHBOARD: &str = "<p>Loading dashboard...</p>";
pub const ANALYZING: &str = "<p>Analyzing location...</p>";
pub const PLANNING_ROUTE: &str = "<p>Planning your route...</p>";
pub const LOADING_POSTS: &str = "<p>Loading posts...</p>";
pub const LOADING_LEADERBOARD: &str = "<p>Loading leaderboard...</p>";

pub const DASHBOARD_FAILED: &str = "<p>Unable to load dashboard data.</p>";
pub const ANALYSIS_FAILED: &str = "<p>Error analyzing location. Please try again.</p>";
pub const ROUTE_FAILED: &str = "<p>Failed to plan route. Please try again.</p>";
pub const POSTS_FAILED: &str = "<p>Unable to load community posts.</p>";
pub const LEADERBOARD_FAILED: &str = "<p>Unable to load leaderboard.</p>";
pub const NO_POSTS: &str = "<p>No posts yet. Be the first to share!</p>";

pub const ALERT_LOCATION_REQUIRED: &str = "Please enter a location or use GPS";
pub const ALERT_DESTINATION_REQUIRED: &str = "Please enter a destination";
pub const ALERT_POST_FIELDS: &str = "Please fill in all fields";
pub const ALERT_POST_FAILED: &str = "Failed to create post. Please try again.";
pub const ALERT_LOCATION_DENIED: &str = "Unable to get your location. Using default location (Pune).";
pub const ALERT_GEOLOCATION_UNSUPPORTED: &str = "Geolocation is not supported by your browser.";
