//! Element ids shared with the page markup.

pub const MAIN_INSIGHT: &str = "main-insight";

pub const CO2_SAVED: &str = "co2-saved";
pub const CLEAN_TRIPS: &str = "clean-trips";
pub const ECO_STREAK: &str = "eco-streak";
pub const ECO_POINTS: &str = "eco-points";
pub const BADGES: &str = "badges-container";

pub const LOCATION_INPUT: &str = "location-input";
pub const ANALYSIS_RESULTS: &str = "analysis-results";
pub const ANALYSIS_CONTENT: &str = "analysis-content";

pub const ROUTE_MODAL: &str = "route-modal";
pub const START_LOCATION: &str = "start-location";
pub const END_LOCATION: &str = "end-location";
/// Radio group name, not an element id.
pub const ROUTE_TYPE: &str = "route-type";
pub const ROUTE_RESULTS: &str = "route-results";

pub const COMMUNITY_FEED: &str = "community-feed";
pub const LEADERBOARD_LIST: &str = "leaderboard-list";
pub const POST_MODAL: &str = "post-modal";
pub const POST_TITLE: &str = "post-title";
pub const POST_CONTENT: &str = "post-content";
pub const POST_LOCATION: &str = "post-location";
pub const POST_TYPE: &str = "post-type";

pub const CHATBOT_WINDOW: &str = "chatbot-window";
pub const CHATBOT_INPUT: &str = "chatbot-input";
pub const CHATBOT_MESSAGES: &str = "chatbot-messages";

pub const CITIZEN_LEGEND: &str = "citizen-legend";
pub const EXPERT_LEGEND: &str = "expert-legend";
