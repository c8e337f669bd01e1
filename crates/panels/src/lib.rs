//! HTML renderers for the dashboard panels.
//!
//! Every function here is pure: payload in, markup out. Text that came from a
//! provider is escaped; numbers are interpolated as-is.

pub mod analysis;
pub mod chat;
pub mod community;
pub mod dashboard;
pub mod gauge;
pub mod messages;
pub mod route;

pub use analysis::render_analysis;
pub use chat::{bot_message, user_message};
pub use community::{rank_label, render_leaderboard, render_posts};
pub use dashboard::{DashboardStats, render_badges};
pub use foundation::escape_html;
pub use gauge::{GaugeGeometry, GaugeReading, dashboard_gauges};
pub use route::render_route;
