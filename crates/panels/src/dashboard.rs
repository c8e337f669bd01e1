use foundation::escape_html;
use providers::{Badge, DashboardData};

/// Text content of the stat tiles, keyed by element id.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    pub co2_saved: String,
    pub clean_trips: String,
    pub eco_streak: String,
    pub eco_points: String,
}

impl DashboardStats {
    pub fn from_data(data: &DashboardData) -> Self {
        Self {
            co2_saved: format!("{} kg", data.user.co2_saved),
            clean_trips: data.user.clean_trips.to_string(),
            eco_streak: format!("{} days", data.streak),
            eco_points: data.user.eco_points.to_string(),
        }
    }

    pub fn entries(&self) -> [(&'static str, &str); 4] {
        [
            ("co2-saved", &self.co2_saved),
            ("clean-trips", &self.clean_trips),
            ("eco-streak", &self.eco_streak),
            ("eco-points", &self.eco_points),
        ]
    }
}

pub fn render_badges(badges: &[Badge]) -> String {
    badges
        .iter()
        .map(|b| {
            format!(
                r#"<div class="badge-item"><div class="badge-icon">{}</div><div>{}</div></div>"#,
                escape_html(&b.badge_icon),
                escape_html(&b.badge_name)
            )
        })
        .collect()
}
