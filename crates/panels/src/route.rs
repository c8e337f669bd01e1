use foundation::escape_html;
use providers::RoutePlan;

pub fn render_route(plan: &RoutePlan) -> String {
    let mut html = format!(
        r#"<div class="route-success">
<h3>🎉 Route Planned Successfully!</h3>
<p><strong>Distance:</strong> {} km</p>
<p><strong>Travel Time:</strong> {} minutes</p>
<p><strong>Route Type:</strong> {}</p>
<p><strong>Eco Points Earned:</strong> +{} points</p>
"#,
        plan.distance_km,
        plan.travel_time_min,
        escape_html(plan.route_type.label()),
        plan.eco_points_earned,
    );
    if plan.co2_saved > 0.0 {
        html.push_str(&format!(
            "<p><strong>CO₂ Saved:</strong> {} kg 🌍</p>\n",
            plan.co2_saved
        ));
    }
    html.push_str(
        "<div class=\"eco-banner\">🏅 Great choice! You're making a positive impact!</div>\n</div>",
    );
    html
}

#[cfg(test)]
mod tests {
    use providers::{RoutePlan, RouteType};

    use super::render_route;

    fn plan(route_type: RouteType, co2_saved: f64) -> RoutePlan {
        RoutePlan {
            distance_km: 5.2,
            travel_time_min: 15,
            route_type,
            eco_points_earned: 25,
            co2_saved,
        }
    }

    #[test]
    fn eco_route_shows_savings() {
        let html = render_route(&plan(RouteType::Eco, 1.2));
        assert!(html.contains("5.2 km"));
        assert!(html.contains("15 minutes"));
        assert!(html.contains("Eco-Friendly 🌿"));
        assert!(html.contains("+25 points"));
        assert!(html.contains("1.2 kg 🌍"));
    }

    #[test]
    fn zero_savings_line_is_omitted() {
        let html = render_route(&plan(RouteType::Fastest, 0.0));
        assert!(html.contains("Fastest ⚡"));
        assert!(!html.contains("CO₂ Saved"));
    }
}
