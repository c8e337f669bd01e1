use foundation::escape_html;
use providers::AnalysisData;

pub fn render_analysis(data: &AnalysisData) -> String {
    let mut html = format!(
        r#"<div class="ai-insight">{insight}</div>
<div class="metrics-grid">
<div class="metric-card"><h4>Air Quality Index</h4><p class="metric-value aqi">{aqi}</p></div>
<div class="metric-card"><h4>Noise Level</h4><p class="metric-value noise">{noise} dB</p></div>
<div class="metric-card"><h4>Traffic Level</h4><p class="metric-value traffic">{traffic}%</p></div>
</div>
<h4>Traffic Pattern Analysis</h4>
<p class="pattern-analysis">{pattern}</p>
"#,
        insight = escape_html(&data.insight),
        aqi = data.metrics.aqi,
        noise = data.metrics.noise_level,
        traffic = data.metrics.traffic_level,
        pattern = escape_html(&data.traffic_pattern.pattern),
    );
    if let Some(hours) = &data.traffic_pattern.busy_hours {
        html.push_str(&format!(
            "<p class=\"busy-hours\">Busy hours: {}</p>\n",
            escape_html(hours)
        ));
    }
    html.push_str("<h4>Nearby Points of Interest</h4>\n<div class=\"locations-list\">");
    for loc in &data.locations {
        html.push_str(&format!(
            r#"<div class="location-item"><strong>{}</strong><br><small>{} | Zone Type: {}</small></div>"#,
            escape_html(&loc.name),
            escape_html(&loc.category),
            escape_html(&loc.zone_type)
        ));
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use foundation::LatLon;
    use providers::demo::demo_analysis;

    use super::render_analysis;

    #[test]
    fn renders_metrics_and_locations() {
        let html = render_analysis(&demo_analysis(LatLon::PUNE));
        assert!(html.contains(r#"<p class="metric-value aqi">65</p>"#));
        assert!(html.contains("45 dB"));
        assert!(html.contains("30%"));
        assert!(html.contains("Green Zone | Zone Type: calm"));
        assert!(html.contains("Commercial | Zone Type: moderate"));
        assert!(!html.contains("busy-hours"));
    }

    #[test]
    fn busy_hours_shown_when_present() {
        let mut data = demo_analysis(LatLon::PUNE);
        data.traffic_pattern.busy_hours = Some("8-10 AM, 5-8 PM".to_string());
        assert!(render_analysis(&data).contains("Busy hours: 8-10 AM, 5-8 PM"));
    }
}
