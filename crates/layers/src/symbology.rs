use foundation::escape_html;

use crate::mode::Mode;
use crate::poi::{Category, PointOfInterest};

/// Marker glyph per zone category. Independent of display mode.
pub fn category_icon(category: Category) -> &'static str {
    match category {
        Category::Busy => "🚗",
        Category::Calm => "🌿",
        Category::Pollution => "😷",
    }
}

/// Inner markup of the custom marker element.
pub fn marker_element_html(icon: &str) -> String {
    format!(r#"<div style="font-size: 24px; cursor: pointer;">{icon}</div>"#)
}

/// Popup body for a zone.
///
/// Name and category are always shown; AQI and noise only in expert mode.
/// The body is rendered once, when the marker is created.
pub fn popup_html(poi: &PointOfInterest, mode: Mode) -> String {
    let mut html = format!(
        r#"<div style="padding: 10px;"><strong>{}</strong><br><small>Type: {}</small><br>"#,
        escape_html(poi.label),
        poi.category.as_str()
    );
    if mode == Mode::Expert {
        html.push_str(&format!(
            "<small>AQI: {}</small><br><small>Noise: {} dB</small>",
            poi.aqi, poi.noise_db
        ));
    }
    html.push_str("</div>");
    html
}

#[cfg(test)]
mod tests {
    use super::{category_icon, popup_html};
    use crate::mode::Mode;
    use crate::poi::{Category, fixtures};

    #[test]
    fn icons_per_category() {
        assert_eq!(category_icon(Category::Busy), "🚗");
        assert_eq!(category_icon(Category::Calm), "🌿");
        assert_eq!(category_icon(Category::Pollution), "😷");
    }

    #[test]
    fn citizen_popup_hides_measurements() {
        let html = popup_html(&fixtures()[0], Mode::Citizen);
        assert!(html.contains("FC Road - High Traffic"));
        assert!(html.contains("Type: busy"));
        assert!(!html.contains("AQI"));
        assert!(!html.contains("Noise"));
    }

    #[test]
    fn expert_popup_shows_measurements() {
        let html = popup_html(&fixtures()[2], Mode::Expert);
        assert!(html.contains("AQI: 150"));
        assert!(html.contains("Noise: 80 dB"));
    }
}
