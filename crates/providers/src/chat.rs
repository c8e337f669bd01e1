/// Keyword rules of the offline assistant, checked in order.
const RULES: &[(&[&str], &str)] = &[
    (
        &["route", "walk", "bike", "path"],
        "I can guide you to cleaner routes! Try exploring eco-friendly paths during off-peak hours to save emissions.",
    ),
    (
        &["eco", "carbon", "green score", "points"],
        "Eco-points come from choosing sustainable travel. Every eco-route boosts your green score and saves CO₂!",
    ),
    (
        &["air", "aqi", "pollution", "quality"],
        "Local AQI is usually best early mornings after rainfall. Consider parks or riverside areas for the cleanest air!",
    ),
    (
        &["traffic", "congestion", "rush"],
        "Traffic peaks around 8 AM and 6 PM. Shifting your commute by 20 minutes can lower delays and emissions.",
    ),
    (
        &["mad", "angry"],
        "I'm never mad, just motivated to help you find greener journeys!",
    ),
];

const GREETING: &str = "I'm GeoSense+, your eco-assistant! Ask me about clean routes, air quality, or earning eco-points.";
const FALLBACK: &str =
    "I'm here to help with eco-routes, air quality insights, or your green score. How can I assist?";

/// Rule-based reply used when no language model is available.
pub fn rule_based_reply(message: &str) -> &'static str {
    let message = message.trim();
    if message.is_empty() {
        return GREETING;
    }
    let lower = message.to_lowercase();
    RULES
        .iter()
        .find(|(keywords, _)| keywords.iter().any(|k| lower.contains(k)))
        .map(|(_, reply)| *reply)
        .unwrap_or(FALLBACK)
}

#[cfg(test)]
mod tests {
    use super::rule_based_reply;

    #[test]
    fn first_matching_rule_wins() {
        // "bike" (routes) comes before "air" (air quality).
        let reply = rule_based_reply("Is the air ok for a BIKE ride?");
        assert!(reply.starts_with("I can guide you to cleaner routes"));
    }

    #[test]
    fn matches_air_quality() {
        assert!(rule_based_reply("what's the AQI today").starts_with("Local AQI"));
    }

    #[test]
    fn empty_message_gets_greeting() {
        assert!(rule_based_reply("   ").starts_with("I'm GeoSense+"));
    }

    #[test]
    fn unknown_topic_gets_fallback() {
        assert!(rule_based_reply("tell me a joke").starts_with("I'm here to help"));
    }
}
