use std::f64::consts::PI;

use providers::DashboardData;

pub const GAUGE_RADIUS: f64 = 45.0;

/// Stroke parameters for a circular SVG gauge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeGeometry {
    pub circumference: f64,
    pub dash_offset: f64,
    pub text: i64,
}

impl GaugeGeometry {
    /// `value / max` is clamped to 1; a non-positive `max` renders empty.
    pub fn new(value: f64, max: f64) -> Self {
        let circumference = 2.0 * PI * GAUGE_RADIUS;
        let fraction = if max > 0.0 {
            (value / max).clamp(0.0, 1.0)
        } else {
            0.0
        };
        Self {
            circumference,
            dash_offset: circumference - fraction * circumference,
            text: value.round() as i64,
        }
    }
}

/// One gauge update: `id` is the element prefix (`{id}-gauge`, `{id}-text`).
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GaugeReading {
    pub id: &'static str,
    pub geometry: GaugeGeometry,
}

impl GaugeReading {
    pub fn new(id: &'static str, value: f64, max: f64) -> Self {
        Self {
            id,
            geometry: GaugeGeometry::new(value, max),
        }
    }

    pub fn gauge_element(&self) -> String {
        format!("{}-gauge", self.id)
    }

    pub fn text_element(&self) -> String {
        format!("{}-text", self.id)
    }
}

pub fn dashboard_gauges(data: &DashboardData) -> [GaugeReading; 4] {
    [
        GaugeReading::new("green-score", f64::from(data.user.green_score), 100.0),
        GaugeReading::new("aqi", f64::from(data.metrics.aqi), 200.0),
        GaugeReading::new("noise", f64::from(data.metrics.noise), 100.0),
        GaugeReading::new("traffic", f64::from(data.metrics.traffic), 100.0),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn half_full_gauge() {
        let g = GaugeGeometry::new(100.0, 200.0);
        assert!((g.circumference - 282.743_338_8).abs() < 1e-6);
        assert!((g.dash_offset - g.circumference / 2.0).abs() < 1e-9);
        assert_eq!(g.text, 100);
    }

    #[test]
    fn overfull_value_is_clamped() {
        let g = GaugeGeometry::new(250.0, 200.0);
        assert_eq!(g.dash_offset, 0.0);
        assert_eq!(g.text, 250);
    }

    #[test]
    fn text_is_rounded() {
        assert_eq!(GaugeGeometry::new(42.5, 100.0).text, 43);
        assert_eq!(GaugeGeometry::new(42.4, 100.0).text, 42);
    }

    #[test]
    fn zero_max_renders_empty() {
        let g = GaugeGeometry::new(10.0, 0.0);
        assert_eq!(g.dash_offset, g.circumference);
    }

    #[test]
    fn element_ids() {
        let r = GaugeReading::new("aqi", 65.0, 200.0);
        assert_eq!(r.gauge_element(), "aqi-gauge");
        assert_eq!(r.text_element(), "aqi-text");
    }
}
