//! In-memory [`Surface`] that records every write.

use std::collections::{BTreeMap, BTreeSet};

use layers::Mode;
use panels::GaugeReading;

use crate::section::Section;
use crate::surface::{Legend, Surface};

#[derive(Debug, Clone)]
pub struct RecordingSurface {
    sections: BTreeSet<Section>,
    active_sections: BTreeSet<Section>,
    active_nav: BTreeSet<Section>,
    legends: BTreeMap<Legend, bool>,
    mode_buttons: BTreeMap<&'static str, bool>,
    html: BTreeMap<String, String>,
    text: BTreeMap<String, String>,
    values: BTreeMap<String, String>,
    radios: BTreeMap<String, String>,
    display: BTreeMap<String, String>,
    alerts: Vec<String>,
    gauges: BTreeMap<&'static str, GaugeReading>,
}

impl Default for RecordingSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl RecordingSurface {
    /// Page with every section container and the eco route type checked.
    pub fn new() -> Self {
        Self {
            sections: Section::ALL.into_iter().collect(),
            active_sections: BTreeSet::new(),
            active_nav: BTreeSet::new(),
            legends: BTreeMap::new(),
            mode_buttons: BTreeMap::new(),
            html: BTreeMap::new(),
            text: BTreeMap::new(),
            values: BTreeMap::new(),
            radios: BTreeMap::from([(crate::dom::ROUTE_TYPE.to_string(), "eco".to_string())]),
            display: BTreeMap::new(),
            alerts: Vec::new(),
            gauges: BTreeMap::new(),
        }
    }

    pub fn without_section(mut self, section: Section) -> Self {
        self.sections.remove(&section);
        self
    }

    pub fn select(&mut self, name: &str, value: &str) {
        self.radios.insert(name.to_string(), value.to_string());
    }

    pub fn active_sections(&self) -> Vec<Section> {
        self.active_sections.iter().copied().collect()
    }

    pub fn active_nav(&self) -> Vec<Section> {
        self.active_nav.iter().copied().collect()
    }

    pub fn legend_visible(&self, legend: Legend) -> Option<bool> {
        self.legends.get(&legend).copied()
    }

    pub fn mode_button_active(&self, mode: Mode) -> Option<bool> {
        self.mode_buttons.get(mode.as_str()).copied()
    }

    pub fn html(&self, id: &str) -> Option<&str> {
        self.html.get(id).map(String::as_str)
    }

    pub fn text(&self, id: &str) -> Option<&str> {
        self.text.get(id).map(String::as_str)
    }

    pub fn display(&self, id: &str) -> Option<&str> {
        self.display.get(id).map(String::as_str)
    }

    pub fn alerts(&self) -> &[String] {
        &self.alerts
    }

    pub fn gauge(&self, id: &str) -> Option<&GaugeReading> {
        self.gauges.get(id)
    }
}

impl Surface for RecordingSurface {
    fn has_section(&self, section: Section) -> bool {
        self.sections.contains(&section)
    }

    fn set_section_active(&mut self, section: Section, active: bool) {
        if !self.sections.contains(&section) {
            return;
        }
        if active {
            self.active_sections.insert(section);
        } else {
            self.active_sections.remove(&section);
        }
    }

    fn set_nav_active(&mut self, section: Section, active: bool) {
        if active {
            self.active_nav.insert(section);
        } else {
            self.active_nav.remove(&section);
        }
    }

    fn set_legend_visible(&mut self, legend: Legend, visible: bool) {
        self.legends.insert(legend, visible);
    }

    fn set_mode_button_active(&mut self, mode: Mode, active: bool) {
        self.mode_buttons.insert(mode.as_str(), active);
    }

    fn set_html(&mut self, id: &str, html: &str) {
        self.html.insert(id.to_string(), html.to_string());
    }

    fn append_html(&mut self, id: &str, html: &str) {
        self.html.entry(id.to_string()).or_default().push_str(html);
    }

    fn set_text(&mut self, id: &str, text: &str) {
        self.text.insert(id.to_string(), text.to_string());
    }

    fn set_value(&mut self, id: &str, value: &str) {
        self.values.insert(id.to_string(), value.to_string());
    }

    fn value(&self, id: &str) -> String {
        self.values.get(id).cloned().unwrap_or_default()
    }

    fn selected(&self, name: &str) -> Option<String> {
        self.radios.get(name).cloned()
    }

    fn set_display(&mut self, id: &str, display: &str) {
        self.display.insert(id.to_string(), display.to_string());
    }

    fn alert(&mut self, message: &str) {
        self.alerts.push(message.to_string());
    }

    fn set_gauge(&mut self, reading: &GaugeReading) {
        self.gauges.insert(reading.id, *reading);
    }
}

#[cfg(test)]
mod tests {
    use super::RecordingSurface;
    use crate::section::Section;
    use crate::surface::Surface;

    #[test]
    fn missing_section_cannot_activate() {
        let mut s = RecordingSurface::new().without_section(Section::Routes);
        assert!(!s.has_section(Section::Routes));
        s.set_section_active(Section::Routes, true);
        assert!(s.active_sections().is_empty());
    }

    #[test]
    fn append_accumulates() {
        let mut s = RecordingSurface::new();
        s.append_html("log", "<a>");
        s.append_html("log", "<b>");
        assert_eq!(s.html("log"), Some("<a><b>"));
    }

    #[test]
    fn unknown_input_is_empty() {
        assert_eq!(RecordingSurface::new().value("nope"), "");
    }
}
