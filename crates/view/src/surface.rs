//! The page as the dashboard sees it.
//!
//! Element ids come from [`crate::dom`]; sections, nav buttons, legends and
//! mode buttons are addressed by their typed keys so the browser
//! implementation owns the selector details.

use layers::Mode;
use panels::GaugeReading;

use crate::section::Section;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Legend {
    Citizen,
    Expert,
}

impl Legend {
    pub fn for_mode(mode: Mode) -> Self {
        match mode {
            Mode::Citizen => Legend::Citizen,
            Mode::Expert => Legend::Expert,
        }
    }

    pub fn element_id(self) -> &'static str {
        match self {
            Legend::Citizen => crate::dom::CITIZEN_LEGEND,
            Legend::Expert => crate::dom::EXPERT_LEGEND,
        }
    }
}

pub trait Surface {
    /// Whether the page has a container for `section`.
    fn has_section(&self, section: Section) -> bool;
    fn set_section_active(&mut self, section: Section, active: bool);
    fn set_nav_active(&mut self, section: Section, active: bool);
    fn set_legend_visible(&mut self, legend: Legend, visible: bool);
    fn set_mode_button_active(&mut self, mode: Mode, active: bool);

    fn set_html(&mut self, id: &str, html: &str);
    fn append_html(&mut self, id: &str, html: &str);
    fn set_text(&mut self, id: &str, text: &str);

    fn set_value(&mut self, id: &str, value: &str);
    /// Current value of an input; empty if the element is missing.
    fn value(&self, id: &str) -> String;
    /// Value of the checked radio in group `name`.
    fn selected(&self, name: &str) -> Option<String>;

    /// Sets the CSS `display` of an element.
    fn set_display(&mut self, id: &str, display: &str);
    /// Blocking user-facing message.
    fn alert(&mut self, message: &str);
    fn set_gauge(&mut self, reading: &GaugeReading);
}
