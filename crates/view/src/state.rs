use foundation::LatLon;
use layers::{LayerToggles, Mode};

use crate::section::Section;

/// What the user is looking at and how.
#[derive(Debug, Clone, PartialEq)]
pub struct ViewState {
    /// `None` until the first successful [`crate::SectionRouter::show`].
    pub active: Option<Section>,
    pub mode: Mode,
    /// Last known user position; the default until geolocation succeeds.
    pub position: LatLon,
    pub toggles: LayerToggles,
    pub chatbot_open: bool,
}

impl ViewState {
    pub fn new(position: LatLon) -> Self {
        Self {
            active: None,
            mode: Mode::default(),
            position,
            toggles: LayerToggles::default(),
            chatbot_open: false,
        }
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::new(LatLon::PUNE)
    }
}
