use foundation::LatLon;
use tracing::error;

use crate::mode::Mode;
use crate::poi::PointOfInterest;
use crate::symbology::{category_icon, popup_html};
use crate::widget::{MapWidget, MarkerHandle};

#[derive(Debug, Clone, PartialEq)]
pub struct Popup {
    pub offset_px: u32,
    pub html: String,
}

/// Everything the widget needs to place one marker.
#[derive(Debug, Clone, PartialEq)]
pub struct MarkerSpec {
    pub position: LatLon,
    pub icon: &'static str,
    pub popup: Option<Popup>,
}

impl MarkerSpec {
    pub fn for_poi(poi: &PointOfInterest, mode: Mode, popup_offset_px: u32) -> Self {
        Self {
            position: poi.position,
            icon: category_icon(poi.category),
            popup: Some(Popup {
                offset_px: popup_offset_px,
                html: popup_html(poi, mode),
            }),
        }
    }
}

/// Handles of the markers currently placed on the widget.
///
/// Every handle is released through the widget before a new batch is created;
/// dropping handles without releasing them would leave stale icons on screen.
#[derive(Debug, Default)]
pub struct MarkerSet {
    handles: Vec<MarkerHandle>,
}

impl MarkerSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.handles.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handles.is_empty()
    }

    pub fn clear<W: MapWidget + ?Sized>(&mut self, widget: &mut W) {
        for handle in self.handles.drain(..) {
            widget.remove_marker(handle);
        }
    }

    /// Forgets handles whose widget has already been torn down.
    pub fn forget(&mut self) {
        self.handles.clear();
    }

    /// Clears, then places one marker per zone.
    pub fn replace_all<W: MapWidget + ?Sized>(
        &mut self,
        widget: &mut W,
        zones: &[PointOfInterest],
        mode: Mode,
        popup_offset_px: u32,
    ) {
        self.clear(widget);
        for poi in zones {
            let spec = MarkerSpec::for_poi(poi, mode, popup_offset_px);
            match widget.add_marker(&spec) {
                Ok(handle) => self.handles.push(handle),
                Err(err) => error!("marker for `{}` rejected: {err}", poi.label),
            }
        }
    }
}
