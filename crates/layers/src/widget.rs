//! Boundary to the third-party map SDK.
//!
//! The controller never talks to the SDK directly; the browser app implements
//! these traits over the TomTom bindings and tests use [`crate::headless`].

use foundation::{Handle, LatLon};

use crate::layer::LayerId;
use crate::marker::MarkerSpec;
use crate::overlay::OverlayLayer;

pub type MarkerHandle = Handle;

#[derive(Debug, Clone, PartialEq)]
pub struct MapOptions {
    pub api_key: String,
    pub container_id: String,
    pub center: LatLon,
    pub zoom: f64,
    pub style: String,
}

impl Default for MapOptions {
    fn default() -> Self {
        Self {
            api_key: "demo".to_string(),
            container_id: "map".to_string(),
            center: LatLon::PUNE,
            zoom: 13.0,
            style: "tomtom://vector/1/basic-main".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MapError {
    #[error("map SDK not loaded after {attempts} attempts")]
    SdkUnavailable { attempts: u32 },
    #[error("map container `{0}` not found")]
    ContainerMissing(String),
    #[error("map construction failed: {0}")]
    Construction(String),
    #[error("layer `{0}` already exists")]
    DuplicateLayer(LayerId),
    #[error("layer `{id}` rejected by the map: {reason}")]
    LayerRejected { id: LayerId, reason: String },
    #[error("layer `{0}` not present")]
    LayerNotFound(LayerId),
    #[error("source `{0}` not present")]
    SourceNotFound(LayerId),
    #[error("marker rejected: {0}")]
    Marker(String),
}

/// A live map instance.
pub trait MapWidget {
    fn add_navigation_control(&mut self);
    fn resize(&mut self);
    fn set_center(&mut self, at: LatLon);
    fn set_zoom(&mut self, zoom: f64);

    fn has_layer(&self, id: LayerId) -> bool;
    fn add_layer(&mut self, layer: &OverlayLayer) -> Result<(), MapError>;
    fn remove_layer(&mut self, id: LayerId) -> Result<(), MapError>;
    fn remove_source(&mut self, id: LayerId) -> Result<(), MapError>;

    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerHandle, MapError>;
    /// Detaches the marker and drops its popup. Unknown handles are ignored.
    fn remove_marker(&mut self, handle: MarkerHandle);

    /// Tears the instance down, releasing its rendering context.
    fn release(&mut self);
}

/// Factory side of the SDK. Script loading is asynchronous, so `is_loaded`
/// may be `false` for a while after page start.
pub trait MapSdk {
    type Widget: MapWidget;

    fn is_loaded(&self) -> bool;
    fn has_container(&self, id: &str) -> bool;
    fn create(&mut self, options: &MapOptions) -> Result<Self::Widget, MapError>;
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::MapError;
    use crate::layer::LayerId;

    #[test]
    fn rejected_layer_keeps_the_sdk_reason() {
        let err = MapError::LayerRejected {
            id: LayerId("traffic-flow"),
            reason: "Style is not done loading".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "layer `traffic-flow` rejected by the map: Style is not done loading"
        );
        assert_ne!(err, MapError::DuplicateLayer(LayerId("traffic-flow")));
    }
}
