//! In-memory map SDK.
//!
//! Enforces the same invariants the real widget enforces (duplicate layer ids
//! are rejected, sources must be removed with their layers) so the controller
//! can be exercised without a browser. Used by the replay CLI and by tests.

use std::cell::Cell;
use std::collections::{BTreeMap, BTreeSet};
use std::rc::Rc;

use foundation::{HandleAllocator, LatLon};

use crate::layer::{Layer, LayerId};
use crate::marker::MarkerSpec;
use crate::overlay::OverlayLayer;
use crate::widget::{MapError, MapOptions, MapSdk, MapWidget, MarkerHandle};

#[derive(Debug)]
pub struct HeadlessSdk {
    /// Number of `is_loaded` polls that still report "not loaded".
    polls_until_loaded: Cell<Option<u32>>,
    containers: BTreeSet<String>,
    fail_next_create: Option<String>,
    created: u32,
    live_widgets: Rc<Cell<u32>>,
}

impl Default for HeadlessSdk {
    fn default() -> Self {
        Self::new()
    }
}

impl HeadlessSdk {
    /// Loaded SDK with a `map` container.
    pub fn new() -> Self {
        Self {
            polls_until_loaded: Cell::new(Some(0)),
            containers: BTreeSet::from(["map".to_string()]),
            fail_next_create: None,
            created: 0,
            live_widgets: Rc::new(Cell::new(0)),
        }
    }

    /// SDK whose script finishes loading after `polls` readiness checks.
    pub fn loading_after(polls: u32) -> Self {
        let sdk = Self::new();
        sdk.polls_until_loaded.set(Some(polls));
        sdk
    }

    /// SDK whose script never loads.
    pub fn never_loaded() -> Self {
        let sdk = Self::new();
        sdk.polls_until_loaded.set(None);
        sdk
    }

    pub fn without_container(mut self, id: &str) -> Self {
        self.containers.remove(id);
        self
    }

    pub fn fail_next_create(&mut self, reason: impl Into<String>) {
        self.fail_next_create = Some(reason.into());
    }

    pub fn created(&self) -> u32 {
        self.created
    }

    /// Widgets constructed and not yet released.
    pub fn live_widgets(&self) -> u32 {
        self.live_widgets.get()
    }
}

impl MapSdk for HeadlessSdk {
    type Widget = HeadlessMap;

    fn is_loaded(&self) -> bool {
        match self.polls_until_loaded.get() {
            None => false,
            Some(0) => true,
            Some(n) => {
                self.polls_until_loaded.set(Some(n - 1));
                false
            }
        }
    }

    fn has_container(&self, id: &str) -> bool {
        self.containers.contains(id)
    }

    fn create(&mut self, options: &MapOptions) -> Result<HeadlessMap, MapError> {
        if let Some(reason) = self.fail_next_create.take() {
            return Err(MapError::Construction(reason));
        }
        self.created += 1;
        self.live_widgets.set(self.live_widgets.get() + 1);
        Ok(HeadlessMap {
            center: options.center,
            zoom: options.zoom,
            nav_controls: 0,
            resizes: 0,
            layers: BTreeSet::new(),
            sources: BTreeSet::new(),
            markers: BTreeMap::new(),
            handles: HandleAllocator::new(),
            released: false,
            live_widgets: Rc::clone(&self.live_widgets),
        })
    }
}

#[derive(Debug)]
pub struct HeadlessMap {
    center: LatLon,
    zoom: f64,
    nav_controls: u32,
    resizes: u32,
    layers: BTreeSet<LayerId>,
    sources: BTreeSet<LayerId>,
    markers: BTreeMap<MarkerHandle, MarkerSpec>,
    handles: HandleAllocator,
    released: bool,
    live_widgets: Rc<Cell<u32>>,
}

impl HeadlessMap {
    pub fn center(&self) -> LatLon {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    pub fn nav_controls(&self) -> u32 {
        self.nav_controls
    }

    pub fn resize_count(&self) -> u32 {
        self.resizes
    }

    pub fn layer_ids(&self) -> Vec<LayerId> {
        self.layers.iter().copied().collect()
    }

    pub fn source_ids(&self) -> Vec<LayerId> {
        self.sources.iter().copied().collect()
    }

    pub fn markers(&self) -> impl Iterator<Item = &MarkerSpec> {
        self.markers.values()
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }
}

impl MapWidget for HeadlessMap {
    fn add_navigation_control(&mut self) {
        self.nav_controls += 1;
    }

    fn resize(&mut self) {
        self.resizes += 1;
    }

    fn set_center(&mut self, at: LatLon) {
        self.center = at;
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.zoom = zoom;
    }

    fn has_layer(&self, id: LayerId) -> bool {
        self.layers.contains(&id)
    }

    fn add_layer(&mut self, layer: &OverlayLayer) -> Result<(), MapError> {
        let id = layer.id();
        if self.layers.contains(&id) || self.sources.contains(&id) {
            return Err(MapError::DuplicateLayer(id));
        }
        self.sources.insert(id);
        self.layers.insert(id);
        Ok(())
    }

    fn remove_layer(&mut self, id: LayerId) -> Result<(), MapError> {
        if !self.layers.remove(&id) {
            return Err(MapError::LayerNotFound(id));
        }
        Ok(())
    }

    fn remove_source(&mut self, id: LayerId) -> Result<(), MapError> {
        if self.layers.contains(&id) {
            // The SDK refuses to drop a source still used by a layer.
            return Err(MapError::DuplicateLayer(id));
        }
        if !self.sources.remove(&id) {
            return Err(MapError::SourceNotFound(id));
        }
        Ok(())
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerHandle, MapError> {
        if self.released {
            return Err(MapError::Marker("map has been removed".to_string()));
        }
        let handle = self.handles.alloc();
        self.markers.insert(handle, spec.clone());
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        if self.handles.release(handle) {
            self.markers.remove(&handle);
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        self.released = true;
        self.markers.clear();
        self.layers.clear();
        self.sources.clear();
        self.live_widgets
            .set(self.live_widgets.get().saturating_sub(1));
    }
}

#[cfg(test)]
mod tests {
    use super::HeadlessSdk;
    use crate::overlay::{OverlayKind, OverlayLayer};
    use crate::widget::{MapError, MapOptions, MapSdk, MapWidget};

    #[test]
    fn rejects_duplicate_layer() {
        let mut sdk = HeadlessSdk::new();
        let mut map = sdk.create(&MapOptions::default()).unwrap();
        let flow = OverlayLayer::new(OverlayKind::Flow, "k");
        map.add_layer(&flow).unwrap();
        assert_eq!(
            map.add_layer(&flow),
            Err(MapError::DuplicateLayer(OverlayKind::Flow.layer_id()))
        );
    }

    #[test]
    fn stale_source_blocks_re_add() {
        let mut sdk = HeadlessSdk::new();
        let mut map = sdk.create(&MapOptions::default()).unwrap();
        let flow = OverlayLayer::new(OverlayKind::Flow, "k");
        map.add_layer(&flow).unwrap();
        map.remove_layer(flow.kind().layer_id()).unwrap();
        assert!(map.add_layer(&flow).is_err());
        map.remove_source(flow.kind().layer_id()).unwrap();
        assert!(map.add_layer(&flow).is_ok());
    }

    #[test]
    fn release_tracks_live_widgets() {
        let mut sdk = HeadlessSdk::new();
        let mut a = sdk.create(&MapOptions::default()).unwrap();
        assert_eq!(sdk.live_widgets(), 1);
        a.release();
        a.release();
        assert_eq!(sdk.live_widgets(), 0);
    }

    #[test]
    fn readiness_flips_after_polls() {
        let sdk = HeadlessSdk::loading_after(2);
        assert!(!sdk.is_loaded());
        assert!(!sdk.is_loaded());
        assert!(sdk.is_loaded());
        assert!(!HeadlessSdk::never_loaded().is_loaded());
    }
}
