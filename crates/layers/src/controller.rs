use foundation::LatLon;
use runtime::RetryPolicy;
use tracing::{debug, error, info, warn};

use crate::layer::Layer;
use crate::marker::MarkerSet;
use crate::mode::Mode;
use crate::overlay::{OverlayKind, OverlayLayer};
use crate::poi::fixtures;
use crate::toggles::LayerToggles;
use crate::widget::{MapError, MapOptions, MapSdk, MapWidget};

#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum MapState {
    #[default]
    Uninitialized,
    /// Widget constructed, waiting for its load event.
    Initializing,
    Ready,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InitOutcome {
    /// Widget constructed; [`MapController::on_load`] follows.
    Started,
    /// SDK script not loaded yet; call `init` again after `delay_ms`.
    RetryAfter { attempt: u32, delay_ms: u32 },
    Failed(MapError),
}

#[derive(Debug, Clone, PartialEq)]
pub struct MapControllerConfig {
    pub options: MapOptions,
    pub sdk_retry: RetryPolicy,
    pub popup_offset_px: u32,
    /// Delay of the forced resize after load.
    pub resize_delay_ms: u32,
}

impl Default for MapControllerConfig {
    fn default() -> Self {
        Self {
            options: MapOptions::default(),
            sdk_retry: RetryPolicy::default(),
            popup_offset_px: 35,
            resize_delay_ms: 300,
        }
    }
}

/// Owns the map widget, its markers and the two traffic overlays, and keeps
/// them in line with the display mode and the expert-legend checkboxes.
pub struct MapController<S: MapSdk> {
    sdk: S,
    config: MapControllerConfig,
    state: MapState,
    sdk_attempts: u32,
    widget: Option<S::Widget>,
    overlays: Vec<OverlayLayer>,
    markers: MarkerSet,
}

impl<S: MapSdk> MapController<S> {
    pub fn new(sdk: S, config: MapControllerConfig) -> Self {
        Self {
            sdk,
            config,
            state: MapState::Uninitialized,
            sdk_attempts: 0,
            widget: None,
            overlays: Vec::new(),
            markers: MarkerSet::new(),
        }
    }

    pub fn state(&self) -> MapState {
        self.state
    }

    pub fn is_ready(&self) -> bool {
        self.state == MapState::Ready
    }

    pub fn has_widget(&self) -> bool {
        self.widget.is_some()
    }

    pub fn widget(&self) -> Option<&S::Widget> {
        self.widget.as_ref()
    }

    pub fn sdk(&self) -> &S {
        &self.sdk
    }

    pub fn sdk_mut(&mut self) -> &mut S {
        &mut self.sdk
    }

    pub fn config(&self) -> &MapControllerConfig {
        &self.config
    }

    pub fn marker_count(&self) -> usize {
        self.markers.len()
    }

    /// Overlays currently attached to the widget, in [`OverlayKind::ALL`] order.
    pub fn attached_overlays(&self) -> Vec<OverlayKind> {
        let Some(widget) = &self.widget else {
            return Vec::new();
        };
        OverlayKind::ALL
            .into_iter()
            .filter(|k| widget.has_layer(k.layer_id()))
            .collect()
    }

    /// (Re)creates the map widget centered on `center`.
    ///
    /// While the SDK script is still loading this hands back a retry delay
    /// from the configured policy; once the policy is exhausted the attempt
    /// fails with [`MapError::SdkUnavailable`]. An existing widget is released
    /// before a new one is constructed.
    pub fn init(&mut self, center: LatLon) -> InitOutcome {
        if !self.sdk.is_loaded() {
            self.sdk_attempts += 1;
            return match self.config.sdk_retry.delay_for(self.sdk_attempts) {
                Some(delay_ms) => {
                    warn!(
                        attempt = self.sdk_attempts,
                        delay_ms, "map SDK not loaded yet, retrying"
                    );
                    InitOutcome::RetryAfter {
                        attempt: self.sdk_attempts,
                        delay_ms,
                    }
                }
                None => {
                    let attempts = self.sdk_attempts;
                    self.sdk_attempts = 0;
                    error!(attempts, "map SDK never loaded, giving up");
                    InitOutcome::Failed(MapError::SdkUnavailable { attempts })
                }
            };
        }
        self.sdk_attempts = 0;

        let container = self.config.options.container_id.clone();
        if !self.sdk.has_container(&container) {
            error!("map container `{container}` not found");
            return InitOutcome::Failed(MapError::ContainerMissing(container));
        }

        self.teardown();

        let options = MapOptions {
            center,
            ..self.config.options.clone()
        };
        info!(lat = center.lat, lon = center.lon, "initializing map");
        match self.sdk.create(&options) {
            Ok(mut widget) => {
                widget.add_navigation_control();
                self.widget = Some(widget);
                self.state = MapState::Initializing;
                InitOutcome::Started
            }
            Err(err) => {
                error!("error initializing map: {err}");
                InitOutcome::Failed(err)
            }
        }
    }

    /// Load continuation: builds the overlay wrappers, places markers and
    /// reconciles. Returns the delay after which [`MapController::resize`]
    /// should run, or `None` if no widget is waiting for its load event.
    pub fn on_load(&mut self, mode: Mode, toggles: &LayerToggles) -> Option<u32> {
        if self.state != MapState::Initializing {
            warn!(state = ?self.state, "ignoring map load event");
            return None;
        }
        info!("map loaded");
        let api_key = self.config.options.api_key.clone();
        self.overlays = OverlayKind::ALL
            .into_iter()
            .map(|kind| OverlayLayer::new(kind, api_key.clone()))
            .collect();
        self.state = MapState::Ready;

        self.add_markers(mode);
        self.reconcile(mode, toggles);
        Some(self.config.resize_delay_ms)
    }

    /// Error continuation. Logs only.
    pub fn on_error(&mut self, message: &str) {
        error!("map error: {message}");
    }

    pub fn resize(&mut self) {
        if let Some(widget) = &mut self.widget {
            widget.resize();
        }
    }

    pub fn recenter(&mut self, at: LatLon, zoom: f64) {
        if let Some(widget) = &mut self.widget {
            widget.set_center(at);
            widget.set_zoom(zoom);
        }
    }

    /// Replaces every marker with a fresh batch built for `mode`.
    ///
    /// Popup bodies are fixed here; switching mode later does not rewrite
    /// popups of markers that survive reconciliation.
    pub fn add_markers(&mut self, mode: Mode) {
        let Some(widget) = &mut self.widget else {
            return;
        };
        self.markers
            .replace_all(widget, fixtures(), mode, self.config.popup_offset_px);
        debug!(count = self.markers.len(), "markers placed");
    }

    pub fn clear_markers(&mut self) {
        if let Some(widget) = &mut self.widget {
            self.markers.clear(widget);
        }
    }

    /// Brings overlays and markers in line with `mode` and `toggles`.
    ///
    /// Both overlays are removed first, then re-added as needed, so a pass
    /// never registers a layer id twice.
    pub fn reconcile(&mut self, mode: Mode, toggles: &LayerToggles) {
        if self.state != MapState::Ready {
            debug!(state = ?self.state, "map not ready, skipping reconciliation");
            return;
        }
        let Some(widget) = &mut self.widget else {
            return;
        };

        for overlay in &self.overlays {
            let id = overlay.id();
            if widget.has_layer(id) {
                if let Err(err) = widget.remove_layer(id) {
                    debug!("remove layer: {err}");
                }
            }
            // A source can outlive its layer; it would block the next add.
            match widget.remove_source(id) {
                Ok(()) | Err(MapError::SourceNotFound(_)) => {}
                Err(err) => debug!("remove source: {err}"),
            }
        }

        match mode {
            Mode::Expert => {
                for overlay in &self.overlays {
                    let wanted = match overlay.kind() {
                        OverlayKind::Flow => toggles.flow,
                        OverlayKind::Incidents => toggles.incidents,
                    };
                    if wanted {
                        if let Err(err) = widget.add_layer(overlay) {
                            error!("adding overlay failed: {err}");
                        }
                    }
                }
                if !toggles.poi_clusters {
                    self.markers.clear(widget);
                } else if self.markers.is_empty() {
                    self.markers.replace_all(
                        widget,
                        fixtures(),
                        mode,
                        self.config.popup_offset_px,
                    );
                }
            }
            Mode::Citizen => {
                if self.markers.is_empty() {
                    self.markers.replace_all(
                        widget,
                        fixtures(),
                        mode,
                        self.config.popup_offset_px,
                    );
                }
            }
        }
        debug!(
            mode = mode.as_str(),
            markers = self.markers.len(),
            "layers reconciled"
        );
    }

    fn teardown(&mut self) {
        if let Some(mut old) = self.widget.take() {
            debug!("releasing previous map instance");
            // Markers and overlays die with the widget.
            self.markers.forget();
            old.release();
        }
        self.overlays.clear();
        self.state = MapState::Uninitialized;
    }
}

impl<S: MapSdk> Drop for MapController<S> {
    fn drop(&mut self) {
        if let Some(widget) = &mut self.widget {
            widget.release();
        }
    }
}

#[cfg(test)]
mod tests {
    use foundation::LatLon;
    use pretty_assertions::assert_eq;
    use runtime::RetryPolicy;

    use super::{InitOutcome, MapController, MapControllerConfig, MapState};
    use crate::headless::HeadlessSdk;
    use crate::mode::Mode;
    use crate::overlay::OverlayKind;
    use crate::toggles::LayerToggles;
    use crate::widget::{MapError, MapWidget};

    fn ready(mode: Mode, toggles: &LayerToggles) -> MapController<HeadlessSdk> {
        let mut c = MapController::new(HeadlessSdk::new(), MapControllerConfig::default());
        assert_eq!(c.init(LatLon::PUNE), InitOutcome::Started);
        assert_eq!(c.on_load(mode, toggles), Some(300));
        c
    }

    fn toggles(flow: bool, incidents: bool, poi_clusters: bool) -> LayerToggles {
        LayerToggles {
            flow,
            incidents,
            poi_clusters,
        }
    }

    #[test]
    fn load_places_fixture_markers_in_citizen_mode() {
        let c = ready(Mode::Citizen, &LayerToggles::default());
        assert_eq!(c.state(), MapState::Ready);
        assert_eq!(c.marker_count(), 4);
        assert_eq!(c.widget().unwrap().marker_count(), 4);
        assert!(c.attached_overlays().is_empty());
        assert_eq!(c.widget().unwrap().nav_controls(), 1);
    }

    #[test]
    fn expert_flow_only_scenario() {
        let t = toggles(true, false, true);
        let mut c = ready(Mode::Citizen, &t);
        c.reconcile(Mode::Expert, &t);
        assert_eq!(c.attached_overlays(), vec![OverlayKind::Flow]);
        assert_eq!(c.marker_count(), 4);
    }

    #[test]
    fn reconcile_is_idempotent() {
        let t = toggles(true, true, true);
        let mut c = ready(Mode::Expert, &t);
        c.reconcile(Mode::Expert, &t);
        let layers_once = c.widget().unwrap().layer_ids();
        let sources_once = c.widget().unwrap().source_ids();
        let markers_once = c.marker_count();

        c.reconcile(Mode::Expert, &t);
        assert_eq!(c.widget().unwrap().layer_ids(), layers_once);
        assert_eq!(c.widget().unwrap().source_ids(), sources_once);
        assert_eq!(c.marker_count(), markers_once);
        assert_eq!(
            c.attached_overlays(),
            vec![OverlayKind::Flow, OverlayKind::Incidents]
        );
    }

    #[test]
    fn source_left_without_its_layer_is_cleared_on_reconcile() {
        let t = toggles(true, false, false);
        let mut c = ready(Mode::Expert, &t);
        let flow = OverlayKind::Flow.layer_id();
        c.widget.as_mut().unwrap().remove_layer(flow).unwrap();
        assert!(c.attached_overlays().is_empty());
        assert_eq!(c.widget().unwrap().source_ids(), vec![flow]);

        c.reconcile(Mode::Expert, &t);
        assert_eq!(c.attached_overlays(), vec![OverlayKind::Flow]);
        assert_eq!(c.widget().unwrap().source_ids(), vec![flow]);
    }

    #[test]
    fn leaving_expert_mode_drops_stray_sources() {
        let t = toggles(true, true, false);
        let mut c = ready(Mode::Expert, &t);
        let incidents = OverlayKind::Incidents.layer_id();
        c.widget.as_mut().unwrap().remove_layer(incidents).unwrap();

        c.reconcile(Mode::Citizen, &t);
        assert!(c.attached_overlays().is_empty());
        assert!(c.widget().unwrap().source_ids().is_empty());
    }

    #[test]
    fn unchecking_clusters_clears_markers_and_rechecking_restores() {
        let mut t = toggles(false, false, true);
        let mut c = ready(Mode::Expert, &t);
        assert_eq!(c.marker_count(), 4);

        t.poi_clusters = false;
        c.reconcile(Mode::Expert, &t);
        assert_eq!(c.marker_count(), 0);
        assert_eq!(c.widget().unwrap().marker_count(), 0);

        t.poi_clusters = true;
        c.reconcile(Mode::Expert, &t);
        assert_eq!(c.marker_count(), 4);
        assert_eq!(c.widget().unwrap().marker_count(), 4);
    }

    #[test]
    fn citizen_mode_never_attaches_overlays() {
        let t = toggles(true, true, true);
        let mut c = ready(Mode::Expert, &t);
        assert_eq!(c.attached_overlays().len(), 2);

        c.reconcile(Mode::Citizen, &t);
        assert!(c.attached_overlays().is_empty());
        assert!(c.widget().unwrap().source_ids().is_empty());
        assert_eq!(c.marker_count(), 4);
    }

    #[test]
    fn citizen_mode_restores_markers_cleared_in_expert_mode() {
        let t = toggles(false, false, false);
        let mut c = ready(Mode::Expert, &t);
        assert_eq!(c.marker_count(), 0);
        c.reconcile(Mode::Citizen, &t);
        assert_eq!(c.marker_count(), 4);
    }

    #[test]
    fn popups_keep_creation_mode() {
        let t = LayerToggles::default();
        let mut c = ready(Mode::Citizen, &t);
        c.reconcile(Mode::Expert, &t);
        let stale = c
            .widget()
            .unwrap()
            .markers()
            .all(|m| !m.popup.as_ref().unwrap().html.contains("AQI"));
        assert!(stale);

        c.add_markers(Mode::Expert);
        assert_eq!(c.marker_count(), 4);
        let fresh = c
            .widget()
            .unwrap()
            .markers()
            .all(|m| m.popup.as_ref().unwrap().html.contains("AQI"));
        assert!(fresh);
    }

    #[test]
    fn add_markers_twice_does_not_duplicate() {
        let mut c = ready(Mode::Citizen, &LayerToggles::default());
        c.add_markers(Mode::Citizen);
        c.add_markers(Mode::Citizen);
        assert_eq!(c.widget().unwrap().marker_count(), 4);
    }

    #[test]
    fn reinit_releases_previous_widget() {
        let t = LayerToggles::default();
        let mut c = ready(Mode::Citizen, &t);
        assert_eq!(c.init(LatLon::PUNE), InitOutcome::Started);
        assert_eq!(c.sdk().created(), 2);
        assert_eq!(c.sdk().live_widgets(), 1);
        assert_eq!(c.state(), MapState::Initializing);
        assert_eq!(c.marker_count(), 0);

        c.on_load(Mode::Citizen, &t);
        assert_eq!(c.marker_count(), 4);
    }

    #[test]
    fn retries_until_sdk_loads() {
        let mut c = MapController::new(
            HeadlessSdk::loading_after(2),
            MapControllerConfig::default(),
        );
        assert_eq!(
            c.init(LatLon::PUNE),
            InitOutcome::RetryAfter {
                attempt: 1,
                delay_ms: 100
            }
        );
        assert_eq!(
            c.init(LatLon::PUNE),
            InitOutcome::RetryAfter {
                attempt: 2,
                delay_ms: 200
            }
        );
        assert_eq!(c.init(LatLon::PUNE), InitOutcome::Started);
    }

    #[test]
    fn gives_up_when_retry_budget_is_spent() {
        let config = MapControllerConfig {
            sdk_retry: RetryPolicy {
                max_attempts: Some(2),
                ..RetryPolicy::default()
            },
            ..MapControllerConfig::default()
        };
        let mut c = MapController::new(HeadlessSdk::never_loaded(), config);
        assert!(matches!(c.init(LatLon::PUNE), InitOutcome::RetryAfter { .. }));
        assert!(matches!(c.init(LatLon::PUNE), InitOutcome::RetryAfter { .. }));
        assert_eq!(
            c.init(LatLon::PUNE),
            InitOutcome::Failed(MapError::SdkUnavailable { attempts: 3 })
        );
        assert_eq!(c.state(), MapState::Uninitialized);
    }

    #[test]
    fn construction_failure_leaves_map_uninitialized() {
        let mut sdk = HeadlessSdk::new();
        sdk.fail_next_create("webgl unavailable");
        let mut c = MapController::new(sdk, MapControllerConfig::default());
        assert_eq!(
            c.init(LatLon::PUNE),
            InitOutcome::Failed(MapError::Construction("webgl unavailable".to_string()))
        );
        assert_eq!(c.state(), MapState::Uninitialized);
        assert!(!c.has_widget());
    }

    #[test]
    fn missing_container_fails_without_retry() {
        let sdk = HeadlessSdk::new().without_container("map");
        let mut c = MapController::new(sdk, MapControllerConfig::default());
        assert_eq!(
            c.init(LatLon::PUNE),
            InitOutcome::Failed(MapError::ContainerMissing("map".to_string()))
        );
    }

    #[test]
    fn reconcile_before_load_is_a_no_op() {
        let mut c = MapController::new(HeadlessSdk::new(), MapControllerConfig::default());
        c.init(LatLon::PUNE);
        c.reconcile(Mode::Expert, &LayerToggles::default());
        assert_eq!(c.marker_count(), 0);
        assert!(c.attached_overlays().is_empty());
    }

    #[test]
    fn load_event_without_pending_widget_is_ignored() {
        let mut c = MapController::new(HeadlessSdk::new(), MapControllerConfig::default());
        assert_eq!(c.on_load(Mode::Citizen, &LayerToggles::default()), None);
    }

    #[test]
    fn recenter_moves_widget() {
        let mut c = ready(Mode::Citizen, &LayerToggles::default());
        let here = LatLon::new(18.6, 73.9);
        c.recenter(here, 15.0);
        assert_eq!(c.widget().unwrap().center(), here);
        assert_eq!(c.widget().unwrap().zoom(), 15.0);
        c.resize();
        assert_eq!(c.widget().unwrap().resize_count(), 1);
    }
}
