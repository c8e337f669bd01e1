//! TomTom Maps SDK behind the [`MapSdk`] / [`MapWidget`] traits.
//!
//! The SDK is loaded by a `<script>` tag and exposes the global `tt`; the
//! small JS shim below keeps constructor calls out of Rust.

use std::cell::Cell;
use std::collections::BTreeMap;
use std::rc::Rc;

use foundation::{HandleAllocator, LatLon};
use layers::symbology::marker_element_html;
use layers::{LayerId, MapError, MapOptions, MapSdk, MapWidget, MarkerHandle, MarkerSpec, OverlayLayer};
use layers::Layer;
use tracing::{debug, warn};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(inline_js = "
export function geosense_sdk_loaded() {
    return typeof tt !== 'undefined';
}

export function geosense_create_map(key, container, lng, lat, zoom, style) {
    return tt.map({ key, container, center: [lng, lat], zoom, style });
}

export function geosense_add_navigation_control(map) {
    map.addControl(new tt.NavigationControl());
}

export function geosense_overlay(id, key) {
    return id === 'traffic-incidents'
        ? new tt.TrafficIncidents({ key })
        : new tt.TrafficFlow({ key });
}

export function geosense_add_marker(map, lng, lat, iconHtml, popupOffset, popupHtml) {
    const el = document.createElement('div');
    el.className = 'custom-marker';
    el.innerHTML = iconHtml;
    const marker = new tt.Marker({ element: el }).setLngLat([lng, lat]);
    if (popupHtml !== undefined && popupHtml !== null) {
        marker.setPopup(new tt.Popup({ offset: popupOffset }).setHTML(popupHtml));
    }
    return marker.addTo(map);
}
")]
extern "C" {
    fn geosense_sdk_loaded() -> bool;

    #[wasm_bindgen(catch)]
    fn geosense_create_map(
        key: &str,
        container: &str,
        lng: f64,
        lat: f64,
        zoom: f64,
        style: &str,
    ) -> Result<TtMap, JsValue>;

    fn geosense_add_navigation_control(map: &TtMap);

    #[wasm_bindgen(catch)]
    fn geosense_overlay(id: &str, key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    fn geosense_add_marker(
        map: &TtMap,
        lng: f64,
        lat: f64,
        icon_html: &str,
        popup_offset: u32,
        popup_html: Option<String>,
    ) -> Result<TtMarker, JsValue>;
}

#[wasm_bindgen]
extern "C" {
    type TtMap;

    #[wasm_bindgen(method)]
    fn resize(this: &TtMap);

    #[wasm_bindgen(method, js_name = setCenter)]
    fn set_center(this: &TtMap, lng_lat: &JsValue);

    #[wasm_bindgen(method, js_name = setZoom)]
    fn set_zoom(this: &TtMap, zoom: f64);

    #[wasm_bindgen(method, js_name = getLayer)]
    fn get_layer(this: &TtMap, id: &str) -> JsValue;

    #[wasm_bindgen(method, catch, js_name = addLayer)]
    fn add_layer(this: &TtMap, layer: &JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = removeLayer)]
    fn remove_layer(this: &TtMap, id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method, catch, js_name = removeSource)]
    fn remove_source(this: &TtMap, id: &str) -> Result<(), JsValue>;

    #[wasm_bindgen(method)]
    fn on(this: &TtMap, event: &str, callback: &js_sys::Function);

    #[wasm_bindgen(method)]
    fn remove(this: &TtMap);

    type TtMarker;

    #[wasm_bindgen(method, js_name = remove)]
    fn remove_marker(this: &TtMarker);
}

/// Map widget events, tagged with the generation of the widget that raised
/// them so events from a released widget can be told apart.
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    Load,
    Error(String),
}

type EventSink = Rc<dyn Fn(u32, MapEvent)>;

thread_local! {
    // Unique across SDK instances.
    static NEXT_GENERATION: Cell<u32> = const { Cell::new(0) };
}

pub struct TomTomSdk {
    document: web_sys::Document,
    generation: Rc<Cell<u32>>,
    sink: EventSink,
}

impl TomTomSdk {
    pub fn new(document: web_sys::Document, sink: impl Fn(u32, MapEvent) + 'static) -> Self {
        Self {
            document,
            generation: Rc::new(Cell::new(0)),
            sink: Rc::new(sink),
        }
    }

    /// Generation of the most recently created widget.
    pub fn generation(&self) -> u32 {
        self.generation.get()
    }
}

impl MapSdk for TomTomSdk {
    type Widget = TomTomMap;

    fn is_loaded(&self) -> bool {
        geosense_sdk_loaded()
    }

    fn has_container(&self, id: &str) -> bool {
        self.document.get_element_by_id(id).is_some()
    }

    fn create(&mut self, options: &MapOptions) -> Result<TomTomMap, MapError> {
        let [lng, lat] = options.center.to_lng_lat();
        let map = geosense_create_map(
            &options.api_key,
            &options.container_id,
            lng,
            lat,
            options.zoom,
            &options.style,
        )
        .map_err(|e| MapError::Construction(js_message(&e)))?;

        let generation = NEXT_GENERATION.with(|g| {
            let n = g.get().wrapping_add(1);
            g.set(n);
            n
        });
        self.generation.set(generation);

        let sink = Rc::clone(&self.sink);
        let on_load = Closure::<dyn FnMut(JsValue)>::new(move |_: JsValue| {
            sink(generation, MapEvent::Load);
        });
        let sink = Rc::clone(&self.sink);
        let on_error = Closure::<dyn FnMut(JsValue)>::new(move |e: JsValue| {
            sink(generation, MapEvent::Error(js_message(&e)));
        });
        map.on("load", on_load.as_ref().unchecked_ref());
        map.on("error", on_error.as_ref().unchecked_ref());

        Ok(TomTomMap {
            map,
            api_key: options.api_key.clone(),
            overlays: BTreeMap::new(),
            markers: BTreeMap::new(),
            handles: HandleAllocator::new(),
            released: false,
            _listeners: [on_load, on_error],
        })
    }
}

pub struct TomTomMap {
    map: TtMap,
    api_key: String,
    overlays: BTreeMap<LayerId, JsValue>,
    markers: BTreeMap<MarkerHandle, TtMarker>,
    handles: HandleAllocator,
    released: bool,
    _listeners: [Closure<dyn FnMut(JsValue)>; 2],
}

impl TomTomMap {
    fn overlay(&mut self, layer: &OverlayLayer) -> Result<JsValue, MapError> {
        let id = layer.id();
        if let Some(js) = self.overlays.get(&id) {
            return Ok(js.clone());
        }
        let key = if layer.api_key().is_empty() {
            self.api_key.as_str()
        } else {
            layer.api_key()
        };
        let js = geosense_overlay(id.as_str(), key)
            .map_err(|e| MapError::Construction(js_message(&e)))?;
        self.overlays.insert(id, js.clone());
        Ok(js)
    }
}

impl MapWidget for TomTomMap {
    fn add_navigation_control(&mut self) {
        geosense_add_navigation_control(&self.map);
    }

    fn resize(&mut self) {
        self.map.resize();
    }

    fn set_center(&mut self, at: LatLon) {
        let [lng, lat] = at.to_lng_lat();
        let lng_lat = js_sys::Array::of2(&JsValue::from_f64(lng), &JsValue::from_f64(lat));
        self.map.set_center(&lng_lat);
    }

    fn set_zoom(&mut self, zoom: f64) {
        self.map.set_zoom(zoom);
    }

    fn has_layer(&self, id: LayerId) -> bool {
        let layer = self.map.get_layer(id.as_str());
        !layer.is_undefined() && !layer.is_null()
    }

    fn add_layer(&mut self, layer: &OverlayLayer) -> Result<(), MapError> {
        let id = layer.id();
        if self.has_layer(id) {
            return Err(MapError::DuplicateLayer(id));
        }
        let js = self.overlay(layer)?;
        self.map.add_layer(&js).map_err(|e| {
            let reason = js_message(&e);
            warn!("addLayer({id}) failed: {reason}");
            MapError::LayerRejected { id, reason }
        })
    }

    fn remove_layer(&mut self, id: LayerId) -> Result<(), MapError> {
        self.map
            .remove_layer(id.as_str())
            .map_err(|_| MapError::LayerNotFound(id))
    }

    fn remove_source(&mut self, id: LayerId) -> Result<(), MapError> {
        self.map
            .remove_source(id.as_str())
            .map_err(|_| MapError::SourceNotFound(id))
    }

    fn add_marker(&mut self, spec: &MarkerSpec) -> Result<MarkerHandle, MapError> {
        let [lng, lat] = spec.position.to_lng_lat();
        let (offset, html) = match &spec.popup {
            Some(p) => (p.offset_px, Some(p.html.clone())),
            None => (0, None),
        };
        let marker = geosense_add_marker(
            &self.map,
            lng,
            lat,
            &marker_element_html(spec.icon),
            offset,
            html,
        )
        .map_err(|e| MapError::Marker(js_message(&e)))?;
        let handle = self.handles.alloc();
        self.markers.insert(handle, marker);
        Ok(handle)
    }

    fn remove_marker(&mut self, handle: MarkerHandle) {
        if let Some(marker) = self.markers.remove(&handle) {
            marker.remove_marker();
            self.handles.release(handle);
        }
    }

    fn release(&mut self) {
        if self.released {
            return;
        }
        for (_, marker) in std::mem::take(&mut self.markers) {
            marker.remove_marker();
        }
        self.map.remove();
        self.released = true;
        debug!("map instance removed");
    }
}

pub(crate) fn js_message(value: &JsValue) -> String {
    if let Some(err) = value.dyn_ref::<js_sys::Error>() {
        return String::from(err.message());
    }
    value
        .as_string()
        .unwrap_or_else(|| format!("{value:?}"))
}
