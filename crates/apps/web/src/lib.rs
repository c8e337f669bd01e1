//! Browser bindings for the GeoSense+ dashboard.
//!
//! The page calls the exported functions from its event handlers. All state
//! lives in one [`App`] held in a thread local; provider calls run on the
//! browser's microtask queue via `spawn_local`.

use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;
use std::sync::atomic::{AtomicBool, Ordering};

use foundation::LatLon;
use providers::{DemoProviders, Providers};
use tracing::{debug, info, warn};
use view::{ConfigError, Dashboard, DashboardConfig, LocateResult, drive};
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use wasm_bindgen_futures::spawn_local;

mod http;
mod surface;
mod tomtom;

use http::HttpProviders;
use surface::DomSurface;
use tomtom::{MapEvent, TomTomSdk};

static INITIALIZED: AtomicBool = AtomicBool::new(false);

type WebDashboard = Dashboard<TomTomSdk, DomSurface>;

#[derive(Debug, thiserror::Error)]
pub enum WebError {
    #[error("no window")]
    NoWindow,
    #[error("no document")]
    NoDocument,
    #[error("dashboard not initialised; call init_dashboard first")]
    NotInitialized,
    #[error("dashboard is busy")]
    Busy,
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error("{0}")]
    Js(String),
}

impl From<WebError> for JsValue {
    fn from(err: WebError) -> Self {
        JsValue::from_str(&err.to_string())
    }
}

struct App {
    dashboard: RefCell<WebDashboard>,
    providers: Box<dyn Providers>,
    timer: Cell<Option<i32>>,
}

thread_local! {
    static APP: RefCell<Option<Rc<App>>> = const { RefCell::new(None) };
    static FEED_LISTENER: Cell<bool> = const { Cell::new(false) };
}

#[wasm_bindgen(start)]
pub fn start() -> Result<(), JsValue> {
    if INITIALIZED.swap(true, Ordering::SeqCst) {
        return Ok(());
    }
    console_error_panic_hook::set_once();
    tracing_wasm::set_as_global_default();
    Ok(())
}

fn now_ms() -> u64 {
    js_sys::Date::now().max(0.0) as u64
}

fn app() -> Result<Rc<App>, WebError> {
    APP.with(|slot| slot.borrow().clone())
        .ok_or(WebError::NotInitialized)
}

/// Runs a synchronous update against the dashboard, then re-arms the timer.
fn update<R>(app: &Rc<App>, f: impl FnOnce(&mut WebDashboard) -> R) -> Result<R, WebError> {
    let out = {
        let mut dash = app.dashboard.try_borrow_mut().map_err(|_| WebError::Busy)?;
        dash.set_now(now_ms());
        f(&mut dash)
    };
    arm_timer(app);
    Ok(out)
}

/// Spawns a provider-backed task and re-arms the timer once it settles.
fn spawn<F, Fut>(app: Rc<App>, task: F)
where
    F: FnOnce(Rc<App>) -> Fut,
    Fut: Future<Output = ()> + 'static,
{
    if let Ok(mut dash) = app.dashboard.try_borrow_mut() {
        dash.set_now(now_ms());
    }
    let fut = task(Rc::clone(&app));
    spawn_local(async move {
        fut.await;
        arm_timer(&app);
    });
}

/// Points the single browser timeout at the dashboard's earliest due timer.
fn arm_timer(app: &Rc<App>) {
    let Some(window) = web_sys::window() else {
        return;
    };
    if let Some(handle) = app.timer.take() {
        window.clear_timeout_with_handle(handle);
    }
    let Ok(due) = app.dashboard.try_borrow().map(|d| d.next_timer_due()) else {
        return;
    };
    let Some(due) = due else {
        return;
    };
    let delay = i32::try_from(due.saturating_sub(now_ms())).unwrap_or(i32::MAX);

    let fire = Rc::clone(app);
    let callback = Closure::once_into_js(move || {
        fire.timer.set(None);
        if let Ok(mut dash) = fire.dashboard.try_borrow_mut() {
            let ran = dash.run_due_timers(now_ms());
            debug!(ran, "timers fired");
        }
        arm_timer(&fire);
    });
    match window.set_timeout_with_callback_and_timeout_and_arguments_0(
        callback.unchecked_ref(),
        delay,
    ) {
        Ok(handle) => app.timer.set(Some(handle)),
        Err(err) => warn!(error = %tomtom::js_message(&err), "setTimeout failed"),
    }
}

fn on_map_event(generation: u32, event: MapEvent) {
    let Some(app) = APP.with(|slot| slot.borrow().clone()) else {
        return;
    };
    let Ok(mut dash) = app.dashboard.try_borrow_mut() else {
        warn!(?event, "map event while dashboard busy");
        return;
    };
    if dash.map().sdk().generation() != generation {
        debug!(generation, ?event, "event from released map ignored");
        return;
    }
    dash.set_now(now_ms());
    match event {
        MapEvent::Load => dash.on_map_load(),
        MapEvent::Error(message) => dash.on_map_error(&message),
    }
    drop(dash);
    arm_timer(&app);
}

/// Builds the dashboard and shows the default section.
///
/// `config_json` overrides [`DashboardConfig`] defaults. With `demo_data`
/// the panels are fed from built-in fixtures instead of the HTTP API.
#[wasm_bindgen]
pub fn init_dashboard(config_json: Option<String>, demo_data: bool) -> Result<(), JsValue> {
    let config = match config_json.as_deref() {
        Some(json) => DashboardConfig::from_json(json).map_err(WebError::from)?,
        None => DashboardConfig::default(),
    };
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let document = window.document().ok_or(WebError::NoDocument)?;

    let providers: Box<dyn Providers> = if demo_data {
        Box::new(DemoProviders::new())
    } else {
        Box::new(HttpProviders::new(config.api_base.clone()))
    };
    info!(demo_data, api_base = %config.api_base, "starting dashboard");

    listen_for_upvotes(&document)?;
    let sdk = TomTomSdk::new(document.clone(), on_map_event);
    let dashboard = Dashboard::new(sdk, DomSurface::new(document), config);
    let app = Rc::new(App {
        dashboard: RefCell::new(dashboard),
        providers,
        timer: Cell::new(None),
    });
    if let Some(previous) = APP.with(|slot| slot.borrow_mut().replace(Rc::clone(&app))) {
        if let (Some(handle), Some(window)) = (previous.timer.take(), web_sys::window()) {
            window.clear_timeout_with_handle(handle);
        }
    }

    let effects = update(&app, |d| d.start(&mut rand::thread_rng()))?;
    spawn(app, move |app| async move {
        drive::run_effects(&app.dashboard, app.providers.as_ref(), effects).await;
    });
    Ok(())
}

#[wasm_bindgen]
pub fn show_section(name: &str) -> Result<(), JsValue> {
    let app = app()?;
    let effects = update(&app, |d| d.show_section(name))?;
    spawn(app, move |app| async move {
        drive::run_effects(&app.dashboard, app.providers.as_ref(), effects).await;
    });
    Ok(())
}

/// Returns false for an unknown mode name.
#[wasm_bindgen]
pub fn set_mode(mode: &str) -> Result<bool, JsValue> {
    let app = app()?;
    Ok(update(&app, |d| d.set_mode_str(mode))?)
}

/// Returns false for an unknown layer key.
#[wasm_bindgen]
pub fn set_layer_toggle(layer: &str, checked: bool) -> Result<bool, JsValue> {
    let app = app()?;
    Ok(update(&app, |d| d.set_toggle_str(layer, checked))?)
}

fn read_position(position: &JsValue) -> Option<LatLon> {
    let coords = js_sys::Reflect::get(position, &JsValue::from_str("coords")).ok()?;
    let lat = js_sys::Reflect::get(&coords, &JsValue::from_str("latitude")).ok()?;
    let lon = js_sys::Reflect::get(&coords, &JsValue::from_str("longitude")).ok()?;
    Some(LatLon::new(lat.as_f64()?, lon.as_f64()?))
}

fn locate(app: &Rc<App>, result: LocateResult) {
    if let Err(err) = update(app, |d| d.locate(result)) {
        warn!(%err, "dropping geolocation result");
    }
}

#[wasm_bindgen]
pub fn get_current_location() -> Result<(), JsValue> {
    let app = app()?;
    let window = web_sys::window().ok_or(WebError::NoWindow)?;
    let Ok(geolocation) = window.navigator().geolocation() else {
        locate(&app, LocateResult::Unsupported);
        return Ok(());
    };

    let ok_app = Rc::clone(&app);
    let on_ok = Closure::once_into_js(move |position: JsValue| {
        let result = read_position(&position)
            .map(LocateResult::Position)
            .unwrap_or(LocateResult::Denied);
        locate(&ok_app, result);
    });
    let on_err = Closure::once_into_js(move |err: JsValue| {
        debug!(error = %tomtom::js_message(&err), "geolocation failed");
        locate(&app, LocateResult::Denied);
    });
    geolocation
        .get_current_position_with_error_callback(on_ok.unchecked_ref(), Some(on_err.unchecked_ref()))
        .map_err(|e| WebError::Js(tomtom::js_message(&e)))?;
    Ok(())
}

#[wasm_bindgen]
pub fn analyze_location() -> Result<(), JsValue> {
    let app = app()?;
    spawn(app, |app| async move {
        drive::analyze(&app.dashboard, app.providers.as_ref()).await;
    });
    Ok(())
}

#[wasm_bindgen]
pub fn show_route_modal() -> Result<(), JsValue> {
    let app = app()?;
    Ok(update(&app, |d| d.open_route_modal())?)
}

#[wasm_bindgen]
pub fn close_route_modal() -> Result<(), JsValue> {
    let app = app()?;
    Ok(update(&app, |d| d.close_route_modal())?)
}

#[wasm_bindgen]
pub fn plan_route() -> Result<(), JsValue> {
    let app = app()?;
    spawn(app, |app| async move {
        drive::plan_route(&app.dashboard, app.providers.as_ref()).await;
    });
    Ok(())
}

#[wasm_bindgen]
pub fn show_post_modal() -> Result<(), JsValue> {
    let app = app()?;
    Ok(update(&app, |d| d.open_post_modal())?)
}

#[wasm_bindgen]
pub fn close_post_modal() -> Result<(), JsValue> {
    let app = app()?;
    Ok(update(&app, |d| d.close_post_modal())?)
}

#[wasm_bindgen]
pub fn submit_post() -> Result<(), JsValue> {
    let app = app()?;
    spawn(app, |app| async move {
        drive::submit_post(&app.dashboard, app.providers.as_ref()).await;
    });
    Ok(())
}

#[wasm_bindgen]
pub fn upvote_post(post_id: String) -> Result<(), JsValue> {
    let app = app()?;
    spawn(app, move |app| async move {
        drive::upvote(&app.dashboard, app.providers.as_ref(), &post_id).await;
    });
    Ok(())
}

/// Routes clicks on upvote buttons inside the feed to [`upvote_post`]. The
/// feed is re-rendered on every load, so the listener sits on the container.
fn listen_for_upvotes(document: &web_sys::Document) -> Result<(), WebError> {
    if FEED_LISTENER.with(Cell::get) {
        return Ok(());
    }
    let Some(feed) = document.get_element_by_id(view::dom::COMMUNITY_FEED) else {
        debug!("no community feed on this page");
        return Ok(());
    };
    let selector = format!(".{}", panels::community::UPVOTE_BUTTON_CLASS);
    let on_click = Closure::<dyn FnMut(web_sys::Event)>::new(move |event: web_sys::Event| {
        let post_id = event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| el.closest(&selector).ok().flatten())
            .and_then(|button| button.get_attribute(panels::community::POST_ID_ATTR));
        if let Some(post_id) = post_id {
            if let Err(err) = upvote_post(post_id) {
                warn!(error = %tomtom::js_message(&err), "upvote click dropped");
            }
        }
    });
    feed.add_event_listener_with_callback("click", on_click.as_ref().unchecked_ref())
        .map_err(|e| WebError::Js(tomtom::js_message(&e)))?;
    on_click.forget();
    FEED_LISTENER.with(|f| f.set(true));
    Ok(())
}

#[wasm_bindgen]
pub fn toggle_chatbot() -> Result<(), JsValue> {
    let app = app()?;
    Ok(update(&app, |d| d.toggle_chatbot())?)
}

#[wasm_bindgen]
pub fn send_chat_message() -> Result<(), JsValue> {
    let app = app()?;
    spawn(app, |app| async move {
        drive::send_chat(&app.dashboard, app.providers.as_ref()).await;
    });
    Ok(())
}

/// Window click handler; closes a modal when its backdrop was clicked.
#[wasm_bindgen]
pub fn on_window_click(target_id: &str) -> Result<bool, JsValue> {
    let app = app()?;
    Ok(update(&app, |d| d.close_modal_on_backdrop(target_id))?)
}

/// JSON snapshot of the view state, for debugging from the console.
#[wasm_bindgen]
pub fn dashboard_snapshot() -> Result<String, JsValue> {
    let app = app()?;
    let dash = app.dashboard.try_borrow().map_err(|_| WebError::Busy)?;
    serde_json::to_string(&dash.snapshot()).map_err(|e| JsValue::from_str(&e.to_string()))
}
