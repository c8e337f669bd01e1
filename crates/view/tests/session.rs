use foundation::LatLon;
use layers::headless::HeadlessSdk;
use layers::{MapState, OverlayKind, ToggleKey};
use pretty_assertions::assert_eq;
use providers::{ProviderError, PostList};
use view::{
    Dashboard, DashboardConfig, Legend, LocateResult, Mode, RecordingSurface, Section, Surface,
    dom,
};

type Session = Dashboard<HeadlessSdk, RecordingSurface>;

fn session() -> Session {
    Dashboard::new(
        HeadlessSdk::new(),
        RecordingSurface::new(),
        DashboardConfig::default(),
    )
}

/// Shows the map section and runs it through init and load.
fn loaded_map() -> Session {
    let mut d = session();
    d.show_section("map");
    assert_eq!(d.next_timer_due(), Some(100));
    assert_eq!(d.run_due_timers(100), 1);
    assert_eq!(d.map().state(), MapState::Initializing);
    d.on_map_load();
    assert_eq!(d.map().state(), MapState::Ready);
    d
}

fn overlays(d: &Session) -> Vec<OverlayKind> {
    d.map().attached_overlays()
}

#[test]
fn every_section_shows_alone() {
    let mut d = session();
    for s in Section::ALL {
        d.show_section(s.as_str());
        assert_eq!(d.surface().active_sections(), vec![s]);
        assert_eq!(d.state().active, Some(s));
    }
}

#[test]
fn unknown_section_keeps_previous() {
    let mut d = session();
    d.show_section("analyze");
    assert!(d.show_section("settings").is_empty());
    assert_eq!(d.state().active, Some(Section::Analyze));
    assert_eq!(d.surface().active_sections(), vec![Section::Analyze]);
    assert_eq!(d.events().count("section"), 1);
}

#[test]
fn map_section_initialises_after_delay_and_resizes_after_load() {
    let mut d = session();
    d.set_now(1_000);
    d.show_section("map");
    assert_eq!(d.run_due_timers(1_099), 0);
    assert_eq!(d.run_due_timers(1_100), 1);
    d.on_map_load();
    assert_eq!(d.map().marker_count(), 4);
    assert!(overlays(&d).is_empty());

    assert_eq!(d.next_timer_due(), Some(1_400));
    d.run_due_timers(1_400);
    let widget = d.map().widget().unwrap();
    assert_eq!(widget.resize_count(), 1);
    assert_eq!(widget.nav_controls(), 1);
}

#[test]
fn reshowing_map_replaces_the_widget() {
    let mut d = loaded_map();
    d.show_section("map");
    d.run_due_timers(200);
    d.on_map_load();
    assert_eq!(d.map().sdk().created(), 2);
    assert_eq!(d.map().sdk().live_widgets(), 1);
    assert_eq!(d.map().marker_count(), 4);
}

#[test]
fn sdk_loading_late_is_retried_with_backoff() {
    let mut d = Dashboard::new(
        HeadlessSdk::loading_after(2),
        RecordingSurface::new(),
        DashboardConfig::default(),
    );
    d.show_section("map");
    d.run_due_timers(100);
    assert_eq!(d.next_timer_due(), Some(200));
    d.run_due_timers(200);
    assert_eq!(d.next_timer_due(), Some(400));
    d.run_due_timers(400);
    assert_eq!(d.map().state(), MapState::Initializing);
    assert_eq!(d.pending_timers(), 0);
}

#[test]
fn sdk_that_never_loads_gives_up() {
    let mut config = DashboardConfig::default();
    config.sdk_retry.max_attempts = Some(3);
    let mut d = Dashboard::new(HeadlessSdk::never_loaded(), RecordingSurface::new(), config);
    d.show_section("map");
    let mut now = 0;
    while let Some(due) = d.next_timer_due() {
        now = due;
        d.run_due_timers(now);
    }
    assert_eq!(now, 100 + 100 + 200 + 400);
    assert_eq!(d.map().state(), MapState::Uninitialized);
    assert!(
        d.events()
            .events()
            .iter()
            .any(|e| e.message.starts_with("failed: map SDK not loaded"))
    );
}

#[test]
fn expert_flow_scenario() {
    let mut d = loaded_map();
    d.set_mode(Mode::Expert);
    assert_eq!(overlays(&d), vec![OverlayKind::Flow]);
    assert_eq!(d.map().marker_count(), 4);
}

#[test]
fn repeated_reconciliation_is_idempotent() {
    let mut d = loaded_map();
    d.set_mode(Mode::Expert);
    d.set_toggle(ToggleKey::TrafficIncidents, true);
    let first = d.snapshot();
    d.set_toggle(ToggleKey::TrafficIncidents, true);
    let second = d.snapshot();
    assert_eq!(first.overlays, second.overlays);
    assert_eq!(first.markers, second.markers);
    let widget = d.map().widget().unwrap();
    assert_eq!(widget.layer_ids().len(), 2);
    assert_eq!(widget.source_ids().len(), 2);
}

#[test]
fn clusters_checkbox_clears_and_restores_markers() {
    let mut d = loaded_map();
    d.set_mode(Mode::Expert);
    d.set_toggle(ToggleKey::PoiClusters, false);
    assert_eq!(d.map().marker_count(), 0);
    assert_eq!(d.map().widget().unwrap().marker_count(), 0);
    d.set_toggle(ToggleKey::PoiClusters, true);
    assert_eq!(d.map().marker_count(), 4);
}

#[test]
fn citizen_mode_drops_overlays_even_when_checked() {
    let mut d = loaded_map();
    d.set_mode(Mode::Expert);
    d.set_toggle(ToggleKey::TrafficIncidents, true);
    assert_eq!(overlays(&d).len(), 2);
    d.set_mode(Mode::Citizen);
    assert!(overlays(&d).is_empty());
    assert!(d.state().toggles.flow && d.state().toggles.incidents);
}

#[test]
fn mode_switch_updates_legends_and_buttons() {
    let mut d = session();
    d.set_mode(Mode::Expert);
    let s = d.surface();
    assert_eq!(s.legend_visible(Legend::Expert), Some(true));
    assert_eq!(s.legend_visible(Legend::Citizen), Some(false));
    assert_eq!(s.mode_button_active(Mode::Expert), Some(true));
    assert_eq!(s.mode_button_active(Mode::Citizen), Some(false));
}

#[test]
fn unknown_mode_is_rejected() {
    let mut d = loaded_map();
    d.set_mode(Mode::Expert);
    assert!(!d.set_mode_str("admin"));
    assert_eq!(d.state().mode, Mode::Expert);
    assert_eq!(overlays(&d), vec![OverlayKind::Flow]);
    assert!(d.set_mode_str("citizen"));
    assert_eq!(d.state().mode, Mode::Citizen);
}

#[test]
fn popups_stay_as_created_after_mode_switch() {
    let mut d = loaded_map();
    d.set_mode(Mode::Expert);
    let stale = d
        .map()
        .widget()
        .unwrap()
        .markers()
        .all(|m| m.popup.as_ref().is_some_and(|p| !p.html.contains("AQI")));
    assert!(stale);
}

#[test]
fn geolocation_failure_alerts_once_and_keeps_default() {
    let mut d = session();
    d.locate(LocateResult::Denied);
    assert_eq!(
        d.surface().alerts(),
        ["Unable to get your location. Using default location (Pune)."]
    );
    assert_eq!(d.state().position, LatLon::new(18.5204, 73.8567));
}

#[test]
fn geolocation_unsupported_alerts() {
    let mut d = session();
    d.locate(LocateResult::Unsupported);
    assert_eq!(d.surface().alerts().len(), 1);
    assert_eq!(d.state().position, LatLon::PUNE);
}

#[test]
fn geolocation_success_recenters_map() {
    let mut d = loaded_map();
    let here = LatLon::new(18.5600, 73.8100);
    d.locate(LocateResult::Position(here));
    assert_eq!(d.state().position, here);
    assert_eq!(d.surface().value(dom::LOCATION_INPUT), "18.5600, 73.8100");
    let widget = d.map().widget().unwrap();
    assert_eq!(widget.center(), here);
    assert_eq!(widget.zoom(), 15.0);
}

#[test]
fn superseded_feed_response_is_dropped() {
    let mut d = session();
    let old = d.begin_posts();
    let new = d.begin_posts();
    assert!(old.token().is_canceled());

    d.finish_posts(&new, Ok(PostList { posts: Vec::new() }));
    let fresh = d.surface().html(dom::COMMUNITY_FEED).map(str::to_string);
    d.finish_posts(&old, Err(ProviderError::Transport("late".to_string())));
    assert_eq!(d.surface().html(dom::COMMUNITY_FEED).map(str::to_string), fresh);
}

#[test]
fn panels_show_placeholders_until_answered() {
    let mut d = session();
    let feed = d.begin_posts();
    let board = d.begin_leaderboard();
    let dash = d.begin_dashboard();
    assert_eq!(d.surface().html(dom::COMMUNITY_FEED), Some("<p>Loading posts...</p>"));
    assert_eq!(
        d.surface().html(dom::LEADERBOARD_LIST),
        Some("<p>Loading leaderboard...</p>")
    );
    assert_eq!(d.surface().html(dom::BADGES), Some("<p>Loading dashboard...</p>"));

    d.finish_posts(&feed, Ok(PostList { posts: Vec::new() }));
    assert_eq!(
        d.surface().html(dom::COMMUNITY_FEED),
        Some("<p>No posts yet. Be the first to share!</p>")
    );
    d.finish_leaderboard(&board, Err(ProviderError::Transport("offline".to_string())));
    d.finish_dashboard(&dash, Err(ProviderError::Transport("offline".to_string())));
    assert_eq!(
        d.surface().html(dom::BADGES),
        Some("<p>Unable to load dashboard data.</p>")
    );
}

#[test]
fn typed_start_coordinates_override_current_position() {
    let mut d = session();
    d.surface_mut().set_value(dom::START_LOCATION, "18.5600, 73.8100");
    d.surface_mut().set_value(dom::END_LOCATION, "Koregaon Park");
    let (_, req) = d.begin_route().unwrap();
    assert_eq!(req.start(), LatLon::new(18.56, 73.81));
    assert_eq!(req.end(), None);
    assert_eq!(req.destination, "Koregaon Park");
    assert_eq!(
        d.surface().html(dom::ROUTE_RESULTS),
        Some("<p>Planning your route...</p>")
    );
}

#[test]
fn provider_failure_renders_inline() {
    let mut d = session();
    let ticket = d.begin_leaderboard();
    d.finish_leaderboard(&ticket, Err(ProviderError::Transport("offline".to_string())));
    assert_eq!(
        d.surface().html(dom::LEADERBOARD_LIST),
        Some("<p>Unable to load leaderboard.</p>")
    );
    assert!(d.surface().alerts().is_empty());
}

#[test]
fn missing_destination_alerts_before_any_request() {
    let mut d = session();
    assert!(d.begin_route().is_none());
    assert_eq!(d.surface().alerts(), ["Please enter a destination"]);
    assert_eq!(d.surface().html(dom::ROUTE_RESULTS), None);
}

#[test]
fn planned_route_switches_to_existing_map() {
    let mut d = loaded_map();
    d.show_section("routes");
    d.surface_mut().set_value(dom::END_LOCATION, "18.5362, 73.8970");
    d.surface_mut().select(dom::ROUTE_TYPE, "fastest");
    let (ticket, req) = d.begin_route().unwrap();
    assert_eq!(req.route_type, providers::RouteType::Fastest);
    assert_eq!(req.start(), LatLon::PUNE);
    assert_eq!(req.end(), Some(LatLon::new(18.5362, 73.8970)));

    let to = LatLon::new(18.5362, 73.8970);
    let plan = providers::route::estimate_route(LatLon::PUNE, to, req.route_type);
    d.finish_route(&ticket, Ok(plan));
    assert_eq!(d.state().active, Some(Section::Map));
    assert!(
        d.surface()
            .html(dom::ROUTE_RESULTS)
            .is_some_and(|h| h.contains("Fastest ⚡"))
    );
}

#[test]
fn modals_and_chatbot() {
    let mut d = session();
    d.open_route_modal();
    assert_eq!(d.surface().display(dom::ROUTE_MODAL), Some("block"));
    assert!(!d.close_modal_on_backdrop("route-results"));
    assert!(d.close_modal_on_backdrop(dom::ROUTE_MODAL));
    assert_eq!(d.surface().display(dom::ROUTE_MODAL), Some("none"));

    d.toggle_chatbot();
    assert_eq!(d.surface().display(dom::CHATBOT_WINDOW), Some("flex"));
    d.toggle_chatbot();
    assert_eq!(d.surface().display(dom::CHATBOT_WINDOW), Some("none"));
}

#[test]
fn snapshot_serializes() {
    let mut d = loaded_map();
    d.set_mode(Mode::Expert);
    let json = serde_json::to_value(d.snapshot()).unwrap();
    assert_eq!(json["active_section"], "map");
    assert_eq!(json["mode"], "expert");
    assert_eq!(json["overlays"][0], "traffic-flow");
    assert_eq!(json["markers"], 4);
    assert_eq!(json["toggles"]["poi-clusters"], true);
}
