use std::collections::BTreeMap;

use foundation::LatLon;
use layers::{InitOutcome, MapController, MapSdk, MapState, Mode, ToggleKey};
use panels::messages;
use providers::{
    AnalysisData, AnalysisRequest, ChatReply, DashboardData, Leaderboard, NewPost, Post,
    PostList, PostType, ProviderError, RoutePlan, RouteRequest, RouteType,
};
use rand::Rng;
use rand::seq::SliceRandom;
use runtime::{EventBus, RequestSlot, Ticket, TimerQueue};
use serde::Serialize;
use tracing::{debug, error, info, warn};

use crate::config::DashboardConfig;
use crate::dom;
use crate::router::SectionRouter;
use crate::section::{Section, SectionEffect};
use crate::state::ViewState;
use crate::surface::{Legend, Surface};

/// Taglines for the header; one is picked at start.
pub const INSIGHTS: [&str; 3] = [
    "AI-powered urban intelligence at your fingertips 🧠",
    "Making cities greener, one route at a time 🌿",
    "Your personal eco-assistant for sustainable living 🌍",
];

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TimerTask {
    InitMap,
    ResizeMap,
}

/// Outcome of a geolocation request.
#[derive(Debug, Copy, Clone, PartialEq)]
pub enum LocateResult {
    Position(LatLon),
    Denied,
    Unsupported,
}

/// Panels whose loads supersede each other.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum Panel {
    Dashboard,
    Analysis,
    Route,
    Posts,
    Leaderboard,
}

impl Panel {
    pub fn as_str(self) -> &'static str {
        match self {
            Panel::Dashboard => "dashboard",
            Panel::Analysis => "analysis",
            Panel::Route => "route",
            Panel::Posts => "posts",
            Panel::Leaderboard => "leaderboard",
        }
    }
}

#[derive(Debug, Default)]
struct PanelSlots {
    dashboard: RequestSlot,
    analysis: RequestSlot,
    route: RequestSlot,
    posts: RequestSlot,
    leaderboard: RequestSlot,
}

impl PanelSlots {
    fn get_mut(&mut self, panel: Panel) -> &mut RequestSlot {
        match panel {
            Panel::Dashboard => &mut self.dashboard,
            Panel::Analysis => &mut self.analysis,
            Panel::Route => &mut self.route,
            Panel::Posts => &mut self.posts,
            Panel::Leaderboard => &mut self.leaderboard,
        }
    }
}

/// One dashboard page session.
///
/// Panel loads are split into `begin_*` and `finish_*`: `begin` validates
/// input, shows the placeholder and hands back the provider request, `finish`
/// renders the response. A panel that is loaded again before its previous
/// response arrives cancels that request; a late response from it is dropped.
pub struct Dashboard<S: MapSdk, U: Surface> {
    config: DashboardConfig,
    state: ViewState,
    map: MapController<S>,
    surface: U,
    timers: TimerQueue<TimerTask>,
    now_ms: u64,
    events: EventBus,
    slots: PanelSlots,
}

impl<S: MapSdk, U: Surface> Dashboard<S, U> {
    pub fn new(sdk: S, surface: U, config: DashboardConfig) -> Self {
        let map = MapController::new(sdk, config.map_controller_config());
        Self {
            state: ViewState::new(config.default_position()),
            config,
            map,
            surface,
            timers: TimerQueue::new(),
            now_ms: 0,
            events: EventBus::new(),
            slots: PanelSlots::default(),
        }
    }

    pub fn state(&self) -> &ViewState {
        &self.state
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    pub fn map(&self) -> &MapController<S> {
        &self.map
    }

    pub fn map_mut(&mut self) -> &mut MapController<S> {
        &mut self.map
    }

    pub fn surface(&self) -> &U {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut U {
        &mut self.surface
    }

    pub fn events(&self) -> &EventBus {
        &self.events
    }

    pub fn now_ms(&self) -> u64 {
        self.now_ms
    }

    /// Advances the session clock. Time never goes backwards.
    pub fn set_now(&mut self, now_ms: u64) {
        self.now_ms = self.now_ms.max(now_ms);
    }

    pub fn next_timer_due(&self) -> Option<u64> {
        self.timers.next_due()
    }

    pub fn pending_timers(&self) -> usize {
        self.timers.len()
    }

    /// Page start: syncs the mode controls, picks a tagline and shows the
    /// dashboard section.
    pub fn start<R: Rng + ?Sized>(&mut self, rng: &mut R) -> &'static [SectionEffect] {
        self.apply_mode_controls();
        if let Some(line) = INSIGHTS.choose(rng) {
            self.surface.set_text(dom::MAIN_INSIGHT, line);
        }
        self.show_section(Section::Dashboard.as_str())
    }

    /// Shows the section named `name` and returns the effects the host has to
    /// drive. Map initialisation is scheduled here and needs no host action
    /// beyond running timers.
    pub fn show_section(&mut self, name: &str) -> &'static [SectionEffect] {
        let effects = SectionRouter::show(&mut self.state, &mut self.surface, name);
        let Some(section) = Section::parse(name).filter(|s| self.state.active == Some(*s)) else {
            return effects;
        };
        self.events.emit(self.now_ms, "section", section.as_str());
        for effect in effects {
            if *effect == SectionEffect::ScheduleMapInit {
                self.schedule(self.config.map_init_delay_ms, TimerTask::InitMap);
            }
        }
        effects
    }

    pub fn set_mode(&mut self, mode: Mode) {
        self.state.mode = mode;
        self.apply_mode_controls();
        self.events.emit(self.now_ms, "mode", mode.as_str());
        self.map.reconcile(mode, &self.state.toggles);
    }

    /// Mode from a `data-mode` attribute. Unknown values are rejected and
    /// leave the state untouched.
    pub fn set_mode_str(&mut self, mode: &str) -> bool {
        match Mode::parse(mode) {
            Some(mode) => {
                self.set_mode(mode);
                true
            }
            None => {
                warn!(mode, "ignoring unknown mode");
                false
            }
        }
    }

    pub fn set_toggle(&mut self, key: ToggleKey, checked: bool) {
        self.state.toggles.set(key, checked);
        self.events.emit(
            self.now_ms,
            "toggle",
            format!("{}={checked}", key.as_str()),
        );
        self.map.reconcile(self.state.mode, &self.state.toggles);
    }

    /// Toggle from a `data-layer` attribute.
    pub fn set_toggle_str(&mut self, layer: &str, checked: bool) -> bool {
        match ToggleKey::parse(layer) {
            Some(key) => {
                self.set_toggle(key, checked);
                true
            }
            None => {
                warn!(layer, "ignoring unknown layer toggle");
                false
            }
        }
    }

    /// Fires every timer due at `now_ms`, in due order. Returns how many ran.
    pub fn run_due_timers(&mut self, now_ms: u64) -> usize {
        self.set_now(now_ms);
        let mut fired = 0;
        while let Some((_, task)) = self.timers.pop_due(self.now_ms) {
            fired += 1;
            match task {
                TimerTask::InitMap => self.init_map(),
                TimerTask::ResizeMap => self.map.resize(),
            }
        }
        fired
    }

    /// Load event of the map widget.
    pub fn on_map_load(&mut self) {
        if let Some(delay) = self.map.on_load(self.state.mode, &self.state.toggles) {
            self.events.emit(self.now_ms, "map", "loaded");
            self.schedule(delay, TimerTask::ResizeMap);
        }
    }

    /// Runtime error event of the map widget.
    pub fn on_map_error(&mut self, message: &str) {
        self.map.on_error(message);
        self.events.emit(self.now_ms, "map", format!("error: {message}"));
    }

    pub fn locate(&mut self, result: LocateResult) {
        match result {
            LocateResult::Position(at) => {
                info!(lat = at.lat, lon = at.lon, "position updated");
                self.state.position = at;
                self.surface.set_value(dom::LOCATION_INPUT, &at.display_4dp());
                self.map.recenter(at, self.config.locate_zoom);
                self.events.emit(self.now_ms, "locate", at.display_4dp());
            }
            LocateResult::Denied => {
                warn!("geolocation denied");
                self.alert(messages::ALERT_LOCATION_DENIED);
            }
            LocateResult::Unsupported => {
                warn!("geolocation unsupported");
                self.alert(messages::ALERT_GEOLOCATION_UNSUPPORTED);
            }
        }
    }

    pub fn begin_dashboard(&mut self) -> Ticket {
        self.surface.set_html(dom::BADGES, messages::LOADING_DASHBOARD);
        self.slots.get_mut(Panel::Dashboard).begin()
    }

    pub fn finish_dashboard(
        &mut self,
        ticket: &Ticket,
        result: Result<DashboardData, ProviderError>,
    ) {
        if !self.accept(Panel::Dashboard, ticket, &result) {
            return;
        }
        match result {
            Ok(data) => {
                for reading in panels::dashboard_gauges(&data) {
                    self.surface.set_gauge(&reading);
                }
                let stats = panels::DashboardStats::from_data(&data);
                for (id, text) in stats.entries() {
                    self.surface.set_text(id, text);
                }
                self.surface
                    .set_html(dom::BADGES, &panels::render_badges(&data.badges));
            }
            Err(err) => {
                error!("dashboard error: {err}");
                self.surface.set_html(dom::BADGES, messages::DASHBOARD_FAILED);
            }
        }
    }

    /// Reads the location input. An empty input alerts and issues nothing;
    /// coordinates typed as `lat, lon` are analysed directly, anything else is
    /// sent as a query around the current position.
    pub fn begin_analysis(&mut self) -> Option<(Ticket, AnalysisRequest)> {
        let input = self.surface.value(dom::LOCATION_INPUT);
        let input = input.trim();
        if input.is_empty() {
            self.alert(messages::ALERT_LOCATION_REQUIRED);
            return None;
        }
        let req = match LatLon::parse(input) {
            Some(at) => AnalysisRequest::new(at, ""),
            None => AnalysisRequest::new(self.state.position, input),
        };
        self.surface
            .set_html(dom::ANALYSIS_CONTENT, messages::ANALYZING);
        self.surface.set_display(dom::ANALYSIS_RESULTS, "block");
        Some((self.slots.get_mut(Panel::Analysis).begin(), req))
    }

    pub fn finish_analysis(&mut self, ticket: &Ticket, result: Result<AnalysisData, ProviderError>) {
        if !self.accept(Panel::Analysis, ticket, &result) {
            return;
        }
        let html = match result {
            Ok(data) => panels::render_analysis(&data),
            Err(err) => {
                error!("analysis error: {err}");
                messages::ANALYSIS_FAILED.to_string()
            }
        };
        self.surface.set_html(dom::ANALYSIS_CONTENT, &html);
    }

    pub fn open_route_modal(&mut self) {
        self.surface.set_display(dom::ROUTE_MODAL, "block");
    }

    pub fn close_route_modal(&mut self) {
        self.surface.set_display(dom::ROUTE_MODAL, "none");
    }

    pub fn begin_route(&mut self) -> Option<(Ticket, RouteRequest)> {
        let destination = self.surface.value(dom::END_LOCATION).trim().to_string();
        if destination.is_empty() {
            self.alert(messages::ALERT_DESTINATION_REQUIRED);
            return None;
        }
        let route_type = self
            .surface
            .selected(dom::ROUTE_TYPE)
            .and_then(|v| RouteType::parse(&v))
            .unwrap_or_default();
        // A blank or unparseable start means the current position.
        let start = LatLon::parse(&self.surface.value(dom::START_LOCATION))
            .unwrap_or(self.state.position);
        let req = RouteRequest::new(start, destination, route_type);
        self.surface
            .set_html(dom::ROUTE_RESULTS, messages::PLANNING_ROUTE);
        Some((self.slots.get_mut(Panel::Route).begin(), req))
    }

    /// Renders the plan and, if a map has been created, switches to it.
    pub fn finish_route(&mut self, ticket: &Ticket, result: Result<RoutePlan, ProviderError>) {
        if !self.accept(Panel::Route, ticket, &result) {
            return;
        }
        match result {
            Ok(plan) => {
                self.surface
                    .set_html(dom::ROUTE_RESULTS, &panels::render_route(&plan));
                if self.map.has_widget() {
                    self.show_section(Section::Map.as_str());
                }
            }
            Err(err) => {
                error!("route planning error: {err}");
                self.surface
                    .set_html(dom::ROUTE_RESULTS, messages::ROUTE_FAILED);
            }
        }
    }

    pub fn begin_posts(&mut self) -> Ticket {
        self.surface
            .set_html(dom::COMMUNITY_FEED, messages::LOADING_POSTS);
        self.slots.get_mut(Panel::Posts).begin()
    }

    pub fn finish_posts(&mut self, ticket: &Ticket, result: Result<PostList, ProviderError>) {
        if !self.accept(Panel::Posts, ticket, &result) {
            return;
        }
        let html = match result {
            Ok(list) => panels::render_posts(&list.posts),
            Err(err) => {
                error!("error loading posts: {err}");
                messages::POSTS_FAILED.to_string()
            }
        };
        self.surface.set_html(dom::COMMUNITY_FEED, &html);
    }

    pub fn begin_leaderboard(&mut self) -> Ticket {
        self.surface
            .set_html(dom::LEADERBOARD_LIST, messages::LOADING_LEADERBOARD);
        self.slots.get_mut(Panel::Leaderboard).begin()
    }

    pub fn finish_leaderboard(
        &mut self,
        ticket: &Ticket,
        result: Result<Leaderboard, ProviderError>,
    ) {
        if !self.accept(Panel::Leaderboard, ticket, &result) {
            return;
        }
        let html = match result {
            Ok(board) => panels::render_leaderboard(&board.leaderboard),
            Err(err) => {
                error!("error loading leaderboard: {err}");
                messages::LEADERBOARD_FAILED.to_string()
            }
        };
        self.surface.set_html(dom::LEADERBOARD_LIST, &html);
    }

    pub fn open_post_modal(&mut self) {
        self.surface.set_display(dom::POST_MODAL, "block");
    }

    pub fn close_post_modal(&mut self) {
        self.surface.set_display(dom::POST_MODAL, "none");
    }

    /// Reads the post form. Title, content and location are required.
    pub fn begin_post(&mut self) -> Option<NewPost> {
        let title = self.surface.value(dom::POST_TITLE).trim().to_string();
        let content = self.surface.value(dom::POST_CONTENT).trim().to_string();
        let location = self.surface.value(dom::POST_LOCATION).trim().to_string();
        if title.is_empty() || content.is_empty() || location.is_empty() {
            self.alert(messages::ALERT_POST_FIELDS);
            return None;
        }
        let post_type = PostType::parse(&self.surface.value(dom::POST_TYPE));
        debug!(%title, post_type = post_type.as_str(), "submitting post");
        Some(NewPost {
            title,
            content,
            location,
            post_type,
        })
    }

    /// Returns `true` if the feed should be reloaded.
    pub fn finish_post(&mut self, result: Result<Post, ProviderError>) -> bool {
        match result {
            Ok(post) => {
                info!(id = %post.id, "post created");
                self.close_post_modal();
                for id in [dom::POST_TITLE, dom::POST_CONTENT, dom::POST_LOCATION] {
                    self.surface.set_value(id, "");
                }
                true
            }
            Err(err) => {
                error!("error creating post: {err}");
                self.alert(messages::ALERT_POST_FAILED);
                false
            }
        }
    }

    /// Returns `true` if the feed should be reloaded.
    pub fn finish_upvote(&mut self, post_id: &str, result: Result<(), ProviderError>) -> bool {
        match result {
            Ok(()) => {
                debug!(post_id, "upvoted");
                true
            }
            Err(err) => {
                error!(post_id, "error upvoting: {err}");
                false
            }
        }
    }

    pub fn toggle_chatbot(&mut self) {
        self.state.chatbot_open = !self.state.chatbot_open;
        let display = if self.state.chatbot_open { "flex" } else { "none" };
        self.surface.set_display(dom::CHATBOT_WINDOW, display);
    }

    /// Echoes the typed message and clears the input. Returns the message to
    /// send, or `None` if the input was blank.
    pub fn begin_chat(&mut self) -> Option<String> {
        let message = self.surface.value(dom::CHATBOT_INPUT).trim().to_string();
        if message.is_empty() {
            return None;
        }
        self.surface
            .append_html(dom::CHATBOT_MESSAGES, &panels::user_message(&message));
        self.surface.set_value(dom::CHATBOT_INPUT, "");
        Some(message)
    }

    /// Chat replies are never superseded; every message gets its answer.
    pub fn finish_chat(&mut self, result: Result<ChatReply, ProviderError>) {
        let text = match &result {
            Ok(reply) => reply.response.as_str(),
            Err(err) => {
                error!("chatbot error: {err}");
                panels::chat::CHAT_APOLOGY
            }
        };
        self.surface
            .append_html(dom::CHATBOT_MESSAGES, &panels::bot_message(text));
    }

    /// Click on a modal's backdrop closes that modal. Returns whether one was
    /// closed.
    pub fn close_modal_on_backdrop(&mut self, target_id: &str) -> bool {
        match target_id {
            dom::ROUTE_MODAL => self.close_route_modal(),
            dom::POST_MODAL => self.close_post_modal(),
            _ => return false,
        }
        true
    }

    pub fn snapshot(&self) -> DashboardSnapshot {
        DashboardSnapshot {
            active_section: self.state.active.map(Section::as_str),
            mode: self.state.mode.as_str(),
            position: [self.state.position.lat, self.state.position.lon],
            toggles: ToggleKey::ALL
                .into_iter()
                .map(|k| (k.as_str(), self.state.toggles.get(k)))
                .collect(),
            map_state: match self.map.state() {
                MapState::Uninitialized => "uninitialized",
                MapState::Initializing => "initializing",
                MapState::Ready => "ready",
            },
            overlays: self
                .map
                .attached_overlays()
                .into_iter()
                .map(|k| k.layer_id().as_str())
                .collect(),
            markers: self.map.marker_count(),
            chatbot_open: self.state.chatbot_open,
            pending_timers: self.timers.len(),
            now_ms: self.now_ms,
        }
    }

    fn schedule(&mut self, delay_ms: u32, task: TimerTask) {
        let id = self.timers.schedule(self.now_ms, delay_ms, task);
        debug!(?task, delay_ms, ?id, "timer scheduled");
    }

    fn init_map(&mut self) {
        match self.map.init(self.state.position) {
            InitOutcome::Started => {
                self.events.emit(self.now_ms, "map", "initializing");
            }
            InitOutcome::RetryAfter { attempt, delay_ms } => {
                self.events
                    .emit(self.now_ms, "map", format!("sdk not ready, attempt {attempt}"));
                self.schedule(delay_ms, TimerTask::InitMap);
            }
            InitOutcome::Failed(err) => {
                self.events.emit(self.now_ms, "map", format!("failed: {err}"));
            }
        }
    }

    fn apply_mode_controls(&mut self) {
        let mode = self.state.mode;
        for m in Mode::ALL {
            self.surface.set_mode_button_active(m, m == mode);
        }
        for legend in [Legend::Citizen, Legend::Expert] {
            self.surface
                .set_legend_visible(legend, legend == Legend::for_mode(mode));
        }
    }

    fn alert(&mut self, message: &str) {
        self.surface.alert(message);
        self.events.emit(self.now_ms, "alert", message);
    }

    /// Completes `ticket` in the panel's slot; stale or canceled responses
    /// are dropped.
    fn accept<T>(
        &mut self,
        panel: Panel,
        ticket: &Ticket,
        result: &Result<T, ProviderError>,
    ) -> bool {
        let current = self.slots.get_mut(panel).finish(ticket);
        if !current || matches!(result, Err(ProviderError::Canceled)) {
            debug!(
                panel = panel.as_str(),
                seq = ticket.seq(),
                "dropping superseded response"
            );
            return false;
        }
        let outcome = if result.is_ok() { "ok" } else { "error" };
        self.events
            .emit(self.now_ms, "provider", format!("{}: {outcome}", panel.as_str()));
        true
    }
}

/// Serializable summary of a session, for logs and the replay tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DashboardSnapshot {
    pub active_section: Option<&'static str>,
    pub mode: &'static str,
    /// `[lat, lon]`
    pub position: [f64; 2],
    pub toggles: BTreeMap<&'static str, bool>,
    pub map_state: &'static str,
    pub overlays: Vec<&'static str>,
    pub markers: usize,
    pub chatbot_open: bool,
    pub pending_timers: usize,
    pub now_ms: u64,
}
