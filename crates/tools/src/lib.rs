//! Headless replay of scripted dashboard sessions.
//!
//! A script is one command per line; blank lines and `#` comments are
//! skipped. The session runs over [`HeadlessSdk`], [`RecordingSurface`] and
//! [`DemoProviders`] with a virtual clock that only moves on `tick`.
//!
//! ```text
//! show map
//! tick 100
//! load
//! mode expert
//! toggle traffic-incidents on
//! set location-input 18.5204, 73.8567
//! analyze
//! ```

use std::cell::RefCell;

use foundation::LatLon;
use layers::headless::HeadlessSdk;
use providers::DemoProviders;
use rand::SeedableRng;
use rand::rngs::StdRng;
use serde::Serialize;
use tracing::debug;
use view::{Dashboard, DashboardConfig, DashboardSnapshot, LocateResult, RecordingSurface, drive};

#[derive(Debug, thiserror::Error)]
pub enum ScriptError {
    #[error("line {line}: {message}")]
    Parse { line: usize, message: String },
    #[error("line {line}: unknown {what} `{value}`")]
    Unknown {
        line: usize,
        what: &'static str,
        value: String,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Start,
    Show(String),
    Mode(String),
    Toggle(String, bool),
    Locate(LocateResult),
    Tick(u64),
    Load,
    MapError(String),
    Set(String, String),
    Select(String, String),
    Analyze,
    OpenRoute,
    CloseRoute,
    PlanRoute,
    OpenPost,
    ClosePost,
    SubmitPost,
    Upvote(String),
    Chatbot,
    Chat,
    Click(String),
}

fn parse_err(line: usize, message: impl Into<String>) -> ScriptError {
    ScriptError::Parse {
        line,
        message: message.into(),
    }
}

fn parse_switch(line: usize, s: &str) -> Result<bool, ScriptError> {
    match s {
        "on" | "true" | "1" => Ok(true),
        "off" | "false" | "0" => Ok(false),
        other => Err(ScriptError::Unknown {
            line,
            what: "switch",
            value: other.to_string(),
        }),
    }
}

fn parse_line(line: usize, text: &str) -> Result<Command, ScriptError> {
    let (verb, rest) = text.split_once(char::is_whitespace).unwrap_or((text, ""));
    let rest = rest.trim();
    let need = |what: &str| -> Result<&str, ScriptError> {
        if rest.is_empty() {
            Err(parse_err(line, format!("`{verb}` needs {what}")))
        } else {
            Ok(rest)
        }
    };
    let pair = |what: &str| -> Result<(String, String), ScriptError> {
        let (a, b) = need(what)?
            .split_once(char::is_whitespace)
            .ok_or_else(|| parse_err(line, format!("`{verb}` needs {what}")))?;
        Ok((a.to_string(), b.trim().to_string()))
    };

    let cmd = match verb {
        "start" => Command::Start,
        "show" => Command::Show(need("a section")?.to_string()),
        "mode" => Command::Mode(need("a mode")?.to_string()),
        "toggle" => {
            let (layer, state) = pair("a layer and on/off")?;
            Command::Toggle(layer, parse_switch(line, &state)?)
        }
        "locate" => Command::Locate(match need("a position, `denied` or `unsupported`")? {
            "denied" => LocateResult::Denied,
            "unsupported" => LocateResult::Unsupported,
            at => LocateResult::Position(
                LatLon::parse(at).ok_or_else(|| parse_err(line, format!("bad position `{at}`")))?,
            ),
        }),
        "tick" => {
            let ms = need("milliseconds")?;
            Command::Tick(
                ms.parse()
                    .map_err(|_| parse_err(line, format!("bad milliseconds `{ms}`")))?,
            )
        }
        "load" => Command::Load,
        "map-error" => Command::MapError(need("a message")?.to_string()),
        "set" => {
            let (id, value) = pair("an element id and a value")?;
            Command::Set(id, value)
        }
        "select" => {
            let (name, value) = pair("a group name and a value")?;
            Command::Select(name, value)
        }
        "analyze" => Command::Analyze,
        "open" | "close" => {
            let open = verb == "open";
            match need("`route` or `post`")? {
                "route" if open => Command::OpenRoute,
                "route" => Command::CloseRoute,
                "post" if open => Command::OpenPost,
                "post" => Command::ClosePost,
                other => {
                    return Err(ScriptError::Unknown {
                        line,
                        what: "modal",
                        value: other.to_string(),
                    });
                }
            }
        }
        "plan-route" => Command::PlanRoute,
        "submit-post" => Command::SubmitPost,
        "upvote" => Command::Upvote(need("a post id")?.to_string()),
        "chatbot" => Command::Chatbot,
        "chat" => Command::Chat,
        "click" => Command::Click(need("an element id")?.to_string()),
        other => {
            return Err(ScriptError::Unknown {
                line,
                what: "command",
                value: other.to_string(),
            });
        }
    };
    Ok(cmd)
}

pub fn parse_script(script: &str) -> Result<Vec<Command>, ScriptError> {
    script
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty() && !l.starts_with('#'))
        .map(|(line, l)| parse_line(line, l))
        .collect()
}

#[derive(Debug, Clone, Serialize)]
pub struct TraceEvent {
    pub at_ms: u64,
    pub kind: &'static str,
    pub message: String,
}

/// Outcome of a replayed session.
#[derive(Debug, Serialize)]
pub struct Replay {
    pub snapshot: DashboardSnapshot,
    pub alerts: Vec<String>,
    pub events: Vec<TraceEvent>,
}

type Session = Dashboard<HeadlessSdk, RecordingSurface>;

pub struct Replayer {
    dash: RefCell<Session>,
    providers: DemoProviders,
    rng: StdRng,
    now_ms: u64,
}

impl Replayer {
    pub fn new(config: DashboardConfig, seed: u64) -> Self {
        Self {
            dash: RefCell::new(Dashboard::new(
                HeadlessSdk::new(),
                RecordingSurface::new(),
                config,
            )),
            providers: DemoProviders::new(),
            rng: StdRng::seed_from_u64(seed),
            now_ms: 0,
        }
    }

    pub fn dashboard(&self) -> std::cell::Ref<'_, Session> {
        self.dash.borrow()
    }

    pub fn apply(&mut self, cmd: &Command) {
        debug!(?cmd, now_ms = self.now_ms, "replay");
        let dash = &self.dash;
        let p = &self.providers;
        match cmd {
            Command::Start => pollster::block_on(drive::start(dash, p, &mut self.rng)),
            Command::Show(name) => pollster::block_on(drive::show_section(dash, p, name)),
            Command::Mode(mode) => {
                dash.borrow_mut().set_mode_str(mode);
            }
            Command::Toggle(layer, on) => {
                dash.borrow_mut().set_toggle_str(layer, *on);
            }
            Command::Locate(result) => dash.borrow_mut().locate(*result),
            Command::Tick(ms) => {
                self.now_ms += ms;
                dash.borrow_mut().run_due_timers(self.now_ms);
            }
            Command::Load => dash.borrow_mut().on_map_load(),
            Command::MapError(message) => dash.borrow_mut().on_map_error(message),
            Command::Set(id, value) => {
                use view::Surface;
                dash.borrow_mut().surface_mut().set_value(id, value);
            }
            Command::Select(name, value) => dash.borrow_mut().surface_mut().select(name, value),
            Command::Analyze => pollster::block_on(drive::analyze(dash, p)),
            Command::OpenRoute => dash.borrow_mut().open_route_modal(),
            Command::CloseRoute => dash.borrow_mut().close_route_modal(),
            Command::PlanRoute => pollster::block_on(drive::plan_route(dash, p)),
            Command::OpenPost => dash.borrow_mut().open_post_modal(),
            Command::ClosePost => dash.borrow_mut().close_post_modal(),
            Command::SubmitPost => pollster::block_on(drive::submit_post(dash, p)),
            Command::Upvote(id) => pollster::block_on(drive::upvote(dash, p, id)),
            Command::Chatbot => dash.borrow_mut().toggle_chatbot(),
            Command::Chat => pollster::block_on(drive::send_chat(dash, p)),
            Command::Click(target) => {
                dash.borrow_mut().close_modal_on_backdrop(target);
            }
        }
    }

    pub fn finish(self) -> Replay {
        let dash = self.dash.into_inner();
        Replay {
            snapshot: dash.snapshot(),
            alerts: dash.surface().alerts().to_vec(),
            events: dash
                .events()
                .events()
                .iter()
                .map(|e| TraceEvent {
                    at_ms: e.at_ms,
                    kind: e.kind,
                    message: e.message.clone(),
                })
                .collect(),
        }
    }
}

/// Parses and runs `script` from a fresh session.
pub fn replay(script: &str, config: DashboardConfig, seed: u64) -> Result<Replay, ScriptError> {
    let commands = parse_script(script)?;
    let mut replayer = Replayer::new(config, seed);
    for cmd in &commands {
        replayer.apply(cmd);
    }
    Ok(replayer.finish())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn parses_commands_and_skips_comments() {
        let script = "# warm up\n\nshow map\ntick 100\ntoggle poi-clusters off\nlocate 18.56, 73.81\nupvote 671392a0c1f2e4b5a6d7e8f9\n";
        let cmds = parse_script(script).unwrap();
        assert_eq!(
            cmds,
            vec![
                Command::Show("map".to_string()),
                Command::Tick(100),
                Command::Toggle("poi-clusters".to_string(), false),
                Command::Locate(LocateResult::Position(LatLon::new(18.56, 73.81))),
                Command::Upvote("671392a0c1f2e4b5a6d7e8f9".to_string()),
            ]
        );
    }

    #[test]
    fn reports_line_of_bad_command() {
        let err = parse_script("show map\nfly away").unwrap_err();
        assert_eq!(err.to_string(), "line 2: unknown command `fly`");
        let err = parse_script("tick soon").unwrap_err();
        assert_eq!(err.to_string(), "line 1: bad milliseconds `soon`");
        assert!(parse_script("toggle traffic-flow").is_err());
    }

    #[test]
    fn replays_expert_map_session() {
        let script = "show map\ntick 100\nload\nmode expert\ntoggle traffic-incidents on\ntick 300\n";
        let out = replay(script, DashboardConfig::default(), 1).unwrap();
        assert_eq!(out.snapshot.active_section, Some("map"));
        assert_eq!(out.snapshot.overlays, vec!["traffic-flow", "traffic-incidents"]);
        assert_eq!(out.snapshot.markers, 4);
        assert!(out.alerts.is_empty());
        assert!(out.events.iter().any(|e| e.kind == "section"));
    }

    #[test]
    fn replays_community_post() {
        let script = "\
show community
open post
set post-title New cycle lane
set post-content Painted last night
set post-location Baner
submit-post
upvote 1
";
        let out = replay(script, DashboardConfig::default(), 1).unwrap();
        assert!(out.alerts.is_empty());
        let json = serde_json::to_value(&out).unwrap();
        assert_eq!(json["snapshot"]["active_section"], "community");
    }

    #[test]
    fn denied_location_alerts() {
        let out = replay("locate denied", DashboardConfig::default(), 1).unwrap();
        assert_eq!(
            out.alerts,
            ["Unable to get your location. Using default location (Pune)."]
        );
    }
}
