//! Async panel drivers.
//!
//! Each driver runs `begin_*`, awaits the provider and then `finish_*`. The
//! dashboard is borrowed only around the synchronous halves, never across an
//! await, so handlers for other UI events can run while a request is pending.

use std::cell::RefCell;

use layers::MapSdk;
use providers::{
    AnalysisProvider, ChatResponder, CommunityStore, DashboardProvider, LeaderboardProvider,
    Providers, RoutePlanner,
};
use runtime::CancelToken;
use tracing::debug;

use crate::dashboard::Dashboard;
use crate::section::SectionEffect;
use crate::surface::Surface;

pub async fn refresh_dashboard<S, U, P>(dash: &RefCell<Dashboard<S, U>>, providers: &P)
where
    S: MapSdk,
    U: Surface,
    P: DashboardProvider + ?Sized,
{
    let ticket = dash.borrow_mut().begin_dashboard();
    let result = providers.dashboard(ticket.token().clone()).await;
    dash.borrow_mut().finish_dashboard(&ticket, result);
}

pub async fn analyze<S, U, P>(dash: &RefCell<Dashboard<S, U>>, providers: &P)
where
    S: MapSdk,
    U: Surface,
    P: AnalysisProvider + ?Sized,
{
    let Some((ticket, req)) = dash.borrow_mut().begin_analysis() else {
        return;
    };
    let result = providers.analyze(req, ticket.token().clone()).await;
    dash.borrow_mut().finish_analysis(&ticket, result);
}

pub async fn plan_route<S, U, P>(dash: &RefCell<Dashboard<S, U>>, providers: &P)
where
    S: MapSdk,
    U: Surface,
    P: RoutePlanner + ?Sized,
{
    let Some((ticket, req)) = dash.borrow_mut().begin_route() else {
        return;
    };
    let result = providers.plan_route(req, ticket.token().clone()).await;
    dash.borrow_mut().finish_route(&ticket, result);
}

pub async fn refresh_posts<S, U, P>(dash: &RefCell<Dashboard<S, U>>, providers: &P)
where
    S: MapSdk,
    U: Surface,
    P: CommunityStore + ?Sized,
{
    let ticket = dash.borrow_mut().begin_posts();
    let result = providers.list_posts(ticket.token().clone()).await;
    dash.borrow_mut().finish_posts(&ticket, result);
}

pub async fn refresh_leaderboard<S, U, P>(dash: &RefCell<Dashboard<S, U>>, providers: &P)
where
    S: MapSdk,
    U: Surface,
    P: LeaderboardProvider + ?Sized,
{
    let ticket = dash.borrow_mut().begin_leaderboard();
    let result = providers.leaderboard(ticket.token().clone()).await;
    dash.borrow_mut().finish_leaderboard(&ticket, result);
}

pub async fn submit_post<S, U, P>(dash: &RefCell<Dashboard<S, U>>, providers: &P)
where
    S: MapSdk,
    U: Surface,
    P: CommunityStore + ?Sized,
{
    let Some(post) = dash.borrow_mut().begin_post() else {
        return;
    };
    let result = providers.create_post(post, CancelToken::new()).await;
    let refresh = dash.borrow_mut().finish_post(result);
    if refresh {
        refresh_posts(dash, providers).await;
    }
}

pub async fn upvote<S, U, P>(dash: &RefCell<Dashboard<S, U>>, providers: &P, post_id: &str)
where
    S: MapSdk,
    U: Surface,
    P: CommunityStore + ?Sized,
{
    let result = providers
        .upvote(post_id.to_string(), CancelToken::new())
        .await;
    let refresh = dash.borrow_mut().finish_upvote(post_id, result);
    if refresh {
        refresh_posts(dash, providers).await;
    }
}

pub async fn send_chat<S, U, P>(dash: &RefCell<Dashboard<S, U>>, providers: &P)
where
    S: MapSdk,
    U: Surface,
    P: ChatResponder + ?Sized,
{
    let Some(message) = dash.borrow_mut().begin_chat() else {
        return;
    };
    let result = providers.reply(message, CancelToken::new()).await;
    dash.borrow_mut().finish_chat(result);
}

/// Drives the provider-backed effects of a section switch, in order.
pub async fn run_effects<S, U, P>(
    dash: &RefCell<Dashboard<S, U>>,
    providers: &P,
    effects: &[SectionEffect],
) where
    S: MapSdk,
    U: Surface,
    P: Providers + ?Sized,
{
    for effect in effects {
        match effect {
            SectionEffect::RefreshDashboard => refresh_dashboard(dash, providers).await,
            SectionEffect::RefreshCommunity => refresh_posts(dash, providers).await,
            SectionEffect::RefreshLeaderboard => refresh_leaderboard(dash, providers).await,
            SectionEffect::ScheduleMapInit => debug!("map init already scheduled"),
        }
    }
}

pub async fn show_section<S, U, P>(dash: &RefCell<Dashboard<S, U>>, providers: &P, name: &str)
where
    S: MapSdk,
    U: Surface,
    P: Providers + ?Sized,
{
    let effects = dash.borrow_mut().show_section(name);
    run_effects(dash, providers, effects).await;
}

pub async fn start<S, U, P, R>(dash: &RefCell<Dashboard<S, U>>, providers: &P, rng: &mut R)
where
    S: MapSdk,
    U: Surface,
    P: Providers + ?Sized,
    R: rand::Rng + ?Sized,
{
    let effects = dash.borrow_mut().start(rng);
    run_effects(dash, providers, effects).await;
}
