//! Data-provider boundary.
//!
//! Each provider is an opaque request/response call; the dashboard never
//! assumes a transport. Futures are not `Send`: in the browser everything runs
//! on the main thread. Every call carries a [`CancelToken`] so a superseded
//! panel refresh can be abandoned.

use std::future::Future;
use std::pin::Pin;

use runtime::CancelToken;

use crate::payload::{
    AnalysisData, AnalysisRequest, ChatReply, DashboardData, Leaderboard, NewPost, Post,
    PostList, RoutePlan, RouteRequest,
};

/// Boxed single-threaded future, for dyn-compatible provider traits.
pub type LocalBoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

pub type ProviderResult<'a, T> = LocalBoxFuture<'a, Result<T, ProviderError>>;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProviderError {
    #[error("request canceled")]
    Canceled,
    #[error("not found: {0}")]
    NotFound(String),
    #[error("rejected: {0}")]
    Rejected(String),
    #[error("transport error: {0}")]
    Transport(String),
    #[error("HTTP {status}: {message}")]
    Status { status: u16, message: String },
    #[error("malformed response: {0}")]
    Decode(String),
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        ProviderError::Decode(err.to_string())
    }
}

pub trait DashboardProvider {
    fn dashboard(&self, cancel: CancelToken) -> ProviderResult<'_, DashboardData>;
}

pub trait AnalysisProvider {
    fn analyze(&self, req: AnalysisRequest, cancel: CancelToken)
    -> ProviderResult<'_, AnalysisData>;
}

pub trait RoutePlanner {
    fn plan_route(&self, req: RouteRequest, cancel: CancelToken) -> ProviderResult<'_, RoutePlan>;
}

pub trait CommunityStore {
    fn list_posts(&self, cancel: CancelToken) -> ProviderResult<'_, PostList>;
    fn create_post(&self, post: NewPost, cancel: CancelToken) -> ProviderResult<'_, Post>;
    fn upvote(&self, post_id: String, cancel: CancelToken) -> ProviderResult<'_, ()>;
}

pub trait LeaderboardProvider {
    fn leaderboard(&self, cancel: CancelToken) -> ProviderResult<'_, Leaderboard>;
}

pub trait ChatResponder {
    fn reply(&self, message: String, cancel: CancelToken) -> ProviderResult<'_, ChatReply>;
}

/// Everything the dashboard pulls data from.
pub trait Providers:
    DashboardProvider + AnalysisProvider + RoutePlanner + CommunityStore + LeaderboardProvider + ChatResponder
{
}

impl<T> Providers for T where
    T: DashboardProvider
        + AnalysisProvider
        + RoutePlanner
        + CommunityStore
        + LeaderboardProvider
        + ChatResponder
{
}

/// Fails fast with [`ProviderError::Canceled`] if `cancel` has fired.
pub fn check_canceled(cancel: &CancelToken) -> Result<(), ProviderError> {
    if cancel.is_canceled() {
        return Err(ProviderError::Canceled);
    }
    Ok(())
}
