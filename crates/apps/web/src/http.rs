//! Providers backed by the dashboard's JSON API.

use gloo_net::http::{Request, Response};
use providers::{
    AnalysisData, AnalysisProvider, AnalysisRequest, ChatReply, ChatRequest, ChatResponder,
    CommunityStore, DashboardData, DashboardProvider, Leaderboard, LeaderboardProvider, NewPost,
    Post, PostList, ProviderError, ProviderResult, RoutePlan, RoutePlanner, RouteRequest,
    check_canceled,
};
use runtime::CancelToken;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use tracing::debug;

#[derive(Debug, Clone)]
pub struct HttpProviders {
    base: String,
}

#[derive(Deserialize)]
struct CreatedPost {
    post: Post,
}

#[derive(Deserialize)]
struct UpvoteReply {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

#[derive(Deserialize)]
struct ErrorBody {
    error: String,
}

impl HttpProviders {
    pub fn new(base: impl Into<String>) -> Self {
        let base = base.into();
        Self {
            base: base.trim_end_matches('/').to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{path}", self.base)
    }

    async fn get<T: DeserializeOwned>(&self, path: &str, cancel: &CancelToken) -> Result<T, ProviderError> {
        check_canceled(cancel)?;
        let url = self.url(path);
        debug!(%url, "GET");
        let resp = Request::get(&url).send().await.map_err(transport)?;
        decode(resp, cancel).await
    }

    async fn post<B, T>(&self, path: &str, body: &B, cancel: &CancelToken) -> Result<T, ProviderError>
    where
        B: serde::Serialize,
        T: DeserializeOwned,
    {
        check_canceled(cancel)?;
        let url = self.url(path);
        debug!(%url, "POST");
        let resp = Request::post(&url)
            .json(body)
            .map_err(transport)?
            .send()
            .await
            .map_err(transport)?;
        decode(resp, cancel).await
    }
}

fn transport(err: gloo_net::Error) -> ProviderError {
    ProviderError::Transport(err.to_string())
}

/// Reads the body, mapping non-2xx statuses to [`ProviderError::Status`]. A
/// request canceled while in flight resolves to [`ProviderError::Canceled`].
async fn decode<T: DeserializeOwned>(resp: Response, cancel: &CancelToken) -> Result<T, ProviderError> {
    let status = resp.status();
    let text = resp.text().await.map_err(transport)?;
    check_canceled(cancel)?;
    if !resp.ok() {
        let message = serde_json::from_str::<ErrorBody>(&text)
            .map(|b| b.error)
            .unwrap_or_else(|_| text.trim().to_string());
        return Err(match status {
            404 => ProviderError::NotFound(message),
            400 => ProviderError::Rejected(message),
            _ => ProviderError::Status { status, message },
        });
    }
    Ok(serde_json::from_str(&text)?)
}

impl DashboardProvider for HttpProviders {
    fn dashboard(&self, cancel: CancelToken) -> ProviderResult<'_, DashboardData> {
        Box::pin(async move { self.get("dashboard", &cancel).await })
    }
}

impl AnalysisProvider for HttpProviders {
    fn analyze(&self, req: AnalysisRequest, cancel: CancelToken) -> ProviderResult<'_, AnalysisData> {
        Box::pin(async move { self.post("location/analyze", &req, &cancel).await })
    }
}

impl RoutePlanner for HttpProviders {
    fn plan_route(&self, req: RouteRequest, cancel: CancelToken) -> ProviderResult<'_, RoutePlan> {
        Box::pin(async move {
            // The API routes between coordinates only.
            if req.end().is_none() {
                return Err(ProviderError::Rejected(format!(
                    "destination `{}` is not `lat, lon`",
                    req.destination
                )));
            }
            self.post("route/plan", &req, &cancel).await
        })
    }
}

impl CommunityStore for HttpProviders {
    fn list_posts(&self, cancel: CancelToken) -> ProviderResult<'_, PostList> {
        Box::pin(async move { self.get("community/posts", &cancel).await })
    }

    fn create_post(&self, post: NewPost, cancel: CancelToken) -> ProviderResult<'_, Post> {
        Box::pin(async move {
            let created: CreatedPost = self.post("community/post", &post, &cancel).await?;
            Ok(created.post)
        })
    }

    fn upvote(&self, post_id: String, cancel: CancelToken) -> ProviderResult<'_, ()> {
        Box::pin(async move {
            let path = format!(
                "community/upvote/{}",
                String::from(js_sys::encode_uri_component(&post_id))
            );
            let reply: UpvoteReply = self.post(&path, &serde_json::json!({}), &cancel).await?;
            if reply.success {
                Ok(())
            } else {
                Err(ProviderError::Rejected(
                    reply.error.unwrap_or_else(|| "upvote failed".to_string()),
                ))
            }
        })
    }
}

impl LeaderboardProvider for HttpProviders {
    fn leaderboard(&self, cancel: CancelToken) -> ProviderResult<'_, Leaderboard> {
        Box::pin(async move { self.get("leaderboard", &cancel).await })
    }
}

impl ChatResponder for HttpProviders {
    fn reply(&self, message: String, cancel: CancelToken) -> ProviderResult<'_, ChatReply> {
        Box::pin(async move {
            self.post("chatbot", &ChatRequest { message }, &cancel)
                .await
        })
    }
}
