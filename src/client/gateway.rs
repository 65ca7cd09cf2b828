//! Remote Data Gateway
//!
//! Async REST client for the feed backend. Holds no state beyond the HTTP
//! client and the configuration it was built from.

use crate::client::config::Config;
use crate::client::reconcile::normalize_comment;
use crate::shared::error::{FeedError, FeedResult};
use crate::shared::post::{Comment, RawComment, RawPost, Tag};
use crate::shared::reaction::{ReactionKind, ReactionTally, TargetType};
use reqwest::{Client, Response, StatusCode, Url};
use serde::Serialize;

/// Result of `POST /reactions`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReactionSubmission {
    /// The backend recorded (or toggled) the reaction
    Accepted,
    /// The backend answered 409; nothing changed server-side
    AlreadyApplied,
}

#[derive(Debug, Serialize)]
struct CommentBody<'a> {
    contenido: &'a str,
}

/// REST client for posts, reactions, comments and tags
#[derive(Debug, Clone)]
pub struct RemoteGateway {
    config: Config,
    client: Client,
}

impl RemoteGateway {
    pub fn new(config: Config) -> FeedResult<Self> {
        let client = Client::builder()
            .timeout(config.request_timeout())
            .build()?;
        Ok(Self { config, client })
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// API URL with `segments` appended, each one percent-encoded
    fn endpoint(&self, segments: &[&str]) -> FeedResult<Url> {
        let base = self.config.api_url("");
        let mut url = Url::parse(&base)
            .map_err(|e| FeedError::transport(None, format!("Invalid API URL {}: {}", base, e)))?;
        url.path_segments_mut()
            .map_err(|_| FeedError::transport(None, format!("API URL {} cannot take a path", base)))?
            .pop_if_empty()
            .extend(segments);
        Ok(url)
    }

    /// Fetch every post, with `userReaction` filled in for `viewer_id`
    pub async fn list_posts(&self, viewer_id: Option<&str>) -> FeedResult<Vec<RawPost>> {
        let url = self.config.api_url("/posts");
        let mut request = self.client.get(&url);
        if let Some(viewer) = viewer_id {
            request = request.query(&[("currentUserId", viewer)]);
        }

        let response = request.send().await?;
        let response = ensure_success(response, "list posts").await?;
        let posts = response.json::<Vec<RawPost>>().await?;
        tracing::debug!("Fetched {} posts", posts.len());
        Ok(posts)
    }

    /// Fetch one post; `None` when the backend does not know it
    pub async fn get_post(
        &self,
        post_id: &str,
        viewer_id: Option<&str>,
    ) -> FeedResult<Option<RawPost>> {
        let url = self.endpoint(&["posts", post_id])?;
        let mut request = self.client.get(url);
        if let Some(viewer) = viewer_id {
            request = request.query(&[("currentUserId", viewer)]);
        }

        let response = request.send().await?;
        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response, "get post").await?;
        Ok(Some(response.json::<RawPost>().await?))
    }

    /// Record a reaction.
    ///
    /// A 409 means the backend already holds this reaction and is reported as
    /// [`ReactionSubmission::AlreadyApplied`], never as an error.
    pub async fn submit_reaction(
        &self,
        viewer_id: &str,
        target_id: &str,
        target_type: TargetType,
        kind: ReactionKind,
    ) -> FeedResult<ReactionSubmission> {
        let url = self.config.api_url("/reactions");
        let type_id = kind.type_id().to_string();
        let response = self
            .client
            .post(&url)
            .query(&[
                ("userId", viewer_id),
                ("targetId", target_id),
                ("targetType", target_type.as_str()),
                ("reactionTypeId", type_id.as_str()),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::CONFLICT {
            tracing::debug!(
                "Reaction {} on {} {} already recorded",
                kind,
                target_type,
                target_id
            );
            return Ok(ReactionSubmission::AlreadyApplied);
        }
        ensure_success(response, "submit reaction").await?;
        Ok(ReactionSubmission::Accepted)
    }

    /// The reaction `viewer_id` currently holds on a target.
    ///
    /// The body is a bare label. 404, an empty body and an unknown label all
    /// yield `None`.
    pub async fn query_user_reaction(
        &self,
        viewer_id: &str,
        target_id: &str,
        target_type: TargetType,
    ) -> FeedResult<Option<ReactionKind>> {
        let url = self.config.api_url("/reactions/user-reaction");
        let response = self
            .client
            .get(&url)
            .query(&[
                ("userId", viewer_id),
                ("targetId", target_id),
                ("targetType", target_type.as_str()),
            ])
            .send()
            .await?;

        if response.status() == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        let response = ensure_success(response, "query user reaction").await?;
        let text = response.text().await?;
        Ok(parse_reaction_label(&text))
    }

    /// Create a comment or, with `parent_comment_id`, a reply.
    ///
    /// Returns the normalized comment. Routing ids missing from the response
    /// are filled in from the request.
    pub async fn submit_comment(
        &self,
        content: &str,
        post_id: &str,
        viewer_id: &str,
        parent_comment_id: Option<&str>,
    ) -> FeedResult<Comment> {
        let url = self.config.api_url("/comments");
        let mut params = vec![("postId", post_id), ("userId", viewer_id)];
        if let Some(parent) = parent_comment_id {
            params.push(("parentCommentId", parent));
        }

        let response = self
            .client
            .post(&url)
            .query(&params)
            .json(&CommentBody { contenido: content })
            .send()
            .await?;
        let response = ensure_success(response, "submit comment").await?;

        let mut raw = response.json::<RawComment>().await?;
        if raw.post_id.is_none() {
            raw.post_id = Some(post_id.to_string());
        }
        if raw.parent_comment_id.is_none() {
            raw.parent_comment_id = parent_comment_id.map(str::to_string);
        }
        tracing::info!("Comment {} created on post {}", raw.id, post_id);
        normalize_comment(raw, self.config.default_avatar())
    }

    /// Current tally for a target
    pub async fn reaction_counts(
        &self,
        target_id: &str,
        target_type: TargetType,
    ) -> FeedResult<ReactionTally> {
        let url = self.config.api_url("/reactions/counts");
        let response = self
            .client
            .get(&url)
            .query(&[("targetId", target_id), ("targetType", target_type.as_str())])
            .send()
            .await?;
        let response = ensure_success(response, "reaction counts").await?;
        Ok(response.json::<ReactionTally>().await?)
    }

    /// Every tag known to the backend
    pub async fn list_tags(&self) -> FeedResult<Vec<Tag>> {
        let url = self.config.api_url("/tags");
        let response = self.client.get(&url).send().await?;
        let response = ensure_success(response, "list tags").await?;
        Ok(response.json::<Vec<Tag>>().await?)
    }
}

/// Turn a non-2xx response into a transport error carrying the body text
async fn ensure_success(response: Response, action: &str) -> FeedResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let error_text = response
        .text()
        .await
        .unwrap_or_else(|_| status.to_string());
    tracing::error!("Failed to {}: {} - {}", action, status, error_text);
    Err(FeedError::transport(
        Some(status.as_u16()),
        format!("Request failed: {} - {}", status, error_text),
    ))
}

fn parse_reaction_label(text: &str) -> Option<ReactionKind> {
    let label = text.trim().trim_matches('"');
    if label.is_empty() || label == "null" {
        return None;
    }
    let kind = ReactionKind::from_label(label);
    if kind.is_none() {
        tracing::warn!("Unknown reaction label from backend: '{}'", label);
    }
    kind
}
