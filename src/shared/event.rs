//! Push Event Types
//!
//! Events delivered by the push channel. There are two topics: one carries
//! newly created comments and replies, the other carries the authoritative
//! reaction tally of a post or comment after somebody reacted to it.
//!
//! Payloads are decoded by [`PushEvent::decode`], which maps the topic a
//! frame arrived on to the matching event variant.

use crate::shared::error::FeedError;
use crate::shared::post::RawComment;
use crate::shared::reaction::{ReactionTally, TargetType};
use serde::{Deserialize, Serialize};

/// Topic carrying new comments and replies
pub const COMMENTS_TOPIC: &str = "/topic/comments/new";

/// Topic carrying reaction-count changes
pub const REACTIONS_TOPIC: &str = "/topic/reactions/new";

/// Reaction-change notification as sent by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReactionNotification {
    #[serde(deserialize_with = "crate::shared::post::flexible_id")]
    pub target_id: String,
    pub target_type: TargetType,
    /// Tally after the change; replaces the local one wholesale
    #[serde(default)]
    pub reaction_counts: ReactionTally,
    /// Whose reaction this is depends on the backend revision, so it is never
    /// applied; the viewer's own reaction is queried separately.
    #[serde(default)]
    pub user_reaction: Option<String>,
}

/// Event delivered by the push channel
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PushEvent {
    /// A comment or reply was created
    NewComment(RawComment),
    /// The reaction tally of a target changed
    ReactionChange(ReactionNotification),
}

impl PushEvent {
    /// Decode a payload according to the topic it arrived on
    pub fn decode(topic: &str, body: &str) -> Result<Self, FeedError> {
        match topic {
            COMMENTS_TOPIC => serde_json::from_str::<RawComment>(body)
                .map(PushEvent::NewComment)
                .map_err(|e| FeedError::malformed(topic, e.to_string())),
            REACTIONS_TOPIC => serde_json::from_str::<ReactionNotification>(body)
                .map(PushEvent::ReactionChange)
                .map_err(|e| FeedError::malformed(topic, e.to_string())),
            other => Err(FeedError::malformed(other, "unknown topic")),
        }
    }

    /// Short label for logging
    pub fn kind(&self) -> &'static str {
        match self {
            PushEvent::NewComment(_) => "new-comment",
            PushEvent::ReactionChange(_) => "reaction-change",
        }
    }
}
