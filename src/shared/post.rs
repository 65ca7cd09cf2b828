//! Post and Comment Data Structures
//!
//! Two layers live here:
//!
//! - `Raw*` types mirror the backend DTOs exactly as they arrive over REST or
//!   the push channel: timestamps are strings, collections may be missing and
//!   ids may come through as numbers.
//! - [`Post`], [`Comment`] and [`User`] are the normalized snapshot types held
//!   by the feed store. Child nodes are reference counted so that an update can
//!   rebuild only the path from the root to the changed node while every other
//!   subtree is shared with the previous snapshot.
//!
//! Normalized types serialize back into the wire shape, so a snapshot can be
//! fed through normalization again and come out unchanged.

use crate::shared::reaction::{lenient_reaction, ReactionKind, ReactionTally};
use chrono::{DateTime, NaiveDateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use std::collections::BTreeSet;
use std::sync::Arc;

/// Avatar used when the backend sends none
pub const DEFAULT_AVATAR: &str = "https://default-avatar.url/path";

/// The held post collection. Cloning is cheap; identity is `Arc::ptr_eq`.
pub type Feed = Arc<Vec<Arc<Post>>>;

/// Accept ids sent either as JSON strings or numbers
pub(crate) fn flexible_id<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    match Id::deserialize(deserializer)? {
        Id::Text(s) if !s.trim().is_empty() => Ok(s),
        Id::Text(_) => Err(serde::de::Error::custom("empty id")),
        Id::Number(n) => Ok(n.to_string()),
    }
}

fn flexible_opt_id<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Id {
        Text(String),
        Number(i64),
    }

    Ok(match Option::<Id>::deserialize(deserializer)? {
        Some(Id::Text(s)) if !s.trim().is_empty() => Some(s),
        Some(Id::Text(_)) | None => None,
        Some(Id::Number(n)) => Some(n.to_string()),
    })
}

/// Parse a backend timestamp.
///
/// Accepts RFC 3339 and the zone-less `LocalDateTime` form
/// (`2024-05-01T10:15:30` with optional fraction), which is read as UTC.
pub fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, chrono::ParseError> {
    match DateTime::parse_from_rfc3339(raw) {
        Ok(dt) => Ok(dt.with_timezone(&Utc)),
        Err(rfc_err) => NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .map(|naive| naive.and_utc())
            .map_err(|_| rfc_err),
    }
}

/// User as sent by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawUser {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub avatar: Option<String>,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub verified: Option<bool>,
}

/// Comment or reply as sent by the backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawComment {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub author: RawUser,
    #[serde(default)]
    pub content: Option<String>,
    pub created_at: String,
    #[serde(default)]
    pub reactions: ReactionTally,
    #[serde(default, deserialize_with = "lenient_reaction")]
    pub user_reaction: Option<ReactionKind>,
    #[serde(default)]
    pub replies: Option<Vec<RawComment>>,
    #[serde(default, deserialize_with = "flexible_opt_id")]
    pub post_id: Option<String>,
    #[serde(default, deserialize_with = "flexible_opt_id")]
    pub parent_comment_id: Option<String>,
}

/// Post as sent by `GET /posts`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawPost {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    pub author: RawUser,
    #[serde(default)]
    pub content: Option<String>,
    #[serde(default)]
    pub tags: Option<Vec<String>>,
    pub created_at: String,
    #[serde(default)]
    pub reactions: ReactionTally,
    #[serde(default, deserialize_with = "lenient_reaction")]
    pub user_reaction: Option<ReactionKind>,
    #[serde(default)]
    pub comments: Option<Vec<RawComment>>,
}

/// Tag as returned by `GET /tags`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tag {
    #[serde(deserialize_with = "flexible_id")]
    pub id: String,
    #[serde(rename = "nombreEtiqueta", alias = "name")]
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub id: String,
    pub name: String,
    pub avatar: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub verified: Option<bool>,
}

impl User {
    /// Normalize a wire user, substituting `default_avatar` for a missing or blank avatar
    pub fn from_raw(raw: RawUser, default_avatar: &str) -> Self {
        let avatar = raw
            .avatar
            .filter(|a| !a.trim().is_empty())
            .unwrap_or_else(|| default_avatar.to_string());
        Self {
            id: raw.id,
            name: raw.name.unwrap_or_default(),
            avatar,
            title: raw.title.unwrap_or_default(),
            verified: raw.verified,
        }
    }

    pub fn is_verified(&self) -> bool {
        self.verified.unwrap_or(false)
    }
}

/// A comment or reply in a normalized snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    pub id: String,
    pub author: User,
    pub content: String,
    pub created_at: DateTime<Utc>,
    pub reactions: ReactionTally,
    pub user_reaction: Option<ReactionKind>,
    /// Display order; appended to, never re-sorted
    pub replies: Vec<Arc<Comment>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub post_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub parent_comment_id: Option<String>,
}

impl Comment {
    /// Number of comments in this subtree, including this one
    pub fn thread_len(&self) -> usize {
        1 + self.replies.iter().map(|r| r.thread_len()).sum::<usize>()
    }
}

/// A post in a normalized snapshot
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Post {
    pub id: String,
    pub author: User,
    pub content: String,
    pub tags: BTreeSet<String>,
    pub created_at: DateTime<Utc>,
    pub reactions: ReactionTally,
    pub user_reaction: Option<ReactionKind>,
    /// Top-level comments only; replies live inside each comment
    pub comments: Vec<Arc<Comment>>,
    /// Bumped on every deep mutation so identity-based renderers notice it
    #[serde(skip)]
    pub last_update: u64,
}

impl Post {
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.contains(tag)
    }

    /// Total number of comments and replies under this post
    pub fn comment_count(&self) -> usize {
        self.comments.iter().map(|c| c.thread_len()).sum()
    }
}
