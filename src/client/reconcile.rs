//! # Feed Reconciliation
//!
//! Pure functions that fold fetched data and push events into a [`Feed`]
//! snapshot. None of them mutate their input: each returns a new snapshot in
//! which only the path from the root to the changed node is rebuilt. Every
//! untouched post, comment and reply keeps its `Arc` identity, which is what
//! snapshot consumers compare to decide whether to re-render.
//!
//! A target that cannot be found is never an error here. The functions
//! return the input snapshot unchanged (same `Arc`) together with an outcome
//! the caller can log.
//!
//! ## Usage
//!
//! ```rust
//! use post_reactions::client::reconcile::{insert_comment, normalize, Insertion};
//! use post_reactions::shared::post::{RawPost, DEFAULT_AVATAR};
//!
//! let raw: Vec<RawPost> = serde_json::from_str(r#"[
//!     {"id": "p1", "author": {"id": "u1"}, "createdAt": "2024-05-01T10:00:00"}
//! ]"#).unwrap();
//! let feed = normalize(raw, DEFAULT_AVATAR);
//! assert!(feed[0].comments.is_empty());
//! ```

use crate::shared::error::FeedResult;
use crate::shared::event::ReactionNotification;
use crate::shared::post::{parse_timestamp, Comment, Feed, Post, RawComment, RawPost, User};
use crate::shared::reaction::{ReactionKind, ReactionTally, TargetType};
use std::sync::Arc;

/// Outcome of [`insert_comment`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Insertion {
    /// The comment was appended
    Inserted,
    /// A comment with the same id already sits where it would have gone
    Duplicate,
    /// No loaded post matches the comment's post id
    UnknownPost,
    /// The post is loaded but the parent comment is not in its tree
    OrphanedReply,
}

impl Insertion {
    pub fn applied(self) -> bool {
        matches!(self, Insertion::Inserted)
    }
}

/// The viewer's own reaction to apply alongside a tally change
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewerReaction {
    /// Keep whatever the snapshot already says
    Unchanged,
    /// Replace it; `None` means the viewer has no reaction
    Set(Option<ReactionKind>),
}

impl ViewerReaction {
    fn resolve(self, current: Option<ReactionKind>) -> Option<ReactionKind> {
        match self {
            ViewerReaction::Unchanged => current,
            ViewerReaction::Set(kind) => kind,
        }
    }
}

/// Normalize a fetched post list into a snapshot.
///
/// Timestamps are parsed, missing tallies and sequences become empty, blank
/// avatars get `default_avatar`. Order is preserved exactly as received.
/// A post or comment whose own timestamp does not parse is dropped together
/// with its replies and logged; the rest of the list survives.
pub fn normalize(raw: Vec<RawPost>, default_avatar: &str) -> Feed {
    let posts = raw
        .into_iter()
        .filter_map(|p| {
            let id = p.id.clone();
            match normalize_post(p, default_avatar) {
                Ok(post) => Some(Arc::new(post)),
                Err(e) => {
                    tracing::warn!("Dropping post {}: {}", id, e);
                    None
                }
            }
        })
        .collect();
    Arc::new(posts)
}

/// Normalize one post. Fails only on the post's own timestamp; broken
/// comments inside it are dropped.
pub fn normalize_post(raw: RawPost, default_avatar: &str) -> FeedResult<Post> {
    let created_at = parse_timestamp(&raw.created_at)?;
    Ok(Post {
        comments: normalize_thread(raw.comments.unwrap_or_default(), default_avatar),
        created_at,
        id: raw.id,
        author: User::from_raw(raw.author, default_avatar),
        content: raw.content.unwrap_or_default(),
        tags: raw.tags.unwrap_or_default().into_iter().collect(),
        reactions: raw.reactions,
        user_reaction: raw.user_reaction,
        last_update: 0,
    })
}

/// Normalize one comment. Fails only on the comment's own timestamp; broken
/// replies are dropped.
pub fn normalize_comment(raw: RawComment, default_avatar: &str) -> FeedResult<Comment> {
    let created_at = parse_timestamp(&raw.created_at)?;
    Ok(Comment {
        replies: normalize_thread(raw.replies.unwrap_or_default(), default_avatar),
        created_at,
        id: raw.id,
        author: User::from_raw(raw.author, default_avatar),
        content: raw.content.unwrap_or_default(),
        reactions: raw.reactions,
        user_reaction: raw.user_reaction,
        post_id: raw.post_id,
        parent_comment_id: raw.parent_comment_id,
    })
}

fn normalize_thread(raw: Vec<RawComment>, default_avatar: &str) -> Vec<Arc<Comment>> {
    raw.into_iter()
        .filter_map(|c| {
            let id = c.id.clone();
            match normalize_comment(c, default_avatar) {
                Ok(comment) => Some(Arc::new(comment)),
                Err(e) => {
                    tracing::warn!("Dropping comment {} and its replies: {}", id, e);
                    None
                }
            }
        })
        .collect()
}

/// Insert a comment or reply into its post.
///
/// Top-level comments are appended to the post; replies are appended to the
/// parent found by a depth-first search of the post's tree. If a comment
/// with the same id is already in the target sequence nothing happens, so
/// an optimistic insert followed by its push echo yields a single entry.
pub fn insert_comment(feed: &Feed, comment: Comment) -> (Feed, Insertion) {
    let Some(post_id) = comment.post_id.as_deref() else {
        return (Arc::clone(feed), Insertion::UnknownPost);
    };
    let Some(index) = feed.iter().position(|p| p.id == post_id) else {
        return (Arc::clone(feed), Insertion::UnknownPost);
    };
    let post = &feed[index];

    let parent_id = comment.parent_comment_id.clone();
    let comments = match parent_id.as_deref() {
        None => {
            if post.comments.iter().any(|c| c.id == comment.id) {
                return (Arc::clone(feed), Insertion::Duplicate);
            }
            let mut comments = post.comments.clone();
            comments.push(Arc::new(comment));
            comments
        }
        Some(parent_id) => {
            let reply = Arc::new(comment);
            match append_reply(&post.comments, parent_id, &reply) {
                Walk::NotFound => return (Arc::clone(feed), Insertion::OrphanedReply),
                Walk::Duplicate => return (Arc::clone(feed), Insertion::Duplicate),
                Walk::Rebuilt(comments) => comments,
            }
        }
    };

    let updated = Post {
        comments,
        last_update: post.last_update.wrapping_add(1),
        ..Post::clone(post)
    };
    (replace_post(feed, index, updated), Insertion::Inserted)
}

/// Apply an authoritative reaction tally to a post or comment.
///
/// The target's tally is replaced wholesale by the event's, never merged.
/// `viewer` replaces the target's `user_reaction` unless it is
/// [`ViewerReaction::Unchanged`]; the event's own `user_reaction` field is
/// ignored. Returns the new snapshot and whether the target was found.
pub fn apply_reaction_change(
    feed: &Feed,
    event: &ReactionNotification,
    viewer: ViewerReaction,
) -> (Feed, bool) {
    match event.target_type {
        TargetType::Post => {
            let Some(index) = feed.iter().position(|p| p.id == event.target_id) else {
                return (Arc::clone(feed), false);
            };
            let post = &feed[index];
            let updated = Post {
                reactions: event.reaction_counts.clone(),
                user_reaction: viewer.resolve(post.user_reaction),
                ..Post::clone(post)
            };
            (replace_post(feed, index, updated), true)
        }
        TargetType::Comment => {
            for (index, post) in feed.iter().enumerate() {
                if let Some(comments) = update_comment_reactions(
                    &post.comments,
                    &event.target_id,
                    &event.reaction_counts,
                    viewer,
                ) {
                    let updated = Post {
                        comments,
                        last_update: post.last_update.wrapping_add(1),
                        ..Post::clone(post)
                    };
                    return (replace_post(feed, index, updated), true);
                }
            }
            (Arc::clone(feed), false)
        }
    }
}

/// Posts carrying `tag`; `"all"` keeps every post
pub fn filter_by_tag(feed: &Feed, tag: &str) -> Vec<Arc<Post>> {
    if tag == "all" {
        return feed.iter().cloned().collect();
    }
    feed.iter().filter(|p| p.has_tag(tag)).cloned().collect()
}

/// Find a comment or reply anywhere in the feed
pub fn find_comment(feed: &Feed, comment_id: &str) -> Option<Arc<Comment>> {
    fn search(comments: &[Arc<Comment>], id: &str) -> Option<Arc<Comment>> {
        comments.iter().find_map(|c| {
            if c.id == id {
                Some(Arc::clone(c))
            } else {
                search(&c.replies, id)
            }
        })
    }
    feed.iter().find_map(|p| search(&p.comments, comment_id))
}

enum Walk {
    NotFound,
    Duplicate,
    Rebuilt(Vec<Arc<Comment>>),
}

fn append_reply(comments: &[Arc<Comment>], parent_id: &str, reply: &Arc<Comment>) -> Walk {
    for (i, comment) in comments.iter().enumerate() {
        let node = if comment.id == parent_id {
            if comment.replies.iter().any(|r| r.id == reply.id) {
                return Walk::Duplicate;
            }
            let mut replies = comment.replies.clone();
            replies.push(Arc::clone(reply));
            Comment {
                replies,
                ..Comment::clone(comment)
            }
        } else {
            match append_reply(&comment.replies, parent_id, reply) {
                Walk::NotFound => continue,
                Walk::Duplicate => return Walk::Duplicate,
                Walk::Rebuilt(replies) => Comment {
                    replies,
                    ..Comment::clone(comment)
                },
            }
        };
        return Walk::Rebuilt(replace_at(comments, i, node));
    }
    Walk::NotFound
}

/// `None` when the target is not in this subtree
fn update_comment_reactions(
    comments: &[Arc<Comment>],
    target_id: &str,
    tally: &ReactionTally,
    viewer: ViewerReaction,
) -> Option<Vec<Arc<Comment>>> {
    comments.iter().enumerate().find_map(|(i, comment)| {
        let node = if comment.id == target_id {
            Comment {
                reactions: tally.clone(),
                user_reaction: viewer.resolve(comment.user_reaction),
                ..Comment::clone(comment)
            }
        } else {
            let replies = update_comment_reactions(&comment.replies, target_id, tally, viewer)?;
            Comment {
                replies,
                ..Comment::clone(comment)
            }
        };
        Some(replace_at(comments, i, node))
    })
}

fn replace_at(comments: &[Arc<Comment>], index: usize, node: Comment) -> Vec<Arc<Comment>> {
    let mut next = comments.to_vec();
    next[index] = Arc::new(node);
    next
}

fn replace_post(feed: &Feed, index: usize, post: Post) -> Feed {
    let mut next = Vec::clone(feed);
    next[index] = Arc::new(post);
    Arc::new(next)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::shared::post::DEFAULT_AVATAR;
    use chrono::{TimeZone, Utc};
    use pretty_assertions::assert_eq;

    fn user(id: &str) -> User {
        User {
            id: id.to_string(),
            name: format!("user {}", id),
            avatar: DEFAULT_AVATAR.to_string(),
            title: String::new(),
            verified: None,
        }
    }

    fn comment(id: &str, post_id: &str, parent: Option<&str>) -> Comment {
        Comment {
            id: id.to_string(),
            author: user("u1"),
            content: format!("comment {}", id),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 10, 0, 0).unwrap(),
            reactions: ReactionTally::new(),
            user_reaction: None,
            replies: Vec::new(),
            post_id: Some(post_id.to_string()),
            parent_comment_id: parent.map(str::to_string),
        }
    }

    fn with_replies(mut c: Comment, replies: Vec<Comment>) -> Comment {
        c.replies = replies.into_iter().map(Arc::new).collect();
        c
    }

    fn post(id: &str, comments: Vec<Comment>) -> Post {
        Post {
            id: id.to_string(),
            author: user("u9"),
            content: format!("post {}", id),
            tags: ["rust".to_string()].into_iter().collect(),
            created_at: Utc.with_ymd_and_hms(2024, 5, 1, 9, 0, 0).unwrap(),
            reactions: ReactionTally::new(),
            user_reaction: None,
            comments: comments.into_iter().map(Arc::new).collect(),
            last_update: 0,
        }
    }

    /// p1: c1 -> (c2 -> c3), c4 ; p2: c5
    fn sample_feed() -> Feed {
        let c3 = comment("c3", "p1", Some("c2"));
        let c2 = with_replies(comment("c2", "p1", Some("c1")), vec![c3]);
        let c1 = with_replies(comment("c1", "p1", None), vec![c2]);
        let c4 = comment("c4", "p1", None);
        let c5 = comment("c5", "p2", None);
        Arc::new(vec![
            Arc::new(post("p1", vec![c1, c4])),
            Arc::new(post("p2", vec![c5])),
        ])
    }

    fn notification(target: &str, target_type: TargetType, tally: ReactionTally) -> ReactionNotification {
        ReactionNotification {
            target_id: target.to_string(),
            target_type,
            reaction_counts: tally,
            user_reaction: Some("Me encanta".to_string()),
        }
    }

    #[test]
    fn test_insert_into_unknown_post_is_noop() {
        let feed = sample_feed();
        let (next, outcome) = insert_comment(&feed, comment("c9", "p404", None));
        assert_eq!(outcome, Insertion::UnknownPost);
        assert!(Arc::ptr_eq(&feed, &next));
    }

    #[test]
    fn test_insert_without_post_id_is_noop() {
        let feed = sample_feed();
        let mut orphan = comment("c9", "p1", None);
        orphan.post_id = None;
        let (next, outcome) = insert_comment(&feed, orphan);
        assert_eq!(outcome, Insertion::UnknownPost);
        assert!(Arc::ptr_eq(&feed, &next));
    }

    #[test]
    fn test_insert_top_level_is_idempotent() {
        let feed = sample_feed();
        let (once, outcome) = insert_comment(&feed, comment("c9", "p1", None));
        assert_eq!(outcome, Insertion::Inserted);
        assert_eq!(once[0].comments.len(), 3);
        assert_eq!(once[0].comments[2].id, "c9");
        assert_ne!(once[0].last_update, feed[0].last_update);
        assert!(Arc::ptr_eq(&feed[1], &once[1]));
        // existing comment nodes are shared, not copied
        assert!(Arc::ptr_eq(&feed[0].comments[0], &once[0].comments[0]));

        let (twice, outcome) = insert_comment(&once, comment("c9", "p1", None));
        assert_eq!(outcome, Insertion::Duplicate);
        assert!(Arc::ptr_eq(&once, &twice));
        assert_eq!(twice[0].comments.len(), 3);
    }

    #[test]
    fn test_insert_nested_reply_rebuilds_only_ancestors() {
        let feed = sample_feed();
        let (next, outcome) = insert_comment(&feed, comment("c10", "p1", Some("c3")));
        assert_eq!(outcome, Insertion::Inserted);

        let old_c1 = &feed[0].comments[0];
        let new_c1 = &next[0].comments[0];
        let new_c3 = &new_c1.replies[0].replies[0];
        assert_eq!(new_c3.replies.len(), 1);
        assert_eq!(new_c3.replies[0].id, "c10");

        // fresh ancestor chain
        assert!(!Arc::ptr_eq(&feed[0], &next[0]));
        assert!(!Arc::ptr_eq(old_c1, new_c1));
        assert!(!Arc::ptr_eq(&old_c1.replies[0], &new_c1.replies[0]));
        // untouched siblings keep identity
        assert!(Arc::ptr_eq(&feed[0].comments[1], &next[0].comments[1]));
        assert!(Arc::ptr_eq(&feed[1], &next[1]));
    }

    #[test]
    fn test_insert_duplicate_reply_is_noop() {
        let feed = sample_feed();
        let (next, outcome) = insert_comment(&feed, comment("c3", "p1", Some("c2")));
        assert_eq!(outcome, Insertion::Duplicate);
        assert!(Arc::ptr_eq(&feed, &next));
    }

    #[test]
    fn test_reply_before_parent_is_dropped() {
        let feed = sample_feed();
        let (next, outcome) = insert_comment(&feed, comment("c11", "p1", Some("c-unknown")));
        assert_eq!(outcome, Insertion::OrphanedReply);
        assert!(!outcome.applied());
        assert!(Arc::ptr_eq(&feed, &next));
    }

    #[test]
    fn test_reply_parent_in_other_post_is_orphaned() {
        let feed = sample_feed();
        let (next, outcome) = insert_comment(&feed, comment("c12", "p2", Some("c1")));
        assert_eq!(outcome, Insertion::OrphanedReply);
        assert!(Arc::ptr_eq(&feed, &next));
    }

    #[test]
    fn test_post_reaction_replaces_tally_and_viewer_reaction() {
        let feed = sample_feed();
        let tally = ReactionTally::new().with("Me gusta", 4);
        let event = notification("p2", TargetType::Post, tally.clone());
        let (next, found) =
            apply_reaction_change(&feed, &event, ViewerReaction::Set(Some(ReactionKind::Like)));
        assert!(found);
        assert_eq!(next[1].reactions, tally);
        assert_eq!(next[1].user_reaction, Some(ReactionKind::Like));
        assert!(Arc::ptr_eq(&feed[0], &next[0]));
        // comment nodes of the touched post are shared
        assert!(Arc::ptr_eq(&feed[1].comments[0], &next[1].comments[0]));
    }

    #[test]
    fn test_post_reaction_ignores_event_user_reaction() {
        let feed = sample_feed();
        let event = notification("p1", TargetType::Post, ReactionTally::new().with("Me encanta", 1));
        let (next, _) = apply_reaction_change(&feed, &event, ViewerReaction::Set(None));
        assert_eq!(next[0].user_reaction, None);

        let (kept, _) = apply_reaction_change(&next, &event, ViewerReaction::Unchanged);
        assert_eq!(kept[0].user_reaction, None);
    }

    #[test]
    fn test_comment_reaction_is_exact_and_bumps_post_marker() {
        let mut seeded = post("p1", vec![]);
        let mut c1 = comment("c1", "p1", None);
        c1.reactions = ReactionTally::new().with("Me gusta", 10).with("Celebrar", 2);
        seeded.comments.push(Arc::new(c1));
        let feed: Feed = Arc::new(vec![Arc::new(seeded)]);

        let tally = ReactionTally::new().with("Me gusta", 1);
        let event = notification("c1", TargetType::Comment, tally.clone());
        let (next, found) = apply_reaction_change(
            &feed,
            &event,
            ViewerReaction::Set(Some(ReactionKind::Funny)),
        );
        assert!(found);
        let c1 = &next[0].comments[0];
        assert_eq!(c1.reactions, tally);
        assert_eq!(c1.reactions.count_of(ReactionKind::Celebrate), 0);
        assert_eq!(c1.user_reaction, Some(ReactionKind::Funny));
        assert_ne!(next[0].last_update, feed[0].last_update);
    }

    #[test]
    fn test_deep_comment_reaction_shares_siblings() {
        let feed = sample_feed();
        let event = notification("c3", TargetType::Comment, ReactionTally::new().with("Celebrar", 3));
        let (next, found) = apply_reaction_change(&feed, &event, ViewerReaction::Unchanged);
        assert!(found);
        let c3 = &next[0].comments[0].replies[0].replies[0];
        assert_eq!(c3.reactions.count_of(ReactionKind::Celebrate), 3);
        assert_eq!(c3.user_reaction, None);
        assert!(Arc::ptr_eq(&feed[0].comments[1], &next[0].comments[1]));
        assert!(Arc::ptr_eq(&feed[1], &next[1]));
        assert_eq!(next[0].last_update, 1);
    }

    #[test]
    fn test_unknown_reaction_target_is_noop() {
        let feed = sample_feed();
        for target_type in [TargetType::Post, TargetType::Comment] {
            let event = notification("nope", target_type, ReactionTally::new().with("Me gusta", 1));
            let (next, found) =
                apply_reaction_change(&feed, &event, ViewerReaction::Set(Some(ReactionKind::Like)));
            assert!(!found);
            assert!(Arc::ptr_eq(&feed, &next));
        }
    }

    #[test]
    fn test_comment_target_type_does_not_match_post_ids() {
        let feed = sample_feed();
        let event = notification("p1", TargetType::Comment, ReactionTally::new());
        let (next, found) = apply_reaction_change(&feed, &event, ViewerReaction::Unchanged);
        assert!(!found);
        assert!(Arc::ptr_eq(&feed, &next));
    }

    #[test]
    fn test_normalize_defaults_missing_fields() {
        let raw: Vec<RawPost> = serde_json::from_value(serde_json::json!([{
            "id": "p1",
            "author": {"id": "u1", "name": "Ana"},
            "content": "hola",
            "createdAt": "2024-05-01T10:00:00",
            "comments": [{
                "id": "c1",
                "author": {"id": "u2", "avatar": ""},
                "createdAt": "2024-05-01T11:00:00.5",
                "replies": [{"id": "c2", "author": {"id": "u3"}, "createdAt": "2024-05-01T12:00:00Z"}]
            }]
        }]))
        .unwrap();
        let feed = normalize(raw, DEFAULT_AVATAR);
        let p1 = &feed[0];
        assert!(p1.reactions.is_empty());
        assert!(p1.tags.is_empty());
        assert_eq!(p1.author.avatar, DEFAULT_AVATAR);
        assert_eq!(p1.comments[0].author.avatar, DEFAULT_AVATAR);
        assert_eq!(p1.comments[0].replies[0].id, "c2");
        assert!(p1.comments[0].replies[0].replies.is_empty());
        assert_eq!(p1.comment_count(), 2);
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let raw: Vec<RawPost> = serde_json::from_value(serde_json::json!([
            {"id": "p2", "author": {"id": "u1"}, "tags": ["rust", "web"], "createdAt": "2024-05-02T10:00:00",
             "reactions": {"Me gusta": 2}, "userReaction": "Me gusta",
             "comments": [{"id": "c1", "postId": "p2", "author": {"id": "u2"}, "createdAt": "2024-05-02T11:00:00"}]},
            {"id": "p1", "author": {"id": "u1"}, "createdAt": "2024-05-01T10:00:00"}
        ]))
        .unwrap();
        let once = normalize(raw, DEFAULT_AVATAR);
        let reserialized: Vec<RawPost> =
            serde_json::from_value(serde_json::to_value(&*once).unwrap()).unwrap();
        let twice = normalize(reserialized, DEFAULT_AVATAR);
        assert_eq!(*once, *twice);
        // order preserved, not sorted by date
        assert_eq!(twice[0].id, "p2");
        assert_eq!(twice[1].id, "p1");
    }

    #[test]
    fn test_normalize_drops_only_the_bad_node() {
        let raw: Vec<RawPost> = serde_json::from_value(serde_json::json!([
            {"id": "p1", "author": {"id": "u1"}, "createdAt": "ayer"},
            {"id": "p2", "author": {"id": "u1"}, "createdAt": "2024-05-02T10:00:00",
             "comments": [
                {"id": "c1", "author": {"id": "u2"}, "createdAt": "2024-05-02T11:00:00",
                 "replies": [
                    {"id": "c2", "author": {"id": "u3"}, "createdAt": "2024-05-01 10:15",
                     "replies": [{"id": "c3", "author": {"id": "u3"}, "createdAt": "2024-05-02T13:00:00"}]},
                    {"id": "c4", "author": {"id": "u3"}, "createdAt": "2024-05-02T14:00:00"}
                 ]}
             ]}
        ]))
        .unwrap();
        let feed = normalize(raw, DEFAULT_AVATAR);
        assert_eq!(feed.len(), 1);
        assert_eq!(feed[0].id, "p2");
        assert_eq!(feed[0].comments[0].replies.len(), 1);
        assert_eq!(feed[0].comments[0].replies[0].id, "c4");
        assert!(find_comment(&feed, "c2").is_none());
        assert!(find_comment(&feed, "c3").is_none());
    }

    #[test]
    fn test_normalize_comment_rejects_own_bad_timestamp() {
        let raw: RawComment = serde_json::from_value(serde_json::json!(
            {"id": "c1", "author": {"id": "u1"}, "createdAt": "ayer"}
        ))
        .unwrap();
        assert!(normalize_comment(raw, DEFAULT_AVATAR).is_err());
    }

    #[test]
    fn test_filter_by_tag() {
        let mut tagged = post("p3", vec![]);
        tagged.tags = ["web".to_string()].into_iter().collect();
        let feed: Feed = Arc::new(vec![Arc::new(post("p1", vec![])), Arc::new(tagged)]);
        assert_eq!(filter_by_tag(&feed, "all").len(), 2);
        let web = filter_by_tag(&feed, "web");
        assert_eq!(web.len(), 1);
        assert!(Arc::ptr_eq(&web[0], &feed[1]));
        assert!(filter_by_tag(&feed, "go").is_empty());
    }

    #[test]
    fn test_find_comment() {
        let feed = sample_feed();
        assert_eq!(find_comment(&feed, "c3").map(|c| c.id.clone()), Some("c3".to_string()));
        assert_eq!(find_comment(&feed, "c5").map(|c| c.id.clone()), Some("c5".to_string()));
        assert!(find_comment(&feed, "c404").is_none());
    }
}
