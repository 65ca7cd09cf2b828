//! Feed fixtures shared by the integration tests

use post_reactions::client::reconcile::normalize_comment;
use post_reactions::client::Config;
use post_reactions::shared::post::{Comment, DEFAULT_AVATAR};
use post_reactions::shared::AppConfig;
use serde_json::{json, Value};
use std::time::Duration;

pub fn user_json(id: &str) -> Value {
    json!({ "id": id, "name": format!("User {}", id), "avatar": "", "title": "Dev" })
}

/// Wire form of a comment. `replies` may be empty.
pub fn comment_json(id: &str, post_id: &str, parent: Option<&str>, replies: Vec<Value>) -> Value {
    json!({
        "id": id,
        "author": user_json("u2"),
        "content": format!("comment {}", id),
        "createdAt": "2024-05-01T10:15:30",
        "reactions": {},
        "userReaction": null,
        "replies": replies,
        "postId": post_id,
        "parentCommentId": parent,
    })
}

pub fn post_json(id: &str, tags: &[&str], comments: Vec<Value>) -> Value {
    json!({
        "id": id,
        "author": user_json("u1"),
        "content": format!("post {}", id),
        "tags": tags,
        "createdAt": "2024-05-01T09:00:00Z",
        "reactions": { "Me gusta": 1 },
        "userReaction": null,
        "comments": comments,
    })
}

/// Two posts: `p1` (tag rust) holds `c1 -> c2`; `p2` (tag tokio) holds `c3`
pub fn feed_json() -> Value {
    json!([
        post_json(
            "p1",
            &["rust"],
            vec![comment_json("c1", "p1", None, vec![comment_json("c2", "p1", Some("c1"), vec![])])],
        ),
        post_json("p2", &["tokio"], vec![comment_json("c3", "p2", None, vec![])]),
    ])
}

/// Normalized comment, ready for `insert_comment`
pub fn comment(id: &str, post_id: &str, parent: Option<&str>) -> Comment {
    let raw = serde_json::from_value(comment_json(id, post_id, parent, vec![]))
        .expect("fixture comment parses");
    normalize_comment(raw, DEFAULT_AVATAR).expect("fixture comment normalizes")
}

/// Configuration pointing the REST gateway at a mock server
pub fn test_config(api_base: &str, viewer: Option<&str>) -> Config {
    let mut builder = AppConfig::builder()
        .api_url(format!("{}/api", api_base))
        .request_timeout(Duration::from_secs(5));
    if let Some(viewer) = viewer {
        builder = builder.viewer_id(viewer);
    }
    Config::with_builder(builder).expect("test config is valid")
}

/// Configuration pointing the push channel at a fake broker
pub fn push_config(push_url: &str, heartbeat: Duration, reconnect: Duration) -> Config {
    let builder = AppConfig::builder()
        .push_url(push_url)
        .heartbeat(heartbeat)
        .reconnect_delay(reconnect)
        .request_timeout(Duration::from_secs(5));
    Config::with_builder(builder).expect("push config is valid")
}
