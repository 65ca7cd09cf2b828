//! # Feed State Store
//!
//! Holds the current feed snapshot and its load status, runs user mutations
//! through the [`RemoteGateway`] and folds push events in through the
//! reconciliation functions.
//!
//! Every snapshot replacement happens behind a single write gate, so two
//! events never reconcile against the same stale snapshot. Network calls are
//! made before taking the gate. Consumers either poll [`FeedStore::snapshot`]
//! or hold a [`FeedStore::subscribe`] receiver that is notified on every
//! replacement.

use crate::client::gateway::{ReactionSubmission, RemoteGateway};
use crate::client::reconcile::{
    apply_reaction_change, filter_by_tag, insert_comment, normalize, normalize_comment, Insertion,
    ViewerReaction,
};
use crate::shared::error::{FeedError, FeedResult};
use crate::shared::event::{PushEvent, ReactionNotification};
use crate::shared::post::{Comment, Feed, Post};
use crate::shared::reaction::{ReactionKind, TargetType};
use std::sync::Arc;
use tokio::sync::{mpsc, watch, Mutex, RwLock};

/// Message shown when the initial load fails
pub const LOAD_FAILED_MESSAGE: &str = "No se pudieron cargar los posts. Intenta de nuevo más tarde.";

/// Load status plus, once ready, the feed itself
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedState {
    /// Initial state, and while a (re)load is in flight
    Loading,
    Ready(Feed),
    /// The last load failed; carries a user-facing message
    Failed(String),
}

impl FeedState {
    pub fn posts(&self) -> Option<&Feed> {
        match self {
            FeedState::Ready(feed) => Some(feed),
            _ => None,
        }
    }

    pub fn is_ready(&self) -> bool {
        matches!(self, FeedState::Ready(_))
    }
}

/// Owner of the feed snapshot
#[derive(Debug)]
pub struct FeedStore {
    gateway: RemoteGateway,
    viewer: RwLock<Option<String>>,
    write_gate: Mutex<()>,
    state: watch::Sender<FeedState>,
}

impl FeedStore {
    /// Create an empty store; the viewer comes from the gateway's configuration
    pub fn new(gateway: RemoteGateway) -> Self {
        let viewer = gateway.config().viewer_id().map(str::to_string);
        let (state, _) = watch::channel(FeedState::Loading);
        Self {
            gateway,
            viewer: RwLock::new(viewer),
            write_gate: Mutex::new(()),
            state,
        }
    }

    pub fn gateway(&self) -> &RemoteGateway {
        &self.gateway
    }

    pub async fn viewer(&self) -> Option<String> {
        self.viewer.read().await.clone()
    }

    /// Change the viewer (login/logout). Takes effect for the next call; the
    /// held feed is not reloaded.
    pub async fn set_viewer(&self, viewer_id: Option<String>) {
        *self.viewer.write().await = viewer_id.filter(|v| !v.trim().is_empty());
    }

    /// Current state
    pub fn snapshot(&self) -> FeedState {
        self.state.borrow().clone()
    }

    /// Receiver notified on every snapshot replacement
    pub fn subscribe(&self) -> watch::Receiver<FeedState> {
        self.state.subscribe()
    }

    /// Posts carrying `tag` (`"all"` for every post); empty unless ready
    pub fn posts_with_tag(&self, tag: &str) -> Vec<Arc<Post>> {
        match &*self.state.borrow() {
            FeedState::Ready(feed) => filter_by_tag(feed, tag),
            _ => Vec::new(),
        }
    }

    /// Fetch and normalize the whole feed.
    ///
    /// Goes through `Loading` and ends in `Ready` or `Failed`. Calling it
    /// again is the retry.
    pub async fn load(&self) -> FeedState {
        self.publish(FeedState::Loading).await;

        let viewer = self.viewer().await;
        let avatar = self.gateway.config().default_avatar();
        let result = self
            .gateway
            .list_posts(viewer.as_deref())
            .await
            .map(|raw| normalize(raw, avatar));

        let next = match result {
            Ok(feed) => {
                tracing::info!("Loaded {} posts", feed.len());
                FeedState::Ready(feed)
            }
            Err(e) => {
                tracing::error!("Failed to load posts: {}", e);
                FeedState::Failed(LOAD_FAILED_MESSAGE.to_string())
            }
        };
        self.publish(next.clone()).await;
        next
    }

    /// Send a reaction for the viewer.
    ///
    /// The snapshot is left alone; the tally changes when the broker echoes
    /// the reaction back. Returns `None` when nothing was sent or the call
    /// failed; both cases are logged, never raised.
    pub async fn react(
        &self,
        target_id: &str,
        target_type: TargetType,
        kind: ReactionKind,
    ) -> Option<ReactionSubmission> {
        let Some(viewer) = self.viewer().await else {
            tracing::warn!("Ignoring reaction on {} {}: no viewer", target_type, target_id);
            return None;
        };

        match self
            .gateway
            .submit_reaction(&viewer, target_id, target_type, kind)
            .await
        {
            Ok(outcome) => {
                tracing::debug!("Reaction {} on {} {}: {:?}", kind, target_type, target_id, outcome);
                Some(outcome)
            }
            Err(e) => {
                tracing::error!("Failed to react to {} {}: {}", target_type, target_id, e);
                None
            }
        }
    }

    /// Post a comment or reply as the viewer and insert it on success.
    ///
    /// Fails with [`FeedError::NotAuthenticated`] when no viewer is set, or
    /// with the gateway's error; in both cases nothing is inserted.
    pub async fn comment(
        &self,
        post_id: &str,
        content: &str,
        parent_comment_id: Option<&str>,
    ) -> FeedResult<Comment> {
        let viewer = self.viewer().await.ok_or(FeedError::NotAuthenticated)?;
        let comment = self
            .gateway
            .submit_comment(content, post_id, &viewer, parent_comment_id)
            .await?;
        self.fold_comment(comment.clone()).await;
        Ok(comment)
    }

    /// Reconcile one push event
    pub async fn handle_event(&self, event: PushEvent) {
        match event {
            PushEvent::NewComment(raw) => {
                let id = raw.id.clone();
                match normalize_comment(raw, self.gateway.config().default_avatar()) {
                    Ok(comment) => {
                        self.fold_comment(comment).await;
                    }
                    Err(e) => tracing::warn!("Dropping comment event {}: {}", id, e),
                }
            }
            PushEvent::ReactionChange(notification) => {
                if self.current_feed().is_none() {
                    tracing::debug!(
                        "Feed not ready, dropping reaction change on {}",
                        notification.target_id
                    );
                    return;
                }
                let viewer = self.viewer_reaction(&notification).await;
                self.fold_reaction(&notification, viewer).await;
            }
        }
    }

    /// Drain a push channel until it closes
    pub async fn run(&self, mut events: mpsc::Receiver<PushEvent>) {
        while let Some(event) = events.recv().await {
            self.handle_event(event).await;
        }
        tracing::info!("Push event stream ended");
    }

    async fn viewer_reaction(&self, notification: &ReactionNotification) -> ViewerReaction {
        let Some(viewer) = self.viewer().await else {
            return ViewerReaction::Unchanged;
        };
        match self
            .gateway
            .query_user_reaction(&viewer, &notification.target_id, notification.target_type)
            .await
        {
            Ok(kind) => ViewerReaction::Set(kind),
            Err(e) => {
                tracing::warn!(
                    "Could not query reaction of {} on {}: {}",
                    viewer,
                    notification.target_id,
                    e
                );
                ViewerReaction::Set(None)
            }
        }
    }

    /// Insert under the write gate. `None` when no feed is loaded.
    async fn fold_comment(&self, comment: Comment) -> Option<Insertion> {
        let _gate = self.write_gate.lock().await;
        let Some(feed) = self.current_feed() else {
            tracing::debug!("Feed not ready, dropping comment {}", comment.id);
            return None;
        };

        let id = comment.id.clone();
        let post_id = comment.post_id.clone().unwrap_or_default();
        let parent_id = comment.parent_comment_id.clone().unwrap_or_default();
        let (next, outcome) = insert_comment(&feed, comment);
        match outcome {
            Insertion::Inserted => {
                tracing::debug!("Inserted comment {} into post {}", id, post_id);
                self.state.send_replace(FeedState::Ready(next));
            }
            Insertion::Duplicate => tracing::debug!("Comment {} already present", id),
            Insertion::UnknownPost => {
                tracing::warn!("Dropping comment {}: {}", id, FeedError::orphaned("post", post_id))
            }
            Insertion::OrphanedReply => tracing::warn!(
                "Dropping reply {}: {}",
                id,
                FeedError::orphaned("parent comment", parent_id)
            ),
        }
        Some(outcome)
    }

    async fn fold_reaction(&self, notification: &ReactionNotification, viewer: ViewerReaction) {
        let _gate = self.write_gate.lock().await;
        let Some(feed) = self.current_feed() else {
            tracing::debug!("Feed not ready, dropping reaction change on {}", notification.target_id);
            return;
        };

        let (next, found) = apply_reaction_change(&feed, notification, viewer);
        if found {
            self.state.send_replace(FeedState::Ready(next));
        } else {
            let kind = match notification.target_type {
                TargetType::Post => "post",
                TargetType::Comment => "comment",
            };
            tracing::debug!(
                "Ignoring reaction change: {}",
                FeedError::orphaned(kind, notification.target_id.as_str())
            );
        }
    }

    fn current_feed(&self) -> Option<Feed> {
        self.state.borrow().posts().cloned()
    }

    async fn publish(&self, state: FeedState) {
        let _gate = self.write_gate.lock().await;
        self.state.send_replace(state);
    }
}
