//! Shared Module
//!
//! Types shared by every part of the client: the wire and snapshot data
//! model, reaction configuration, push events, errors and configuration.
//!
//! # Overview
//!
//! Nothing in this module performs I/O. The gateway, push adapter and store
//! in [`crate::client`] are built on top of these types.

/// Posts, comments and users (wire and snapshot forms)
pub mod post;

/// Reaction kinds, targets and tallies
pub mod reaction;

/// Push channel events
pub mod event;

/// Shared error types
pub mod error;

/// Application configuration
pub mod config;

/// Re-export commonly used types for convenience
pub use config::{AppConfig, AppConfigBuilder, ConfigError};
pub use error::{FeedError, FeedResult};
pub use event::{PushEvent, ReactionNotification};
pub use post::{Comment, Feed, Post, RawComment, RawPost, RawUser, Tag, User};
pub use reaction::{ReactionKind, ReactionTally, TargetType};
