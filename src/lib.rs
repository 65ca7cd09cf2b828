//! Post Reactions - Feed Client Library
//!
//! Client-side state for a social feed: posts, threaded comments and
//! per-viewer reactions, kept current by a REST backend and a STOMP push
//! channel.
//!
//! # Overview
//!
//! This library provides:
//! - An async REST gateway for posts, reactions, comments and tags
//! - A push channel that delivers new comments and reaction tallies
//! - Pure reconciliation functions with structural sharing
//! - A feed store that serializes snapshot replacement
//!
//! # Module Structure
//!
//! - **`shared`** - Data model, reaction kinds, push events, errors and
//!   configuration. No I/O.
//! - **`client`** - Gateway, push channel, reconciliation and store.
//!
//! # Feature Flags
//!
//! - **`cli`** - Builds the `feed-watch` binary (adds `tracing-subscriber`
//!   and `dotenv`)
//!
//! # Snapshots
//!
//! The feed is an `Arc<Vec<Arc<Post>>>`. An update rebuilds only the path
//! from the root to the changed node, so consumers can compare nodes with
//! `Arc::ptr_eq` to find what changed.
//!
//! # Error Handling
//!
//! - `FeedError` in `shared::error` for gateway and reconciliation failures
//! - `ConfigError` in `shared::config` for configuration problems
//! - Push-stream problems are logged with `tracing` and the event dropped

/// Shared types and data structures
pub mod shared;

/// Backend gateway, push channel and feed store
pub mod client;
