//! Feed Client Module
//!
//! Everything that talks to the backend or holds state: the REST gateway,
//! the STOMP push channel, the reconciliation functions and the store that
//! ties them together.
//!
//! # Architecture
//!
//! - **`config`** - Configuration wrapper with environment overrides
//! - **`gateway`** - Async REST client (posts, reactions, comments, tags)
//! - **`stomp`** - STOMP 1.2 frame codec
//! - **`push`** - WebSocket push channel with heartbeat and reconnect
//! - **`reconcile`** - Pure snapshot transformations
//! - **`store`** - Feed state store
//!
//! # Module Structure
//!
//! ```text
//! client/
//! ├── mod.rs       - Module exports and documentation
//! ├── config.rs    - Configuration management
//! ├── gateway.rs   - REST gateway
//! ├── stomp.rs     - STOMP frames
//! ├── push.rs      - Push channel adapter
//! ├── reconcile.rs - Reconciliation engine
//! └── store.rs     - Feed state store
//! ```
//!
//! # Example
//!
//! ```rust,no_run
//! use post_reactions::client::{Config, FeedStore, PushChannel, RemoteGateway};
//! use std::sync::Arc;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = Config::from_env()?;
//! let store = Arc::new(FeedStore::new(RemoteGateway::new(config.clone())?));
//! store.load().await;
//!
//! let (channel, events) = PushChannel::connect(&config);
//! let worker = Arc::clone(&store);
//! tokio::spawn(async move { worker.run(events).await });
//! # channel.close().await;
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod gateway;
pub mod push;
pub mod reconcile;
pub mod stomp;
pub mod store;

pub use config::Config;
pub use gateway::{ReactionSubmission, RemoteGateway};
pub use push::{PushChannel, PushStatus};
pub use reconcile::{Insertion, ViewerReaction};
pub use store::{FeedState, FeedStore, LOAD_FAILED_MESSAGE};
