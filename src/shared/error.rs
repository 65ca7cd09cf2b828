//! Shared Error Types
//!
//! This module defines the error taxonomy used across the feed client.
//! Most of these never reach the caller: event-stream failures are logged
//! and the offending event is dropped. Only transport failures from a direct
//! user action (submitting a comment, loading the feed) are returned.
//!
//! # Error Categories
//!
//! - `Transport` - Network or HTTP failure from a gateway call
//! - `NotAuthenticated` - A mutation was attempted without a viewer identity
//! - `MalformedEvent` - A push payload could not be parsed
//! - `OrphanedReference` - A comment, reply or reaction target is not loaded
//! - `Serialization` - JSON or timestamp decoding failed
//! - `Connection` - The push socket could not be established or broke
//!
//! # Usage
//!
//! ```rust
//! use post_reactions::shared::error::FeedError;
//!
//! let error = FeedError::transport(Some(500), "Internal Server Error");
//! assert!(error.to_string().contains("500"));
//! ```
use thiserror::Error;

/// Result alias used by the gateway and the store
pub type FeedResult<T> = Result<T, FeedError>;

/// Errors that can occur while talking to the feed backend or reconciling events
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FeedError {
    /// HTTP or network failure
    #[error("Transport error{}: {message}", .status.map(|s| format!(" (HTTP {})", s)).unwrap_or_default())]
    Transport {
        /// HTTP status when the server answered, `None` for network failures
        status: Option<u16>,
        /// Human-readable error message
        message: String,
    },

    /// No viewer identity is set
    #[error("Not authenticated: a viewer identity is required")]
    NotAuthenticated,

    /// Push payload failed to parse
    #[error("Malformed event on '{topic}': {message}")]
    MalformedEvent {
        /// Topic the payload arrived on
        topic: String,
        /// Parser error
        message: String,
    },

    /// Target of an event is not present locally
    #[error("Orphaned {kind} reference: {id}")]
    OrphanedReference {
        /// What was being looked up ("post", "comment", "parent comment")
        kind: &'static str,
        /// The id that could not be resolved
        id: String,
    },

    /// JSON serialization or deserialization error
    #[error("Serialization error: {message}")]
    Serialization {
        /// Human-readable error message
        message: String,
    },

    /// Push connection failure
    #[error("Connection error: {message}")]
    Connection {
        /// Human-readable error message
        message: String,
    },
}

impl FeedError {
    /// Create a new transport error
    pub fn transport(status: Option<u16>, message: impl Into<String>) -> Self {
        Self::Transport {
            status,
            message: message.into(),
        }
    }

    /// Create a new malformed event error
    pub fn malformed(topic: impl Into<String>, message: impl Into<String>) -> Self {
        Self::MalformedEvent {
            topic: topic.into(),
            message: message.into(),
        }
    }

    /// Create a new orphaned reference error
    pub fn orphaned(kind: &'static str, id: impl Into<String>) -> Self {
        Self::OrphanedReference {
            kind,
            id: id.into(),
        }
    }

    /// Create a new serialization error
    pub fn serialization(message: impl Into<String>) -> Self {
        Self::Serialization {
            message: message.into(),
        }
    }

    /// Create a new connection error
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection {
            message: message.into(),
        }
    }

    /// HTTP status attached to a transport error, if any
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Transport { status, .. } => *status,
            _ => None,
        }
    }
}

impl From<serde_json::Error> for FeedError {
    fn from(err: serde_json::Error) -> Self {
        Self::serialization(format!("JSON error: {}", err))
    }
}

impl From<reqwest::Error> for FeedError {
    fn from(err: reqwest::Error) -> Self {
        let status = err.status().map(|s| s.as_u16());
        if err.is_decode() {
            return Self::serialization(format!("Failed to parse response: {}", err));
        }
        Self::transport(status, format!("Network error: {}", err))
    }
}

impl From<chrono::ParseError> for FeedError {
    fn from(err: chrono::ParseError) -> Self {
        Self::serialization(format!("Invalid timestamp: {}", err))
    }
}
