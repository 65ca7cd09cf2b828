//! Common test utilities and helpers
//!
//! This module provides shared utilities for all tests including:
//! - Feed fixtures and configurations
//! - Mock REST backend helpers
//! - A fake STOMP broker
//! - Custom assertion macros
#![allow(dead_code)]

#[macro_use]
pub mod assertions;
pub mod broker;
pub mod fixtures;
pub mod mock_server;

// Re-export commonly used utilities
pub use broker::*;
pub use fixtures::*;
pub use mock_server::*;
