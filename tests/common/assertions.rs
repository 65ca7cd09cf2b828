//! Custom assertion macros and utilities
//!
//! Provides enhanced assertion macros for better test output and
//! more descriptive error messages.

/// Assert that a result is ok and return the value
#[macro_export]
macro_rules! assert_ok {
    ($result:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("Expected Ok, got Err: {:?}", e),
        }
    };
    ($result:expr, $message:expr) => {
        match $result {
            Ok(value) => value,
            Err(e) => panic!("{}: {:?}", $message, e),
        }
    };
}

/// Assert that a result is an error, optionally of a given shape
#[macro_export]
macro_rules! assert_err {
    ($result:expr) => {
        assert!($result.is_err(), "Expected Err, got Ok");
    };
    ($result:expr, $pattern:pat) => {
        match $result {
            Err($pattern) => {}
            Ok(value) => panic!("Expected Err, got Ok: {:?}", value),
            Err(e) => panic!("Expected different error variant, got: {:?}", e),
        }
    };
}

/// Assert that the store holds a ready feed and return it
#[macro_export]
macro_rules! assert_ready {
    ($state:expr) => {
        match $state {
            post_reactions::client::FeedState::Ready(feed) => feed,
            other => panic!("Expected Ready, got {:?}", other),
        }
    };
}

/// Assert that two snapshots are the very same allocation
#[macro_export]
macro_rules! assert_same_arc {
    ($left:expr, $right:expr) => {
        assert!(
            std::sync::Arc::ptr_eq(&$left, &$right),
            "Expected the same Arc for {}",
            stringify!($left)
        );
    };
}
