//! # Event Admin Testing
//!
//! Testing utilities for the event administration core.
//!
//! This crate provides:
//! - In-memory implementations of every collaborator trait
//! - A recording notifier that can be told to fail
//! - [`FixedClock`] for deterministic timestamps
//! - Fixtures and a fully wired [`TestBackend`]
//! - proptest strategies for assignment batches
//!
//! ## Example
//!
//! ```ignore
//! use eventadmin_testing::TestBackend;
//!
//! #[tokio::test]
//! async fn sends_codes() {
//!     let backend = TestBackend::new();
//!     backend.codes.add_codes(backend.restricted.id, &["A", "B"]);
//!
//!     let manager = backend.code_manager();
//!     // ...
//! }
//! ```

pub mod fixtures;
pub mod notifier;
pub mod properties;
pub mod stores;

use chrono::{DateTime, Utc};
use eventadmin_core::environment::Clock;

/// Mock implementations of environment traits.
pub mod mocks {
    use super::{Clock, DateTime, Utc};
    use std::sync::{Arc, RwLock};

    /// Clock that returns a settable instant.
    ///
    /// Clones share the same instant, so a test can move time forward after
    /// handing the clock to a service.
    ///
    /// # Example
    ///
    /// ```
    /// use eventadmin_testing::mocks::FixedClock;
    /// use eventadmin_core::environment::Clock;
    /// use chrono::{Duration, Utc};
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// let t1 = clock.now();
    /// assert_eq!(t1, clock.now());
    ///
    /// clock.advance(Duration::hours(1));
    /// assert_eq!(clock.now(), t1 + Duration::hours(1));
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: Arc<RwLock<DateTime<Utc>>>,
    }

    impl FixedClock {
        /// Create a clock frozen at `time`.
        #[must_use]
        pub fn new(time: DateTime<Utc>) -> Self {
            Self {
                time: Arc::new(RwLock::new(time)),
            }
        }

        /// Jump to `time`.
        #[allow(clippy::unwrap_used)] // Lock poisoning only happens after a test panicked
        pub fn set(&self, time: DateTime<Utc>) {
            *self.time.write().unwrap() = time;
        }

        /// Move forward by `delta`.
        #[allow(clippy::unwrap_used)]
        pub fn advance(&self, delta: chrono::Duration) {
            let mut time = self.time.write().unwrap();
            *time += delta;
        }
    }

    impl Clock for FixedClock {
        #[allow(clippy::unwrap_used)]
        fn now(&self) -> DateTime<Utc> {
            *self.time.read().unwrap()
        }
    }

    /// Clock frozen at 2026-03-01 10:00:00 UTC.
    ///
    /// # Panics
    ///
    /// Never in practice: the timestamp is hardcoded.
    #[must_use]
    #[allow(clippy::expect_used)]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(
            DateTime::parse_from_rfc3339("2026-03-01T10:00:00Z")
                .expect("hardcoded timestamp should always parse")
                .with_timezone(&Utc),
        )
    }
}

/// Install a test-friendly tracing subscriber once per process.
///
/// Honours `RUST_LOG`; output goes through the test harness capture.
pub fn init_test_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_test_writer()
        .try_init();
}

pub use fixtures::TestBackend;
pub use mocks::{test_clock, FixedClock};
pub use notifier::{RecordingNotifier, SentMessage};
pub use stores::{
    InMemoryAuthorization, InMemoryCategoryLoader, InMemoryConfigurationStore,
    InMemoryEventRepository, InMemorySpecialCodeStore, InMemoryWaitingQueueRepository,
    StaticSeatAvailability,
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        let time1 = clock.now();
        let time2 = clock.now();
        assert_eq!(time1, time2);
    }

    #[test]
    fn clones_share_time() {
        let clock = test_clock();
        let other = clock.clone();
        clock.advance(chrono::Duration::minutes(5));
        assert_eq!(clock.now(), other.now());
    }
}
