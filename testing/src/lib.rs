//! # Recauda Testing
//!
//! Testing utilities and helpers for the Recauda UI state layer.
//!
//! This crate provides:
//! - Mock implementations of Environment traits
//! - The Given-When-Then [`ReducerTest`] harness
//! - Assertion helpers for effects (timers, cancellation, futures)
//!
//! ## Example
//!
//! ```ignore
//! use recauda_testing::{ReducerTest, RecordingNavigator};
//!
//! let navigator = Arc::new(RecordingNavigator::new());
//!
//! ReducerTest::new(LoginReducer)
//!     .with_env(LoginEnvironment::new(navigator.clone()))
//!     .given_state(LoginState::default())
//!     .given_actions([LoginAction::PhoneChanged("3584123456".into())])
//!     .when_action(LoginAction::Submit)
//!     .then_effects(|effects| assertions::assert_effects_count(effects, 1))
//!     .run();
//! ```

use chrono::{DateTime, Utc};
use recauda_core::environment::{Clock, IdGenerator, Navigator};

/// Mock implementations for testing.
pub mod mocks {
    use super::{Clock, DateTime, IdGenerator, Navigator, Utc};
    use std::sync::atomic::{AtomicU64, Ordering};
    use std::sync::{Mutex, PoisonError};

    /// Fixed clock for deterministic tests
    ///
    /// Always returns the same time, making tests reproducible.
    ///
    /// # Example
    ///
    /// ```
    /// use recauda_testing::mocks::FixedClock;
    /// use recauda_core::environment::Clock;
    /// use chrono::Utc;
    ///
    /// let clock = FixedClock::new(Utc::now());
    /// assert_eq!(clock.now(), clock.now());
    /// ```
    #[derive(Debug, Clone)]
    pub struct FixedClock {
        time: DateTime<Utc>,
    }

    impl FixedClock {
        /// Create a new fixed clock with the given time
        #[must_use]
        pub const fn new(time: DateTime<Utc>) -> Self {
            Self { time }
        }
    }

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.time
        }
    }

    /// Create a default fixed clock for tests (2025-01-01 00:00:00 UTC)
    #[must_use]
    pub fn test_clock() -> FixedClock {
        FixedClock::new(DateTime::<Utc>::from_timestamp(1_735_689_600, 0).unwrap_or_default())
    }

    /// Predictable ids: `{prefix}-1`, `{prefix}-2`, ...
    #[derive(Debug)]
    pub struct SequentialIdGenerator {
        prefix: String,
        next: AtomicU64,
    }

    impl SequentialIdGenerator {
        /// Create a generator starting at 1
        #[must_use]
        pub fn new(prefix: impl Into<String>) -> Self {
            Self {
                prefix: prefix.into(),
                next: AtomicU64::new(1),
            }
        }
    }

    impl IdGenerator for SequentialIdGenerator {
        fn next_id(&self) -> String {
            let n = self.next.fetch_add(1, Ordering::SeqCst);
            format!("{}-{n}", self.prefix)
        }
    }

    /// A navigation request captured by [`RecordingNavigator`]
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub enum NavigationRecord {
        /// `push(path)`
        Push(String),
        /// `back()`
        Back,
    }

    /// Navigator that records every request instead of routing
    #[derive(Debug, Default)]
    pub struct RecordingNavigator {
        records: Mutex<Vec<NavigationRecord>>,
    }

    impl RecordingNavigator {
        /// Create an empty recorder
        #[must_use]
        pub fn new() -> Self {
            Self::default()
        }

        /// All requests so far, oldest first
        #[must_use]
        pub fn records(&self) -> Vec<NavigationRecord> {
            self.records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .clone()
        }

        /// Paths passed to `push`, oldest first
        #[must_use]
        pub fn pushed(&self) -> Vec<String> {
            self.records()
                .into_iter()
                .filter_map(|r| match r {
                    NavigationRecord::Push(path) => Some(path),
                    NavigationRecord::Back => None,
                })
                .collect()
        }

        /// The most recent request
        #[must_use]
        pub fn last(&self) -> Option<NavigationRecord> {
            self.records().pop()
        }

        fn record(&self, record: NavigationRecord) {
            self.records
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .push(record);
        }
    }

    impl Navigator for RecordingNavigator {
        fn push(&self, path: &str) {
            self.record(NavigationRecord::Push(path.to_string()));
        }

        fn back(&self) {
            self.record(NavigationRecord::Back);
        }
    }
}


// Re-export commonly used items
pub use mocks::{
    FixedClock, NavigationRecord, RecordingNavigator, SequentialIdGenerator, test_clock,
};
pub use reducer_test::{ReducerTest, assertions};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fixed_clock() {
        let clock = test_clock();
        assert_eq!(clock.now(), clock.now());
        assert_eq!(clock.now().to_rfc3339(), "2025-01-01T00:00:00+00:00");
    }

    #[test]
    fn test_sequential_ids() {
        let ids = SequentialIdGenerator::new("seller");
        assert_eq!(ids.next_id(), "seller-1");
        assert_eq!(ids.next_id(), "seller-2");
    }

    #[test]
    fn test_recording_navigator() {
        let navigator = RecordingNavigator::new();
        navigator.push("/sellers-list");
        navigator.back();

        assert_eq!(navigator.pushed(), vec!["/sellers-list".to_string()]);
        assert_eq!(navigator.last(), Some(NavigationRecord::Back));
    }
}
