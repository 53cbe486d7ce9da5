//! Prometheus metrics for observability.
//!
//! The [`Store`](crate::Store) records counters and histograms through the
//! `metrics` facade. Nothing is collected until a recorder is installed;
//! [`MetricsRecorder::install`] installs a Prometheus recorder whose output can
//! be rendered as text (the demo binary prints it with `--metrics`).
//!
//! # Example
//!
//! ```rust,no_run
//! use recauda_runtime::metrics::MetricsRecorder;
//!
//! # fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let recorder = MetricsRecorder::install()?;
//! // ... drive some stores ...
//! println!("{}", recorder.render());
//! # Ok(())
//! # }
//! ```

use metrics::{describe_counter, describe_histogram};
use metrics_exporter_prometheus::{Matcher, PrometheusBuilder, PrometheusHandle};
use thiserror::Error;

// Re-export metrics macros for use in other modules
pub use metrics::{counter, histogram};

/// Total actions accepted by a store.
pub const COMMANDS_TOTAL: &str = "store.commands.total";
/// Actions rejected because the store was disposed or shutting down.
pub const COMMANDS_REJECTED: &str = "store.commands.rejected";
/// Time spent inside the reducer.
pub const REDUCER_DURATION: &str = "store.reducer.duration_seconds";
/// Effects returned per action.
pub const EFFECTS_COUNT: &str = "store.effects.count";
/// Effects executed, labelled by `type`.
pub const EFFECTS_EXECUTED: &str = "store.effects.executed";
/// In-flight tasks aborted through `Effect::Cancel`, a restarted
/// `Effect::Cancellable` or disposal.
pub const EFFECTS_CANCELLED: &str = "store.effects.cancelled";
/// Stores disposed.
pub const STORE_DISPOSED: &str = "store.disposed";

/// Errors from metrics operations.
#[derive(Error, Debug)]
pub enum MetricsError {
    /// Failed to build metrics exporter
    #[error("Failed to build metrics exporter: {0}")]
    Build(String),
    /// Failed to install metrics exporter
    #[error("Failed to install metrics exporter: {0}")]
    Install(String),
}

/// Installed Prometheus recorder.
pub struct MetricsRecorder {
    handle: PrometheusHandle,
}

impl MetricsRecorder {
    /// Describe the store metrics and install a global Prometheus recorder.
    ///
    /// # Errors
    ///
    /// Returns [`MetricsError::Build`] if the bucket configuration is invalid and
    /// [`MetricsError::Install`] if a global recorder is already installed.
    pub fn install() -> Result<Self, MetricsError> {
        let builder = PrometheusBuilder::new()
            .set_buckets_for_metric(
                Matcher::Suffix("duration_seconds".to_string()),
                &[0.000_01, 0.000_05, 0.000_1, 0.000_5, 0.001, 0.005, 0.01, 0.05],
            )
            .map_err(|e| MetricsError::Build(e.to_string()))?;

        let handle = builder
            .install_recorder()
            .map_err(|e| MetricsError::Install(e.to_string()))?;

        register_metrics();
        tracing::debug!("Prometheus recorder installed");

        Ok(Self { handle })
    }

    /// Render current metrics in Prometheus text format.
    #[must_use]
    pub fn render(&self) -> String {
        self.handle.render()
    }
}

impl std::fmt::Debug for MetricsRecorder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MetricsRecorder").finish_non_exhaustive()
    }
}

/// Register all metric descriptions.
pub fn register_metrics() {
    describe_counter!(COMMANDS_TOTAL, "Total number of actions sent to stores");
    describe_counter!(
        COMMANDS_REJECTED,
        "Actions rejected because the store was disposed or shutting down"
    );
    describe_histogram!(REDUCER_DURATION, "Time taken to execute reducers");
    describe_histogram!(EFFECTS_COUNT, "Number of effects returned per action");
    describe_counter!(EFFECTS_EXECUTED, "Total number of effects executed, by type");
    describe_counter!(
        EFFECTS_CANCELLED,
        "Total number of in-flight effect tasks aborted"
    );
    describe_counter!(STORE_DISPOSED, "Total number of disposed stores");
}
