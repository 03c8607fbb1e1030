//! Tracing, logging, metrics (shared setup for both services).

/// Initialize process-wide observability (tracing/logging).
///
/// This is safe to call multiple times; subsequent calls become no-ops.
pub fn init() {
    tracing::init();
}

/// Tracing configuration (filters, layers).
pub mod tracing;

/// Prometheus counters and text exposition.
pub mod metrics;

pub use metrics::{CatalogMetrics, MetricsError, MetricsRegistry};
