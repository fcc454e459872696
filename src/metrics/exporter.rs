//! Prometheus metrics exporter
//!
//! Installs the Prometheus recorder in-process. The exposition is rendered
//! on demand; there is no HTTP listener since a run is short-lived.

use crate::metrics::recorder::init_metrics;
use metrics_exporter_prometheus::{PrometheusBuilder, PrometheusHandle};
use std::sync::OnceLock;

/// Global prometheus handle
static PROMETHEUS_HANDLE: OnceLock<PrometheusHandle> = OnceLock::new();

/// Install the Prometheus recorder as the global `metrics` recorder.
///
/// Subsequent calls return the existing handle.
pub fn install_prometheus() -> MetricsResult<&'static PrometheusHandle> {
    if let Some(handle) = PROMETHEUS_HANDLE.get() {
        return Ok(handle);
    }

    let handle = PrometheusBuilder::new()
        .install_recorder()
        .map_err(|e| MetricsError::SetupFailed(e.to_string()))?;

    init_metrics();

    let _ = PROMETHEUS_HANDLE.set(handle);
    PROMETHEUS_HANDLE
        .get()
        .ok_or(MetricsError::NotInitialized)
}

/// Render metrics in the Prometheus text format
pub fn render_metrics() -> Option<String> {
    PROMETHEUS_HANDLE.get().map(|h| h.render())
}

/// Errors that can occur during metrics setup
#[derive(Debug, thiserror::Error)]
pub enum MetricsError {
    #[error("Failed to setup metrics: {0}")]
    SetupFailed(String),

    #[error("Metrics recorder not initialized")]
    NotInitialized,
}

pub type MetricsResult<T> = Result<T, MetricsError>;
