//! Application state for API handlers

use crate::metrics::MetricsRegistry;
use crate::sample::SampleStore;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Metrics registry with the sensor collector
    pub metrics: Arc<MetricsRegistry>,

    /// Latest sensor sample and link status
    pub store: Arc<SampleStore>,

    /// Exporter version
    pub version: String,

    /// Exporter start time
    pub started_at: chrono::DateTime<chrono::Utc>,
}

impl AppState {
    /// Create new application state
    pub fn new(metrics: Arc<MetricsRegistry>, store: Arc<SampleStore>) -> Self {
        Self {
            metrics,
            store,
            version: env!("CARGO_PKG_VERSION").to_string(),
            started_at: chrono::Utc::now(),
        }
    }

    /// Get uptime as a human-readable string
    pub fn uptime(&self) -> String {
        let secs = (chrono::Utc::now() - self.started_at).num_seconds();

        if secs < 60 {
            format!("{}s", secs)
        } else if secs < 3600 {
            format!("{}m {}s", secs / 60, secs % 60)
        } else if secs < 86400 {
            format!("{}h {}m", secs / 3600, (secs % 3600) / 60)
        } else {
            format!("{}d {}h", secs / 86400, (secs % 86400) / 3600)
        }
    }
}
