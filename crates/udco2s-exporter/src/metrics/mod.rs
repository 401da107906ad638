//! Prometheus metrics for the sensor.
//!
//! Values are not pushed into long-lived gauges; [`SensorCollector`] reads
//! one snapshot of the [`SampleStore`](crate::sample::SampleStore) per scrape
//! and emits it as-is.

pub mod collector;
pub mod exporter;
pub mod registry;

pub use collector::SensorCollector;
pub use exporter::{export_metrics, TEXT_CONTENT_TYPE};
pub use registry::MetricsRegistry;

/// Prefix applied to every series
pub const NAMESPACE: &str = "udco2s";
