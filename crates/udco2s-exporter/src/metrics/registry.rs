//! Registry holding the sensor collector

use super::collector::SensorCollector;
use super::exporter::export_metrics;
use super::NAMESPACE;
use crate::error::ExporterResult;
use crate::sample::SampleStore;
use prometheus::Registry;
use std::sync::Arc;

/// Prometheus registry with the sensor collector registered under `udco2s_`.
pub struct MetricsRegistry {
    registry: Registry,
}

impl MetricsRegistry {
    pub fn new(store: Arc<SampleStore>) -> ExporterResult<Self> {
        Self::with_prefix(NAMESPACE, store)
    }

    pub fn with_prefix(prefix: &str, store: Arc<SampleStore>) -> ExporterResult<Self> {
        let registry = Registry::new_custom(Some(prefix.to_string()), None)?;
        registry.register(Box::new(SensorCollector::new(store)?))?;
        Ok(Self { registry })
    }

    /// Export metrics in Prometheus text format
    pub fn export(&self) -> ExporterResult<String> {
        export_metrics(&self.registry)
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }
}
