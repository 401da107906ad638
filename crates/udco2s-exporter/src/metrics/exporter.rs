//! Metrics exporter for Prometheus scraping

use crate::error::ExporterResult;
use prometheus::{Registry, TextEncoder};

/// Content type of the text exposition format
pub const TEXT_CONTENT_TYPE: &str = "text/plain; version=0.0.4; charset=utf-8";

/// Export metrics in Prometheus text format
pub fn export_metrics(registry: &Registry) -> ExporterResult<String> {
    let encoder = TextEncoder::new();
    let metric_families = registry.gather();
    let mut buffer = String::new();
    encoder.encode_utf8(&metric_families, &mut buffer)?;
    Ok(buffer)
}
