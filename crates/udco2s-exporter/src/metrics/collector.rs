//! Scrape-time collector over the shared sample store.

use crate::error::ExporterResult;
use crate::sample::SampleStore;
use prometheus::core::{Collector, Desc, Describer};
use prometheus::proto::MetricFamily;
use prometheus::{Gauge, IntCounter, IntGauge, Opts};
use std::sync::Arc;

// Series names predate this exporter; dashboards query them verbatim.
pub const CO2: &str = "CO2";
pub const HUMIDITY: &str = "HUM";
pub const TEMPERATURE: &str = "TEMP";
pub const LAST_SUCCESS: &str = "last";
pub const LINK_STATE: &str = "link_state";
pub const PARSE_ERRORS: &str = "parse_errors_total";
pub const RECONNECTS: &str = "reconnects_total";

/// Emits the latest [`SensorSample`](crate::sample::SensorSample) and link
/// status on every scrape.
pub struct SensorCollector {
    store: Arc<SampleStore>,
    co2: Opts,
    humidity: Opts,
    temperature: Opts,
    last_success: Opts,
    link_state: Opts,
    parse_errors: Opts,
    reconnects: Opts,
    descs: Vec<Desc>,
}

impl SensorCollector {
    pub fn new(store: Arc<SampleStore>) -> ExporterResult<Self> {
        let co2 = Opts::new(CO2, "CO2 concentration in ppm");
        let humidity = Opts::new(HUMIDITY, "Relative humidity in percent");
        let temperature = Opts::new(TEMPERATURE, "Temperature in degrees Celsius");
        let last_success = Opts::new(
            LAST_SUCCESS,
            "Unix time of the last successfully parsed reading",
        );
        let link_state = Opts::new(
            LINK_STATE,
            "Sensor link state (0=connected, 1=stale, 2=disconnected)",
        );
        let parse_errors = Opts::new(PARSE_ERRORS, "Sensor lines discarded as unparseable");
        let reconnects = Opts::new(RECONNECTS, "Successful serial reconnects");

        let descs = [
            &co2,
            &humidity,
            &temperature,
            &last_success,
            &link_state,
            &parse_errors,
            &reconnects,
        ]
        .into_iter()
        .map(|opts| opts.describe())
        .collect::<Result<Vec<_>, _>>()?;

        Ok(Self {
            store,
            co2,
            humidity,
            temperature,
            last_success,
            link_state,
            parse_errors,
            reconnects,
            descs,
        })
    }
}

impl Collector for SensorCollector {
    fn desc(&self) -> Vec<&Desc> {
        self.descs.iter().collect()
    }

    fn collect(&self) -> Vec<MetricFamily> {
        let snap = self.store.snapshot();
        let sample = snap.sample;

        let mut families = Vec::with_capacity(self.descs.len());
        families.extend(gauge(&self.co2, f64::from(sample.co2_ppm)));
        families.extend(gauge(&self.humidity, sample.humidity_pct));
        families.extend(gauge(&self.temperature, sample.temperature_c));
        families.extend(gauge(&self.last_success, sample.last_success_epoch as f64));
        families.extend(int_gauge(&self.link_state, snap.link_state.as_metric()));
        families.extend(counter(&self.parse_errors, snap.parse_errors));
        families.extend(counter(&self.reconnects, snap.reconnects));
        families
    }
}

fn gauge(opts: &Opts, value: f64) -> Vec<MetricFamily> {
    match Gauge::with_opts(opts.clone()) {
        Ok(metric) => {
            metric.set(value);
            metric.collect()
        }
        Err(err) => {
            tracing::error!(metric = %opts.name, error = %err, "Failed to build gauge");
            Vec::new()
        }
    }
}

fn int_gauge(opts: &Opts, value: i64) -> Vec<MetricFamily> {
    match IntGauge::with_opts(opts.clone()) {
        Ok(metric) => {
            metric.set(value);
            metric.collect()
        }
        Err(err) => {
            tracing::error!(metric = %opts.name, error = %err, "Failed to build gauge");
            Vec::new()
        }
    }
}

fn counter(opts: &Opts, value: u64) -> Vec<MetricFamily> {
    match IntCounter::with_opts(opts.clone()) {
        Ok(metric) => {
            metric.inc_by(value);
            metric.collect()
        }
        Err(err) => {
            tracing::error!(metric = %opts.name, error = %err, "Failed to build counter");
            Vec::new()
        }
    }
}
