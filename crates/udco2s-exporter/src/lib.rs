//! UD-CO2S Prometheus exporter
//!
//! Polls a UD-CO2S CO2/humidity/temperature sensor over a serial line and
//! serves the latest reading on `/metrics`:
//! - Serial transport and scripted fakes
//! - Line parser and shared sample store
//! - Poller with link health tracking and reconnect backoff
//! - Prometheus collector and HTTP endpoints

pub mod api;
pub mod config;
pub mod error;
pub mod metrics;
pub mod parser;
pub mod poller;
pub mod sample;
pub mod serial;
pub mod server;

pub use config::ExporterConfig;
pub use error::{ApiError, ExporterError, ExporterResult, ParseError};
pub use metrics::{MetricsRegistry, SensorCollector};
pub use parser::{parse_line, Reading};
pub use poller::{PollEvent, Poller};
pub use sample::{LinkState, SampleStore, SensorSample, StoreSnapshot};
pub use server::Server;
