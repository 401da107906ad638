//! Configuration for udco2s-exporter

use crate::error::{ExporterError, ExporterResult};
use serde::{Deserialize, Serialize};
use std::net::SocketAddr;
use std::time::Duration;

/// Command that makes the UD-CO2S start streaming readings.
pub const START_COMMAND: &str = "STA\r\n";

/// Main exporter configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExporterConfig {
    /// Serial connection to the sensor
    #[serde(default)]
    pub serial: SerialConfig,

    /// Poll loop behaviour
    #[serde(default)]
    pub poller: PollerConfig,

    /// HTTP server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// Serial device configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SerialConfig {
    /// Device path
    #[serde(default = "default_device_path")]
    pub path: String,

    /// Baud rate
    #[serde(default = "default_baud_rate")]
    pub baud_rate: u32,

    /// Read timeout in milliseconds
    #[serde(default = "default_read_timeout_ms")]
    pub read_timeout_ms: u64,
}

impl SerialConfig {
    pub fn read_timeout(&self) -> Duration {
        Duration::from_millis(self.read_timeout_ms)
    }
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self {
            path: default_device_path(),
            baud_rate: default_baud_rate(),
            read_timeout_ms: default_read_timeout_ms(),
        }
    }
}

/// Poller configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PollerConfig {
    /// Consecutive read timeouts before the link is reported stale
    #[serde(default = "default_stale_after_timeouts")]
    pub stale_after_timeouts: u32,

    /// Initial reconnect backoff in milliseconds
    #[serde(default = "default_backoff_initial_ms")]
    pub backoff_initial_ms: u64,

    /// Maximum reconnect backoff in milliseconds
    #[serde(default = "default_backoff_max_ms")]
    pub backoff_max_ms: u64,
}

impl Default for PollerConfig {
    fn default() -> Self {
        Self {
            stale_after_timeouts: default_stale_after_timeouts(),
            backoff_initial_ms: default_backoff_initial_ms(),
            backoff_max_ms: default_backoff_max_ms(),
        }
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Listen address
    #[serde(default = "default_listen_addr")]
    pub listen_addr: SocketAddr,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level
    #[serde(default = "default_log_level")]
    pub level: String,

    /// JSON format
    #[serde(default)]
    pub json: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            json: false,
        }
    }
}

// Default value helpers
fn default_device_path() -> String {
    "/dev/ttyACM0".to_string()
}

fn default_baud_rate() -> u32 {
    115_200
}

fn default_read_timeout_ms() -> u64 {
    6_000
}

fn default_stale_after_timeouts() -> u32 {
    3
}

fn default_backoff_initial_ms() -> u64 {
    500
}

fn default_backoff_max_ms() -> u64 {
    30_000
}

fn default_listen_addr() -> SocketAddr {
    SocketAddr::from(([0, 0, 0, 0], 5000))
}

fn default_log_level() -> String {
    "info".to_string()
}

impl ExporterConfig {
    /// Load configuration from defaults, an optional file, then `UDCO2S_*`
    /// environment variables (`UDCO2S_SERIAL__PATH`, `UDCO2S_SERVER__LISTEN_ADDR`, ...).
    pub fn load(path: Option<&str>) -> ExporterResult<Self> {
        let mut builder = config::Config::builder();

        builder = builder.add_source(config::Config::try_from(&ExporterConfig::default())?);

        if let Some(path) = path {
            builder = builder.add_source(config::File::with_name(path).required(true));
        }

        builder = builder.add_source(
            config::Environment::with_prefix("UDCO2S")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        let config: ExporterConfig = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }

    /// Reject values the poller cannot run with.
    pub fn validate(&self) -> ExporterResult<()> {
        if self.serial.path.trim().is_empty() {
            return Err(ExporterError::Config("serial device path is empty".into()));
        }
        if self.serial.baud_rate == 0 {
            return Err(ExporterError::Config("baud rate must be non-zero".into()));
        }
        if self.serial.read_timeout_ms == 0 {
            return Err(ExporterError::Config(
                "read timeout must be non-zero".into(),
            ));
        }
        if self.poller.stale_after_timeouts == 0 {
            return Err(ExporterError::Config(
                "stale_after_timeouts must be at least 1".into(),
            ));
        }
        if self.poller.backoff_max_ms < self.poller.backoff_initial_ms {
            return Err(ExporterError::Config(format!(
                "backoff_max_ms ({}) is below backoff_initial_ms ({})",
                self.poller.backoff_max_ms, self.poller.backoff_initial_ms
            )));
        }
        Ok(())
    }
}
