//! udco2s-exporter - UD-CO2S sensor exporter
//!
//! Reads CO2, humidity and temperature from the sensor's serial port and
//! serves them to Prometheus on `/metrics`.

use clap::Parser;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use udco2s_exporter::{ExporterConfig, ExporterError, ExporterResult, Server};

/// udco2s-exporter CLI
#[derive(Parser)]
#[command(name = "udco2s-exporter")]
#[command(about = "Prometheus exporter for the UD-CO2S CO2 sensor", long_about = None)]
#[command(version)]
struct Cli {
    /// Configuration file path
    #[arg(short, long, env = "UDCO2S_CONFIG")]
    config: Option<String>,

    /// UD-CO2S serial device path [default: /dev/ttyACM0]
    #[arg(short, long, env = "UDCO2S_DEVICE")]
    device: Option<String>,

    /// Bind address for the scrape endpoint [default: 0.0.0.0:5000]
    #[arg(short, long, env = "UDCO2S_BIND")]
    bind: Option<String>,

    /// Serial read timeout in milliseconds [default: 6000]
    #[arg(long, env = "UDCO2S_READ_TIMEOUT_MS")]
    read_timeout_ms: Option<u64>,

    /// Consecutive read timeouts before the sensor is reported stale [default: 3]
    #[arg(long, env = "UDCO2S_STALE_AFTER")]
    stale_after: Option<u32>,

    /// Log level
    #[arg(long, env = "UDCO2S_LOG_LEVEL")]
    log_level: Option<String>,

    /// Enable JSON logging
    #[arg(long, env = "UDCO2S_LOG_JSON")]
    json: bool,
}

impl Cli {
    /// Flags win over file and environment configuration.
    fn apply(&self, config: &mut ExporterConfig) -> ExporterResult<()> {
        if let Some(device) = &self.device {
            config.serial.path = device.clone();
        }
        if let Some(bind) = &self.bind {
            config.server.listen_addr = bind
                .parse()
                .map_err(|e| ExporterError::Config(format!("Invalid bind address: {}", e)))?;
        }
        if let Some(timeout) = self.read_timeout_ms {
            config.serial.read_timeout_ms = timeout;
        }
        if let Some(stale_after) = self.stale_after {
            config.poller.stale_after_timeouts = stale_after;
        }
        if let Some(level) = &self.log_level {
            config.logging.level = level.clone();
        }
        if self.json {
            config.logging.json = true;
        }
        config.validate()
    }
}

#[tokio::main]
async fn main() -> ExporterResult<()> {
    let cli = Cli::parse();

    let mut config = ExporterConfig::load(cli.config.as_deref())?;
    cli.apply(&mut config)?;

    // Initialize tracing
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| config.logging.level.clone().into());

    if config.logging.json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        device = %config.serial.path,
        bind = %config.server.listen_addr,
        "Starting udco2s exporter"
    );

    let result = Server::new(config).run().await;
    if let Err(err) = &result {
        tracing::error!(error = %err, "udco2s exporter failed");
    }
    result
}
