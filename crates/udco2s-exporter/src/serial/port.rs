//! Real serial port backed by the `serialport` crate.

use super::{is_timeout, Connector, LineSource};
use crate::config::SerialConfig;
use crate::error::{ExporterError, ExporterResult};
use serialport::SerialPort;
use std::io::{self, BufRead, BufReader, Write};

/// Buffered line reader over an open serial port.
pub struct SerialLineSource {
    reader: BufReader<Box<dyn SerialPort>>,
    pending: Vec<u8>,
}

impl SerialLineSource {
    /// Open the device with the configured baud rate and read timeout.
    pub fn open(config: &SerialConfig) -> ExporterResult<Self> {
        let port = serialport::new(config.path.as_str(), config.baud_rate)
            .timeout(config.read_timeout())
            .open()
            .map_err(|source| ExporterError::SerialOpen {
                path: config.path.clone(),
                source,
            })?;

        tracing::debug!(
            path = %config.path,
            baud = config.baud_rate,
            timeout_ms = config.read_timeout_ms,
            "Serial port opened"
        );

        Ok(Self {
            reader: BufReader::new(port),
            pending: Vec::new(),
        })
    }

    fn take_line(&mut self) -> String {
        let raw = std::mem::take(&mut self.pending);
        let line = String::from_utf8_lossy(&raw);
        line.trim_end_matches(['\r', '\n']).to_string()
    }
}

impl LineSource for SerialLineSource {
    fn send_command(&mut self, command: &str) -> io::Result<()> {
        let port = self.reader.get_mut();
        port.write_all(command.as_bytes())?;
        port.flush()
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        match self.reader.read_until(b'\n', &mut self.pending) {
            Ok(0) if self.pending.is_empty() => Err(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "serial stream closed",
            )),
            // Either a full line, or the tail of the stream before EOF.
            Ok(_) => Ok(Some(self.take_line())),
            Err(err) if is_timeout(&err) => Ok(None),
            Err(err) => Err(err),
        }
    }
}

/// Connector that opens the configured serial device.
pub struct SerialConnector {
    config: SerialConfig,
}

impl SerialConnector {
    pub fn new(config: SerialConfig) -> Self {
        Self { config }
    }
}

impl Connector for SerialConnector {
    type Source = SerialLineSource;

    fn connect(&mut self) -> ExporterResult<Self::Source> {
        SerialLineSource::open(&self.config)
    }

    fn target(&self) -> &str {
        &self.config.path
    }
}
