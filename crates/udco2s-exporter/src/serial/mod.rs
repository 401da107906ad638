//! Line-oriented access to the sensor.
//!
//! The poller only needs two things from a transport: write a command and
//! read the next complete line. [`LineSource`] captures that, [`Connector`]
//! knows how to (re)open one.

pub mod fake;
pub mod port;

pub use fake::{FakeLineSource, FakeRead, ScriptedConnector};
pub use port::{SerialConnector, SerialLineSource};

use crate::error::ExporterResult;
use std::io;

/// A newline-delimited text stream from the sensor.
pub trait LineSource: Send {
    /// Write a raw command, e.g. the start command.
    fn send_command(&mut self, command: &str) -> io::Result<()>;

    /// Read the next complete line with its terminator removed.
    ///
    /// `Ok(None)` means the read timed out before a full line arrived; any
    /// partial data is kept for the next call. End of stream is reported as
    /// [`io::ErrorKind::UnexpectedEof`].
    fn read_line(&mut self) -> io::Result<Option<String>>;
}

/// Opens fresh [`LineSource`]s, used at startup and on every reconnect.
pub trait Connector: Send {
    type Source: LineSource;

    fn connect(&mut self) -> ExporterResult<Self::Source>;

    /// Human-readable target for log lines.
    fn target(&self) -> &str;
}

/// Timeouts surface differently per platform; all of these mean "no data yet".
pub(crate) fn is_timeout(err: &io::Error) -> bool {
    matches!(
        err.kind(),
        io::ErrorKind::TimedOut | io::ErrorKind::WouldBlock | io::ErrorKind::Interrupted
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_kinds() {
        assert!(is_timeout(&io::Error::from(io::ErrorKind::TimedOut)));
        assert!(is_timeout(&io::Error::from(io::ErrorKind::WouldBlock)));
        assert!(!is_timeout(&io::Error::from(io::ErrorKind::BrokenPipe)));
        assert!(!is_timeout(&io::Error::from(io::ErrorKind::UnexpectedEof)));
    }
}
