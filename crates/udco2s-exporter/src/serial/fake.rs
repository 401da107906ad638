use super::{Connector, LineSource};
use crate::error::{ExporterError, ExporterResult};
use parking_lot::Mutex;
use std::collections::VecDeque;
use std::io;
use std::sync::Arc;
use std::time::Duration;

/// One scripted outcome of [`LineSource::read_line`].
#[derive(Debug, Clone)]
pub enum FakeRead {
    Line(String),
    Timeout,
    Error(io::ErrorKind),
    /// Sleep before yielding the line.
    Delayed(String, Duration),
}

impl FakeRead {
    pub fn line(line: impl Into<String>) -> Self {
        FakeRead::Line(line.into())
    }
}

/// Scripted line source used in tests and local runs without hardware.
/// An exhausted script behaves like an idle sensor and times out.
#[derive(Debug, Default)]
pub struct FakeLineSource {
    script: VecDeque<FakeRead>,
    writes: Arc<Mutex<Vec<String>>>,
    fail_commands: bool,
}

impl FakeLineSource {
    pub fn new(script: Vec<FakeRead>) -> Self {
        Self {
            script: script.into(),
            ..Self::default()
        }
    }

    /// Script made of complete lines only.
    pub fn from_lines<I, S>(lines: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::new(lines.into_iter().map(|l| FakeRead::Line(l.into())).collect())
    }

    /// Make every `send_command` fail with `BrokenPipe`.
    pub fn failing_commands(mut self) -> Self {
        self.fail_commands = true;
        self
    }

    /// Handle onto the commands written so far; stays valid after the
    /// source is moved into a poller.
    pub fn writes(&self) -> Arc<Mutex<Vec<String>>> {
        Arc::clone(&self.writes)
    }
}

impl LineSource for FakeLineSource {
    fn send_command(&mut self, command: &str) -> io::Result<()> {
        if self.fail_commands {
            return Err(io::Error::new(io::ErrorKind::BrokenPipe, "write refused"));
        }
        self.writes.lock().push(command.to_string());
        Ok(())
    }

    fn read_line(&mut self) -> io::Result<Option<String>> {
        match self.script.pop_front() {
            Some(FakeRead::Line(line)) => Ok(Some(line)),
            Some(FakeRead::Delayed(line, delay)) => {
                std::thread::sleep(delay);
                Ok(Some(line))
            }
            Some(FakeRead::Timeout) | None => Ok(None),
            Some(FakeRead::Error(kind)) => Err(io::Error::new(kind, "scripted failure")),
        }
    }
}

/// Connector handing out pre-built sources in order. Once the queue is
/// empty every attempt fails as if the device were unplugged.
#[derive(Debug, Default)]
pub struct ScriptedConnector {
    sources: VecDeque<ExporterResult<FakeLineSource>>,
    attempts: usize,
}

impl ScriptedConnector {
    pub fn new(sources: Vec<FakeLineSource>) -> Self {
        Self {
            sources: sources.into_iter().map(Ok).collect(),
            attempts: 0,
        }
    }

    /// Queue a failed connection attempt.
    pub fn then_fail(mut self) -> Self {
        self.sources.push_back(Err(unplugged()));
        self
    }

    pub fn then_source(mut self, source: FakeLineSource) -> Self {
        self.sources.push_back(Ok(source));
        self
    }

    pub fn attempts(&self) -> usize {
        self.attempts
    }
}

impl Connector for ScriptedConnector {
    type Source = FakeLineSource;

    fn connect(&mut self) -> ExporterResult<Self::Source> {
        self.attempts += 1;
        self.sources.pop_front().unwrap_or_else(|| Err(unplugged()))
    }

    fn target(&self) -> &str {
        "fake"
    }
}

fn unplugged() -> ExporterError {
    ExporterError::SerialOpen {
        path: "fake".to_string(),
        source: serialport::Error::new(serialport::ErrorKind::NoDevice, "device unplugged"),
    }
}
