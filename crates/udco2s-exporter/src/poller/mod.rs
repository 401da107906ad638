//! Background poll-parse-store loop.
//!
//! [`Poller::start`] opens the sensor and sends the start command; failures
//! there are fatal. After that the poller never gives up: bad lines are
//! logged and skipped, timeouts mark the link stale, and I/O errors drop the
//! port and reconnect with exponential backoff.

pub mod backoff;
pub mod link;

pub use backoff::BackoffController;
pub use link::{next_state, LinkEvent};

use crate::config::{PollerConfig, START_COMMAND};
use crate::error::{ExporterError, ExporterResult, ParseError};
use crate::parser::parse_line;
use crate::sample::{LinkState, SampleStore, SensorSample};
use crate::serial::{Connector, LineSource};
use std::sync::Arc;
use std::thread::JoinHandle;
use std::time::{Duration, Instant};

/// Result of a single [`Poller::poll_once`] call.
#[derive(Debug, Clone, PartialEq)]
pub enum PollEvent {
    /// A line was parsed and committed
    Committed(SensorSample),
    /// A line was discarded
    Rejected(ParseError),
    /// No complete line before the read timeout
    Timeout,
    /// The port failed and was dropped
    Disconnected,
    /// The port was reopened
    Reconnected,
    /// Disconnected and waiting for the next reconnect window
    Waiting(Duration),
}

/// Owns the sensor connection and keeps the [`SampleStore`] fresh.
pub struct Poller<C: Connector> {
    connector: C,
    source: Option<C::Source>,
    store: Arc<SampleStore>,
    backoff: BackoffController,
    stale_after: u32,
}

impl<C: Connector> Poller<C> {
    /// Open the sensor and send the start command.
    pub fn start(
        mut connector: C,
        store: Arc<SampleStore>,
        config: &PollerConfig,
    ) -> ExporterResult<Self> {
        let source = open_and_start(&mut connector)?;
        tracing::info!(target_device = connector.target(), "Sensor streaming started");
        store.set_link_state(LinkState::Connected);

        Ok(Self {
            connector,
            source: Some(source),
            store,
            backoff: BackoffController::new(config.backoff_initial_ms, config.backoff_max_ms),
            stale_after: config.stale_after_timeouts,
        })
    }

    /// Run one step of the loop. Never blocks longer than one read timeout
    /// and never sleeps; [`PollEvent::Waiting`] tells the caller how long to.
    pub fn poll_once(&mut self) -> PollEvent {
        let Some(source) = self.source.as_mut() else {
            return self.try_reconnect();
        };

        match source.read_line() {
            Ok(Some(line)) => {
                tracing::debug!(line = %line, "Received sensor line");
                self.handle_line(&line)
            }
            Ok(None) => {
                let consecutive = self.store.record_timeout();
                tracing::trace!(consecutive, "Sensor read timed out");
                self.apply(LinkEvent::Timeout { consecutive });
                PollEvent::Timeout
            }
            Err(err) => {
                tracing::warn!(error = %err, "Sensor read failed, dropping connection");
                self.source = None;
                self.backoff.mark_failure(Instant::now());
                self.apply(LinkEvent::IoError);
                PollEvent::Disconnected
            }
        }
    }

    /// Poll forever.
    pub fn run(mut self) {
        loop {
            if let PollEvent::Waiting(delay) = self.poll_once() {
                std::thread::sleep(delay);
            }
        }
    }

    /// Run the loop on a dedicated, detached thread.
    pub fn spawn(self) -> std::io::Result<JoinHandle<()>>
    where
        C: 'static,
        C::Source: 'static,
    {
        std::thread::Builder::new()
            .name("udco2s-poller".to_string())
            .spawn(move || self.run())
    }

    pub fn store(&self) -> &Arc<SampleStore> {
        &self.store
    }

    pub fn is_connected(&self) -> bool {
        self.source.is_some()
    }

    fn handle_line(&mut self, line: &str) -> PollEvent {
        match parse_line(line) {
            Ok(reading) => {
                let sample = reading.into_sample(chrono::Utc::now().timestamp());
                self.store.commit(sample);
                self.apply(LinkEvent::Sample);
                PollEvent::Committed(sample)
            }
            Err(err) => {
                tracing::warn!(error = %err, "Discarding sensor line");
                self.store.record_parse_error();
                self.apply(LinkEvent::Rejected);
                PollEvent::Rejected(err)
            }
        }
    }

    fn try_reconnect(&mut self) -> PollEvent {
        let now = Instant::now();
        if !self.backoff.should_retry(now) {
            return PollEvent::Waiting(self.backoff.remaining(now));
        }

        match open_and_start(&mut self.connector) {
            Ok(source) => {
                self.source = Some(source);
                self.backoff.mark_success(Instant::now());
                self.store.record_reconnect();
                self.apply(LinkEvent::Reconnected);
                PollEvent::Reconnected
            }
            Err(err) => {
                self.backoff.mark_failure(now);
                let retry_in = self.backoff.remaining(now);
                tracing::warn!(
                    error = %err,
                    retry_in_ms = retry_in.as_millis() as u64,
                    "Reconnect failed"
                );
                PollEvent::Waiting(retry_in)
            }
        }
    }

    fn apply(&self, event: LinkEvent) {
        let current = self.store.link_state();
        let next = next_state(current, event, self.stale_after);
        if next == current {
            return;
        }
        self.store.set_link_state(next);
        match next {
            LinkState::Connected => {
                tracing::info!(from = current.as_str(), "Sensor link connected")
            }
            LinkState::Stale => tracing::warn!(
                timeouts = self.stale_after,
                "Sensor link stale, no data within read timeout"
            ),
            LinkState::Disconnected => tracing::warn!(
                target_device = self.connector.target(),
                "Sensor link disconnected"
            ),
        }
    }
}

fn open_and_start<C: Connector>(connector: &mut C) -> ExporterResult<C::Source> {
    let mut source = connector.connect()?;
    source
        .send_command(START_COMMAND)
        .map_err(ExporterError::StartCommand)?;
    Ok(source)
}
