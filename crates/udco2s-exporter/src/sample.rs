//! The last-known sensor reading and the lock that guards it.
//!
//! The poller thread is the only writer. Scrapes and health checks copy the
//! whole record out under a read lock, so a reader sees either the previous
//! commit or the next one, never a mix.

use parking_lot::RwLock;
use serde::Serialize;

/// One complete reading from the sensor.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct SensorSample {
    pub co2_ppm: u32,
    pub humidity_pct: f64,
    pub temperature_c: f64,
    /// Unix seconds of the commit; zero until the first successful read
    pub last_success_epoch: i64,
}

/// Connection health as seen by the poller.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LinkState {
    #[default]
    Connected,
    Stale,
    Disconnected,
}

impl LinkState {
    /// Value exported on the `link_state` gauge.
    pub fn as_metric(self) -> i64 {
        match self {
            LinkState::Connected => 0,
            LinkState::Stale => 1,
            LinkState::Disconnected => 2,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            LinkState::Connected => "connected",
            LinkState::Stale => "stale",
            LinkState::Disconnected => "disconnected",
        }
    }
}

/// Everything readers get from a single lock acquisition.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct StoreSnapshot {
    pub sample: SensorSample,
    pub link_state: LinkState,
    pub consecutive_timeouts: u32,
    pub parse_errors: u64,
    pub reconnects: u64,
}

/// Shared, lock-protected home of the latest [`SensorSample`].
#[derive(Debug, Default)]
pub struct SampleStore {
    inner: RwLock<StoreSnapshot>,
}

impl SampleStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copy of the full record.
    pub fn snapshot(&self) -> StoreSnapshot {
        *self.inner.read()
    }

    /// Copy of the current sample only.
    pub fn sample(&self) -> SensorSample {
        self.inner.read().sample
    }

    /// Replace the sample in one step; the line was received, so the
    /// timeout streak ends too.
    pub fn commit(&self, sample: SensorSample) {
        let mut guard = self.inner.write();
        guard.sample = sample;
        guard.consecutive_timeouts = 0;
    }

    pub fn record_parse_error(&self) {
        let mut guard = self.inner.write();
        guard.parse_errors += 1;
        guard.consecutive_timeouts = 0;
    }

    /// Count one more read timeout and return the new streak length.
    pub fn record_timeout(&self) -> u32 {
        let mut guard = self.inner.write();
        guard.consecutive_timeouts = guard.consecutive_timeouts.saturating_add(1);
        guard.consecutive_timeouts
    }

    pub fn record_reconnect(&self) {
        let mut guard = self.inner.write();
        guard.reconnects += 1;
        guard.consecutive_timeouts = 0;
    }

    pub fn link_state(&self) -> LinkState {
        self.inner.read().link_state
    }

    /// Set the link state, returning the previous one.
    pub fn set_link_state(&self, state: LinkState) -> LinkState {
        std::mem::replace(&mut self.inner.write().link_state, state)
    }
}
