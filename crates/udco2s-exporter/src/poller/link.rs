//! Link health transitions.
//!
//! ```text
//! Connected --N timeouts--> Stale --sample--> Connected
//!     \                      /
//!      `--io error--> Disconnected --reconnect--> Connected
//! ```

use crate::sample::LinkState;

/// What the poller just observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkEvent {
    /// A line parsed and was committed
    Sample,
    /// A line arrived but was rejected
    Rejected,
    /// A read timed out; carries the current streak length
    Timeout { consecutive: u32 },
    /// Hard read error or end of stream
    IoError,
    /// Port reopened and start command sent
    Reconnected,
}

/// Next state after `event`, given the stale threshold.
pub fn next_state(current: LinkState, event: LinkEvent, stale_after: u32) -> LinkState {
    match (current, event) {
        (_, LinkEvent::IoError) => LinkState::Disconnected,
        (_, LinkEvent::Reconnected) => LinkState::Connected,
        (LinkState::Disconnected, _) => LinkState::Disconnected,
        (_, LinkEvent::Sample) => LinkState::Connected,
        (LinkState::Connected, LinkEvent::Timeout { consecutive }) if consecutive >= stale_after => {
            LinkState::Stale
        }
        (state, _) => state,
    }
}
