// src/meter/config.rs

use core::time::Duration;

use crate::common::timing;

/// Tunables for a [`Session`](super::Session).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionConfig {
    /// Deadline for each command/response exchange, including the handshake.
    pub timeout: Duration,
    /// Wait after taking over the line before the first command.
    pub settle_delay: Duration,
    /// Pause between polls of the receive buffer.
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            timeout: timing::EXCHANGE_TIMEOUT,
            settle_delay: timing::SETTLE_DELAY,
            poll_interval: timing::POLL_INTERVAL,
        }
    }
}

impl SessionConfig {
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_settle_delay(mut self, settle_delay: Duration) -> Self {
        self.settle_delay = settle_delay;
        self
    }

    pub fn with_poll_interval(mut self, poll_interval: Duration) -> Self {
        self.poll_interval = poll_interval;
        self
    }

    pub(crate) fn settle_delay_ms(&self) -> u32 {
        u32::try_from(self.settle_delay.as_millis()).unwrap_or(u32::MAX)
    }

    pub(crate) fn poll_interval_us(&self) -> u32 {
        u32::try_from(self.poll_interval.as_micros()).unwrap_or(u32::MAX)
    }
}
