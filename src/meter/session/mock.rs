// src/meter/session/mock.rs

//! Scripted transport with a simulated clock for session tests.

use super::Session;
use crate::common::hal_traits::{MeterSerial, MeterTimer};
use crate::meter::SessionConfig;
use core::time::Duration;
use nb::Result as NbResult;
use std::cell::Cell;
use std::collections::VecDeque;
use std::rc::Rc;
use std::vec::Vec;

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct MockInstant(pub u64);
impl core::ops::Sub<MockInstant> for MockInstant {
    type Output = Duration;
    fn sub(self, rhs: MockInstant) -> Duration {
        Duration::from_micros(self.0.saturating_sub(rhs.0))
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct MockCommError;

/// Bytes become readable at scheduled times. Each completed command write
/// (one ending in `\r`) pops the next scripted reply and schedules its
/// chunks relative to the moment of the write.
#[derive(Debug, Default)]
pub struct MockInterface {
    pub now_us: u64,
    pub rx: Vec<u8>,
    scheduled: Vec<(u64, Vec<u8>)>,
    replies: VecDeque<Vec<(u64, Vec<u8>)>>,
    pub written: Vec<u8>,
    pub blocked_writes: u32,
    pub max_write_chunk: Option<usize>,
    pub fail_reads: bool,
    /// Reports bytes as available but never hands any out.
    pub stalled_reads: bool,
    pub fail_writes: bool,
    pub fail_close: bool,
    pub closes: Rc<Cell<u32>>,
}

impl MockInterface {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the reply to the next command: `(delay_us, bytes)` chunks.
    pub fn reply(&mut self, chunks: &[(u64, &str)]) {
        self.replies.push_back(
            chunks
                .iter()
                .map(|(delay, text)| (*delay, text.as_bytes().to_vec()))
                .collect(),
        );
    }

    /// Like [`reply`](Self::reply), for replies that are not valid text.
    pub fn reply_raw(&mut self, chunks: Vec<(u64, Vec<u8>)>) {
        self.replies.push_back(chunks);
    }

    /// Bytes that are already waiting before anything is written.
    pub fn stage_stale(&mut self, bytes: &[u8]) {
        self.rx.extend_from_slice(bytes);
    }

    pub fn written_str(&self) -> &str {
        core::str::from_utf8(&self.written).unwrap()
    }

    fn release(&mut self) {
        let now = self.now_us;
        let (ready, later): (Vec<_>, Vec<_>) = core::mem::take(&mut self.scheduled)
            .into_iter()
            .partition(|(at, _)| *at <= now);
        for (_, bytes) in ready {
            self.rx.extend(bytes);
        }
        self.scheduled = later;
    }

    fn schedule_next_reply(&mut self) {
        if let Some(chunks) = self.replies.pop_front() {
            for (delay, bytes) in chunks {
                self.scheduled.push((self.now_us + delay, bytes));
            }
            self.scheduled.sort_by_key(|(at, _)| *at);
        }
    }
}

impl MeterTimer for MockInterface {
    type Instant = MockInstant;
    fn now(&self) -> Self::Instant {
        MockInstant(self.now_us)
    }
    fn delay_us(&mut self, us: u32) {
        self.now_us += us as u64;
    }
    fn delay_ms(&mut self, ms: u32) {
        self.now_us += (ms as u64) * 1000;
    }
}

impl MeterSerial for MockInterface {
    type Error = MockCommError;

    fn bytes_available(&mut self) -> Result<usize, Self::Error> {
        if self.fail_reads {
            return Err(MockCommError);
        }
        self.release();
        Ok(self.rx.len())
    }

    fn read_available(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error> {
        if self.fail_reads {
            return Err(MockCommError);
        }
        self.release();
        if self.stalled_reads {
            return Ok(0);
        }
        let n = buffer.len().min(self.rx.len());
        buffer[..n].copy_from_slice(&self.rx[..n]);
        self.rx.drain(..n);
        Ok(n)
    }

    fn write(&mut self, bytes: &[u8]) -> NbResult<usize, Self::Error> {
        if self.fail_writes {
            return Err(nb::Error::Other(MockCommError));
        }
        if self.blocked_writes > 0 {
            self.blocked_writes -= 1;
            return Err(nb::Error::WouldBlock);
        }
        let n = self.max_write_chunk.map_or(bytes.len(), |max| max.min(bytes.len()));
        self.written.extend_from_slice(&bytes[..n]);
        if self.written.ends_with(b"\r") {
            self.schedule_next_reply();
        }
        Ok(n)
    }

    fn close(&mut self) -> Result<(), Self::Error> {
        self.closes.set(self.closes.get() + 1);
        if self.fail_close {
            Err(MockCommError)
        } else {
            Ok(())
        }
    }
}

/// Fast timings for tests.
pub fn test_config() -> SessionConfig {
    SessionConfig::default()
        .with_timeout(Duration::from_millis(50))
        .with_settle_delay(Duration::from_secs(1))
        .with_poll_interval(Duration::from_micros(100))
}

/// A session that skips the settle delay and handshake.
pub fn session(interface: MockInterface) -> Session<MockInterface> {
    Session {
        interface,
        config: test_config(),
        is_open: true,
    }
}
