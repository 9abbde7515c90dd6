// src/meter/session/io_helpers.rs

use super::Session;
use crate::common::{
    error::MeterError,
    frame::{EchoFrame, FrameState},
    hal_traits::{MeterSerial, MeterTimer},
};
use alloc::vec;
use core::time::Duration;
use nb::Result as NbResult;
use tracing::{debug, trace};

const DRAIN_CHUNK: usize = 64;

impl<IF> Session<IF>
where
    IF: MeterSerial + MeterTimer,
{
    /// True once more than `timeout` has elapsed since `start`.
    pub(super) fn has_timed_out(&self, start: IF::Instant, timeout: Duration) -> bool {
        self.interface.now() - start > timeout
    }

    /// Executes a non-blocking I/O operation (`f`) repeatedly until it stops
    /// returning `WouldBlock`. Returns `Ok(None)` once more than `timeout`
    /// has elapsed since `start`.
    pub(super) fn execute_blocking_io_until<FN, T>(
        &mut self,
        start: IF::Instant,
        timeout: Duration,
        mut f: FN,
    ) -> Result<Option<T>, MeterError<IF::Error>>
    where
        FN: FnMut(&mut IF) -> NbResult<T, IF::Error>,
    {
        loop {
            match f(&mut self.interface) {
                Ok(result) => return Ok(Some(result)),
                Err(nb::Error::WouldBlock) => {
                    if self.has_timed_out(start, timeout) {
                        return Ok(None);
                    }
                    self.pause();
                }
                Err(nb::Error::Other(e)) => return Err(MeterError::Io(e)),
            }
        }
    }

    pub(super) fn pause(&mut self) {
        let us = self.config.poll_interval_us();
        self.interface.delay_us(us);
    }

    /// Discards whatever was already buffered when the exchange started.
    ///
    /// Nothing is pipelined, so leftover bytes can only be noise or the tail
    /// of an earlier reply.
    pub(super) fn drain_input(&mut self) -> Result<usize, MeterError<IF::Error>> {
        let stale = self.interface.bytes_available().map_err(MeterError::Io)?;
        let mut scratch = [0u8; DRAIN_CHUNK];
        let mut discarded = 0;
        while discarded < stale {
            let want = (stale - discarded).min(scratch.len());
            let n = self
                .interface
                .read_available(&mut scratch[..want])
                .map_err(MeterError::Io)?;
            if n == 0 {
                break;
            }
            discarded += n;
        }
        if discarded > 0 {
            debug!(discarded, "discarded stale input before exchange");
        }
        Ok(discarded)
    }

    /// Writes the whole command. Returns `false` if it timed out first.
    pub(super) fn send_command_bytes(
        &mut self,
        bytes: &[u8],
        start: IF::Instant,
        timeout: Duration,
    ) -> Result<bool, MeterError<IF::Error>> {
        let mut sent = 0;
        while sent < bytes.len() {
            let remaining = &bytes[sent..];
            let accepted = self.execute_blocking_io_until(start, timeout, |iface| {
                match iface.write(remaining) {
                    Ok(0) => Err(nb::Error::WouldBlock),
                    other => other,
                }
            })?;
            match accepted {
                Some(n) => sent += n.min(remaining.len()),
                None => return Ok(false),
            }
        }
        Ok(true)
    }

    /// Moves everything currently buffered into `frame`.
    ///
    /// Returns `None` when nothing was read.
    pub(super) fn read_into_frame(
        &mut self,
        frame: &mut EchoFrame<'_>,
    ) -> Result<Option<FrameState>, MeterError<IF::Error>> {
        let available = self.interface.bytes_available().map_err(MeterError::Io)?;
        if available == 0 {
            return Ok(None);
        }
        let mut chunk = vec![0u8; available];
        let n = self
            .interface
            .read_available(&mut chunk)
            .map_err(MeterError::Io)?;
        if n == 0 {
            return Ok(None);
        }
        chunk.truncate(n);
        trace!(len = n, "received bytes");
        Ok(Some(frame.feed(&chunk)))
    }
}
