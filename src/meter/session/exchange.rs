// src/meter/session/exchange.rs

use super::Session;
use crate::common::{
    command::{Command, CommandBuffer},
    error::MeterError,
    frame::{EchoFrame, FrameState},
    hal_traits::{MeterSerial, MeterTimer},
    timing,
};
use alloc::string::{String, ToString};
use core::time::Duration;
use tracing::{debug, trace};

impl<IF> Session<IF>
where
    IF: MeterSerial + MeterTimer,
{
    /// Sends `command` and returns the trimmed reply that follows its echo.
    ///
    /// A trailing `\r` is added if missing. Commands without `?` succeed as
    /// soon as the echo and the `\n` terminator have arrived; queries wait
    /// for a non-empty payload.
    pub fn exchange(
        &mut self,
        command: &str,
        timeout: Duration,
    ) -> Result<String, MeterError<IF::Error>> {
        self.exchange_with_terminator(command, timeout, timing::REPLY_TERMINATOR)
    }

    /// Like [`exchange`](Self::exchange), with a caller-chosen reply terminator.
    pub fn exchange_with_terminator(
        &mut self,
        command: &str,
        timeout: Duration,
        terminator: &str,
    ) -> Result<String, MeterError<IF::Error>> {
        self.ensure_open()?;
        self.execute_exchange(Command::Raw(command), timeout, terminator)
    }

    /// One full command/response cycle. Nothing is retried here.
    pub(super) fn execute_exchange(
        &mut self,
        command: Command<'_>,
        timeout: Duration,
        terminator: &str,
    ) -> Result<String, MeterError<IF::Error>> {
        // 1. Normalize
        let wire = command.format_into()?;

        // 2. Drop anything left over from a previous exchange
        self.drain_input()?;

        let mut frame = EchoFrame::new(wire.as_str(), terminator);
        let start = self.interface.now();
        trace!(
            command = %wire.escape_debug(),
            requires_answer = frame.requires_answer(),
            "sending command"
        );

        // 3. Send
        if !self.send_command_bytes(wire.as_bytes(), start, timeout)? {
            return Err(timeout_error(&wire, &frame));
        }

        // 4. Accumulate until the frame completes or time runs out
        loop {
            if self.has_timed_out(start, timeout) {
                let err = timeout_error(&wire, &frame);
                debug!(error = %err, "exchange timed out");
                return Err(err);
            }
            match self.read_into_frame(&mut frame)? {
                Some(FrameState::Complete) => break,
                Some(_) => {}
                None => self.pause(),
            }
        }

        let payload = frame.payload()?;
        debug!(command = %wire.escape_debug(), payload, "exchange complete");
        Ok(payload.to_string())
    }
}

fn timeout_error<E: core::fmt::Debug>(
    wire: &CommandBuffer,
    frame: &EchoFrame<'_>,
) -> MeterError<E> {
    MeterError::Timeout {
        command: wire.to_string(),
        partial: frame.partial(),
    }
}
