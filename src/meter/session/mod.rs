// src/meter/session/mod.rs

mod exchange;
mod io_helpers;
#[cfg(test)]
mod mock;

use crate::common::{
    command::Command,
    error::MeterError,
    hal_traits::{MeterSerial, MeterTimer},
    response::Reading,
    timing,
};
use crate::meter::config::SessionConfig;
use alloc::boxed::Box;
use tracing::{debug, warn};

/// An open connection to one power meter.
///
/// The session owns its transport for its whole lifetime and releases it
/// exactly once, either through [`close`](Self::close) or when dropped.
/// One exchange runs at a time; share a session across threads only behind
/// your own lock.
#[derive(Debug)]
pub struct Session<IF>
where
    IF: MeterSerial + MeterTimer,
{
    interface: IF,
    config: SessionConfig,
    is_open: bool,
}

impl<IF> Session<IF>
where
    IF: MeterSerial + MeterTimer,
{
    /// Takes over `interface`, waits for the meter to settle and turns on echo.
    ///
    /// The first `ECHO 1` commonly fails when the meter still has echo off,
    /// so it is sent once more before giving up with
    /// [`MeterError::SessionInit`]. The transport is released on failure.
    pub fn open(interface: IF, config: SessionConfig) -> Result<Self, MeterError<IF::Error>> {
        let mut session = Session {
            interface,
            config,
            is_open: true,
        };
        let settle_ms = session.config.settle_delay_ms();
        session.interface.delay_ms(settle_ms);
        session.enable_echo()?;
        debug!("session open");
        Ok(session)
    }

    fn enable_echo(&mut self) -> Result<(), MeterError<IF::Error>> {
        let timeout = self.config.timeout;
        if let Err(first) =
            self.execute_exchange(Command::EnableEcho, timeout, timing::REPLY_TERMINATOR)
        {
            warn!(error = %first, "echo handshake failed, retrying once");
            self.execute_exchange(Command::EnableEcho, timeout, timing::REPLY_TERMINATOR)
                .map_err(|e| MeterError::SessionInit(Box::new(e)))?;
        }
        Ok(())
    }

    /// Reads value and status of both channels with one `PM:PWS?` query.
    ///
    /// No retry; a [`Timeout`](MeterError::Timeout) or
    /// [`Format`](MeterError::Format) error may be retried by the caller.
    pub fn read_both(&mut self) -> Result<Reading, MeterError<IF::Error>> {
        self.ensure_open()?;
        let timeout = self.config.timeout;
        let payload =
            self.execute_exchange(Command::ReadPowerStatus, timeout, timing::REPLY_TERMINATOR)?;
        Ok(Reading::parse(&payload)?)
    }

    /// Releases the transport. Safe to call more than once; errors from the
    /// transport are logged and otherwise ignored.
    pub fn close(&mut self) {
        if !self.is_open {
            return;
        }
        self.is_open = false;
        match self.interface.close() {
            Ok(()) => debug!("transport released"),
            Err(e) => debug!(error = ?e, "ignoring error while releasing transport"),
        }
    }

    pub fn is_open(&self) -> bool {
        self.is_open
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Direct access to the transport, for diagnostics.
    pub fn interface_mut(&mut self) -> &mut IF {
        &mut self.interface
    }

    fn ensure_open(&self) -> Result<(), MeterError<IF::Error>> {
        if self.is_open {
            Ok(())
        } else {
            Err(MeterError::Closed)
        }
    }
}

impl<IF> Drop for Session<IF>
where
    IF: MeterSerial + MeterTimer,
{
    fn drop(&mut self) {
        self.close();
    }
}
