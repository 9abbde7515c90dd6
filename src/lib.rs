// src/lib.rs

//! Driver for the Newport 2936 dual-channel optical power meter.
//!
//! The meter speaks a line-oriented ASCII protocol at 38400 baud. Every
//! command is echoed before any answer, and `PM:PWS?` returns the value and
//! a hex status register for both channels:
//!
//! ```text
//! -> PM:PWS?\r
//! <- PM:PWS?\r1.2e-03 128 3.4e-04 10A\n
//! ```
//!
//! [`Session`] owns a transport implementing [`MeterSerial`] and
//! [`MeterTimer`], performs the `ECHO 1` handshake on open and turns each
//! reply into a [`Reading`]. With the `serial` feature,
//! [`serial::SerialTransport`] provides a transport over a host serial port.

#![cfg_attr(not(any(test, feature = "std")), no_std)]

extern crate alloc;

pub mod common;
pub mod meter;
#[cfg(feature = "serial")]
pub mod serial;

// Re-export key types for convenience
pub use common::{ChannelStatus, FormatError, MeterError, MeterSerial, MeterTimer, Reading};
pub use meter::{Session, SessionConfig};
