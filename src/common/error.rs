// src/common/error.rs

use alloc::boxed::Box;
use alloc::string::String;
use core::fmt::Debug;

/// Errors produced while turning a device reply into typed data.
///
/// These never involve the transport, so they carry no generic parameter and
/// can be produced by the pure decoding functions on their own.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    /// The measurement reply did not split into exactly four fields.
    #[error("Returned improper value: {payload:?} ({found} fields, expected 4)")]
    ImproperFieldCount { found: usize, payload: String },

    /// A measurement field could not be parsed as a floating-point number.
    #[error("Invalid measurement value: {0:?}")]
    InvalidValue(String),

    /// A status field has fewer than the three hex digits the bit layout needs.
    #[error("Status token {0:?} is shorter than 3 hex digits")]
    StatusTooShort(String),

    /// A status field contains a character that is not a hex digit.
    #[error("Invalid hex digit {digit:?} in status token {token:?}")]
    InvalidStatusDigit { token: String, digit: char },

    /// The bytes following the echo are not valid UTF-8.
    #[error("Response is not valid UTF-8")]
    InvalidUtf8,
}

/// A command that does not fit the fixed-size command buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Command of {len} bytes exceeds the {capacity} byte command buffer")]
pub struct CommandTooLong {
    pub len: usize,
    pub capacity: usize,
}

/// Top-level error for everything a [`Session`](crate::meter::Session) can report.
///
/// `E` is the error type of the underlying transport.
#[derive(Debug, thiserror::Error)]
pub enum MeterError<E = ()>
where
    E: Debug,
{
    /// Underlying transport failure. Fatal to the session, never retried.
    #[error("Transport error: {0:?}")]
    Io(E),

    /// No valid frame was assembled before the deadline.
    #[error("Timeout reading back serial command from message: {command:?}; partial return: {partial:?}")]
    Timeout { command: String, partial: String },

    /// The device answered, but the answer could not be decoded.
    #[error("Malformed response: {0}")]
    Format(#[from] FormatError),

    /// The command could not be formatted for the wire.
    #[error("Command formatting failed: {0}")]
    Command(#[from] CommandTooLong),

    /// The echo handshake failed on both attempts. Holds the second failure.
    #[error("Echo handshake failed after one retry")]
    SessionInit(Box<MeterError<E>>),

    /// The session has already released its transport.
    #[error("Session is closed")]
    Closed,
}

impl<E: Debug> MeterError<E> {
    /// True for failures that a caller may reasonably retry with a fresh query.
    pub fn is_recoverable(&self) -> bool {
        matches!(self, MeterError::Timeout { .. } | MeterError::Format(_))
    }
}
