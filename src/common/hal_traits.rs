// src/common/hal_traits.rs

use core::fmt::Debug;
use core::ops::Sub;
use core::time::Duration;

/// A point in time as reported by a [`MeterTimer`].
///
/// Anything that is `Copy + Ord` and supports `instant - instant` qualifies,
/// which covers `std::time::Instant` as well as simple tick counters used on
/// embedded targets and in tests. Timeouts are checked as elapsed time, so
/// no instant is ever offset by a caller-supplied duration.
pub trait MeterInstant: Copy + Ord + Sub<Self, Output = Duration> {}

impl<T> MeterInstant for T where T: Copy + Ord + Sub<T, Output = Duration> {}

/// Clock and delay source used for deadlines and the post-open settle delay.
pub trait MeterTimer {
    type Instant: MeterInstant;

    /// Current time.
    fn now(&self) -> Self::Instant;

    /// Delay for at least the specified number of microseconds.
    fn delay_us(&mut self, us: u32);

    /// Delay for at least the specified number of milliseconds.
    fn delay_ms(&mut self, ms: u32);
}

/// Byte-level access to the serial line the meter is attached to.
///
/// Opening the line and configuring the baud rate happen before a value of
/// this type is handed to a session; the session owns it from then on.
pub trait MeterSerial {
    /// Associated error type for communication errors.
    type Error: Debug;

    /// Number of received bytes that can be read right now without blocking.
    fn bytes_available(&mut self) -> Result<usize, Self::Error>;

    /// Copies currently buffered bytes into `buffer` and returns how many
    /// were copied. Never blocks; `Ok(0)` means nothing was ready.
    fn read_available(&mut self, buffer: &mut [u8]) -> Result<usize, Self::Error>;

    /// Attempts to queue `bytes` for transmission.
    ///
    /// Returns the number of leading bytes accepted, or
    /// `Err(nb::Error::WouldBlock)` if the transmit buffer is full.
    fn write(&mut self, bytes: &[u8]) -> nb::Result<usize, Self::Error>;

    /// Releases the line.
    fn close(&mut self) -> Result<(), Self::Error>;
}
