// src/common/timing.rs

use core::time::Duration;

// === Line settings ===

/// Baud rate the 2936 uses on its RS-232/USB serial interface (8N1).
pub const BAUD_RATE: u32 = 38_400;

// === Session timing ===

/// The meter ignores commands for roughly a second after the line opens.
pub const SETTLE_DELAY: Duration = Duration::from_secs(1);

/// Default deadline for one command/response exchange.
pub const EXCHANGE_TIMEOUT: Duration = Duration::from_secs(2);

/// Pause between polls of the receive buffer while an exchange is pending.
/// Round-trips are tens of milliseconds, so this only keeps the loop off 100% CPU.
pub const POLL_INTERVAL: Duration = Duration::from_micros(100);

// === Framing ===

/// Terminator the meter expects at the end of every command it receives.
pub const COMMAND_TERMINATOR: char = '\r';

/// Terminator the meter puts after the payload of a reply.
pub const REPLY_TERMINATOR: &str = "\n";
