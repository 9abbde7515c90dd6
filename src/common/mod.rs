// src/common/mod.rs

// --- Declare all public modules within common ---
pub mod command;
pub mod error;
pub mod frame;
pub mod hal_traits;
pub mod response;
pub mod status;
pub mod timing;

// --- Re-export key types/traits/functions for easier access ---

pub use command::{Command, CommandBuffer, COMMAND_CAPACITY};
pub use error::{CommandTooLong, FormatError, MeterError};
pub use frame::{EchoFrame, FrameState};
pub use hal_traits::{MeterInstant, MeterSerial, MeterTimer};
pub use response::{parse_reading, Reading};
pub use status::{decode_status, ChannelStatus, StatusFlags};
