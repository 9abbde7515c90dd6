//! Command definitions for the 2936 ASCII protocol.
//!
//! Only the two commands the session needs are named; anything else can be
//! sent as [`Command::Raw`].

use arrayvec::ArrayString;
use core::fmt;

use super::error::CommandTooLong;
use super::timing::COMMAND_TERMINATOR;

/// Capacity of the buffer a command is formatted into, terminator included.
pub const COMMAND_CAPACITY: usize = 64;

/// A command normalized for the wire.
pub type CommandBuffer = ArrayString<COMMAND_CAPACITY>;

/// A command understood by the meter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command<'a> {
    /// `ECHO 1` - makes the meter echo each command before answering.
    EnableEcho,

    /// `PM:PWS?` - reads value and status for both channels.
    ReadPowerStatus,

    /// Any other command text, with or without the trailing `\r`.
    Raw(&'a str),
}

impl<'a> Command<'a> {
    /// Command text as typed, without normalization.
    pub fn as_str(&self) -> &'a str {
        match self {
            Command::EnableEcho => "ECHO 1",
            Command::ReadPowerStatus => "PM:PWS?",
            Command::Raw(text) => text,
        }
    }

    /// Queries contain `?` and must produce a payload after the echo.
    pub fn requires_answer(&self) -> bool {
        self.as_str().contains('?')
    }

    /// Formats the command into a fixed buffer, appending `\r` if missing.
    pub fn format_into(&self) -> Result<CommandBuffer, CommandTooLong> {
        let text = self.as_str();
        let needs_terminator = !text.ends_with(COMMAND_TERMINATOR);
        let len = text.len() + usize::from(needs_terminator);
        if len > COMMAND_CAPACITY {
            return Err(CommandTooLong { len, capacity: COMMAND_CAPACITY });
        }

        let mut buffer = CommandBuffer::new();
        buffer.push_str(text);
        if needs_terminator {
            buffer.push(COMMAND_TERMINATOR);
        }
        Ok(buffer)
    }
}

impl fmt::Display for Command<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
