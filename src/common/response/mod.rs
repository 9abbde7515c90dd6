// src/common/response/mod.rs

pub mod parse;

pub use parse::parse_reading;

use crate::common::error::FormatError;
use crate::common::status::ChannelStatus;
use core::fmt;

/// Both channels of one `PM:PWS?` reply.
///
/// Only ever built from a complete, validated reply; see [`parse_reading`].
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Reading {
    pub channel_one: ChannelStatus,
    pub channel_two: ChannelStatus,
}

impl Reading {
    /// Parses a `<value1> <status1> <value2> <status2>` payload.
    pub fn parse(payload: &str) -> Result<Self, FormatError> {
        parse_reading(payload)
    }

    pub fn channels(&self) -> [ChannelStatus; 2] {
        [self.channel_one, self.channel_two]
    }
}

fn fmt_channel(f: &mut fmt::Formatter<'_>, label: &str, ch: &ChannelStatus) -> fmt::Result {
    write!(
        f,
        "{}:  Val{:.2e} Uni{} Ran{} Det{} Sat{} Ring{} Over{}",
        label,
        ch.value,
        ch.units,
        ch.range,
        u8::from(ch.detector_present),
        u8::from(ch.saturated),
        u8::from(ch.ranging_in_progress),
        u8::from(ch.overrange),
    )
}

/// One-line summary in the layout of the polling console.
impl fmt::Display for Reading {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_channel(f, "CHAN_ONE", &self.channel_one)?;
        f.write_str("  ")?;
        fmt_channel(f, "CHAN_TWO", &self.channel_two)
    }
}
