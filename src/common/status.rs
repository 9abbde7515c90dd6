// src/common/status.rs

use alloc::string::{String, ToString};
use core::str::FromStr;

use super::error::FormatError;

/// Metadata carried by one status token, without the measured value.
///
/// The token is the channel status register printed in hex. The meter's
/// register layout, low bits first:
///
/// * bit 0 - channel overrange for the current range
/// * bit 1 - detector saturated
/// * bit 2 - measurement taken while the channel was ranging
/// * bit 3 - detector present
/// * bits 4-6 - channel range (see `PM:RANge?`)
/// * bits 7-8 - channel units (see `PM:UNITS?`)
#[derive(Debug, Copy, Clone, Eq, PartialEq, Hash)]
pub struct StatusFlags {
    pub units: u8,
    pub range: u8,
    pub detector_present: bool,
    pub ranging_in_progress: bool,
    pub saturated: bool,
    pub overrange: bool,
}

/// Decodes a status token such as `"128"`.
///
/// Every character must be a hex digit and at least three are required;
/// only the first three are consulted.
pub fn decode_status(token: &str) -> Result<StatusFlags, FormatError> {
    let mut digits = [0u8; 3];
    let mut count = 0;
    for c in token.chars() {
        let digit = c.to_digit(16).ok_or_else(|| FormatError::InvalidStatusDigit {
            token: token.to_string(),
            digit: c,
        })?;
        if count < digits.len() {
            digits[count] = digit as u8;
        }
        count += 1;
    }
    if count < digits.len() {
        return Err(FormatError::StatusTooShort(token.to_string()));
    }

    let [d0, d1, d2] = digits;
    Ok(StatusFlags {
        units: (d0 & 0x1) * 2 + (d1 & 0x8) / 8,
        range: d1 & 0x7,
        detector_present: (d2 & 0x8) != 0,
        ranging_in_progress: (d2 & 0x4) != 0,
        saturated: (d2 & 0x2) != 0,
        overrange: (d2 & 0x1) != 0,
    })
}

/// One channel of a reading: the measured value plus its decoded status.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ChannelStatus {
    pub value: f64,
    /// Units code, 0-3.
    pub units: u8,
    /// Range code, 0-7.
    pub range: u8,
    pub detector_present: bool,
    pub ranging_in_progress: bool,
    pub saturated: bool,
    pub overrange: bool,
}

impl ChannelStatus {
    /// Builds a channel record from its numeric token and status token.
    pub fn decode(value_token: &str, status_token: &str) -> Result<Self, FormatError> {
        let value = f64::from_str(value_token)
            .map_err(|_| FormatError::InvalidValue(String::from(value_token)))?;
        Ok(Self::from_parts(value, decode_status(status_token)?))
    }

    pub fn from_parts(value: f64, flags: StatusFlags) -> Self {
        ChannelStatus {
            value,
            units: flags.units,
            range: flags.range,
            detector_present: flags.detector_present,
            ranging_in_progress: flags.ranging_in_progress,
            saturated: flags.saturated,
            overrange: flags.overrange,
        }
    }

    pub fn flags(&self) -> StatusFlags {
        StatusFlags {
            units: self.units,
            range: self.range,
            detector_present: self.detector_present,
            ranging_in_progress: self.ranging_in_progress,
            saturated: self.saturated,
            overrange: self.overrange,
        }
    }
}
