// src/common/frame.rs

use alloc::string::String;
use alloc::vec::Vec;
use core::str;

use super::error::FormatError;

/// Progress of one echo-framed exchange.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub enum FrameState {
    /// The buffer does not yet hold the full echo plus at least one more byte.
    AwaitingEcho,
    /// Echo seen, but the remainder is not an acceptable reply yet.
    AwaitingAnswer,
    /// A reply has been accepted; further input is ignored.
    Complete,
}

/// Accumulates received bytes for one command and decides when the reply is
/// complete.
///
/// The meter echoes every command verbatim before anything else. A command
/// without `?` is answered by the echo and the terminator alone. A query may
/// produce the echo and a bare terminator before the answer body, so for
/// queries the remainder after the echo must be longer than one byte.
#[derive(Debug, Clone)]
pub struct EchoFrame<'a> {
    command: &'a [u8],
    terminator: &'a [u8],
    requires_answer: bool,
    buffer: Vec<u8>,
    state: FrameState,
}

impl<'a> EchoFrame<'a> {
    /// `command` is the normalized wire text, including its trailing `\r`.
    pub fn new(command: &'a str, terminator: &'a str) -> Self {
        EchoFrame {
            command: command.as_bytes(),
            terminator: terminator.as_bytes(),
            requires_answer: command.contains('?'),
            buffer: Vec::new(),
            state: FrameState::AwaitingEcho,
        }
    }

    pub fn requires_answer(&self) -> bool {
        self.requires_answer
    }

    pub fn state(&self) -> FrameState {
        self.state
    }

    /// Appends a chunk of received bytes and re-evaluates the frame.
    pub fn feed(&mut self, chunk: &[u8]) -> FrameState {
        if self.state != FrameState::Complete {
            self.buffer.extend_from_slice(chunk);
            self.state = self.evaluate();
        }
        self.state
    }

    fn evaluate(&self) -> FrameState {
        let Some(rest) = self.buffer.strip_prefix(self.command) else {
            return FrameState::AwaitingEcho;
        };
        if rest.is_empty() {
            return FrameState::AwaitingEcho;
        }
        if rest.ends_with(self.terminator) && (!self.requires_answer || rest.len() > 1) {
            FrameState::Complete
        } else {
            FrameState::AwaitingAnswer
        }
    }

    /// Everything received so far, echo included, for diagnostics.
    pub fn partial(&self) -> String {
        String::from_utf8_lossy(&self.buffer).into_owned()
    }

    /// The reply with the echo stripped and surrounding whitespace trimmed.
    ///
    /// Only meaningful once the frame is [`FrameState::Complete`].
    pub fn payload(&self) -> Result<&str, FormatError> {
        let rest = self.buffer.get(self.command.len()..).unwrap_or_default();
        str::from_utf8(rest)
            .map(str::trim)
            .map_err(|_| FormatError::InvalidUtf8)
    }
}
