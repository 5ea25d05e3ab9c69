//! Incremental frame recovery from an untrusted byte stream.
//!
//! The framer is driven one byte at a time and never blocks: a byte either
//! advances the header state machine, lands in the payload buffer, or resyncs
//! the framer to [`FrameState::Preamble1`]. Every terminal outcome of a frame
//! attempt, valid or not, returns the state to `Preamble1`, so garbage input
//! can never leave the framer stuck.

use crate::checksum::block_crc;
use crate::constants::{
    MAX_PAYLOAD_LEN, RESPONSE_MARKER, SBF_HEADER_LEN, SBF_PREAMBLE1, SBF_PREAMBLE2,
};
use crate::error::ParserError;

/// One variant per byte position within the frame header.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
enum FrameState {
    #[default]
    Preamble1,
    Preamble2,
    Crc1,
    Crc2,
    BlockId1,
    BlockId2,
    Length1,
    Length2,
    Payload,
    /// ASCII sub-mode for "$R..." command responses, sharing the payload
    /// buffer with the binary path.
    CommandLine,
}

/// A completed unit recovered from the byte stream.
#[derive(Debug, PartialEq, Eq)]
pub enum FramerEvent<'a> {
    /// A CRC-valid binary block. `block_id` still carries the revision bits
    /// in its upper 3 bits.
    Block { block_id: u16, payload: &'a [u8] },
    /// A command-response line, without the leading "$R" and the trailing
    /// newline.
    CommandEcho(&'a [u8]),
}

/// Byte-at-a-time frame parser.
pub struct Framer {
    state: FrameState,
    crc: u16,
    block_id: u16,
    length: u16,
    read: usize,
    payload: [u8; MAX_PAYLOAD_LEN],
    crc_errors: u32,
}

impl Default for Framer {
    fn default() -> Self {
        Self::new()
    }
}

impl Framer {
    pub const fn new() -> Self {
        Self {
            state: FrameState::Preamble1,
            crc: 0,
            block_id: 0,
            length: 0,
            read: 0,
            payload: [0; MAX_PAYLOAD_LEN],
            crc_errors: 0,
        }
    }

    /// Number of frames dropped for checksum mismatch or truncated length.
    pub fn crc_error_count(&self) -> u32 {
        self.crc_errors
    }

    /// Re-arm the preamble search. Safe to call mid-stream.
    pub fn reset(&mut self) {
        self.state = FrameState::Preamble1;
        self.read = 0;
    }

    /// Consume one byte. Returns a completed block or echo line once all of
    /// its bytes have been seen, an error for integrity violations, and
    /// `None` otherwise (including silent resynchronization).
    pub fn consume(&mut self, byte: u8) -> Option<Result<FramerEvent<'_>, ParserError>> {
        match self.state {
            FrameState::Preamble1 => {
                if byte == SBF_PREAMBLE1 {
                    self.state = FrameState::Preamble2;
                    self.read = 0;
                }
            },
            FrameState::Preamble2 => {
                self.state = match byte {
                    SBF_PREAMBLE2 => FrameState::Crc1,
                    RESPONSE_MARKER => FrameState::CommandLine,
                    _ => FrameState::Preamble1,
                };
            },
            FrameState::Crc1 => {
                self.crc = u16::from(byte);
                self.state = FrameState::Crc2;
            },
            FrameState::Crc2 => {
                self.crc |= u16::from(byte) << 8;
                self.state = FrameState::BlockId1;
            },
            FrameState::BlockId1 => {
                self.block_id = u16::from(byte);
                self.state = FrameState::BlockId2;
            },
            FrameState::BlockId2 => {
                self.block_id |= u16::from(byte) << 8;
                self.state = FrameState::Length1;
            },
            FrameState::Length1 => {
                self.length = u16::from(byte);
                self.state = FrameState::Length2;
            },
            FrameState::Length2 => {
                self.length |= u16::from(byte) << 8;
                if self.length < SBF_HEADER_LEN {
                    // not enough bytes to checksum, probably a truncation
                    self.crc_errors += 1;
                    self.state = FrameState::Preamble1;
                    return Some(Err(ParserError::TruncatedFrame {
                        length: self.length,
                    }));
                }
                if self.length % 4 != 0 {
                    self.state = FrameState::Preamble1;
                    return None;
                }
                if self.length == SBF_HEADER_LEN {
                    // empty payload, the frame is already complete
                    self.state = FrameState::Preamble1;
                    return Some(self.finish_block());
                }
                self.state = FrameState::Payload;
            },
            FrameState::Payload => {
                if self.read < MAX_PAYLOAD_LEN {
                    self.payload[self.read] = byte;
                }
                self.read += 1;
                if self.read >= usize::from(self.length - SBF_HEADER_LEN) {
                    self.state = FrameState::Preamble1;
                    if self.read > MAX_PAYLOAD_LEN {
                        // structurally consumed so we stay in sync, but too
                        // large to be one of ours
                        return None;
                    }
                    return Some(self.finish_block());
                }
            },
            FrameState::CommandLine => {
                if self.read >= MAX_PAYLOAD_LEN {
                    // no room left to compare the echo, ignore the line
                    self.state = FrameState::Preamble1;
                    return None;
                }
                self.payload[self.read] = byte;
                self.read += 1;
                if byte == b'\n' {
                    self.state = FrameState::Preamble1;
                    return Some(Ok(FramerEvent::CommandEcho(&self.payload[..self.read - 1])));
                }
            },
        }
        None
    }

    fn finish_block(&mut self) -> Result<FramerEvent<'_>, ParserError> {
        let len = usize::from(self.length - SBF_HEADER_LEN);
        let crc = block_crc(self.block_id, self.length, &self.payload[..len]);
        if crc != self.crc {
            self.crc_errors += 1;
            return Err(ParserError::InvalidChecksum {
                expect: self.crc,
                got: crc,
            });
        }
        Ok(FramerEvent::Block {
            block_id: self.block_id,
            payload: &self.payload[..len],
        })
    }
}
