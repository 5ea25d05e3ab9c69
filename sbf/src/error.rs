use core::fmt;

/// Error that is possible during frame parsing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParserError {
    InvalidChecksum {
        expect: u16,
        got: u16,
    },
    /// Declared frame length smaller than the 8-byte header, so there are
    /// not enough bytes to checksum.
    TruncatedFrame {
        length: u16,
    },
    /// Payload shorter than the fixed layout of the block.
    InvalidBlockLen {
        block: &'static str,
        expect: usize,
        got: usize,
    },
}

impl fmt::Display for ParserError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParserError::InvalidChecksum { expect, got } => write!(
                f,
                "Not valid frame checksum, expect {:x}, got {:x}",
                expect, got
            ),
            ParserError::TruncatedFrame { length } => {
                write!(f, "Frame length {} too short for the header", length)
            },
            ParserError::InvalidBlockLen { block, expect, got } => write!(
                f,
                "Invalid block({}) length, expect {}, got {}",
                block, expect, got
            ),
        }
    }
}

impl std::error::Error for ParserError {}

/// Reason the receiver is not ready for the vehicle to arm.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArmingError {
    DiskUnmounted,
    DiskFull,
    NotLogging,
}

impl fmt::Display for ArmingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ArmingError::DiskUnmounted => f.write_str("receiver disk is not mounted"),
            ArmingError::DiskFull => f.write_str("receiver disk is full"),
            ArmingError::NotLogging => f.write_str("receiver is not currently logging"),
        }
    }
}

impl std::error::Error for ArmingError {}
