pub const SBF_PREAMBLE1: u8 = 0x24; // '$'
pub const SBF_PREAMBLE2: u8 = 0x40; // '@'

/// Second byte of a "$R" command response, in place of [`SBF_PREAMBLE2`].
pub const RESPONSE_MARKER: u8 = b'R';

/// Frame header: preamble (2) + crc (2) + block id (2) + length (2).
pub const SBF_HEADER_LEN: u16 = 8;

/// Fixed capacity of the shared payload buffer. Blocks larger than this are
/// consumed from the stream but dropped.
pub const MAX_PAYLOAD_LEN: usize = 256;

/// Low 13 bits of the block id field; the upper 3 bits are revision flags.
pub const BLOCK_ID_MASK: u16 = 8191;

/// Sentinel for "value not provided". A field is usable only when strictly
/// greater than this.
pub const DO_NOT_USE: f64 = -2.0e10;

pub(crate) const UNKNOWN_WEEK: u16 = 65535;
pub(crate) const UNKNOWN_SV_COUNT: u8 = 255;

/// First byte of an accepted command echo line.
pub(crate) const COMMAND_OK: u8 = b':';
/// First byte of a rejected command echo line.
#[allow(dead_code, reason = "documents the protocol, checked in tests")]
pub(crate) const COMMAND_REJECTED: u8 = b'?';
