//! Block catalog: maps a block id to a borrowed view over its payload.
//!
//! Each `*Ref` type wraps the raw payload bytes and exposes typed accessors
//! at fixed little-endian offsets. Construction checks the payload is at
//! least as long as the fixed part of the layout; accessors can then index
//! without further checks.

use crate::checksum::block_crc;
use crate::constants::{BLOCK_ID_MASK, SBF_HEADER_LEN, SBF_PREAMBLE1, SBF_PREAMBLE2};
use crate::error::ParserError;

pub const PVT_GEODETIC: u16 = 4007;
pub const INS_NAV_GEOD: u16 = 4226;
pub const ATT_EULER: u16 = 5938;
pub const ATT_COV_EULER: u16 = 5939;
pub const DOP: u16 = 4001;
pub const RECEIVER_STATUS: u16 = 4014;
pub const VEL_COV_GEODETIC: u16 = 5908;

fn read_u16(b: &[u8], off: usize) -> u16 {
    u16::from_le_bytes([b[off], b[off + 1]])
}

fn read_u32(b: &[u8], off: usize) -> u32 {
    let mut buf = [0; 4];
    buf.copy_from_slice(&b[off..off + 4]);
    u32::from_le_bytes(buf)
}

fn read_f32(b: &[u8], off: usize) -> f32 {
    let mut buf = [0; 4];
    buf.copy_from_slice(&b[off..off + 4]);
    f32::from_le_bytes(buf)
}

fn read_f64(b: &[u8], off: usize) -> f64 {
    let mut buf = [0; 8];
    buf.copy_from_slice(&b[off..off + 8]);
    f64::from_le_bytes(buf)
}

macro_rules! block_ref {
    ($name:ident, $label:literal, $min_len:literal) => {
        #[derive(Debug, Clone, Copy)]
        pub struct $name<'a>(&'a [u8]);

        impl<'a> $name<'a> {
            pub const MIN_LEN: usize = $min_len;

            pub fn new(payload: &'a [u8]) -> Result<Self, ParserError> {
                if payload.len() < Self::MIN_LEN {
                    return Err(ParserError::InvalidBlockLen {
                        block: $label,
                        expect: Self::MIN_LEN,
                        got: payload.len(),
                    });
                }
                Ok(Self(payload))
            }
        }
    };
}

block_ref!(PvtGeodeticRef, "PvtGeodetic", 88);

/// Position, velocity and time solution in geodetic coordinates
impl PvtGeodeticRef<'_> {
    pub fn tow(&self) -> u32 {
        read_u32(self.0, 0)
    }
    /// GPS week number, 65535 when unknown
    pub fn wnc(&self) -> u16 {
        read_u16(self.0, 4)
    }
    /// PVT mode: solution type in the low nibble, override flags above
    pub fn mode(&self) -> u8 {
        self.0[6]
    }
    pub fn error(&self) -> u8 {
        self.0[7]
    }
    /// Latitude in radians
    pub fn latitude(&self) -> f64 {
        read_f64(self.0, 8)
    }
    /// Longitude in radians
    pub fn longitude(&self) -> f64 {
        read_f64(self.0, 16)
    }
    /// Ellipsoidal height in meters
    pub fn height(&self) -> f64 {
        read_f64(self.0, 24)
    }
    /// Geoid undulation in meters
    pub fn undulation(&self) -> f32 {
        read_f32(self.0, 32)
    }
    /// North velocity (m/s)
    pub fn vn(&self) -> f32 {
        read_f32(self.0, 36)
    }
    /// East velocity (m/s)
    pub fn ve(&self) -> f32 {
        read_f32(self.0, 40)
    }
    /// Up velocity (m/s)
    pub fn vu(&self) -> f32 {
        read_f32(self.0, 44)
    }
    /// Course over ground (degrees)
    pub fn cog(&self) -> f32 {
        read_f32(self.0, 48)
    }
    pub fn rx_clk_bias(&self) -> f64 {
        read_f64(self.0, 52)
    }
    pub fn rx_clk_drift(&self) -> f32 {
        read_f32(self.0, 60)
    }
    pub fn time_system(&self) -> u8 {
        self.0[64]
    }
    pub fn datum(&self) -> u8 {
        self.0[65]
    }
    /// Satellites used in the solution, 255 when unknown
    pub fn nr_sv(&self) -> u8 {
        self.0[66]
    }
    pub fn reference_id(&self) -> u16 {
        read_u16(self.0, 68)
    }
    /// Age of differential corrections, 10 ms units
    pub fn mean_corr_age(&self) -> u16 {
        read_u16(self.0, 70)
    }
    /// Twice the rms horizontal error, in cm
    pub fn h_accuracy(&self) -> u16 {
        read_u16(self.0, 82)
    }
    /// Twice the rms vertical error, in cm
    pub fn v_accuracy(&self) -> u16 {
        read_u16(self.0, 84)
    }
}

block_ref!(InsNavGeodRef, "InsNavGeod", 60);

/// Inertial-aided navigation solution in geodetic coordinates
impl InsNavGeodRef<'_> {
    pub fn tow(&self) -> u32 {
        read_u32(self.0, 0)
    }
    pub fn wnc(&self) -> u16 {
        read_u16(self.0, 4)
    }
    pub fn mode(&self) -> u8 {
        self.0[6]
    }
    pub fn error(&self) -> u8 {
        self.0[7]
    }
    /// Latitude in radians
    pub fn latitude(&self) -> f64 {
        read_f64(self.0, 8)
    }
    /// Longitude in radians
    pub fn longitude(&self) -> f64 {
        read_f64(self.0, 16)
    }
    /// Ellipsoidal height in meters
    pub fn height(&self) -> f64 {
        read_f64(self.0, 24)
    }
    pub fn undulation(&self) -> f32 {
        read_f32(self.0, 32)
    }
    pub fn vn(&self) -> f32 {
        read_f32(self.0, 36)
    }
    pub fn ve(&self) -> f32 {
        read_f32(self.0, 40)
    }
    pub fn vu(&self) -> f32 {
        read_f32(self.0, 44)
    }
    /// Heading (degrees)
    pub fn heading(&self) -> f32 {
        read_f32(self.0, 48)
    }
    pub fn pitch(&self) -> f32 {
        read_f32(self.0, 52)
    }
    pub fn roll(&self) -> f32 {
        read_f32(self.0, 56)
    }
}

block_ref!(AttEulerRef, "AttEuler", 36);

/// Dual-antenna attitude, Euler angles
impl AttEulerRef<'_> {
    pub fn tow(&self) -> u32 {
        read_u32(self.0, 0)
    }
    pub fn wnc(&self) -> u16 {
        read_u16(self.0, 4)
    }
    pub fn nr_sv(&self) -> u8 {
        self.0[6]
    }
    pub fn error(&self) -> u8 {
        self.0[7]
    }
    pub fn mode(&self) -> u16 {
        read_u16(self.0, 8)
    }
    /// Heading (degrees)
    pub fn heading(&self) -> f32 {
        read_f32(self.0, 12)
    }
    pub fn pitch(&self) -> f32 {
        read_f32(self.0, 16)
    }
    pub fn roll(&self) -> f32 {
        read_f32(self.0, 20)
    }
}

block_ref!(AttCovEulerRef, "AttCovEuler", 32);

/// Covariance of the dual-antenna attitude
impl AttCovEulerRef<'_> {
    pub fn tow(&self) -> u32 {
        read_u32(self.0, 0)
    }
    pub fn wnc(&self) -> u16 {
        read_u16(self.0, 4)
    }
    pub fn error(&self) -> u8 {
        self.0[7]
    }
    /// Heading variance (degrees squared)
    pub fn cov_head_head(&self) -> f32 {
        read_f32(self.0, 8)
    }
    pub fn cov_pitch_pitch(&self) -> f32 {
        read_f32(self.0, 12)
    }
    pub fn cov_roll_roll(&self) -> f32 {
        read_f32(self.0, 16)
    }
}

block_ref!(DopRef, "Dop", 24);

/// Dilution of precision
impl DopRef<'_> {
    pub fn tow(&self) -> u32 {
        read_u32(self.0, 0)
    }
    pub fn wnc(&self) -> u16 {
        read_u16(self.0, 4)
    }
    pub fn nr_sv(&self) -> u8 {
        self.0[6]
    }
    /// Position DOP, 0.01 units
    pub fn pdop(&self) -> u16 {
        read_u16(self.0, 8)
    }
    /// Time DOP, 0.01 units
    pub fn tdop(&self) -> u16 {
        read_u16(self.0, 10)
    }
    /// Horizontal DOP, 0.01 units
    pub fn hdop(&self) -> u16 {
        read_u16(self.0, 12)
    }
    /// Vertical DOP, 0.01 units
    pub fn vdop(&self) -> u16 {
        read_u16(self.0, 14)
    }
    pub fn hpl(&self) -> f32 {
        read_f32(self.0, 16)
    }
    pub fn vpl(&self) -> f32 {
        read_f32(self.0, 20)
    }
}

block_ref!(ReceiverStatusRef, "ReceiverStatus", 24);

/// Overall receiver status: activity and error bitmasks
impl ReceiverStatusRef<'_> {
    pub fn tow(&self) -> u32 {
        read_u32(self.0, 0)
    }
    pub fn wnc(&self) -> u16 {
        read_u16(self.0, 4)
    }
    pub fn cpu_load(&self) -> u8 {
        self.0[6]
    }
    pub fn up_time(&self) -> u32 {
        read_u32(self.0, 8)
    }
    pub fn rx_state(&self) -> u32 {
        read_u32(self.0, 12)
    }
    pub fn rx_error(&self) -> u32 {
        read_u32(self.0, 16)
    }
}

block_ref!(VelCovGeodeticRef, "VelCovGeodetic", 48);

/// Covariance of the geodetic velocity solution
impl VelCovGeodeticRef<'_> {
    pub fn tow(&self) -> u32 {
        read_u32(self.0, 0)
    }
    pub fn wnc(&self) -> u16 {
        read_u16(self.0, 4)
    }
    pub fn mode(&self) -> u8 {
        self.0[6]
    }
    /// North velocity variance (m²/s²)
    pub fn cov_vn_vn(&self) -> f32 {
        read_f32(self.0, 8)
    }
    /// East velocity variance (m²/s²)
    pub fn cov_ve_ve(&self) -> f32 {
        read_f32(self.0, 12)
    }
    /// Up velocity variance (m²/s²)
    pub fn cov_vu_vu(&self) -> f32 {
        read_f32(self.0, 16)
    }
}

/// One decoded block, selected by the low 13 bits of the block id.
#[derive(Debug, Clone, Copy)]
pub enum BlockRef<'a> {
    PvtGeodetic(PvtGeodeticRef<'a>),
    InsNavGeod(InsNavGeodRef<'a>),
    AttEuler(AttEulerRef<'a>),
    AttCovEuler(AttCovEulerRef<'a>),
    Dop(DopRef<'a>),
    ReceiverStatus(ReceiverStatusRef<'a>),
    VelCovGeodetic(VelCovGeodeticRef<'a>),
    /// Structurally accepted but not part of the catalog.
    Unknown(u16),
}

/// Select the block view matching `block_id`. Unknown ids are accepted and
/// mapped to [`BlockRef::Unknown`]; only catalog blocks whose payload is too
/// short for their layout are an error.
pub fn match_block(block_id: u16, payload: &[u8]) -> Result<BlockRef<'_>, ParserError> {
    let id = block_id & BLOCK_ID_MASK;
    Ok(match id {
        PVT_GEODETIC => BlockRef::PvtGeodetic(PvtGeodeticRef::new(payload)?),
        INS_NAV_GEOD => BlockRef::InsNavGeod(InsNavGeodRef::new(payload)?),
        ATT_EULER => BlockRef::AttEuler(AttEulerRef::new(payload)?),
        ATT_COV_EULER => BlockRef::AttCovEuler(AttCovEulerRef::new(payload)?),
        DOP => BlockRef::Dop(DopRef::new(payload)?),
        RECEIVER_STATUS => BlockRef::ReceiverStatus(ReceiverStatusRef::new(payload)?),
        VEL_COV_GEODETIC => BlockRef::VelCovGeodetic(VelCovGeodeticRef::new(payload)?),
        _ => BlockRef::Unknown(id),
    })
}

/// Encode one complete frame around `payload`: preamble, checksum, block id
/// and length header. The payload is zero-padded to the 4-byte alignment the
/// wire format requires. Useful for receiver simulators and tests.
pub fn encode_frame(block_id: u16, payload: &[u8]) -> Vec<u8> {
    let padding = (4 - payload.len() % 4) % 4;
    let length = SBF_HEADER_LEN + (payload.len() + padding) as u16;

    let mut padded = payload.to_vec();
    padded.resize(payload.len() + padding, 0);
    let crc = block_crc(block_id, length, &padded);

    let mut frame = Vec::with_capacity(usize::from(length));
    frame.push(SBF_PREAMBLE1);
    frame.push(SBF_PREAMBLE2);
    frame.extend_from_slice(&crc.to_le_bytes());
    frame.extend_from_slice(&block_id.to_le_bytes());
    frame.extend_from_slice(&length.to_le_bytes());
    frame.extend_from_slice(&padded);
    frame
}
