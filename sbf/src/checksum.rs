//! SBF block checksum: CRC-16/CCITT (XMODEM variant, poly 0x1021, init 0),
//! chained over block id, length and payload in that order.

const CRC_POLY: u16 = 0x1021;

/// Streaming CRC-16/CCITT calculator supporting both per-byte and
/// single-shot use.
#[derive(Default)]
pub struct Crc16 {
    crc: u16,
}

impl Crc16 {
    pub const fn new() -> Self {
        Self { crc: 0 }
    }

    /// Update checksum with new bytes
    pub const fn update(&mut self, bytes: &[u8]) {
        let mut i = 0;
        while i < bytes.len() {
            self.update_byte(bytes[i]);
            i += 1;
        }
    }

    /// Update checksum with a single byte
    pub const fn update_byte(&mut self, byte: u8) {
        self.crc ^= (byte as u16) << 8;
        let mut bit = 0;
        while bit < 8 {
            if self.crc & 0x8000 != 0 {
                self.crc = (self.crc << 1) ^ CRC_POLY;
            } else {
                self.crc <<= 1;
            }
            bit += 1;
        }
    }

    /// Get the current checksum result
    pub const fn result(self) -> u16 {
        self.crc
    }
}

/// Checksum of one block as carried in the frame header.
pub fn block_crc(block_id: u16, length: u16, payload: &[u8]) -> u16 {
    let mut crc = Crc16::new();
    crc.update(&block_id.to_le_bytes());
    crc.update(&length.to_le_bytes());
    crc.update(payload);
    crc.result()
}
