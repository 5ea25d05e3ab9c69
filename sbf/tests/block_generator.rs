//! Builders for synthetic SBF payloads used across the integration tests.
//!
//! Field order and widths mirror the block layouts the `*Ref` accessors
//! read, so a generated payload decodes back to the values set here.

#![allow(dead_code, reason = "Each test crate uses a subset")]

use byteorder::{LittleEndian, WriteBytesExt};
use sbf::DO_NOT_USE;

/// Payload of a PvtGeodetic block (88 bytes).
#[derive(Debug, Clone)]
pub struct PvtGeodetic {
    pub tow: u32,
    pub wnc: u16,
    pub mode: u8,
    pub latitude: f64,
    pub longitude: f64,
    pub height: f64,
    pub undulation: f32,
    pub vn: f32,
    pub ve: f32,
    pub vu: f32,
    pub cog: f32,
    pub nr_sv: u8,
    pub mean_corr_age: u16,
    pub h_accuracy: u16,
    pub v_accuracy: u16,
}

impl Default for PvtGeodetic {
    fn default() -> Self {
        Self {
            tow: 430_200_000,
            wnc: 2086,
            mode: 1, // standalone fix
            latitude: 0.85,
            longitude: 0.15,
            height: 120.0,
            undulation: 45.0,
            vn: 1.0,
            ve: 0.0,
            vu: 0.0,
            cog: DO_NOT_USE as f32,
            nr_sv: 12,
            mean_corr_age: 0,
            h_accuracy: 200,
            v_accuracy: 400,
        }
    }
}

impl PvtGeodetic {
    pub fn to_payload(&self) -> Vec<u8> {
        let mut w = Vec::with_capacity(88);
        w.write_u32::<LittleEndian>(self.tow).unwrap();
        w.write_u16::<LittleEndian>(self.wnc).unwrap();
        w.write_u8(self.mode).unwrap();
        w.write_u8(0).unwrap(); // error
        w.write_f64::<LittleEndian>(self.latitude).unwrap();
        w.write_f64::<LittleEndian>(self.longitude).unwrap();
        w.write_f64::<LittleEndian>(self.height).unwrap();
        w.write_f32::<LittleEndian>(self.undulation).unwrap();
        w.write_f32::<LittleEndian>(self.vn).unwrap();
        w.write_f32::<LittleEndian>(self.ve).unwrap();
        w.write_f32::<LittleEndian>(self.vu).unwrap();
        w.write_f32::<LittleEndian>(self.cog).unwrap();
        w.write_f64::<LittleEndian>(0.0).unwrap(); // rx clock bias
        w.write_f32::<LittleEndian>(0.0).unwrap(); // rx clock drift
        w.write_u8(0).unwrap(); // time system
        w.write_u8(0).unwrap(); // datum
        w.write_u8(self.nr_sv).unwrap();
        w.write_u8(0).unwrap(); // wa corr info
        w.write_u16::<LittleEndian>(0).unwrap(); // reference id
        w.write_u16::<LittleEndian>(self.mean_corr_age).unwrap();
        w.write_u32::<LittleEndian>(0).unwrap(); // signal info
        w.write_u8(0).unwrap(); // alert flag
        w.write_u8(0).unwrap(); // nr bases
        w.write_u16::<LittleEndian>(0).unwrap(); // ppp info
        w.write_u16::<LittleEndian>(0).unwrap(); // latency
        w.write_u16::<LittleEndian>(self.h_accuracy).unwrap();
        w.write_u16::<LittleEndian>(self.v_accuracy).unwrap();
        w.write_u8(0).unwrap(); // misc
        w.write_u8(0).unwrap(); // padding
        assert_eq!(w.len(), 88);
        w
    }

    pub fn to_frame(&self) -> Vec<u8> {
        sbf::encode_frame(sbf::PVT_GEODETIC, &self.to_payload())
    }
}

/// Payload of a ReceiverStatus block (24 bytes).
pub fn receiver_status_payload(rx_state: u32, rx_error: u32) -> Vec<u8> {
    let mut w = Vec::with_capacity(24);
    w.write_u32::<LittleEndian>(430_200_000).unwrap();
    w.write_u16::<LittleEndian>(2086).unwrap();
    w.write_u8(10).unwrap(); // cpu load
    w.write_u8(0).unwrap(); // ext error
    w.write_u32::<LittleEndian>(3600).unwrap(); // up time
    w.write_u32::<LittleEndian>(rx_state).unwrap();
    w.write_u32::<LittleEndian>(rx_error).unwrap();
    w.write_u8(0).unwrap(); // N
    w.write_u8(0).unwrap(); // sb length
    w.write_u8(0).unwrap(); // cmd count
    w.write_u8(0).unwrap(); // temperature
    assert_eq!(w.len(), 24);
    w
}

/// Payload of a VelCovGeodetic block (48 bytes).
pub fn vel_cov_payload(cov_vn_vn: f32, cov_ve_ve: f32, cov_vu_vu: f32) -> Vec<u8> {
    let mut w = Vec::with_capacity(48);
    w.write_u32::<LittleEndian>(430_200_000).unwrap();
    w.write_u16::<LittleEndian>(2086).unwrap();
    w.write_u8(1).unwrap(); // mode
    w.write_u8(0).unwrap(); // error
    w.write_f32::<LittleEndian>(cov_vn_vn).unwrap();
    w.write_f32::<LittleEndian>(cov_ve_ve).unwrap();
    w.write_f32::<LittleEndian>(cov_vu_vu).unwrap();
    for _ in 0..7 {
        w.write_f32::<LittleEndian>(0.0).unwrap();
    }
    assert_eq!(w.len(), 48);
    w
}

/// Payload of an AttEuler block (36 bytes).
pub fn att_euler_payload(heading: f32, nr_sv: u8) -> Vec<u8> {
    let mut w = Vec::with_capacity(36);
    w.write_u32::<LittleEndian>(430_200_000).unwrap();
    w.write_u16::<LittleEndian>(2086).unwrap();
    w.write_u8(nr_sv).unwrap();
    w.write_u8(0).unwrap(); // error
    w.write_u16::<LittleEndian>(1).unwrap(); // mode
    w.write_u16::<LittleEndian>(0).unwrap(); // reserved
    w.write_f32::<LittleEndian>(heading).unwrap();
    for _ in 0..5 {
        w.write_f32::<LittleEndian>(0.0).unwrap();
    }
    assert_eq!(w.len(), 36);
    w
}

/// Payload of an AttCovEuler block (32 bytes).
pub fn att_cov_payload(cov_head_head: f32) -> Vec<u8> {
    let mut w = Vec::with_capacity(32);
    w.write_u32::<LittleEndian>(430_200_000).unwrap();
    w.write_u16::<LittleEndian>(2086).unwrap();
    w.write_u8(0).unwrap(); // reserved
    w.write_u8(0).unwrap(); // error
    w.write_f32::<LittleEndian>(cov_head_head).unwrap();
    for _ in 0..5 {
        w.write_f32::<LittleEndian>(0.0).unwrap();
    }
    assert_eq!(w.len(), 32);
    w
}

/// Payload of a Dop block (24 bytes). DOP values in 0.01 units.
pub fn dop_payload(hdop: u16, vdop: u16) -> Vec<u8> {
    let mut w = Vec::with_capacity(24);
    w.write_u32::<LittleEndian>(430_200_000).unwrap();
    w.write_u16::<LittleEndian>(2086).unwrap();
    w.write_u8(12).unwrap(); // nr sv
    w.write_u8(0).unwrap(); // reserved
    w.write_u16::<LittleEndian>(180).unwrap(); // pdop
    w.write_u16::<LittleEndian>(90).unwrap(); // tdop
    w.write_u16::<LittleEndian>(hdop).unwrap();
    w.write_u16::<LittleEndian>(vdop).unwrap();
    w.write_f32::<LittleEndian>(0.0).unwrap(); // hpl
    w.write_f32::<LittleEndian>(0.0).unwrap(); // vpl
    assert_eq!(w.len(), 24);
    w
}

/// Payload of an InsNavGeod block (60 bytes).
pub fn ins_nav_payload(
    latitude: f64,
    longitude: f64,
    height: f64,
    vn: f32,
    ve: f32,
    vu: f32,
    heading: f32,
) -> Vec<u8> {
    let mut w = Vec::with_capacity(60);
    w.write_u32::<LittleEndian>(430_200_000).unwrap();
    w.write_u16::<LittleEndian>(2086).unwrap();
    w.write_u8(1).unwrap(); // mode
    w.write_u8(0).unwrap(); // error
    w.write_f64::<LittleEndian>(latitude).unwrap();
    w.write_f64::<LittleEndian>(longitude).unwrap();
    w.write_f64::<LittleEndian>(height).unwrap();
    w.write_f32::<LittleEndian>(0.0).unwrap(); // undulation
    w.write_f32::<LittleEndian>(vn).unwrap();
    w.write_f32::<LittleEndian>(ve).unwrap();
    w.write_f32::<LittleEndian>(vu).unwrap();
    w.write_f32::<LittleEndian>(heading).unwrap();
    w.write_f32::<LittleEndian>(0.0).unwrap(); // pitch
    w.write_f32::<LittleEndian>(0.0).unwrap(); // roll
    assert_eq!(w.len(), 60);
    w
}
