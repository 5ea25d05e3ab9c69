//! # sbf
//!
//! A pure-Rust library for talking to Septentrio GNSS receivers over the SBF
//! (Septentrio Binary Format) protocol: an incremental frame parser, a small
//! catalog of navigation block decoders, and a poll-driven receiver driver
//! that configures the device and tracks its health.
//!
//! Parsing frames
//! ==============
//!
//! The [`Framer`] is fed one byte at a time and reports completed frames and
//! command-echo lines. It recovers from garbage input by searching for the
//! next preamble, so it can be driven directly from an unreliable serial
//! stream:
//! ```
//! use sbf::{match_block, BlockRef, Framer, FramerEvent};
//!
//! let mut framer = Framer::new();
//! let bytes: &[u8] = &[]; // from your serial port
//! for b in bytes {
//!     if let Some(Ok(FramerEvent::Block { block_id, payload })) = framer.consume(*b) {
//!         if let Ok(BlockRef::PvtGeodetic(pvt)) = match_block(block_id, payload) {
//!             println!("satellites used: {}", pvt.nr_sv());
//!         }
//!     }
//! }
//! ```
//!
//! Driving a receiver
//! ==================
//!
//! The [`Driver`] owns a [`Transport`] (a non-blocking byte source/sink) and
//! a [`NavigationState`], runs the configuration handshake against the
//! receiver, and decodes incoming blocks on every [`Driver::poll`]. The
//! caller supplies the clock, so the driver never blocks or sleeps:
//! ```no_run
//! # fn clock_ms() -> u64 { 0 }
//! # fn open_port() -> impl sbf::Transport {
//! #     struct P;
//! #     impl sbf::Transport for P {
//! #         fn available(&self) -> usize { 0 }
//! #         fn read_byte(&mut self) -> Option<u8> { None }
//! #         fn write(&mut self, bytes: &[u8]) -> usize { bytes.len() }
//! #     }
//! #     P
//! # }
//! use sbf::{Config, Driver};
//!
//! let mut driver = Driver::new(open_port(), Config::default(), clock_ms());
//! loop {
//!     if driver.poll(clock_ms(), false) {
//!         let nav = driver.navigation();
//!         println!("fix: {:?}, sats: {}", nav.fix, nav.num_sats);
//!     }
//! }
//! ```

pub use crate::{
    blocks::{
        encode_frame, match_block, AttCovEulerRef, AttEulerRef, BlockRef, DopRef, InsNavGeodRef,
        PvtGeodeticRef, ReceiverStatusRef, VelCovGeodeticRef, ATT_COV_EULER, ATT_EULER, DOP,
        INS_NAV_GEOD, PVT_GEODETIC, RECEIVER_STATUS, VEL_COV_GEODETIC,
    },
    checksum::{block_crc, Crc16},
    constants::{BLOCK_ID_MASK, DO_NOT_USE, MAX_PAYLOAD_LEN, SBF_PREAMBLE1, SBF_PREAMBLE2},
    device::{
        Config, DeviceStatus, DiskLogging, Driver, RxError, RxState, StreamSetup, Transport,
        RX_ERROR_MASK,
    },
    error::{ArmingError, ParserError},
    framer::{Framer, FramerEvent},
    navigation::{decode, FixKind, NavigationState},
};

mod blocks;
mod checksum;
mod constants;
mod device;
mod error;
mod framer;
mod navigation;
