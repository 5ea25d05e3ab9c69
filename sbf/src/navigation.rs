//! Shared navigation-state model and the decode routines that populate it.
//!
//! Decoders update a field only when the block's validity indicator or
//! sentinel check permits it, so stale values are never overwritten with
//! garbage. The model is written exclusively from [`decode`] and read by the
//! rest of the system through a shared reference.

use chrono::{Duration, NaiveDate, NaiveDateTime};

use crate::blocks::BlockRef;
use crate::constants::{DO_NOT_USE, UNKNOWN_SV_COUNT, UNKNOWN_WEEK};
use crate::device::DeviceStatus;

/// Base-station operation, forces the classification down to [`FixKind::NoFix`].
const MODE_BASE_STATION: u8 = 0x40;
/// Explicit 2-D-only indication, caps the classification at [`FixKind::Fix2d`].
const MODE_FIX_2D: u8 = 0x80;

/// Navigation solution confidence, ordered worst to best.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub enum FixKind {
    #[default]
    NoFix,
    Fix2d,
    Fix3d,
    /// 3-D fix aided by differential or SBAS corrections.
    DGps,
    RtkFloat,
    RtkFixed,
}

/// Decoded navigation state. Optional fields carry an explicit `have_*`
/// flag; a flag only ever goes true together with a valid value.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct NavigationState {
    /// GPS week number
    pub time_week: u16,
    /// Milliseconds into the GPS week
    pub time_week_ms: u32,
    pub have_time: bool,

    /// Latitude in degrees
    pub latitude: f64,
    /// Longitude in degrees
    pub longitude: f64,
    /// Altitude above mean sea level, in meters
    pub altitude: f64,
    pub have_position: bool,

    /// North, east, down velocity in m/s
    pub velocity_ned: [f32; 3],
    pub have_vertical_velocity: bool,
    /// 2-D speed over ground, m/s
    pub ground_speed: f32,
    /// Course over ground, degrees in [0, 360)
    pub ground_course: f32,

    /// 1-sigma horizontal position error, meters
    pub horizontal_accuracy: f32,
    pub have_horizontal_accuracy: bool,
    /// 1-sigma vertical position error, meters
    pub vertical_accuracy: f32,
    pub have_vertical_accuracy: bool,
    /// 1-sigma speed error, m/s
    pub speed_accuracy: f32,
    pub have_speed_accuracy: bool,

    pub num_sats: u8,
    pub fix: FixKind,

    /// Heading from the receiver (dual antenna or INS), degrees
    pub yaw_degrees: f32,
    pub have_yaw: bool,
    /// Heading variance, degrees squared
    pub yaw_accuracy: f32,
    pub have_yaw_accuracy: bool,

    /// Horizontal dilution of precision, 0.01 units
    pub hdop: u16,
    /// Vertical dilution of precision, 0.01 units
    pub vdop: u16,

    /// Age of differential corrections, ms
    pub rtk_age_ms: u32,
    /// Timestamp of the last decoded navigation block, caller clock
    pub last_update_ms: u64,
}

impl NavigationState {
    /// Time of the current solution in the GPS timescale (no leap second
    /// adjustment), when the receiver has reported a week number.
    pub fn gps_time(&self) -> Option<NaiveDateTime> {
        if !self.have_time {
            return None;
        }
        let epoch = NaiveDate::from_ymd_opt(1980, 1, 6)?.and_hms_opt(0, 0, 0)?;
        Some(
            epoch
                + Duration::weeks(i64::from(self.time_week))
                + Duration::milliseconds(i64::from(self.time_week_ms)),
        )
    }
}

fn usable_f64(value: f64) -> bool {
    value > DO_NOT_USE
}

fn usable_f32(value: f32) -> bool {
    f64::from(value) > DO_NOT_USE
}

fn wrap_360(degrees: f32) -> f32 {
    let wrapped = degrees % 360.0;
    if wrapped < 0.0 {
        wrapped + 360.0
    } else {
        wrapped
    }
}

/// Classification from the PVT mode byte. Unrecognized nibble values keep
/// the current classification.
fn fix_from_mode(mode: u8, current: FixKind) -> FixKind {
    let base = match mode & 0x0f {
        0 => FixKind::NoFix,
        1 | 3 => FixKind::Fix3d,    // standalone, fixed location
        2 | 6 => FixKind::DGps,     // dgps, sbas
        4 | 7 => FixKind::RtkFixed, // static and moving-base rtk
        5 | 8 => FixKind::RtkFloat,
        _ => current,
    };
    if mode & MODE_BASE_STATION != 0 {
        FixKind::NoFix
    } else if mode & MODE_FIX_2D != 0 {
        FixKind::Fix2d
    } else {
        base
    }
}

fn update_time(nav: &mut NavigationState, wnc: u16, tow: u32, now_ms: u64) {
    if wnc != UNKNOWN_WEEK {
        nav.time_week = wnc;
        nav.time_week_ms = tow;
        nav.have_time = true;
    }
    nav.last_update_ms = now_ms;
}

fn update_velocity(nav: &mut NavigationState, vn: f32, ve: f32, vu: f32, cog: Option<f32>) {
    nav.velocity_ned = [vn, ve, -vu];
    nav.have_vertical_velocity = true;
    nav.ground_speed = (vn * vn + ve * ve).sqrt();
    nav.ground_course = match cog {
        Some(cog) => wrap_360(cog),
        None => wrap_360(ve.atan2(vn).to_degrees()),
    };
}

fn update_position(nav: &mut NavigationState, lat_rad: f64, lon_rad: f64, height: f64, undulation: f32) {
    nav.latitude = lat_rad.to_degrees();
    nav.longitude = lon_rad.to_degrees();
    nav.altitude = height - f64::from(undulation);
    nav.have_position = true;
}

/// Decode one block into the shared models. Returns true iff the navigation
/// state was updated; receiver status only touches `status`.
///
/// `prefer_ins` suppresses the position and velocity fields of PvtGeodetic
/// so they are sourced from InsNavGeod instead.
pub fn decode(
    nav: &mut NavigationState,
    status: &mut DeviceStatus,
    block: &BlockRef<'_>,
    now_ms: u64,
    prefer_ins: bool,
) -> bool {
    match block {
        BlockRef::PvtGeodetic(pvt) => {
            update_time(nav, pvt.wnc(), pvt.tow(), now_ms);

            if usable_f32(pvt.vn()) {
                if !prefer_ins {
                    let cog = usable_f32(pvt.cog()).then(|| pvt.cog());
                    update_velocity(nav, pvt.vn(), pvt.ve(), pvt.vu(), cog);
                }
                nav.rtk_age_ms = u32::from(pvt.mean_corr_age()) * 10;

                // value is expressed as twice the rms error, in cm
                nav.horizontal_accuracy = f32::from(pvt.h_accuracy()) * 0.005;
                nav.vertical_accuracy = f32::from(pvt.v_accuracy()) * 0.005;
                nav.have_horizontal_accuracy = true;
                nav.have_vertical_accuracy = true;
            }

            if usable_f64(pvt.latitude()) && !prefer_ins {
                update_position(nav, pvt.latitude(), pvt.longitude(), pvt.height(), pvt.undulation());
            }

            if pvt.nr_sv() != UNKNOWN_SV_COUNT {
                nav.num_sats = pvt.nr_sv();
            }

            nav.fix = fix_from_mode(pvt.mode(), nav.fix);
            true
        },
        BlockRef::InsNavGeod(ins) => {
            update_time(nav, ins.wnc(), ins.tow(), now_ms);

            if usable_f32(ins.vn()) {
                update_velocity(nav, ins.vn(), ins.ve(), ins.vu(), None);
            }
            if usable_f64(ins.latitude()) {
                update_position(nav, ins.latitude(), ins.longitude(), ins.height(), ins.undulation());
            }
            if usable_f32(ins.heading()) {
                nav.yaw_degrees = ins.heading();
                nav.have_yaw = true;
            }

            nav.fix = fix_from_mode(ins.mode(), nav.fix);
            true
        },
        BlockRef::AttEuler(att) => {
            update_time(nav, att.wnc(), att.tow(), now_ms);

            if att.nr_sv() != UNKNOWN_SV_COUNT {
                nav.num_sats = att.nr_sv();
            }
            if usable_f32(att.heading()) {
                nav.yaw_degrees = att.heading();
                nav.have_yaw = true;
            }
            true
        },
        BlockRef::AttCovEuler(cov) => {
            update_time(nav, cov.wnc(), cov.tow(), now_ms);

            if usable_f32(cov.cov_head_head()) {
                nav.yaw_accuracy = cov.cov_head_head();
                nav.have_yaw_accuracy = true;
            }
            true
        },
        BlockRef::Dop(dop) => {
            nav.hdop = dop.hdop();
            nav.vdop = dop.vdop();
            true
        },
        BlockRef::ReceiverStatus(rx) => {
            status.update(rx.rx_state(), rx.rx_error());
            false
        },
        BlockRef::VelCovGeodetic(cov) => {
            // select the maximum variance; only a scalar estimate is
            // propagated downstream
            let max_variance = cov.cov_vn_vn().max(cov.cov_ve_ve()).max(cov.cov_vu_vu());
            if max_variance > 0.0 {
                nav.speed_accuracy = max_variance.sqrt();
                nav.have_speed_accuracy = true;
            } else {
                nav.have_speed_accuracy = false;
            }
            true
        },
        BlockRef::Unknown(_) => false,
    }
}
