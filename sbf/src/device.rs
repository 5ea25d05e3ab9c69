//! Receiver driver: configuration handshake, health tracking and the
//! per-tick poll loop.
//!
//! Everything here is poll-and-advance: the external scheduler calls
//! [`Driver::poll`] at a bounded rate with the current time, the driver
//! drains whatever bytes the transport has and decides whether anything
//! needs to be sent. No call blocks.

use bitflags::bitflags;
use log::{debug, info, warn};

use crate::blocks::match_block;
use crate::constants::COMMAND_OK;
use crate::error::ArmingError;
use crate::framer::{Framer, FramerEvent};
use crate::navigation::{self, NavigationState};

/// Non-blocking byte source/sink, typically a serial port. `write` is
/// best-effort and may accept fewer bytes than offered.
pub trait Transport {
    fn available(&self) -> usize;
    fn read_byte(&mut self) -> Option<u8>;
    fn write(&mut self, bytes: &[u8]) -> usize;
}

/// Fallback when the receiver never echoes anything, e.g. because input is
/// disabled on its port.
const PORT_ENABLE: &str = "\nSSSSSSSSSS\n";
const MOUNT_DISK: &str = "emd, DSK1, Mount\n";
const UNMOUNT_DISK: &str = "emd, DSK1, Unmount\n";

/// No echo for this long means the port is not accepting input.
const STALL_TIMEOUT_MS: u64 = 2500;
/// Re-send cadence for the current command.
const RETRY_INTERVAL_MS: u64 = 1000;

const INIT_SINGLE: &[&str] = &[
    "sso,Stream1,COM1,PVTGeodetic+DOP+ReceiverStatus+VelCovGeodetic+BaseVectorGeod,msec100\n",
    "srd,Moderate,UAV\n",
    "sem,PVT,5\n",
    "spm,Rover,all\n",
    "sso,Stream2,Dsk1,postprocess+event+comment,msec100\n",
];

const INIT_DUAL_ANTENNA: &[&str] = &[
    "sso,Stream1,COM1,PVTGeodetic+DOP+ReceiverStatus+VelCovGeodetic+AttEuler+AttCovEuler,msec100\n",
    "sga,MultiAntenna\n",
    "srd,Moderate,UAV\n",
    "sem,PVT,5\n",
    "spm,Rover,all\n",
    "sso,Stream2,Dsk1,postprocess+event+comment,msec100\n",
];

const INIT_INS: &[&str] = &[
    "sso,Stream1,COM1,INSNavGeod+PVTGeodetic+DOP+ReceiverStatus+VelCovGeodetic,msec100\n",
    "srd,Moderate,UAV\n",
    "sem,PVT,5\n",
    "spm,Rover,all\n",
    "sso,Stream2,Dsk1,postprocess+event+comment,msec100\n",
];

/// Receiver variant, selects the configuration command sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StreamSetup {
    #[default]
    Single,
    DualAntenna,
    /// Inertial-aided receiver; position and velocity are taken from
    /// InsNavGeod instead of PvtGeodetic.
    Ins,
}

impl StreamSetup {
    /// The configuration command sequence sent for this variant.
    pub fn commands(self) -> &'static [&'static str] {
        match self {
            StreamSetup::Single => INIT_SINGLE,
            StreamSetup::DualAntenna => INIT_DUAL_ANTENNA,
            StreamSetup::Ins => INIT_INS,
        }
    }
}

/// On-receiver disk logging policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DiskLogging {
    /// Logging not requested; arming readiness ignores the disk.
    #[default]
    Disabled,
    /// Logging requested and gating arming readiness.
    Logging,
    /// Additionally unmount the disk after each armed-to-disarmed cycle.
    Managed,
}

#[derive(Debug, Clone, Copy)]
pub struct Config {
    /// When false the handshake never runs and the driver reports
    /// configured immediately.
    pub auto_config: bool,
    pub stream_setup: StreamSetup,
    pub disk_logging: DiskLogging,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            auto_config: true,
            stream_setup: StreamSetup::default(),
            disk_logging: DiskLogging::default(),
        }
    }
}

bitflags! {
    /// Receiver activity bits from the ReceiverStatus block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RxState: u32 {
        const DISK_ACTIVITY = 1 << 7;
        const DISK_FULL = 1 << 8;
        const DISK_MOUNTED = 1 << 9;
    }

    /// Receiver error bits from the ReceiverStatus block.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
    pub struct RxError: u32 {
        const SOFTWARE = 1 << 3;
        const WATCHDOG = 1 << 4;
        const CONGESTION = 1 << 6;
        const MISSED_EVENT = 1 << 8;
        const CPU_OVERLOAD = 1 << 9;
        const INVALID_CONFIG = 1 << 10;
        const OUT_OF_GEOFENCE = 1 << 11;
    }
}

/// Fault bits that make the receiver unhealthy and are announced on change.
pub const RX_ERROR_MASK: RxError = RxError::CONGESTION
    .union(RxError::MISSED_EVENT)
    .union(RxError::CPU_OVERLOAD)
    .union(RxError::INVALID_CONFIG)
    .union(RxError::OUT_OF_GEOFENCE);

/// Receiver health and disk status, fed from ReceiverStatus blocks.
#[derive(Debug, Default)]
pub struct DeviceStatus {
    pub rx_state: RxState,
    pub rx_error: RxError,
    pub has_been_armed: bool,
    notifications: Vec<String>,
}

impl DeviceStatus {
    /// Apply a new ReceiverStatus sample. A change in the fault-restricted
    /// error mask raises exactly one notification.
    pub(crate) fn update(&mut self, state_bits: u32, error_bits: u32) {
        let new_error = RxError::from_bits_retain(error_bits);
        let old_faults = self.rx_error & RX_ERROR_MASK;
        let new_faults = new_error & RX_ERROR_MASK;
        if old_faults != new_faults {
            let text = format!(
                "receiver error changed (0x{:08x}/0x{:08x})",
                old_faults.bits(),
                new_faults.bits()
            );
            info!("{text}");
            self.notifications.push(text);
        }
        self.rx_state = RxState::from_bits_retain(state_bits);
        self.rx_error = new_error;
    }

    /// True while none of the fault bits are set.
    pub fn is_healthy(&self) -> bool {
        (self.rx_error & RX_ERROR_MASK).is_empty()
    }

    /// Drain the user-visible status messages raised since the last call.
    pub fn take_notifications(&mut self) -> Vec<String> {
        std::mem::take(&mut self.notifications)
    }
}

/// Configuration handshake: send each command in order, advance on a
/// matching echo, retry on a timer. The cursor never decreases; once it
/// reaches the end of the sequence the receiver stays configured.
struct Handshake {
    commands: &'static [&'static str],
    cursor: usize,
    last_ack_ms: u64,
    next_retry_ms: u64,
}

impl Handshake {
    fn new(commands: &'static [&'static str], now_ms: u64) -> Self {
        Self {
            commands,
            cursor: 0,
            last_ack_ms: now_ms,
            next_retry_ms: 0,
        }
    }

    fn is_complete(&self) -> bool {
        self.cursor >= self.commands.len()
    }

    fn tick<T: Transport>(&mut self, transport: &mut T, now_ms: u64) {
        if self.is_complete() || now_ms <= self.next_retry_ms {
            return;
        }
        if now_ms > self.last_ack_ms + STALL_TIMEOUT_MS {
            // no progress at all, the port may not accept input yet
            debug!("sending port enable");
            transport.write(PORT_ENABLE.as_bytes());
            self.last_ack_ms = now_ms;
        } else {
            let cmd = self.commands[self.cursor];
            debug!("sending init command: {}", cmd.trim_end());
            transport.write(cmd.as_bytes());
        }
        self.next_retry_ms = now_ms + RETRY_INTERVAL_MS;
    }

    /// Assess one "$R..." echo line (without the marker and newline). Only
    /// an accepted echo of the command at the cursor advances it.
    fn handle_echo(&mut self, line: &[u8], now_ms: u64) {
        if self.is_complete() {
            return;
        }
        if line.first() != Some(&COMMAND_OK) {
            warn!("receiver rejected command: {}", String::from_utf8_lossy(line));
            return;
        }
        // skip the validity byte and the separator
        let mut text = line.get(2..).unwrap_or(&[]);
        if let Some(stripped) = text.strip_suffix(b"\r") {
            text = stripped;
        }
        let expected = self.commands[self.cursor].trim_end().as_bytes();
        if text == expected {
            self.cursor += 1;
            self.last_ack_ms = now_ms;
            debug!(
                "command acknowledged ({}/{})",
                self.cursor,
                self.commands.len()
            );
        } else {
            debug!(
                "unexpected command echo: {}",
                String::from_utf8_lossy(text)
            );
        }
    }
}

/// The receiver driver. Owns the framer, the navigation and status models
/// and the handshake; exposes the models read-only.
pub struct Driver<T: Transport> {
    transport: T,
    config: Config,
    framer: Framer,
    nav: NavigationState,
    status: DeviceStatus,
    handshake: Handshake,
}

impl<T: Transport> Driver<T> {
    /// Port enable is sent immediately so a misconfigured receiver starts
    /// listening before the first handshake tick.
    pub fn new(mut transport: T, config: Config, now_ms: u64) -> Self {
        transport.write(PORT_ENABLE.as_bytes());
        let handshake = Handshake::new(config.stream_setup.commands(), now_ms);
        Self {
            transport,
            config,
            framer: Framer::new(),
            nav: NavigationState::default(),
            status: DeviceStatus::default(),
            handshake,
        }
    }

    /// One driver tick: drain available bytes, then run the handshake and
    /// disk-management timers. Returns true iff the navigation state was
    /// updated.
    pub fn poll(&mut self, now_ms: u64, armed: bool) -> bool {
        let mut updated = false;
        let prefer_ins = self.config.stream_setup == StreamSetup::Ins;

        for _ in 0..self.transport.available() {
            let Some(byte) = self.transport.read_byte() else {
                break;
            };
            match self.framer.consume(byte) {
                Some(Ok(FramerEvent::Block { block_id, payload })) => {
                    match match_block(block_id, payload) {
                        Ok(block) => {
                            updated |= navigation::decode(
                                &mut self.nav,
                                &mut self.status,
                                &block,
                                now_ms,
                                prefer_ins,
                            );
                        },
                        Err(e) => debug!("malformed block {block_id}: {e}"),
                    }
                },
                Some(Ok(FramerEvent::CommandEcho(line))) => {
                    self.handshake.handle_echo(line, now_ms);
                },
                Some(Err(e)) => debug!("dropped frame: {e}"),
                None => {},
            }
        }

        if self.config.auto_config {
            if !self.handshake.is_complete() {
                self.handshake.tick(&mut self.transport, now_ms);
            } else if self.config.disk_logging == DiskLogging::Managed {
                // only manage disarm cycles once init is done
                if armed {
                    self.status.has_been_armed = true;
                } else if self.status.has_been_armed
                    && self.status.rx_state.contains(RxState::DISK_MOUNTED)
                    && now_ms > self.handshake.next_retry_ms
                {
                    // unmounting reuses the handshake retry clock as its
                    // rate limit
                    info!("unmounting receiver disk");
                    self.transport.write(UNMOUNT_DISK.as_bytes());
                    self.handshake.next_retry_ms = now_ms + RETRY_INTERVAL_MS;
                }
            }
        }

        updated
    }

    /// Read-only snapshot of the decoded navigation state.
    pub fn navigation(&self) -> &NavigationState {
        &self.nav
    }

    pub fn status(&self) -> &DeviceStatus {
        &self.status
    }

    /// True once every configuration command has been acknowledged, or
    /// immediately when auto-configuration is disabled.
    pub fn is_configured(&self) -> bool {
        !self.config.auto_config || self.handshake.is_complete()
    }

    pub fn is_healthy(&self) -> bool {
        self.status.is_healthy()
    }

    /// Commands acknowledged so far out of the configured sequence.
    pub fn configuration_progress(&self) -> (usize, usize) {
        (self.handshake.cursor, self.handshake.commands.len())
    }

    pub fn crc_error_count(&self) -> u32 {
        self.framer.crc_error_count()
    }

    pub fn take_notifications(&mut self) -> Vec<String> {
        self.status.take_notifications()
    }

    /// Arming-readiness gate for storage-backed logging. When the disk is
    /// unmounted this issues a single mount attempt as a side effect; there
    /// is no remount loop, the caller simply retries arming.
    pub fn prepare_for_arming(&mut self) -> Result<(), ArmingError> {
        if self.config.disk_logging == DiskLogging::Disabled {
            return Ok(());
        }
        if !self.status.rx_state.contains(RxState::DISK_MOUNTED) {
            info!("receiver disk is not mounted, attempting to mount it");
            self.transport.write(MOUNT_DISK.as_bytes());
            self.status.has_been_armed = false;
            return Err(ArmingError::DiskUnmounted);
        }
        if self.status.rx_state.contains(RxState::DISK_FULL) {
            return Err(ArmingError::DiskFull);
        }
        if !self.status.rx_state.contains(RxState::DISK_ACTIVITY) {
            return Err(ArmingError::NotLogging);
        }
        Ok(())
    }
}
