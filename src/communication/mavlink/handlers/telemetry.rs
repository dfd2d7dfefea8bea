//! Telemetry Stream Scheduler
//!
//! Services the static stream-group table at operator-configured rates and
//! builds the telemetry messages from the vehicle facade's state snapshots.
//!
//! # Scheduling
//!
//! Each stream group is due when `now - last_sent >= 1000/rate` ms. A due
//! group attempts its message kinds in declared order; before building, each
//! kind's fixed wire length is tested against the channel's free
//! transmit-buffer space. If a message does not fit, or the transport refuses
//! a send, the whole group is abandoned for this pass and `last_sent` stays
//! unchanged — the group is delayed, never dropped. Groups and channels are
//! scheduled independently, so one group's backpressure cannot starve
//! another.

use crate::communication::mavlink::link::OutboundSequencer;
use crate::communication::mavlink::state::FixType;
use crate::communication::mavlink::streams::{MsgKind, StreamId, STREAM_TABLE};
use crate::communication::mavlink::transport::GcsChannel;
use crate::communication::mavlink::vehicle::{ModeOps, VehicleFacade, VehicleKind};
use crate::parameters::StreamRateParams;
use mavlink::common::{
    GpsFixType, MavBatteryFunction, MavBatteryType, MavMessage, MavPowerStatus,
    MavSysStatusSensor, ATTITUDE_DATA, BATTERY_STATUS_DATA, GLOBAL_POSITION_INT_DATA,
    GPS_RAW_INT_DATA, HEARTBEAT_DATA, NAV_CONTROLLER_OUTPUT_DATA, POWER_STATUS_DATA,
    RAW_IMU_DATA, RC_CHANNELS_RAW_DATA, SERVO_OUTPUT_RAW_DATA, SCALED_PRESSURE_DATA,
    SYS_STATUS_DATA,
};

/// Number of GCS channels the scheduler tracks
pub const MAX_CHANNELS: usize = 4;

/// Sensors reported in SYS_STATUS for a tracker board
const SENSORS_DEFAULT: MavSysStatusSensor = MavSysStatusSensor::from_bits_truncate(
    MavSysStatusSensor::MAV_SYS_STATUS_SENSOR_3D_GYRO.bits()
        | MavSysStatusSensor::MAV_SYS_STATUS_SENSOR_3D_ACCEL.bits()
        | MavSysStatusSensor::MAV_SYS_STATUS_SENSOR_3D_MAG.bits()
        | MavSysStatusSensor::MAV_SYS_STATUS_SENSOR_ABSOLUTE_PRESSURE.bits()
        | MavSysStatusSensor::MAV_SYS_STATUS_SENSOR_GPS.bits(),
);

/// Per-channel per-group send timestamps
#[derive(Debug, Clone, Copy)]
struct ChannelSchedule {
    /// Last send in milliseconds; None until a group's first send
    last_sent_ms: [Option<u32>; StreamId::COUNT],
}

impl ChannelSchedule {
    const fn new() -> Self {
        Self {
            last_sent_ms: [None; StreamId::COUNT],
        }
    }
}

/// Rate-limited, buffer-bounded stream servicing for every GCS channel
pub struct TelemetryScheduler {
    channels: [ChannelSchedule; MAX_CHANNELS],
}

impl TelemetryScheduler {
    pub const fn new() -> Self {
        Self {
            channels: [ChannelSchedule::new(); MAX_CHANNELS],
        }
    }

    /// Whether a group is due for sending
    fn due(last_sent_ms: Option<u32>, rate_hz: u8, now_ms: u32) -> bool {
        if rate_hz == 0 {
            return false;
        }
        let interval_ms = 1000 / rate_hz as u32;
        match last_sent_ms {
            None => true,
            Some(t) => now_ms.wrapping_sub(t) >= interval_ms,
        }
    }

    /// Service every due stream group on one channel.
    ///
    /// # Arguments
    ///
    /// * `chan` - Channel index (0..MAX_CHANNELS)
    /// * `channel` - The channel's transmit path
    /// * `facade` - Vehicle state source for the message builders
    /// * `rates` - Live SR_* rates
    /// * `seq` - Outbound header sequencer
    /// * `now_ms` - Current time in milliseconds
    pub fn data_stream_send<F, C>(
        &mut self,
        chan: usize,
        channel: &mut C,
        facade: &F,
        rates: &StreamRateParams,
        seq: &mut OutboundSequencer,
        now_ms: u32,
    ) where
        F: VehicleFacade,
        C: GcsChannel,
    {
        let Some(schedule) = self.channels.get_mut(chan) else {
            return;
        };

        for entry in STREAM_TABLE {
            let idx = entry.id.index();
            if !Self::due(schedule.last_sent_ms[idx], rates.rate(entry.id), now_ms) {
                continue;
            }

            let mut complete = true;
            for kind in entry.msgs {
                if channel.txspace() < kind.wire_len() {
                    complete = false;
                    break;
                }
                // A builder with no data yet skips its message without
                // penalizing the rest of the group
                if let Some(msg) = build_message(*kind, facade, now_ms) {
                    if channel.send(&seq.next_header(), &msg).is_err() {
                        complete = false;
                        break;
                    }
                }
            }

            if complete {
                schedule.last_sent_ms[idx] = Some(now_ms);
            }
        }
    }
}

impl Default for TelemetryScheduler {
    fn default() -> Self {
        Self::new()
    }
}

/// Build one telemetry message from the facade's current state.
///
/// Returns None when the vehicle has no data for this kind yet.
pub fn build_message<F: VehicleFacade>(
    kind: MsgKind,
    facade: &F,
    now_ms: u32,
) -> Option<MavMessage> {
    match kind {
        MsgKind::Heartbeat => Some(build_heartbeat(facade)),
        MsgKind::SysStatus => Some(build_sys_status(facade)),
        MsgKind::PowerStatus => Some(build_power_status(facade)),
        MsgKind::NavControllerOutput => Some(build_nav_controller_output(facade)),
        MsgKind::GpsRaw => Some(build_gps_raw(facade, now_ms)),
        MsgKind::GlobalPosition => build_global_position(facade, now_ms),
        MsgKind::ServoOutputRaw => Some(build_servo_output_raw(facade, now_ms)),
        MsgKind::RcChannelsRaw => Some(build_rc_channels_raw(facade, now_ms)),
        MsgKind::Attitude => Some(build_attitude(facade, now_ms)),
        MsgKind::RawImu => Some(build_raw_imu(facade, now_ms)),
        MsgKind::ScaledPressure => Some(build_scaled_pressure(facade, now_ms)),
        MsgKind::BatteryStatus => Some(build_battery_status(facade)),
        // Status texts are drained from the notifier, not scheduled
        MsgKind::StatusText => None,
    }
}

/// Build HEARTBEAT from the vehicle kind's mode summary
pub fn build_heartbeat<F: VehicleFacade>(facade: &F) -> MavMessage {
    let mode = facade.current_mode();
    MavMessage::HEARTBEAT(HEARTBEAT_DATA {
        custom_mode: mode.to_custom_mode(),
        mavtype: <F::Kind as VehicleKind>::mav_type(),
        autopilot: <F::Kind as VehicleKind>::autopilot_type(),
        base_mode: <F::Kind as VehicleKind>::base_mode(mode, facade.armed()),
        system_status: <F::Kind as VehicleKind>::system_status(mode),
        mavlink_version: 3,
    })
}

fn build_sys_status<F: VehicleFacade>(facade: &F) -> MavMessage {
    let battery = facade.battery();
    let voltage_battery = (battery.voltage * 1000.0) as u16;
    // Current and remaining are only reported with a healthy current sensor
    let (current_battery, battery_remaining) = if battery.has_current && battery.healthy {
        (
            (battery.current_amps * 100.0) as i16,
            battery.remaining_pct,
        )
    } else {
        (-1, -1)
    };

    MavMessage::SYS_STATUS(SYS_STATUS_DATA {
        onboard_control_sensors_present: SENSORS_DEFAULT,
        onboard_control_sensors_enabled: SENSORS_DEFAULT,
        onboard_control_sensors_health: SENSORS_DEFAULT,
        load: (facade.load_average() * 10.0) as u16, // 0.1% units
        voltage_battery,
        current_battery,
        battery_remaining,
        drop_rate_comm: 0,
        errors_comm: 0,
        errors_count1: 0,
        errors_count2: 0,
        errors_count3: 0,
        errors_count4: 0,
        ..Default::default()
    })
}

fn build_power_status<F: VehicleFacade>(facade: &F) -> MavMessage {
    MavMessage::POWER_STATUS(POWER_STATUS_DATA {
        Vcc: facade.board_voltage_mv(),
        Vservo: 0,
        flags: MavPowerStatus::empty(),
    })
}

fn build_nav_controller_output<F: VehicleFacade>(facade: &F) -> MavMessage {
    let nav = facade.nav_status();
    MavMessage::NAV_CONTROLLER_OUTPUT(NAV_CONTROLLER_OUTPUT_DATA {
        nav_roll: 0.0,
        nav_pitch: nav.pitch_deg,
        alt_error: nav.alt_difference_m(),
        aspd_error: 0.0,
        xtrack_error: 0.0,
        nav_bearing: nav.bearing_deg as i16,
        target_bearing: nav.bearing_deg as i16,
        wp_dist: nav.distance_m as u16,
    })
}

fn build_gps_raw<F: VehicleFacade>(facade: &F, now_ms: u32) -> MavMessage {
    let gps = facade.gps_fix();
    let fix_type = match gps.fix_type {
        FixType::NoFix => GpsFixType::GPS_FIX_TYPE_NO_FIX,
        FixType::Fix2d => GpsFixType::GPS_FIX_TYPE_2D_FIX,
        FixType::Fix3d => GpsFixType::GPS_FIX_TYPE_3D_FIX,
    };

    MavMessage::GPS_RAW_INT(GPS_RAW_INT_DATA {
        time_usec: now_ms as u64 * 1000,
        lat: gps.lat_e7,
        lon: gps.lon_e7,
        alt: gps.alt_mm,
        eph: gps.hdop_cm,
        epv: gps.vdop_cm,
        vel: gps.ground_speed_cms,
        cog: gps.course_cdeg,
        fix_type,
        satellites_visible: gps.num_sats,
        ..Default::default()
    })
}

fn build_global_position<F: VehicleFacade>(facade: &F, now_ms: u32) -> Option<MavMessage> {
    let pos = facade.position()?;
    Some(MavMessage::GLOBAL_POSITION_INT(GLOBAL_POSITION_INT_DATA {
        time_boot_ms: now_ms,
        lat: pos.lat_e7,
        lon: pos.lon_e7,
        alt: pos.alt_mm,
        relative_alt: pos.relative_alt_mm,
        vx: pos.vel_cms[0],
        vy: pos.vel_cms[1],
        vz: pos.vel_cms[2],
        hdg: pos.heading_cdeg,
    }))
}

fn build_servo_output_raw<F: VehicleFacade>(facade: &F, now_ms: u32) -> MavMessage {
    let servos = facade.servo_outputs();
    MavMessage::SERVO_OUTPUT_RAW(SERVO_OUTPUT_RAW_DATA {
        time_usec: now_ms.wrapping_mul(1000),
        port: 0,
        servo1_raw: servos[0],
        servo2_raw: servos[1],
        servo3_raw: servos[2],
        servo4_raw: servos[3],
        servo5_raw: servos[4],
        servo6_raw: servos[5],
        servo7_raw: servos[6],
        servo8_raw: servos[7],
        ..Default::default()
    })
}

fn build_rc_channels_raw<F: VehicleFacade>(facade: &F, now_ms: u32) -> MavMessage {
    let rc = facade.rc_inputs();
    MavMessage::RC_CHANNELS_RAW(RC_CHANNELS_RAW_DATA {
        time_boot_ms: now_ms,
        port: 0,
        chan1_raw: rc[0],
        chan2_raw: rc[1],
        chan3_raw: rc[2],
        chan4_raw: rc[3],
        chan5_raw: rc[4],
        chan6_raw: rc[5],
        chan7_raw: rc[6],
        chan8_raw: rc[7],
        rssi: 255,
    })
}

fn build_attitude<F: VehicleFacade>(facade: &F, now_ms: u32) -> MavMessage {
    let att = facade.attitude();
    MavMessage::ATTITUDE(ATTITUDE_DATA {
        time_boot_ms: now_ms,
        roll: att.roll,
        pitch: att.pitch,
        yaw: att.yaw,
        rollspeed: att.rollspeed,
        pitchspeed: att.pitchspeed,
        yawspeed: att.yawspeed,
    })
}

fn build_raw_imu<F: VehicleFacade>(facade: &F, now_ms: u32) -> MavMessage {
    let imu = facade.imu_sample();
    MavMessage::RAW_IMU(RAW_IMU_DATA {
        time_usec: now_ms as u64 * 1000,
        xacc: imu.accel[0],
        yacc: imu.accel[1],
        zacc: imu.accel[2],
        xgyro: imu.gyro[0],
        ygyro: imu.gyro[1],
        zgyro: imu.gyro[2],
        xmag: imu.mag[0],
        ymag: imu.mag[1],
        zmag: imu.mag[2],
        ..Default::default()
    })
}

fn build_scaled_pressure<F: VehicleFacade>(facade: &F, now_ms: u32) -> MavMessage {
    let pressure = facade.pressure_sample();
    MavMessage::SCALED_PRESSURE(SCALED_PRESSURE_DATA {
        time_boot_ms: now_ms,
        press_abs: pressure.press_abs_hpa,
        press_diff: pressure.press_diff_hpa,
        temperature: pressure.temperature_cdeg,
        ..Default::default()
    })
}

fn build_battery_status<F: VehicleFacade>(facade: &F) -> MavMessage {
    let battery = facade.battery();
    let mut voltages = [u16::MAX; 10];
    voltages[0] = (battery.voltage * 1000.0) as u16;

    MavMessage::BATTERY_STATUS(BATTERY_STATUS_DATA {
        current_consumed: -1,
        energy_consumed: -1,
        temperature: i16::MAX, // unknown
        voltages,
        current_battery: if battery.has_current {
            (battery.current_amps * 100.0) as i16
        } else {
            -1
        },
        id: 0,
        battery_function: MavBatteryFunction::MAV_BATTERY_FUNCTION_ALL,
        mavtype: MavBatteryType::MAV_BATTERY_TYPE_UNKNOWN,
        battery_remaining: battery.remaining_pct,
        ..Default::default()
    })
}
