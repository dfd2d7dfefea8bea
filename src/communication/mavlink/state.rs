//! Shared Value Types
//!
//! Plain data carried between the vehicle facade and the MAVLink handlers.
//! Telemetry builders read these snapshots; the mission handler produces a
//! [`Location`] from uploaded waypoints. None of these types own behavior
//! beyond small accessors.

/// Canonical position used for the home reference and waypoint translation.
///
/// Latitude/longitude are fixed-point degrees scaled by 1e7; altitude is in
/// centimeters. These scale factors are part of the wire contract and must
/// not be altered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Location {
    /// Latitude in 1e7-scaled degrees
    pub lat: i32,
    /// Longitude in 1e7-scaled degrees
    pub lng: i32,
    /// Altitude in centimeters
    pub alt_cm: i32,
    /// Altitude is relative to home rather than absolute
    pub relative_alt: bool,
}

/// Battery snapshot for SYS_STATUS / BATTERY_STATUS
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BatteryInfo {
    /// Pack voltage in volts
    pub voltage: f32,
    /// Current draw in amperes
    pub current_amps: f32,
    /// Remaining capacity in percent, -1 when unknown
    pub remaining_pct: i8,
    /// Current sensing is available
    pub has_current: bool,
    /// Monitor is present and reporting
    pub healthy: bool,
}

impl Default for BatteryInfo {
    fn default() -> Self {
        Self {
            voltage: 0.0,
            current_amps: 0.0,
            remaining_pct: -1,
            has_current: false,
            healthy: false,
        }
    }
}

/// Altitude source used for the NAV_CONTROLLER_OUTPUT altitude error
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AltSource {
    #[default]
    Baro,
    Gps,
}

/// Tracking controller status snapshot
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NavStatus {
    /// Commanded pitch to the target in degrees
    pub pitch_deg: f32,
    /// Commanded bearing to the target in degrees
    pub bearing_deg: f32,
    /// Horizontal distance to the target in meters
    pub distance_m: f32,
    /// Altitude difference derived from barometric pressure, meters
    pub alt_difference_baro_m: f32,
    /// Altitude difference derived from GPS, meters
    pub alt_difference_gps_m: f32,
    /// Which altitude difference feeds the telemetry altitude error
    pub alt_source: AltSource,
    /// Baro calibration has been requested and not yet completed
    pub need_altitude_calibration: bool,
}

impl NavStatus {
    /// Altitude error reported to the GCS, per the configured source
    pub fn alt_difference_m(&self) -> f32 {
        match self.alt_source {
            AltSource::Baro => self.alt_difference_baro_m,
            AltSource::Gps => self.alt_difference_gps_m,
        }
    }
}

/// GPS fix quality
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FixType {
    #[default]
    NoFix,
    Fix2d,
    Fix3d,
}

/// GPS receiver snapshot for GPS_RAW_INT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GpsFix {
    pub fix_type: FixType,
    /// Latitude in 1e7-scaled degrees
    pub lat_e7: i32,
    /// Longitude in 1e7-scaled degrees
    pub lon_e7: i32,
    /// Altitude above MSL in millimeters
    pub alt_mm: i32,
    /// Horizontal dilution of precision in centimeters
    pub hdop_cm: u16,
    /// Vertical dilution of precision in centimeters
    pub vdop_cm: u16,
    /// Ground speed in cm/s
    pub ground_speed_cms: u16,
    /// Course over ground in centidegrees
    pub course_cdeg: u16,
    pub num_sats: u8,
}

/// Fused position estimate for GLOBAL_POSITION_INT
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct PositionSample {
    pub lat_e7: i32,
    pub lon_e7: i32,
    /// Altitude above MSL in millimeters
    pub alt_mm: i32,
    /// Altitude above home in millimeters
    pub relative_alt_mm: i32,
    /// NED velocity in cm/s
    pub vel_cms: [i16; 3],
    /// Heading in centidegrees, u16::MAX when unknown
    pub heading_cdeg: u16,
}

/// Attitude estimate in radians / rad/s
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Attitude {
    pub roll: f32,
    pub pitch: f32,
    pub yaw: f32,
    pub rollspeed: f32,
    pub pitchspeed: f32,
    pub yawspeed: f32,
}

/// Raw IMU sample for RAW_IMU (raw sensor units)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ImuSample {
    pub accel: [i16; 3],
    pub gyro: [i16; 3],
    pub mag: [i16; 3],
}

/// Barometer sample for SCALED_PRESSURE
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PressureSample {
    /// Absolute pressure in hPa
    pub press_abs_hpa: f32,
    /// Differential pressure in hPa
    pub press_diff_hpa: f32,
    /// Temperature in centidegrees Celsius
    pub temperature_cdeg: i16,
}

/// Why a mode change was requested
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ModeReason {
    Startup,
    GcsCommand,
    RcInput,
}

/// Data stream requested from the tracked vehicle during lock-on
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamRequest {
    /// Position stream (GLOBAL_POSITION_INT et al.)
    Position,
    /// Raw sensor stream carrying barometric pressure
    AirPressure,
}
