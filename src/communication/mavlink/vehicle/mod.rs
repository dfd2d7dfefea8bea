//! Vehicle Kind Trait and Facade
//!
//! The GCS layer is generic over two seams:
//!
//! - [`VehicleKind`]: what kind of vehicle this is — frame type, mode set,
//!   heartbeat summary, and the kind-specific command/message hooks. Each
//!   vehicle variant is a concrete implementation of this one interface.
//! - [`VehicleFacade`]: the running vehicle behind the protocol — actions the
//!   handlers invoke (arm, set mode, set home, servo test, stream requests)
//!   and the state snapshots the telemetry builders read.

mod antenna_tracker;

pub use antenna_tracker::{AntennaTracker, TrackerMode};

use mavlink::common::{
    COMMAND_LONG_DATA, GLOBAL_POSITION_INT_DATA, MANUAL_CONTROL_DATA, MavAutopilot, MavMessage,
    MavModeFlag, MavResult, MavState, MavType, SCALED_PRESSURE_DATA,
};

use super::state::{
    Attitude, BatteryInfo, GpsFix, ImuSample, Location, ModeReason, NavStatus, PositionSample,
    PressureSample, StreamRequest,
};

pub trait ModeOps {
    fn from_custom_mode(mode: u32) -> Option<Self>
    where
        Self: Sized;

    fn to_custom_mode(&self) -> u32;

    /// Whether a GCS may select this mode directly
    fn gcs_settable(&self) -> bool {
        true
    }

    fn as_str(&self) -> &'static str;
}

pub trait VehicleKind {
    type Mode: ModeOps + Clone + Copy + PartialEq + Default;

    fn mav_type() -> MavType;

    fn autopilot_type() -> MavAutopilot {
        MavAutopilot::MAV_AUTOPILOT_ARDUPILOTMEGA
    }

    fn name() -> &'static str;

    /// Heartbeat base-mode flags for the given mode/armed state
    fn base_mode(mode: Self::Mode, armed: bool) -> MavModeFlag;

    /// Heartbeat system status for the given mode
    fn system_status(mode: Self::Mode) -> MavState;

    /// Kind-specific command dispatch, tried before the common handler.
    ///
    /// Returns `None` when this kind has no handler for the command.
    fn handle_command<F>(facade: &mut F, cmd: &COMMAND_LONG_DATA) -> Option<MavResult>
    where
        F: VehicleFacade<Kind = Self>,
        Self: Sized;

    /// Kind-specific inbound message hook (eavesdropped target telemetry,
    /// operator input). Returns true when the message was consumed.
    fn handle_message<F>(facade: &mut F, msg: &MavMessage) -> bool
    where
        F: VehicleFacade<Kind = Self>,
        Self: Sized;
}

/// Actions and state the protocol layer consumes from the running vehicle
pub trait VehicleFacade {
    type Kind: VehicleKind;

    // --- state snapshots ---

    fn current_mode(&self) -> <Self::Kind as VehicleKind>::Mode;
    fn armed(&self) -> bool;
    fn home(&self) -> Option<Location>;
    fn battery(&self) -> BatteryInfo;
    fn nav_status(&self) -> NavStatus;
    fn gps_fix(&self) -> GpsFix;
    fn attitude(&self) -> Attitude;
    /// Fused position estimate; None until one is available
    fn position(&self) -> Option<PositionSample>;
    fn imu_sample(&self) -> ImuSample;
    fn pressure_sample(&self) -> PressureSample;
    fn servo_outputs(&self) -> [u16; 8];
    fn rc_inputs(&self) -> [u16; 8];
    fn board_voltage_mv(&self) -> u16;
    /// Main-loop load in percent
    fn load_average(&self) -> f32;

    // --- actions ---

    fn arm_servos(&mut self) -> bool;
    fn disarm_servos(&mut self) -> bool;
    fn set_mode(&mut self, mode: <Self::Kind as VehicleKind>::Mode, reason: ModeReason) -> bool;
    fn set_home(&mut self, home: Location) -> bool;
    /// Drive one servo to a raw position for ground testing
    fn servo_test(&mut self, channel: f32, position: f32) -> bool;
    /// Ask a remote system to start sending one of its data streams
    fn request_stream(&mut self, sysid: u8, compid: u8, stream: StreamRequest) -> bool;
    fn start_baro_calibration(&mut self) -> bool {
        false
    }

    // --- tracked-vehicle telemetry hooks ---

    fn update_target_position(&mut self, pkt: &GLOBAL_POSITION_INT_DATA);
    fn update_target_pressure(&mut self, pkt: &SCALED_PRESSURE_DATA);
    fn manual_control(&mut self, _pkt: &MANUAL_CONTROL_DATA) {}
}

/// Float equality within a small epsilon, for command parameters
pub(crate) fn is_equal(a: f32, b: f32) -> bool {
    libm::fabsf(a - b) < 1.0e-6
}

pub(crate) fn is_zero(v: f32) -> bool {
    is_equal(v, 0.0)
}
