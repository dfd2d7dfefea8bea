//! Antenna tracker vehicle kind
//!
//! Mode numbering and heartbeat summary follow the ArduPilot AntennaTracker
//! conventions so existing ground stations recognize the vehicle.

use super::{is_equal, is_zero, ModeOps, VehicleFacade, VehicleKind};
use crate::communication::mavlink::state::ModeReason;
use mavlink::common::{
    COMMAND_LONG_DATA, MavCmd, MavComponent, MavMessage, MavModeFlag, MavResult, MavState, MavType,
};

/// Tracker operating modes, by wire custom-mode number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TrackerMode {
    Manual = 0,
    Stop = 1,
    Scan = 2,
    ServoTest = 3,
    Auto = 10,
    #[default]
    Initialising = 16,
}

impl ModeOps for TrackerMode {
    fn from_custom_mode(mode: u32) -> Option<Self> {
        match mode {
            0 => Some(TrackerMode::Manual),
            1 => Some(TrackerMode::Stop),
            2 => Some(TrackerMode::Scan),
            3 => Some(TrackerMode::ServoTest),
            10 => Some(TrackerMode::Auto),
            16 => Some(TrackerMode::Initialising),
            _ => None,
        }
    }

    fn to_custom_mode(&self) -> u32 {
        *self as u32
    }

    fn gcs_settable(&self) -> bool {
        !matches!(self, TrackerMode::Initialising)
    }

    fn as_str(&self) -> &'static str {
        match self {
            TrackerMode::Manual => "MANUAL",
            TrackerMode::Stop => "STOP",
            TrackerMode::Scan => "SCAN",
            TrackerMode::ServoTest => "SERVO_TEST",
            TrackerMode::Auto => "AUTO",
            TrackerMode::Initialising => "INITIALISING",
        }
    }
}

#[derive(Clone, Copy)]
pub struct AntennaTracker;

impl VehicleKind for AntennaTracker {
    type Mode = TrackerMode;

    fn mav_type() -> MavType {
        MavType::MAV_TYPE_ANTENNA_TRACKER
    }

    fn name() -> &'static str {
        "Tracker"
    }

    fn base_mode(mode: TrackerMode, armed: bool) -> MavModeFlag {
        // All modes are custom-numbered on the wire
        let mut flags = MavModeFlag::MAV_MODE_FLAG_CUSTOM_MODE_ENABLED;

        match mode {
            TrackerMode::Manual => {
                flags |= MavModeFlag::MAV_MODE_FLAG_MANUAL_INPUT_ENABLED;
            }
            TrackerMode::Scan | TrackerMode::ServoTest | TrackerMode::Auto => {
                // Positions are aimed by the controller, not the operator
                flags |= MavModeFlag::MAV_MODE_FLAG_GUIDED_ENABLED
                    | MavModeFlag::MAV_MODE_FLAG_STABILIZE_ENABLED;
            }
            TrackerMode::Stop | TrackerMode::Initialising => {}
        }

        if armed {
            flags |= MavModeFlag::MAV_MODE_FLAG_SAFETY_ARMED;
        }

        flags
    }

    fn system_status(mode: TrackerMode) -> MavState {
        match mode {
            TrackerMode::Initialising => MavState::MAV_STATE_CALIBRATING,
            _ => MavState::MAV_STATE_ACTIVE,
        }
    }

    fn handle_command<F>(facade: &mut F, cmd: &COMMAND_LONG_DATA) -> Option<MavResult>
    where
        F: VehicleFacade<Kind = Self>,
    {
        match cmd.command {
            MavCmd::MAV_CMD_COMPONENT_ARM_DISARM => {
                // Arming is only accepted when addressed to the system
                // control component
                let result = if cmd.target_component
                    == MavComponent::MAV_COMP_ID_SYSTEM_CONTROL as u8
                {
                    if is_equal(cmd.param1, 1.0) {
                        facade.arm_servos();
                        MavResult::MAV_RESULT_ACCEPTED
                    } else if is_zero(cmd.param1) {
                        facade.disarm_servos();
                        MavResult::MAV_RESULT_ACCEPTED
                    } else {
                        MavResult::MAV_RESULT_UNSUPPORTED
                    }
                } else {
                    MavResult::MAV_RESULT_UNSUPPORTED
                };
                Some(result)
            }

            MavCmd::MAV_CMD_DO_SET_SERVO => {
                let result = if facade.servo_test(cmd.param1, cmd.param2) {
                    MavResult::MAV_RESULT_ACCEPTED
                } else {
                    MavResult::MAV_RESULT_FAILED
                };
                Some(result)
            }

            MavCmd::MAV_CMD_MISSION_START => {
                facade.set_mode(TrackerMode::Auto, ModeReason::GcsCommand);
                Some(MavResult::MAV_RESULT_ACCEPTED)
            }

            _ => None,
        }
    }

    fn handle_message<F>(facade: &mut F, msg: &MavMessage) -> bool
    where
        F: VehicleFacade<Kind = Self>,
    {
        match msg {
            // Telemetry eavesdropped from the tracked vehicle
            MavMessage::GLOBAL_POSITION_INT(pkt) => {
                facade.update_target_position(pkt);
                true
            }
            MavMessage::SCALED_PRESSURE(pkt) => {
                facade.update_target_pressure(pkt);
                true
            }
            MavMessage::MANUAL_CONTROL(pkt) => {
                facade.manual_control(pkt);
                true
            }
            _ => false,
        }
    }
}
