//! Command Protocol Handler
//!
//! Routes COMMAND_LONG packets to vehicle actions and produces exactly one
//! COMMAND_ACK per inbound packet. The vehicle kind's own dispatch hook is
//! consulted first (arm/disarm, servo test, mission start for the tracker);
//! commands it declines fall through to the common handler (mode change,
//! preflight calibration); anything left is UNSUPPORTED.
//!
//! The handler is stateless apart from side effects on the vehicle facade —
//! no retries, no deferral.

use crate::communication::mavlink::status_notifier::StatusNotifier;
use crate::communication::mavlink::vehicle::{is_equal, ModeOps, VehicleFacade, VehicleKind};
use mavlink::common::{COMMAND_ACK_DATA, COMMAND_LONG_DATA, MavCmd, MavResult};
use mavlink::MavHeader;

pub struct CommandHandler;

impl CommandHandler {
    pub fn new() -> Self {
        Self
    }

    /// Handle a COMMAND_LONG packet.
    ///
    /// # Arguments
    ///
    /// * `facade` - Vehicle actions target
    /// * `notifier` - Operator status queue
    /// * `header` - Sender's header, used to address the ack
    /// * `cmd` - The received command
    ///
    /// # Returns
    ///
    /// The acknowledgment to transmit back to the sender.
    pub fn handle_command_long<F: VehicleFacade>(
        &self,
        facade: &mut F,
        notifier: &mut StatusNotifier,
        header: &MavHeader,
        cmd: &COMMAND_LONG_DATA,
    ) -> COMMAND_ACK_DATA {
        notifier.send_info("Command received");

        let result = <F::Kind as VehicleKind>::handle_command(facade, cmd)
            .unwrap_or_else(|| self.handle_command_default(facade, cmd));

        crate::log_debug!(
            "COMMAND_LONG {} -> {}",
            cmd.command as u32,
            result as u32
        );

        COMMAND_ACK_DATA {
            command: cmd.command,
            result,
            progress: 0,
            result_param2: 0,
            target_system: header.system_id,
            target_component: header.component_id,
        }
    }

    /// Common commands shared by every vehicle kind
    fn handle_command_default<F: VehicleFacade>(
        &self,
        facade: &mut F,
        cmd: &COMMAND_LONG_DATA,
    ) -> MavResult {
        use crate::communication::mavlink::state::ModeReason;

        match cmd.command {
            MavCmd::MAV_CMD_DO_SET_MODE => {
                let custom = cmd.param2 as u32;
                match <F::Kind as VehicleKind>::Mode::from_custom_mode(custom) {
                    Some(mode) if mode.gcs_settable() => {
                        if facade.set_mode(mode, ModeReason::GcsCommand) {
                            MavResult::MAV_RESULT_ACCEPTED
                        } else {
                            MavResult::MAV_RESULT_FAILED
                        }
                    }
                    _ => MavResult::MAV_RESULT_DENIED,
                }
            }

            MavCmd::MAV_CMD_PREFLIGHT_CALIBRATION => {
                // param3 == 1 requests ground-pressure (baro) calibration
                if is_equal(cmd.param3, 1.0) {
                    if facade.start_baro_calibration() {
                        MavResult::MAV_RESULT_ACCEPTED
                    } else {
                        MavResult::MAV_RESULT_FAILED
                    }
                } else {
                    MavResult::MAV_RESULT_UNSUPPORTED
                }
            }

            _ => MavResult::MAV_RESULT_UNSUPPORTED,
        }
    }
}

impl Default for CommandHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communication::mavlink::state::ModeReason;
    use crate::communication::mavlink::vehicle::mock::MockTracker;
    use crate::communication::mavlink::vehicle::TrackerMode;
    use mavlink::common::MavComponent;

    const SYSTEM_CONTROL: u8 = MavComponent::MAV_COMP_ID_SYSTEM_CONTROL as u8;

    fn create_command_long(
        command: MavCmd,
        param1: f32,
        param2: f32,
        param3: f32,
        target_component: u8,
    ) -> COMMAND_LONG_DATA {
        COMMAND_LONG_DATA {
            param1,
            param2,
            param3,
            param4: 0.0,
            param5: 0.0,
            param6: 0.0,
            param7: 0.0,
            command,
            target_system: 1,
            target_component,
            confirmation: 0,
        }
    }

    fn gcs_header() -> MavHeader {
        MavHeader {
            system_id: 255,
            component_id: 190,
            sequence: 0,
        }
    }

    fn handle(
        facade: &mut MockTracker,
        cmd: &COMMAND_LONG_DATA,
    ) -> COMMAND_ACK_DATA {
        let handler = CommandHandler::new();
        let mut notifier = StatusNotifier::new();
        handler.handle_command_long(facade, &mut notifier, &gcs_header(), cmd)
    }

    #[test]
    fn test_arm_accepted_once() {
        let mut facade = MockTracker::new();
        let cmd = create_command_long(
            MavCmd::MAV_CMD_COMPONENT_ARM_DISARM,
            1.0,
            0.0,
            0.0,
            SYSTEM_CONTROL,
        );

        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.result, MavResult::MAV_RESULT_ACCEPTED);
        assert_eq!(ack.command, MavCmd::MAV_CMD_COMPONENT_ARM_DISARM);
        assert_eq!(facade.arm_calls, 1);
        assert_eq!(facade.disarm_calls, 0);
    }

    #[test]
    fn test_disarm_accepted() {
        let mut facade = MockTracker::new();
        facade.is_armed = true;
        let cmd = create_command_long(
            MavCmd::MAV_CMD_COMPONENT_ARM_DISARM,
            0.0,
            0.0,
            0.0,
            SYSTEM_CONTROL,
        );

        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.result, MavResult::MAV_RESULT_ACCEPTED);
        assert_eq!(facade.disarm_calls, 1);
        assert!(!facade.is_armed);
    }

    #[test]
    fn test_arm_fractional_param_unsupported() {
        let mut facade = MockTracker::new();
        let cmd = create_command_long(
            MavCmd::MAV_CMD_COMPONENT_ARM_DISARM,
            0.5,
            0.0,
            0.0,
            SYSTEM_CONTROL,
        );

        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.result, MavResult::MAV_RESULT_UNSUPPORTED);
        assert_eq!(facade.arm_calls, 0);
        assert_eq!(facade.disarm_calls, 0);
    }

    #[test]
    fn test_arm_wrong_component_unsupported() {
        let mut facade = MockTracker::new();
        let cmd = create_command_long(
            MavCmd::MAV_CMD_COMPONENT_ARM_DISARM,
            1.0,
            0.0,
            0.0,
            1, // autopilot component, not system control
        );

        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.result, MavResult::MAV_RESULT_UNSUPPORTED);
        assert_eq!(facade.arm_calls, 0);
    }

    #[test]
    fn test_servo_test_delegates_result() {
        let mut facade = MockTracker::new();
        let cmd = create_command_long(MavCmd::MAV_CMD_DO_SET_SERVO, 2.0, 1700.0, 0.0, 1);

        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.result, MavResult::MAV_RESULT_ACCEPTED);
        assert_eq!(facade.servo_test_calls.len(), 1);
        assert_eq!(facade.servo_test_calls[0], (2.0, 1700.0));

        facade.servo_test_result = false;
        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.result, MavResult::MAV_RESULT_FAILED);
    }

    #[test]
    fn test_mission_start_forces_auto() {
        let mut facade = MockTracker::new();
        let cmd = create_command_long(MavCmd::MAV_CMD_MISSION_START, 0.0, 0.0, 0.0, 1);

        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.result, MavResult::MAV_RESULT_ACCEPTED);
        assert_eq!(
            facade.set_mode_calls.as_slice(),
            &[(TrackerMode::Auto, ModeReason::GcsCommand)]
        );
    }

    #[test]
    fn test_do_set_mode_common_handler() {
        let mut facade = MockTracker::new();
        let cmd =
            create_command_long(MavCmd::MAV_CMD_DO_SET_MODE, 0.0, 2.0, 0.0, 1);

        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.result, MavResult::MAV_RESULT_ACCEPTED);
        assert_eq!(facade.mode, TrackerMode::Scan);
    }

    #[test]
    fn test_do_set_mode_rejects_unknown_and_initialising() {
        let mut facade = MockTracker::new();

        let unknown =
            create_command_long(MavCmd::MAV_CMD_DO_SET_MODE, 0.0, 7.0, 0.0, 1);
        assert_eq!(
            handle(&mut facade, &unknown).result,
            MavResult::MAV_RESULT_DENIED
        );

        let initialising =
            create_command_long(MavCmd::MAV_CMD_DO_SET_MODE, 0.0, 16.0, 0.0, 1);
        assert_eq!(
            handle(&mut facade, &initialising).result,
            MavResult::MAV_RESULT_DENIED
        );
        assert!(facade.set_mode_calls.is_empty());
    }

    #[test]
    fn test_preflight_baro_calibration() {
        let mut facade = MockTracker::new();
        let cmd = create_command_long(
            MavCmd::MAV_CMD_PREFLIGHT_CALIBRATION,
            0.0,
            0.0,
            1.0,
            1,
        );

        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.result, MavResult::MAV_RESULT_ACCEPTED);
        assert_eq!(facade.baro_cal_calls, 1);

        // Other calibration selectors are not supported
        let gyro = create_command_long(
            MavCmd::MAV_CMD_PREFLIGHT_CALIBRATION,
            1.0,
            0.0,
            0.0,
            1,
        );
        assert_eq!(
            handle(&mut facade, &gyro).result,
            MavResult::MAV_RESULT_UNSUPPORTED
        );
        assert_eq!(facade.baro_cal_calls, 1);
    }

    #[test]
    fn test_unknown_command_unsupported() {
        let mut facade = MockTracker::new();
        let cmd = create_command_long(MavCmd::MAV_CMD_NAV_TAKEOFF, 0.0, 0.0, 0.0, 1);

        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.result, MavResult::MAV_RESULT_UNSUPPORTED);
    }

    #[test]
    fn test_ack_addresses_sender() {
        let mut facade = MockTracker::new();
        let cmd = create_command_long(MavCmd::MAV_CMD_MISSION_START, 0.0, 0.0, 0.0, 1);

        let ack = handle(&mut facade, &cmd);
        assert_eq!(ack.target_system, 255);
        assert_eq!(ack.target_component, 190);
    }
}
