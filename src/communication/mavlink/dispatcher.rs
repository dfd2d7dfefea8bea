//! Inbound Message Dispatcher
//!
//! Routes decoded MAVLink messages to the protocol handlers and collects
//! their responses for the caller to transmit on the originating channel.
//!
//! When a target system id is configured (SYSID_TARGET parameter non-zero),
//! every inbound packet from any other system is dropped before routing.
//! Messages no handler claims are offered to the vehicle kind's message hook
//! and otherwise ignored.

use crate::communication::mavlink::handlers::command::CommandHandler;
use crate::communication::mavlink::handlers::mission::HomeUploadHandler;
use crate::communication::mavlink::handlers::target::TargetLock;
use crate::communication::mavlink::status_notifier::StatusNotifier;
use crate::communication::mavlink::vehicle::{VehicleFacade, VehicleKind};
use heapless::Vec;
use mavlink::common::MavMessage;
use mavlink::MavHeader;

/// Upper bound on responses a single inbound packet can produce
pub const MAX_RESPONSES: usize = 4;

pub struct MessageDispatcher {
    command: CommandHandler,
    upload: HomeUploadHandler,
    target: TargetLock,
    notifier: StatusNotifier,
    /// Configured target system id; non-zero drops all other senders
    sysid_filter: u8,
}

impl MessageDispatcher {
    /// # Arguments
    ///
    /// * `sysid_target` - configured SYSID_TARGET value, 0 to accept any sender
    pub fn new(sysid_target: u8) -> Self {
        Self {
            command: CommandHandler::new(),
            upload: HomeUploadHandler::new(),
            target: TargetLock::new(sysid_target),
            notifier: StatusNotifier::new(),
            sysid_filter: sysid_target,
        }
    }

    pub fn target_lock(&self) -> &TargetLock {
        &self.target
    }

    pub fn notifier(&mut self) -> &mut StatusNotifier {
        &mut self.notifier
    }

    /// Retune the inbound filter to a new target system id; 0 disables it
    pub fn set_sysid_filter(&mut self, sysid: u8) {
        self.sysid_filter = sysid;
    }

    /// Route one inbound message.
    ///
    /// # Arguments
    ///
    /// * `header` - The sender's header
    /// * `msg` - The decoded message
    /// * `facade` - Vehicle state and actions
    ///
    /// # Returns
    ///
    /// The responses to transmit on the channel the message arrived on.
    pub fn handle_message<F: VehicleFacade>(
        &mut self,
        header: &MavHeader,
        msg: &MavMessage,
        facade: &mut F,
    ) -> Vec<MavMessage, MAX_RESPONSES> {
        let mut responses = Vec::new();

        if self.sysid_filter != 0 && header.system_id != self.sysid_filter {
            return responses;
        }

        match msg {
            MavMessage::HEARTBEAT(data) => {
                self.target.handle_heartbeat(header, data, facade);
            }

            MavMessage::COMMAND_LONG(data) => {
                let ack = self
                    .command
                    .handle_command_long(facade, &mut self.notifier, header, data);
                let _ = responses.push(MavMessage::COMMAND_ACK(ack));
            }

            MavMessage::MISSION_WRITE_PARTIAL_LIST(data) => {
                if let Some(request) = self.upload.handle_write_partial_list(header, data) {
                    let _ = responses.push(MavMessage::MISSION_REQUEST(request));
                }
            }

            MavMessage::MISSION_ITEM(data) => {
                let ack =
                    self.upload
                        .handle_mission_item(header, data, facade, &mut self.notifier);
                let _ = responses.push(MavMessage::MISSION_ACK(ack));
            }

            other => {
                if !<F::Kind as VehicleKind>::handle_message(facade, other) {
                    crate::log_debug!("Unhandled message from system {}", header.system_id as u32);
                }
            }
        }

        responses
    }
}

impl Default for MessageDispatcher {
    fn default() -> Self {
        Self::new(0)
    }
}
