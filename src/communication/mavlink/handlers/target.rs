//! Target Lock-On Handshake
//!
//! The tracker passively listens for heartbeats and locks onto the first
//! suitable vehicle it hears (or, when a target system id is configured,
//! onto that system only). On lock it asks the vehicle's autopilot to start
//! streaming position and barometric pressure so the pointing solution has
//! something to chew on.
//!
//! The lock is terminal for the life of the link: later heartbeats from
//! other vehicles do not steal the target.

use crate::communication::mavlink::state::StreamRequest;
use crate::communication::mavlink::vehicle::VehicleFacade;
use mavlink::common::{MavType, HEARTBEAT_DATA};
use mavlink::MavHeader;

pub struct TargetLock {
    locked: bool,
    /// Target system id; 0 accepts the first suitable vehicle heard
    sysid: u8,
    /// Component id captured from the lock heartbeat
    compid: u8,
}

impl TargetLock {
    /// # Arguments
    ///
    /// * `sysid_target` - configured target system id, 0 for first-heard
    pub const fn new(sysid_target: u8) -> Self {
        Self {
            locked: false,
            sysid: sysid_target,
            compid: 0,
        }
    }

    pub fn locked(&self) -> bool {
        self.locked
    }

    /// Current target system id; 0 until a vehicle is heard or configured
    pub fn sysid_target(&self) -> u8 {
        self.sysid
    }

    pub fn target_component(&self) -> u8 {
        self.compid
    }

    /// Consider a heartbeat for lock-on.
    ///
    /// Heartbeats from ground stations and from other pointing hardware are
    /// never lock candidates. On lock the target's autopilot is asked for
    /// the position and air-pressure streams; a refused request is not an
    /// error, the vehicle may simply already be streaming.
    pub fn handle_heartbeat<F: VehicleFacade>(
        &mut self,
        header: &MavHeader,
        data: &HEARTBEAT_DATA,
        facade: &mut F,
    ) {
        if self.locked {
            return;
        }

        match data.mavtype {
            MavType::MAV_TYPE_ANTENNA_TRACKER
            | MavType::MAV_TYPE_GCS
            | MavType::MAV_TYPE_ONBOARD_CONTROLLER
            | MavType::MAV_TYPE_GIMBAL => return,
            _ => {}
        }

        if self.sysid != 0 && header.system_id != self.sysid {
            return;
        }

        self.sysid = header.system_id;
        self.compid = header.component_id;
        self.locked = true;

        crate::log_info!("Locked on target system {}", self.sysid as u32);

        facade.request_stream(self.sysid, self.compid, StreamRequest::Position);
        facade.request_stream(self.sysid, self.compid, StreamRequest::AirPressure);
    }
}

impl Default for TargetLock {
    fn default() -> Self {
        Self::new(0)
    }
}
