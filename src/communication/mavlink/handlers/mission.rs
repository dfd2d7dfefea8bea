//! Home Upload Handler
//!
//! The tracker has no mission in the usual sense; the mission protocol is
//! used by ground stations to push a single "home" waypoint that anchors the
//! tracking geometry.
//!
//! # Upload Flow (GCS → Tracker)
//!
//! 1. GCS sends MISSION_WRITE_PARTIAL_LIST with start_index=0
//! 2. Tracker responds with MISSION_REQUEST for seq=0 and opens the session
//! 3. GCS sends MISSION_ITEM for seq=0
//! 4. Tracker translates the item's frame, sets home, and sends MISSION_ACK
//!
//! Every received MISSION_ITEM produces exactly one MISSION_ACK addressed to
//! its sender, whatever the outcome, and closes the session. There is no
//! session timeout: a GCS that never sends the item leaves the session open
//! until the next item arrives.

use crate::communication::mavlink::state::Location;
use crate::communication::mavlink::status_notifier::StatusNotifier;
use crate::communication::mavlink::vehicle::VehicleFacade;
use mavlink::common::{
    MavFrame, MavMissionResult, MavMissionType, MISSION_ACK_DATA, MISSION_ITEM_DATA,
    MISSION_REQUEST_DATA, MISSION_WRITE_PARTIAL_LIST_DATA,
};
use mavlink::MavHeader;

/// Mean earth radius used for the flat-earth local-frame translation, meters
const RADIUS_OF_EARTH_M: f32 = 6_378_100.0;

/// Single-waypoint home upload session
pub struct HomeUploadHandler {
    /// An upload session is open and the home item is expected next
    receiving: bool,
    /// Sequence index requested from the GCS
    request_index: u16,
}

impl HomeUploadHandler {
    pub const fn new() -> Self {
        Self {
            receiving: false,
            request_index: 0,
        }
    }

    /// Whether an upload session is open
    pub fn receiving(&self) -> bool {
        self.receiving
    }

    /// Handle MISSION_WRITE_PARTIAL_LIST.
    ///
    /// Only a window starting at index 0 is meaningful for the tracker; any
    /// other start index is ignored without a response. On success the
    /// session opens and the returned MISSION_REQUEST asks the sender for
    /// item 0.
    pub fn handle_write_partial_list(
        &mut self,
        header: &MavHeader,
        data: &MISSION_WRITE_PARTIAL_LIST_DATA,
    ) -> Option<MISSION_REQUEST_DATA> {
        if data.start_index != 0 {
            crate::log_warn!(
                "Ignoring mission write starting at {}",
                data.start_index
            );
            return None;
        }

        self.receiving = true;
        self.request_index = 0;

        Some(MISSION_REQUEST_DATA {
            target_system: header.system_id,
            target_component: header.component_id,
            seq: self.request_index,
            mission_type: MavMissionType::MAV_MISSION_TYPE_MISSION,
        })
    }

    /// Handle MISSION_ITEM.
    ///
    /// Translates the item into a canonical [`Location`], commits it as home
    /// when it is the expected seq-0 item of an open session, and always
    /// produces the single acknowledgment for the sender. The session is
    /// closed on every path.
    pub fn handle_mission_item<F: VehicleFacade>(
        &mut self,
        header: &MavHeader,
        data: &MISSION_ITEM_DATA,
        facade: &mut F,
        notifier: &mut StatusNotifier,
    ) -> MISSION_ACK_DATA {
        let home = facade.home().unwrap_or_default();
        let was_receiving = self.receiving;
        self.receiving = false;

        let result = match Self::translate_frame(data, home) {
            Err(result) => result,
            Ok(_) if !was_receiving => MavMissionResult::MAV_MISSION_ERROR,
            Ok(_) if data.seq != self.request_index => {
                // Only seq 0 can carry home; a stray index abandons the
                // session without touching it
                crate::log_warn!("Unexpected mission item seq {}", data.seq as u32);
                MavMissionResult::MAV_MISSION_ACCEPTED
            }
            Ok(location) => {
                facade.set_home(location);
                notifier.send_info("New HOME received");
                MavMissionResult::MAV_MISSION_ACCEPTED
            }
        };

        MISSION_ACK_DATA {
            target_system: header.system_id,
            target_component: header.component_id,
            mavtype: result,
            mission_type: MavMissionType::MAV_MISSION_TYPE_MISSION,
        }
    }

    /// Translate an item's coordinates into a canonical location.
    ///
    /// Global frames scale directly into 1e7 degrees / centimeter altitude.
    /// Local frames are flat-earth offsets from home with the longitude
    /// scaled by the cosine of the home latitude; NED altitude is negated.
    fn translate_frame(
        data: &MISSION_ITEM_DATA,
        home: Location,
    ) -> Result<Location, MavMissionResult> {
        match data.frame {
            MavFrame::MAV_FRAME_GLOBAL | MavFrame::MAV_FRAME_MISSION => Ok(Location {
                lat: (1.0e7 * data.x) as i32,
                lng: (1.0e7 * data.y) as i32,
                alt_cm: (data.z * 1.0e2) as i32,
                relative_alt: false,
            }),

            MavFrame::MAV_FRAME_GLOBAL_RELATIVE_ALT => Ok(Location {
                lat: (1.0e7 * data.x) as i32,
                lng: (1.0e7 * data.y) as i32,
                alt_cm: (data.z * 1.0e2) as i32,
                relative_alt: true,
            }),

            MavFrame::MAV_FRAME_LOCAL_NED => {
                Ok(Self::local_offset(home, data.x, data.y, -data.z))
            }

            MavFrame::MAV_FRAME_LOCAL_ENU => {
                Ok(Self::local_offset(home, data.x, data.y, data.z))
            }

            _ => Err(MavMissionResult::MAV_MISSION_UNSUPPORTED_FRAME),
        }
    }

    /// Flat-earth offset from home: north/east meters to 1e7 degrees
    fn local_offset(home: Location, north_m: f32, east_m: f32, up_m: f32) -> Location {
        let home_lat_rad = (home.lat as f32 / 1.0e7).to_radians();
        let dlat = (north_m / RADIUS_OF_EARTH_M).to_degrees();
        let dlng = (east_m / (RADIUS_OF_EARTH_M * libm::cosf(home_lat_rad))).to_degrees();

        Location {
            lat: (1.0e7 * dlat) as i32 + home.lat,
            lng: (1.0e7 * dlng) as i32 + home.lng,
            alt_cm: (up_m * 1.0e2) as i32,
            relative_alt: true,
        }
    }
}

impl Default for HomeUploadHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::communication::mavlink::vehicle::mock::MockTracker;
    use mavlink::common::MavCmd;

    fn gcs_header() -> MavHeader {
        MavHeader {
            system_id: 255,
            component_id: 190,
            sequence: 0,
        }
    }

    fn write_partial_list(start: i16, end: i16) -> MISSION_WRITE_PARTIAL_LIST_DATA {
        MISSION_WRITE_PARTIAL_LIST_DATA {
            start_index: start,
            end_index: end,
            target_system: 1,
            target_component: 1,
            mission_type: MavMissionType::MAV_MISSION_TYPE_MISSION,
        }
    }

    fn mission_item(seq: u16, frame: MavFrame, x: f32, y: f32, z: f32) -> MISSION_ITEM_DATA {
        MISSION_ITEM_DATA {
            param1: 0.0,
            param2: 0.0,
            param3: 0.0,
            param4: 0.0,
            x,
            y,
            z,
            seq,
            command: MavCmd::MAV_CMD_NAV_WAYPOINT,
            target_system: 1,
            target_component: 1,
            frame,
            current: 0,
            autocontinue: 1,
            mission_type: MavMissionType::MAV_MISSION_TYPE_MISSION,
        }
    }

    fn open_session(handler: &mut HomeUploadHandler) {
        let request = handler
            .handle_write_partial_list(&gcs_header(), &write_partial_list(0, 0))
            .unwrap();
        assert_eq!(request.seq, 0);
        assert_eq!(request.target_system, 255);
        assert!(handler.receiving());
    }

    #[test]
    fn test_global_frame_home_upload() {
        let mut handler = HomeUploadHandler::new();
        let mut facade = MockTracker::new();
        let mut notifier = StatusNotifier::new();
        open_session(&mut handler);

        let item = mission_item(0, MavFrame::MAV_FRAME_GLOBAL, 10.0, 20.0, 50.0);
        let ack = handler.handle_mission_item(&gcs_header(), &item, &mut facade, &mut notifier);

        assert_eq!(ack.mavtype, MavMissionResult::MAV_MISSION_ACCEPTED);
        assert_eq!(ack.target_system, 255);
        assert_eq!(ack.target_component, 190);
        assert!(!handler.receiving());
        assert_eq!(facade.set_home_calls, 1);
        assert_eq!(
            facade.home_position,
            Some(Location {
                lat: 100_000_000,
                lng: 200_000_000,
                alt_cm: 5000,
                relative_alt: false,
            })
        );
        // Operator notification queued
        assert_eq!(notifier.pending(), 1);
    }

    #[test]
    fn test_relative_alt_frame_sets_flag() {
        let mut handler = HomeUploadHandler::new();
        let mut facade = MockTracker::new();
        let mut notifier = StatusNotifier::new();
        open_session(&mut handler);

        let item = mission_item(0, MavFrame::MAV_FRAME_GLOBAL_RELATIVE_ALT, 1.0, 2.0, 30.0);
        let ack = handler.handle_mission_item(&gcs_header(), &item, &mut facade, &mut notifier);

        assert_eq!(ack.mavtype, MavMissionResult::MAV_MISSION_ACCEPTED);
        let home = facade.home_position.unwrap();
        assert!(home.relative_alt);
        assert_eq!(home.alt_cm, 3000);
    }

    #[test]
    fn test_unsupported_frame_rejected_home_unset() {
        let mut handler = HomeUploadHandler::new();
        let mut facade = MockTracker::new();
        let mut notifier = StatusNotifier::new();
        open_session(&mut handler);

        let item = mission_item(0, MavFrame::MAV_FRAME_GLOBAL_TERRAIN_ALT, 10.0, 20.0, 50.0);
        let ack = handler.handle_mission_item(&gcs_header(), &item, &mut facade, &mut notifier);

        assert_eq!(ack.mavtype, MavMissionResult::MAV_MISSION_UNSUPPORTED_FRAME);
        assert_eq!(facade.set_home_calls, 0);
        assert_eq!(facade.home_position, None);
        assert!(!handler.receiving());
    }

    #[test]
    fn test_item_without_session_rejected() {
        let mut handler = HomeUploadHandler::new();
        let mut facade = MockTracker::new();
        let mut notifier = StatusNotifier::new();

        let item = mission_item(0, MavFrame::MAV_FRAME_GLOBAL, 10.0, 20.0, 50.0);
        let ack = handler.handle_mission_item(&gcs_header(), &item, &mut facade, &mut notifier);

        assert_eq!(ack.mavtype, MavMissionResult::MAV_MISSION_ERROR);
        assert_eq!(facade.set_home_calls, 0);
    }

    #[test]
    fn test_wrong_seq_abandons_session() {
        let mut handler = HomeUploadHandler::new();
        let mut facade = MockTracker::new();
        let mut notifier = StatusNotifier::new();
        open_session(&mut handler);

        let item = mission_item(3, MavFrame::MAV_FRAME_GLOBAL, 10.0, 20.0, 50.0);
        let ack = handler.handle_mission_item(&gcs_header(), &item, &mut facade, &mut notifier);

        assert_eq!(ack.mavtype, MavMissionResult::MAV_MISSION_ACCEPTED);
        assert_eq!(facade.set_home_calls, 0);
        assert!(!handler.receiving());

        // Session is gone: a follow-up seq-0 item is now a protocol error
        let item = mission_item(0, MavFrame::MAV_FRAME_GLOBAL, 10.0, 20.0, 50.0);
        let ack = handler.handle_mission_item(&gcs_header(), &item, &mut facade, &mut notifier);
        assert_eq!(ack.mavtype, MavMissionResult::MAV_MISSION_ERROR);
    }

    #[test]
    fn test_nonzero_start_index_ignored() {
        let mut handler = HomeUploadHandler::new();
        let response =
            handler.handle_write_partial_list(&gcs_header(), &write_partial_list(2, 5));
        assert!(response.is_none());
        assert!(!handler.receiving());
    }

    #[test]
    fn test_local_ned_frame_offsets_from_home() {
        let mut handler = HomeUploadHandler::new();
        let mut facade = MockTracker::new();
        let mut notifier = StatusNotifier::new();
        // Home at the equator keeps the longitude scale factor at 1
        facade.home_position = Some(Location {
            lat: 0,
            lng: 0,
            alt_cm: 0,
            relative_alt: false,
        });
        open_session(&mut handler);

        // 1000 m north, 1000 m east, 30 m down
        let item = mission_item(0, MavFrame::MAV_FRAME_LOCAL_NED, 1000.0, 1000.0, 30.0);
        let ack = handler.handle_mission_item(&gcs_header(), &item, &mut facade, &mut notifier);

        assert_eq!(ack.mavtype, MavMissionResult::MAV_MISSION_ACCEPTED);
        let home = facade.home_position.unwrap();
        // 1000 m ≈ 0.008983 degrees ≈ 89_830 in 1e7 units
        assert!((89_000..=90_500).contains(&home.lat), "lat {}", home.lat);
        assert!((89_000..=90_500).contains(&home.lng), "lng {}", home.lng);
        // NED z is down, altitude is negated and relative
        assert_eq!(home.alt_cm, -3000);
        assert!(home.relative_alt);
    }

    #[test]
    fn test_local_enu_keeps_altitude_sign() {
        let mut handler = HomeUploadHandler::new();
        let mut facade = MockTracker::new();
        let mut notifier = StatusNotifier::new();
        open_session(&mut handler);

        let item = mission_item(0, MavFrame::MAV_FRAME_LOCAL_ENU, 0.0, 0.0, 30.0);
        handler.handle_mission_item(&gcs_header(), &item, &mut facade, &mut notifier);

        let home = facade.home_position.unwrap();
        assert_eq!(home.alt_cm, 3000);
        assert!(home.relative_alt);
    }
}
