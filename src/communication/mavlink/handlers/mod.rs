//! MAVLink Message Handlers
//!
//! Protocol-specific handlers driven by the dispatcher and the link driver:
//!
//! - `telemetry` - stream-group scheduler and message builders
//! - `command` - COMMAND_LONG dispatch and acknowledgment
//! - `mission` - single-waypoint home upload handshake
//! - `target` - target vehicle lock-on handshake

pub mod command;
pub mod mission;
pub mod target;
pub mod telemetry;
