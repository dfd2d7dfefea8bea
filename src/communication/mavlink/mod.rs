//! MAVLink 2.0 Protocol Communication
//!
//! This module implements the MAVLink-facing side of the antenna tracker for
//! communication with Ground Control Stations (GCS) such as QGroundControl and
//! Mission Planner, and for listening to the tracked vehicle's telemetry.
//!
//! # Architecture
//!
//! - **Dispatcher**: Inbound message routing to handlers
//! - **Handlers**: Protocol-specific message handlers (telemetry, command, mission, target)
//! - **Link**: Link driver (loop timers, outbound sequencing, stream servicing)
//! - **Streams**: Static stream-group table consulted by the telemetry scheduler
//! - **State**: Value types shared between the vehicle facade and the handlers
//! - **Transport**: Channel abstraction over the radio/serial transmit path
//! - **Vehicle**: Vehicle-kind trait and the facade consumed by the handlers
//!
//! Byte-level framing (parsing and serialization of MAVLink frames) is not part
//! of this module; the integrator feeds decoded `MavMessage` values in and
//! forwards built messages to the wire.

pub mod dispatcher; // Inbound message dispatcher (routing to handlers)
pub mod handlers; // Message handlers
pub mod link; // Link driver (timers, heartbeat, stream servicing)
pub mod state; // Shared value types
pub mod status_notifier; // STATUSTEXT notification queue
pub mod streams; // Stream-group table
pub mod transport; // Transmit channel abstraction
pub mod vehicle; // Vehicle kind trait + facade
