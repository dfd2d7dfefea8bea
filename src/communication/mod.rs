//! Communication Protocols
//!
//! This module provides communication protocol implementations for the tracker,
//! including MAVLink for ground control station integration.
//!
//! # Protocols
//!
//! - **MAVLink 2.0**: Primary GCS communication protocol
//!   - Telemetry streaming (HEARTBEAT, ATTITUDE, GPS, stream groups)
//!   - Command execution (COMMAND_LONG)
//!   - Home upload (MISSION_WRITE_PARTIAL_LIST / MISSION_ITEM)
//!   - Target vehicle lock-on (HEARTBEAT handshake)

pub mod mavlink;
