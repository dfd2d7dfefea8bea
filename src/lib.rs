#![cfg_attr(not(test), no_std)]

//! pico_track - Ground-station communication layer for an antenna tracker
//!
//! This library implements the GCS-facing side of an antenna tracker: rate-limited
//! telemetry streaming, inbound command dispatch, the target-lock handshake, and the
//! single-waypoint home upload protocol. Byte-level MAVLink framing and the physical
//! transport are supplied by the integrator through the transport trait.

// Core utilities (logging)
pub mod core;

// Communication protocols (MAVLink GCS link)
pub mod communication;

// Operator-tunable parameters (stream rates, target system id)
pub mod parameters;
