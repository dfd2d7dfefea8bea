//! Transmit Channel Abstraction
//!
//! This module provides a trait-based abstraction over the outbound side of a
//! GCS link (serial radio, UART, UDP), mirroring ArduPilot's
//! `comm_get_txspace` / `comm_send` pair.
//!
//! # Design
//!
//! - **Trait-based**: `GcsChannel` defines the interface; monomorphization
//!   keeps it zero-cost
//! - **Synchronous**: the whole GCS layer runs inside one cooperative control
//!   loop, so channel operations never block on the caller's behalf — a send
//!   either queues into the transport's transmit buffer or fails
//! - **Budgeted**: `txspace()` exposes the free transmit-buffer space so the
//!   telemetry scheduler can defer messages that would not fit
//!
//! Inbound framing is not part of this trait: the integrator parses raw bytes
//! into `MavMessage` values and feeds them to the dispatcher directly.

use core::fmt;

use mavlink::common::MavMessage;
use mavlink::MavHeader;

/// Outbound channel to one GCS link
///
/// Implementations are expected to encode the message with the MAVLink v2
/// framing and place it into their transmit buffer. A full buffer is reported
/// through `txspace()`, not by blocking in `send()`.
pub trait GcsChannel {
    /// Free space in the transmit buffer, in bytes
    fn txspace(&self) -> usize;

    /// Encode and queue one message for transmission
    ///
    /// # Returns
    ///
    /// - `Ok(())` - Message queued
    /// - `Err(TransportError)` - I/O error, timeout, or disconnection
    fn send(&mut self, header: &MavHeader, msg: &MavMessage) -> Result<(), TransportError>;
}

/// Transport error types
///
/// Categorizes transport failures for appropriate error handling.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TransportError {
    /// Generic I/O error (hardware failure, driver error)
    IoError,
    /// Operation timed out
    Timeout,
    /// Transport is no longer available for communication
    Disconnected,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TransportError::IoError => write!(f, "I/O error"),
            TransportError::Timeout => write!(f, "Operation timed out"),
            TransportError::Disconnected => write!(f, "Transport disconnected"),
        }
    }
}
