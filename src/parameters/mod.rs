//! Operator Parameters
//!
//! In-memory parameter store and the typed views the GCS layer reads from it.
//! Persistence (flash, file) is the integrator's concern; this library only
//! needs live values and a dirty flag to know when a save is worthwhile.
//!
//! # Parameters consumed by this crate
//!
//! - `SR_*` - per-stream-group telemetry rates in Hz, range 0-10
//!   (see [`streams::StreamRateParams`])
//! - `SYSID_TARGET` - system id of the vehicle to track; 0 = lock onto the
//!   first trackable vehicle heard

pub mod storage;
pub mod streams;

pub use storage::{ParamFlags, ParamValue, ParameterStore, StoreError};
pub use streams::StreamRateParams;
