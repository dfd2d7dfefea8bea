//! Core Utilities
//!
//! Shared infrastructure used across the crate. Currently this is the logging
//! abstraction; vehicle control, navigation and task scheduling live outside
//! this library.

pub mod logging;
