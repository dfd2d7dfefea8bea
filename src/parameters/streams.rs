//! Stream Rate Parameters
//!
//! Per-stream-group telemetry rates (SR_* parameters). Rates are in Hz,
//! clamped to 0-10; a rate of 0 disables the group. The scheduler reads
//! these live on every servicing pass, so an operator change takes effect on
//! the next due-check.

use crate::communication::mavlink::streams::StreamId;

use super::storage::{ParamFlags, ParamValue, ParameterStore, StoreError};

/// Maximum stream rate in Hz
pub const MAX_STREAM_RATE_HZ: u8 = 10;

/// Parameter names, indexed by [`StreamId`]
const RATE_PARAM_NAMES: [&str; StreamId::COUNT] = [
    "SR_RAW_SENS",
    "SR_EXT_STAT",
    "SR_RC_CHAN",
    "SR_RAW_CTRL",
    "SR_POSITION",
    "SR_EXTRA1",
    "SR_EXTRA2",
    "SR_EXTRA3",
    "SR_PARAMS",
];

/// Default rates in Hz: 1 Hz everywhere, 10 Hz for the parameter stream
const RATE_DEFAULTS: [u8; StreamId::COUNT] = [1, 1, 1, 1, 1, 1, 1, 1, 10];

/// Snapshot of the SR_* rates consulted by the telemetry scheduler
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StreamRateParams {
    rates: [u8; StreamId::COUNT],
}

impl StreamRateParams {
    /// Compiled-in defaults
    pub fn defaults() -> Self {
        Self {
            rates: RATE_DEFAULTS,
        }
    }

    /// Read the current rates from the store.
    ///
    /// Missing or mistyped entries fall back to the default; everything is
    /// clamped to the 0-10 Hz range.
    pub fn from_store(store: &ParameterStore) -> Self {
        let mut rates = RATE_DEFAULTS;
        for (i, name) in RATE_PARAM_NAMES.iter().enumerate() {
            if let Some(v) = store.get_int(name) {
                rates[i] = v.clamp(0, MAX_STREAM_RATE_HZ as i32) as u8;
            }
        }
        Self { rates }
    }

    /// Register the SR_* parameters with their default values
    pub fn register_defaults(store: &mut ParameterStore) -> Result<(), StoreError> {
        for (name, default) in RATE_PARAM_NAMES.iter().zip(RATE_DEFAULTS) {
            store.register(name, ParamValue::Int(default as i32), ParamFlags::empty())?;
        }
        Ok(())
    }

    pub fn rate(&self, id: StreamId) -> u8 {
        self.rates[id.index()]
    }

    pub fn set_rate(&mut self, id: StreamId, hz: u8) {
        self.rates[id.index()] = hz.min(MAX_STREAM_RATE_HZ);
    }
}

impl Default for StreamRateParams {
    fn default() -> Self {
        Self::defaults()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let rates = StreamRateParams::defaults();
        assert_eq!(rates.rate(StreamId::RawSensors), 1);
        assert_eq!(rates.rate(StreamId::Extra1), 1);
        assert_eq!(rates.rate(StreamId::Params), 10);
    }

    #[test]
    fn test_from_store_clamps() {
        let mut store = ParameterStore::new();
        StreamRateParams::register_defaults(&mut store).unwrap();

        store.set("SR_EXTRA1", ParamValue::Int(50)).unwrap();
        store.set("SR_POSITION", ParamValue::Int(-3)).unwrap();

        let rates = StreamRateParams::from_store(&store);
        assert_eq!(rates.rate(StreamId::Extra1), 10); // clamped down
        assert_eq!(rates.rate(StreamId::Position), 0); // clamped up
        assert_eq!(rates.rate(StreamId::ExtendedStatus), 1); // untouched default
    }

    #[test]
    fn test_from_store_missing_uses_defaults() {
        let store = ParameterStore::new();
        let rates = StreamRateParams::from_store(&store);
        assert_eq!(rates, StreamRateParams::defaults());
    }

    #[test]
    fn test_set_rate_clamps() {
        let mut rates = StreamRateParams::defaults();
        rates.set_rate(StreamId::Extra3, 200);
        assert_eq!(rates.rate(StreamId::Extra3), MAX_STREAM_RATE_HZ);
    }
}
