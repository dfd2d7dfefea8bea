//! Parameter Storage
//!
//! Fixed-capacity name/value map with per-parameter flags. Values are typed;
//! a parameter keeps the type it was registered with. The store tracks a
//! dirty flag so the integrator knows when persisting is worthwhile.

use bitflags::bitflags;
use heapless::{FnvIndexMap, String};

/// Maximum parameter name length (MAVLink PARAM_* id field)
pub const PARAM_NAME_LEN: usize = 16;

/// Maximum number of parameters (power of two, FnvIndexMap requirement)
pub const PARAM_CAPACITY: usize = 32;

/// Typed parameter value
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ParamValue {
    Int(i32),
    Float(f32),
}

bitflags! {
    /// Per-parameter access flags
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct ParamFlags: u8 {
        /// Not writable through the GCS parameter protocol
        const READ_ONLY = 0b0000_0001;
        /// Not listed through the GCS parameter protocol
        const HIDDEN = 0b0000_0010;
    }
}

/// Store operation errors
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StoreError {
    /// Store is at capacity
    Full,
    /// Parameter name exceeds PARAM_NAME_LEN
    NameTooLong,
    /// Parameter does not exist
    Unknown,
    /// Value type does not match the registered type
    WrongType,
    /// Parameter is read-only for GCS writes
    ReadOnly,
}

type ParamName = String<PARAM_NAME_LEN>;

/// Fixed-capacity parameter store
pub struct ParameterStore {
    values: FnvIndexMap<ParamName, ParamValue, PARAM_CAPACITY>,
    flags: FnvIndexMap<ParamName, ParamFlags, PARAM_CAPACITY>,
    dirty: bool,
}

impl ParameterStore {
    pub fn new() -> Self {
        Self {
            values: FnvIndexMap::new(),
            flags: FnvIndexMap::new(),
            dirty: false,
        }
    }

    fn name_key(name: &str) -> Result<ParamName, StoreError> {
        ParamName::try_from(name).map_err(|_| StoreError::NameTooLong)
    }

    /// Register a parameter with its default value and flags.
    ///
    /// Registering an existing name overwrites its value and flags without
    /// marking the store dirty (defaults are not worth persisting).
    pub fn register(
        &mut self,
        name: &str,
        value: ParamValue,
        flags: ParamFlags,
    ) -> Result<(), StoreError> {
        let key = Self::name_key(name)?;
        self.flags
            .insert(key.clone(), flags)
            .map_err(|_| StoreError::Full)?;
        self.values.insert(key, value).map_err(|_| StoreError::Full)?;
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<ParamValue> {
        let key = Self::name_key(name).ok()?;
        self.values.get(&key).copied()
    }

    pub fn get_int(&self, name: &str) -> Option<i32> {
        match self.get(name)? {
            ParamValue::Int(v) => Some(v),
            ParamValue::Float(_) => None,
        }
    }

    pub fn get_float(&self, name: &str) -> Option<f32> {
        match self.get(name)? {
            ParamValue::Float(v) => Some(v),
            ParamValue::Int(_) => None,
        }
    }

    /// Update an existing parameter (internal writes bypass READ_ONLY)
    pub fn set(&mut self, name: &str, value: ParamValue) -> Result<(), StoreError> {
        let key = Self::name_key(name)?;
        let slot = self.values.get_mut(&key).ok_or(StoreError::Unknown)?;
        if core::mem::discriminant(slot) != core::mem::discriminant(&value) {
            return Err(StoreError::WrongType);
        }
        if *slot != value {
            *slot = value;
            self.dirty = true;
        }
        Ok(())
    }

    /// Update a parameter on behalf of the GCS parameter protocol
    pub fn set_from_gcs(&mut self, name: &str, value: ParamValue) -> Result<(), StoreError> {
        let flags = self.param_flags(name).ok_or(StoreError::Unknown)?;
        if flags.contains(ParamFlags::READ_ONLY) {
            return Err(StoreError::ReadOnly);
        }
        self.set(name, value)
    }

    pub fn param_flags(&self, name: &str) -> Option<ParamFlags> {
        let key = Self::name_key(name).ok()?;
        self.flags.get(&key).copied()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// A value changed since the last clear_dirty()
    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn clear_dirty(&mut self) {
        self.dirty = false;
    }
}

impl Default for ParameterStore {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_and_get() {
        let mut store = ParameterStore::new();
        store
            .register("SYSID_TARGET", ParamValue::Int(0), ParamFlags::empty())
            .unwrap();

        assert_eq!(store.get_int("SYSID_TARGET"), Some(0));
        assert_eq!(store.get_float("SYSID_TARGET"), None);
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_set_marks_dirty() {
        let mut store = ParameterStore::new();
        store
            .register("SR_EXTRA1", ParamValue::Int(1), ParamFlags::empty())
            .unwrap();

        store.set("SR_EXTRA1", ParamValue::Int(5)).unwrap();
        assert_eq!(store.get_int("SR_EXTRA1"), Some(5));
        assert!(store.is_dirty());

        store.clear_dirty();
        // Writing the same value back is not a change
        store.set("SR_EXTRA1", ParamValue::Int(5)).unwrap();
        assert!(!store.is_dirty());
    }

    #[test]
    fn test_set_unknown_and_wrong_type() {
        let mut store = ParameterStore::new();
        store
            .register("SR_EXTRA1", ParamValue::Int(1), ParamFlags::empty())
            .unwrap();

        assert_eq!(
            store.set("NOPE", ParamValue::Int(1)),
            Err(StoreError::Unknown)
        );
        assert_eq!(
            store.set("SR_EXTRA1", ParamValue::Float(1.0)),
            Err(StoreError::WrongType)
        );
    }

    #[test]
    fn test_gcs_write_respects_read_only() {
        let mut store = ParameterStore::new();
        store
            .register("FORMAT_VERSION", ParamValue::Int(1), ParamFlags::READ_ONLY)
            .unwrap();

        assert_eq!(
            store.set_from_gcs("FORMAT_VERSION", ParamValue::Int(2)),
            Err(StoreError::ReadOnly)
        );
        // Internal writes still allowed
        store.set("FORMAT_VERSION", ParamValue::Int(2)).unwrap();
        assert_eq!(store.get_int("FORMAT_VERSION"), Some(2));
    }

    #[test]
    fn test_name_too_long() {
        let mut store = ParameterStore::new();
        assert_eq!(
            store.register(
                "THIS_NAME_IS_MUCH_TOO_LONG",
                ParamValue::Int(0),
                ParamFlags::empty()
            ),
            Err(StoreError::NameTooLong)
        );
    }
}
