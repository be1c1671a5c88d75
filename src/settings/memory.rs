//! In-memory settings store.
//!
//! Backs the settings boundary with a fixed-size slot table. Intended for
//! host-side testing and for targets whose persistence layer is wired up
//! separately.

use crate::error::SettingsError;

use super::{SettingKey, SettingsStore};

#[derive(Debug, Clone, Copy, PartialEq)]
enum Slot {
    Float(f32),
    Int(i32),
}

/// Volatile settings store holding one typed slot per key.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slots: [Option<Slot>; SettingKey::ALL.len()],
}

impl MemoryStore {
    /// Create an empty store.
    pub const fn new() -> Self {
        Self {
            slots: [None; SettingKey::ALL.len()],
        }
    }
}

impl SettingsStore for MemoryStore {
    fn has(&self, key: SettingKey) -> bool {
        self.slots[key.index()].is_some()
    }

    fn get_float(&self, key: SettingKey) -> Result<f32, SettingsError> {
        match self.slots[key.index()] {
            Some(Slot::Float(value)) => Ok(value),
            _ => Err(SettingsError::ReadFailed(key)),
        }
    }

    fn get_int(&self, key: SettingKey) -> Result<i32, SettingsError> {
        match self.slots[key.index()] {
            Some(Slot::Int(value)) => Ok(value),
            _ => Err(SettingsError::ReadFailed(key)),
        }
    }

    fn put_float(&mut self, key: SettingKey, value: f32) -> Result<(), SettingsError> {
        self.slots[key.index()] = Some(Slot::Float(value));
        Ok(())
    }

    fn put_int(&mut self, key: SettingKey, value: i32) -> Result<(), SettingsError> {
        self.slots[key.index()] = Some(Slot::Int(value));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let mut store = MemoryStore::new();
        assert!(!store.has(SettingKey::DegreesPerRev));

        store.put_float(SettingKey::DegreesPerRev, 5.0).unwrap();
        assert!(store.has(SettingKey::DegreesPerRev));
        assert!((store.get_float(SettingKey::DegreesPerRev).unwrap() - 5.0).abs() < 1e-6);
    }

    #[test]
    fn test_type_mismatch_is_read_failure() {
        let mut store = MemoryStore::new();
        store.put_int(SettingKey::StepsPerRev, 200).unwrap();

        assert_eq!(
            store.get_float(SettingKey::StepsPerRev),
            Err(SettingsError::ReadFailed(SettingKey::StepsPerRev))
        );
    }

    #[test]
    fn test_missing_key_is_read_failure() {
        let store = MemoryStore::new();
        assert_eq!(
            store.get_int(SettingKey::MicroSteps),
            Err(SettingsError::ReadFailed(SettingKey::MicroSteps))
        );
    }
}
