//! Startup binding between the settings store and the configuration state.
//!
//! On startup every persisted key that is missing from the store is seeded
//! with its documented default, then all seven values are read back into a
//! [`StoredSettings`] snapshot. Seeding is idempotent: existing values are
//! never overwritten.

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

use super::{SettingKey, SettingsStore};

/// Snapshot of the seven persisted scalars.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StoredSettings {
    /// Relative move distance in degrees.
    pub relative_move: f32,
    /// Absolute move target in degrees.
    pub absolute_position: f32,
    /// Motor steps per revolution.
    pub steps_per_rev: i32,
    /// Table degrees per motor revolution.
    pub degrees_per_rev: f32,
    /// Driver microstep setting.
    pub micro_steps: i32,
    /// Velocity in degrees per second.
    pub degrees_per_sec: i32,
    /// Acceleration in degrees per second squared.
    pub degrees_accel: i32,
}

impl Default for StoredSettings {
    fn default() -> Self {
        Self {
            relative_move: 90.0,
            absolute_position: 90.0,
            steps_per_rev: 200,
            degrees_per_rev: 5.0,
            micro_steps: 4,
            degrees_per_sec: 20,
            degrees_accel: 20,
        }
    }
}

/// Seed missing keys with defaults, then read the full snapshot.
pub fn load_or_init<S: SettingsStore>(store: &mut S) -> Result<StoredSettings, SettingsError> {
    let defaults = StoredSettings::default();

    for key in SettingKey::ALL {
        if store.has(key) {
            continue;
        }
        match key {
            SettingKey::RelativeMove => store.put_float(key, defaults.relative_move)?,
            SettingKey::AbsolutePosition => store.put_float(key, defaults.absolute_position)?,
            SettingKey::StepsPerRev => store.put_int(key, defaults.steps_per_rev)?,
            SettingKey::DegreesPerRev => store.put_float(key, defaults.degrees_per_rev)?,
            SettingKey::MicroSteps => store.put_int(key, defaults.micro_steps)?,
            SettingKey::DegreesPerSec => store.put_int(key, defaults.degrees_per_sec)?,
            SettingKey::DegreesAccel => store.put_int(key, defaults.degrees_accel)?,
        }
    }

    Ok(StoredSettings {
        relative_move: store.get_float(SettingKey::RelativeMove)?,
        absolute_position: store.get_float(SettingKey::AbsolutePosition)?,
        steps_per_rev: store.get_int(SettingKey::StepsPerRev)?,
        degrees_per_rev: store.get_float(SettingKey::DegreesPerRev)?,
        micro_steps: store.get_int(SettingKey::MicroSteps)?,
        degrees_per_sec: store.get_int(SettingKey::DegreesPerSec)?,
        degrees_accel: store.get_int(SettingKey::DegreesAccel)?,
    })
}
