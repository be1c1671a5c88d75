//! Persisted-settings boundary.
//!
//! The core reads and writes seven named scalars through the [`SettingsStore`]
//! trait; what sits behind it (flash preferences, a TOML file, a test map) is
//! the integrator's choice. [`binder`] seeds missing keys with documented
//! defaults at startup and snapshots the stored values.

pub mod binder;
mod memory;

#[cfg(feature = "std")]
mod file;

pub use binder::{load_or_init, StoredSettings};
pub use memory::MemoryStore;

#[cfg(feature = "std")]
pub use file::TomlStore;

use crate::error::SettingsError;

/// Identifier for a persisted scalar.
///
/// Each key renders to the store's string name, kept stable so snapshots
/// written by earlier firmware remain readable.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SettingKey {
    /// User-defined relative move distance (float degrees).
    RelativeMove,
    /// User-defined absolute move target (float degrees).
    AbsolutePosition,
    /// Motor steps per revolution (integer).
    StepsPerRev,
    /// Table degrees per motor revolution (float).
    DegreesPerRev,
    /// Driver microstep setting (integer).
    MicroSteps,
    /// Velocity in degrees per second (integer).
    DegreesPerSec,
    /// Acceleration in degrees per second squared (integer).
    DegreesAccel,
}

impl SettingKey {
    /// All keys, in seeding order.
    pub const ALL: [SettingKey; 7] = [
        SettingKey::RelativeMove,
        SettingKey::AbsolutePosition,
        SettingKey::StepsPerRev,
        SettingKey::DegreesPerRev,
        SettingKey::MicroSteps,
        SettingKey::DegreesPerSec,
        SettingKey::DegreesAccel,
    ];

    /// The store-facing name of this key.
    pub fn as_str(self) -> &'static str {
        match self {
            SettingKey::RelativeMove => "relativeMove",
            SettingKey::AbsolutePosition => "absolutePos",
            SettingKey::StepsPerRev => "stepsRev",
            SettingKey::DegreesPerRev => "degreesRev",
            SettingKey::MicroSteps => "microSteps",
            SettingKey::DegreesPerSec => "degSec",
            SettingKey::DegreesAccel => "degAcc",
        }
    }

    pub(crate) fn index(self) -> usize {
        match self {
            SettingKey::RelativeMove => 0,
            SettingKey::AbsolutePosition => 1,
            SettingKey::StepsPerRev => 2,
            SettingKey::DegreesPerRev => 3,
            SettingKey::MicroSteps => 4,
            SettingKey::DegreesPerSec => 5,
            SettingKey::DegreesAccel => 6,
        }
    }
}

/// Abstract persisted key/value store for named scalars.
pub trait SettingsStore {
    /// Check whether a value exists for the key.
    fn has(&self, key: SettingKey) -> bool;

    /// Read a float value.
    fn get_float(&self, key: SettingKey) -> Result<f32, SettingsError>;

    /// Read an integer value.
    fn get_int(&self, key: SettingKey) -> Result<i32, SettingsError>;

    /// Write a float value.
    fn put_float(&mut self, key: SettingKey, value: f32) -> Result<(), SettingsError>;

    /// Write an integer value.
    fn put_int(&mut self, key: SettingKey, value: i32) -> Result<(), SettingsError>;
}
