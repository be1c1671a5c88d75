//! TOML file-backed settings store (std only).
//!
//! Persists the settings snapshot to a small TOML document using the same key
//! names as the store boundary. Writes go to disk on every put, mirroring the
//! write-through behavior of flash preference storage.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::SettingsError;

use super::{SettingKey, SettingsStore};

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct Snapshot {
    #[serde(rename = "relativeMove", skip_serializing_if = "Option::is_none")]
    relative_move: Option<f32>,

    #[serde(rename = "absolutePos", skip_serializing_if = "Option::is_none")]
    absolute_position: Option<f32>,

    #[serde(rename = "stepsRev", skip_serializing_if = "Option::is_none")]
    steps_per_rev: Option<i32>,

    #[serde(rename = "degreesRev", skip_serializing_if = "Option::is_none")]
    degrees_per_rev: Option<f32>,

    #[serde(rename = "microSteps", skip_serializing_if = "Option::is_none")]
    micro_steps: Option<i32>,

    #[serde(rename = "degSec", skip_serializing_if = "Option::is_none")]
    degrees_per_sec: Option<i32>,

    #[serde(rename = "degAcc", skip_serializing_if = "Option::is_none")]
    degrees_accel: Option<i32>,
}

/// Settings store persisted as a TOML file.
#[derive(Debug)]
pub struct TomlStore {
    path: PathBuf,
    snapshot: Snapshot,
}

impl TomlStore {
    /// Open a store at the given path, loading the snapshot if the file exists.
    ///
    /// # Errors
    ///
    /// Returns an error if an existing file cannot be read or parsed.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self, SettingsError> {
        let path = path.as_ref().to_path_buf();
        let snapshot = if path.exists() {
            let content = fs::read_to_string(&path).map_err(io_error)?;
            toml::from_str(&content).map_err(|e| {
                let msg = heapless::String::try_from(e.message()).unwrap_or_default();
                SettingsError::ParseError(msg)
            })?
        } else {
            Snapshot::default()
        };

        Ok(Self { path, snapshot })
    }

    /// The file path backing this store.
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn persist(&self) -> Result<(), SettingsError> {
        let content = toml::to_string(&self.snapshot).map_err(|e| {
            let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
            SettingsError::ParseError(msg)
        })?;
        fs::write(&self.path, content).map_err(io_error)
    }
}

fn io_error(e: std::io::Error) -> SettingsError {
    let msg = heapless::String::try_from(e.to_string().as_str()).unwrap_or_default();
    SettingsError::IoError(msg)
}

impl SettingsStore for TomlStore {
    fn has(&self, key: SettingKey) -> bool {
        match key {
            SettingKey::RelativeMove => self.snapshot.relative_move.is_some(),
            SettingKey::AbsolutePosition => self.snapshot.absolute_position.is_some(),
            SettingKey::StepsPerRev => self.snapshot.steps_per_rev.is_some(),
            SettingKey::DegreesPerRev => self.snapshot.degrees_per_rev.is_some(),
            SettingKey::MicroSteps => self.snapshot.micro_steps.is_some(),
            SettingKey::DegreesPerSec => self.snapshot.degrees_per_sec.is_some(),
            SettingKey::DegreesAccel => self.snapshot.degrees_accel.is_some(),
        }
    }

    fn get_float(&self, key: SettingKey) -> Result<f32, SettingsError> {
        let value = match key {
            SettingKey::RelativeMove => self.snapshot.relative_move,
            SettingKey::AbsolutePosition => self.snapshot.absolute_position,
            SettingKey::DegreesPerRev => self.snapshot.degrees_per_rev,
            _ => None,
        };
        value.ok_or(SettingsError::ReadFailed(key))
    }

    fn get_int(&self, key: SettingKey) -> Result<i32, SettingsError> {
        let value = match key {
            SettingKey::StepsPerRev => self.snapshot.steps_per_rev,
            SettingKey::MicroSteps => self.snapshot.micro_steps,
            SettingKey::DegreesPerSec => self.snapshot.degrees_per_sec,
            SettingKey::DegreesAccel => self.snapshot.degrees_accel,
            _ => None,
        };
        value.ok_or(SettingsError::ReadFailed(key))
    }

    fn put_float(&mut self, key: SettingKey, value: f32) -> Result<(), SettingsError> {
        match key {
            SettingKey::RelativeMove => self.snapshot.relative_move = Some(value),
            SettingKey::AbsolutePosition => self.snapshot.absolute_position = Some(value),
            SettingKey::DegreesPerRev => self.snapshot.degrees_per_rev = Some(value),
            _ => return Err(SettingsError::WriteFailed(key)),
        }
        self.persist()
    }

    fn put_int(&mut self, key: SettingKey, value: i32) -> Result<(), SettingsError> {
        match key {
            SettingKey::StepsPerRev => self.snapshot.steps_per_rev = Some(value),
            SettingKey::MicroSteps => self.snapshot.micro_steps = Some(value),
            SettingKey::DegreesPerSec => self.snapshot.degrees_per_sec = Some(value),
            SettingKey::DegreesAccel => self.snapshot.degrees_accel = Some(value),
            _ => return Err(SettingsError::WriteFailed(key)),
        }
        self.persist()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(tag: &str) -> PathBuf {
        let mut path = std::env::temp_dir();
        path.push(format!("rotary-table-{}-{}.toml", tag, std::process::id()));
        path
    }

    #[test]
    fn test_open_missing_file_is_empty() {
        let path = temp_path("missing");
        let _ = fs::remove_file(&path);

        let store = TomlStore::open(&path).unwrap();
        assert!(!store.has(SettingKey::StepsPerRev));
    }

    #[test]
    fn test_put_persists_to_disk() {
        let path = temp_path("persist");
        let _ = fs::remove_file(&path);

        let mut store = TomlStore::open(&path).unwrap();
        store.put_int(SettingKey::StepsPerRev, 400).unwrap();
        store.put_float(SettingKey::DegreesPerRev, 5.0).unwrap();

        let reopened = TomlStore::open(&path).unwrap();
        assert_eq!(reopened.get_int(SettingKey::StepsPerRev).unwrap(), 400);
        assert!((reopened.get_float(SettingKey::DegreesPerRev).unwrap() - 5.0).abs() < 1e-6);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_keys_use_stable_names() {
        let path = temp_path("names");
        let _ = fs::remove_file(&path);

        let mut store = TomlStore::open(&path).unwrap();
        store.put_int(SettingKey::DegreesPerSec, 20).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert!(content.contains("degSec"));

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_wrong_typed_put_is_rejected() {
        let path = temp_path("typed");
        let _ = fs::remove_file(&path);

        let mut store = TomlStore::open(&path).unwrap();
        assert!(store.put_float(SettingKey::StepsPerRev, 1.0).is_err());

        let _ = fs::remove_file(&path);
    }
}
