//! Error types for the rotary-table library.
//!
//! Provides unified error handling across the settings and motion-device boundaries.

use core::fmt;

use crate::settings::SettingKey;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all rotary-table operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Error {
    /// Settings store error
    Settings(SettingsError),
    /// Motion device error
    Device(DeviceError),
}

/// Settings-store errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SettingsError {
    /// A persisted value could not be read, or has the wrong type for its key
    ReadFailed(SettingKey),
    /// A value could not be written to the store
    WriteFailed(SettingKey),
    /// Failed to parse a stored settings snapshot (std only)
    #[cfg(feature = "std")]
    ParseError(heapless::String<128>),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Motion-device errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DeviceError {
    /// The device rejected the command (e.g. step queue unavailable)
    CommandRejected,
    /// Speed or acceleration has not been configured yet
    RateNotSet,
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Settings(e) => write!(f, "Settings error: {}", e),
            Error::Device(e) => write!(f, "Device error: {}", e),
        }
    }
}

impl fmt::Display for SettingsError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SettingsError::ReadFailed(key) => {
                write!(f, "Failed to read setting '{}'", key.as_str())
            }
            SettingsError::WriteFailed(key) => {
                write!(f, "Failed to write setting '{}'", key.as_str())
            }
            #[cfg(feature = "std")]
            SettingsError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            #[cfg(feature = "std")]
            SettingsError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for DeviceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeviceError::CommandRejected => write!(f, "Device rejected the motion command"),
            DeviceError::RateNotSet => write!(f, "Device speed or acceleration not configured"),
        }
    }
}

// Conversion impls
impl From<SettingsError> for Error {
    fn from(e: SettingsError) -> Self {
        Error::Settings(e)
    }
}

impl From<DeviceError> for Error {
    fn from(e: DeviceError) -> Self {
        Error::Device(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for SettingsError {}

#[cfg(feature = "std")]
impl std::error::Error for DeviceError {}
