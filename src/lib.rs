//! # rotary-table
//!
//! Angle/step conversion and motion sequencing for motorized rotary indexing tables.
//!
//! ## Features
//!
//! - **Angle-native API**: user targets in degrees, device commands in signed steps
//! - **Division indexing**: step through N equal slices of a configured arc with
//!   boundary snap-back to the entered start/end angles
//! - **Position tracking**: live step count normalized into `[0, 360)` degrees
//! - **Persisted settings**: seven clamped scalars behind a pluggable store
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust
//! use rotary_table::{Command, Direction, FloatField, IntField};
//! use rotary_table::{MemoryStore, RotaryController, SimulatedDevice};
//!
//! let mut table = RotaryController::new(SimulatedDevice::new(), MemoryStore::new())?;
//!
//! // Index through four equal divisions of a 90 degree arc
//! table.apply_float_entry(FloatField::DivisionStart, 0.0)?;
//! table.apply_float_entry(FloatField::DivisionEnd, 90.0)?;
//! table.apply_int_entry(IntField::DivisionSteps, 4)?;
//! table.handle(Command::GotoDivisionStart(Direction::Clockwise))?;
//! table.handle(Command::DivisionNext)?;
//! # Ok::<(), rotary_table::Error>(())
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables the TOML file-backed settings store
//! - `alloc`: Enables heap allocation for no_std with allocator
//! - `defmt`: Enables defmt logging for embedded targets

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]
// Allow large error types - necessary for no_std with heapless strings
#![allow(clippy::result_large_err)]

#[cfg(feature = "alloc")]
extern crate alloc;

// Core modules
pub mod config;
pub mod controller;
pub mod device;
pub mod error;
pub mod motion;
pub mod position;
pub mod settings;

// Re-exports for ergonomic API
pub use config::{Geometry, JogAngles, MotionRates};
pub use controller::{Command, EntryText, FloatField, IntField, Response, RotaryController};
pub use device::{MotionDevice, SimulatedDevice};
pub use error::{DeviceError, Error, Result, SettingsError};
pub use motion::{
    Direction, DivisionMove, DivisionNav, DivisionSequencer, DivisionSpec, DivisionStatus,
    JogCommand,
};
pub use position::PositionTracker;
pub use settings::{MemoryStore, SettingKey, SettingsStore, StoredSettings};

// File-backed settings store (std only)
#[cfg(feature = "std")]
pub use settings::TomlStore;
