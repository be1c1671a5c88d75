//! Configuration module for rotary-table.
//!
//! Provides the table geometry (motor steps, microstepping, gearing) with its
//! derived per-step angle, the motion-rate parameters, and the clamp ranges
//! applied to every user-editable scalar.

mod geometry;
pub mod ranges;

pub use geometry::{Geometry, JogAngles, MotionRates};
