//! Angular position tracking.
//!
//! Folds the device's accumulated step count into a normalized table angle in
//! `[0, 360)`. Refreshed once per UI tick and after every completed move.

use crate::config::Geometry;

/// Normalize a raw step count into a table angle in `[0, 360)`.
pub fn normalized_angle(raw_steps: i64, angle_per_step: f32) -> f32 {
    let revolutions = raw_steps as f32 * angle_per_step / 360.0;
    let (fractional, _) = libm::modff(revolutions);
    let mut angle = 360.0 * fractional;
    if angle < 0.0 {
        angle += 360.0;
    }
    // A sub-ulp negative remainder can round the shift up to exactly 360.0
    if angle >= 360.0 {
        angle = 0.0;
    }
    angle
}

/// Tracks the table's normalized angular position.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PositionTracker {
    angle: f32,
}

impl PositionTracker {
    /// Create a tracker at angle zero.
    pub const fn new() -> Self {
        Self { angle: 0.0 }
    }

    /// Recompute the angle from the device's raw step count.
    pub fn update(&mut self, raw_steps: i64, geometry: &Geometry) -> f32 {
        self.angle = normalized_angle(raw_steps, geometry.angle_per_step());
        self.angle
    }

    /// The most recently computed angle, in `[0, 360)`.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }
}
