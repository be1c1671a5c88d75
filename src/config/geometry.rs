//! Table geometry and derived motion constants.
//!
//! The three geometry inputs (motor steps per revolution, driver microsteps,
//! table degrees per motor revolution) determine the angle the table moves per
//! motor step. Everything downstream - position normalization, step rounding,
//! jog presets, step rates - is derived from that one constant, so it is
//! recomputed eagerly on every input change.

use serde::{Deserialize, Serialize};

use super::ranges;

/// Fallback when a stored degrees-per-revolution value is non-positive
/// (a corrupted store must never produce a non-positive step angle).
const FALLBACK_DEGREES_PER_REV: f32 = 5.0;

/// Table geometry with derived per-step angle.
///
/// Inputs are saturated to their documented ranges on construction and on
/// every setter, which keeps `angle_per_step` strictly positive at all times.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Geometry {
    /// Motor steps per motor revolution.
    steps_per_rev: i32,

    /// Driver microstep setting.
    micro_steps: i32,

    /// Degrees the table moves per motor revolution.
    degrees_per_rev: f32,

    /// Degrees the table moves per (micro)step. Derived.
    angle_per_step: f32,

    /// Steps in one full table revolution, rounded half-up. Derived.
    circle_steps: u32,
}

impl Geometry {
    /// Create a geometry from raw inputs, saturating each to its valid range.
    pub fn new(steps_per_rev: i32, micro_steps: i32, degrees_per_rev: f32) -> Self {
        let degrees_per_rev = if degrees_per_rev > 0.0 {
            degrees_per_rev.min(ranges::FULL_CIRCLE)
        } else {
            FALLBACK_DEGREES_PER_REV
        };

        let mut geometry = Self {
            steps_per_rev: ranges::STEPS_PER_REV.clamp(steps_per_rev),
            micro_steps: ranges::MICRO_STEPS.clamp(micro_steps),
            degrees_per_rev,
            angle_per_step: 0.0,
            circle_steps: 0,
        };
        geometry.recompute();
        geometry
    }

    /// Motor steps per motor revolution.
    #[inline]
    pub fn steps_per_rev(&self) -> i32 {
        self.steps_per_rev
    }

    /// Driver microstep setting.
    #[inline]
    pub fn micro_steps(&self) -> i32 {
        self.micro_steps
    }

    /// Degrees the table moves per motor revolution.
    #[inline]
    pub fn degrees_per_rev(&self) -> f32 {
        self.degrees_per_rev
    }

    /// Degrees the table moves per step.
    #[inline]
    pub fn angle_per_step(&self) -> f32 {
        self.angle_per_step
    }

    /// Steps in one full table revolution.
    #[inline]
    pub fn circle_steps(&self) -> u32 {
        self.circle_steps
    }

    /// Steps per degree of table rotation.
    #[inline]
    pub fn steps_per_degree(&self) -> f32 {
        1.0 / self.angle_per_step
    }

    /// Set motor steps per revolution, saturating to the valid range.
    pub fn set_steps_per_rev(&mut self, value: i32) {
        self.steps_per_rev = ranges::STEPS_PER_REV.clamp(value);
        self.recompute();
    }

    /// Set driver microsteps, saturating to the valid range.
    pub fn set_micro_steps(&mut self, value: i32) {
        self.micro_steps = ranges::MICRO_STEPS.clamp(value);
        self.recompute();
    }

    /// Set degrees per motor revolution.
    ///
    /// The entry saturates between the current angle-per-step (a revolution
    /// cannot move the table less than one step does) and a full circle.
    pub fn set_degrees_per_rev(&mut self, value: f32) {
        self.degrees_per_rev = ranges::per_step_floor(self.angle_per_step).clamp(value);
        self.recompute();
    }

    /// Jog distances for the fixed step-multiple presets.
    #[inline]
    pub fn jog_angles(&self) -> JogAngles {
        JogAngles {
            single: self.angle_per_step,
            ten: self.angle_per_step * 10.0,
            hundred: self.angle_per_step * 100.0,
            thousand: self.angle_per_step * 1000.0,
        }
    }

    /// Rescale a raw device step count taken under a previous angle-per-step
    /// so that it represents the same absolute angle under the current one.
    pub fn rescaled_steps(&self, steps: i64, old_angle_per_step: f32) -> i64 {
        let angle = steps as f32 * old_angle_per_step;
        libm::roundf(angle / self.angle_per_step) as i64
    }

    fn recompute(&mut self) {
        self.angle_per_step =
            self.degrees_per_rev / self.steps_per_rev as f32 / self.micro_steps as f32;
        self.circle_steps = (ranges::FULL_CIRCLE / self.angle_per_step + 0.5) as u32;
    }
}

/// Jog distances for one step and the 10/100/1000 step multiples.
///
/// The smallest jog available is one step, so the presets are step multiples
/// rather than round angles.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct JogAngles {
    /// One step.
    pub single: f32,
    /// Ten steps.
    pub ten: f32,
    /// One hundred steps.
    pub hundred: f32,
    /// One thousand steps.
    pub thousand: f32,
}

/// Velocity and acceleration in table degrees.
///
/// Stored in degrees; converted to step rates against the current geometry
/// whenever they are pushed to the motion device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MotionRates {
    degrees_per_sec: i32,
    degrees_accel: i32,
}

impl MotionRates {
    /// Create motion rates, saturating each to its valid range.
    pub fn new(degrees_per_sec: i32, degrees_accel: i32) -> Self {
        Self {
            degrees_per_sec: ranges::DEGREES_PER_SEC.clamp(degrees_per_sec),
            degrees_accel: ranges::DEGREES_ACCEL.clamp(degrees_accel),
        }
    }

    /// Velocity in degrees per second.
    #[inline]
    pub fn degrees_per_sec(&self) -> i32 {
        self.degrees_per_sec
    }

    /// Acceleration in degrees per second squared.
    #[inline]
    pub fn degrees_accel(&self) -> i32 {
        self.degrees_accel
    }

    /// Set velocity, saturating to the valid range.
    pub fn set_degrees_per_sec(&mut self, value: i32) {
        self.degrees_per_sec = ranges::DEGREES_PER_SEC.clamp(value);
    }

    /// Set acceleration, saturating to the valid range.
    pub fn set_degrees_accel(&mut self, value: i32) {
        self.degrees_accel = ranges::DEGREES_ACCEL.clamp(value);
    }

    /// Step rate in steps per second under the given geometry.
    #[inline]
    pub fn step_rate(&self, geometry: &Geometry) -> f32 {
        self.degrees_per_sec as f32 * geometry.steps_per_degree()
    }

    /// Step acceleration in steps per second squared under the given geometry.
    #[inline]
    pub fn step_acceleration(&self, geometry: &Geometry) -> f32 {
        self.degrees_accel as f32 * geometry.steps_per_degree()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn worm_table() -> Geometry {
        // 200 step motor, 4 microsteps, 72:1 worm drive (5 degrees/rev)
        Geometry::new(200, 4, 5.0)
    }

    #[test]
    fn test_angle_per_step_derivation() {
        let geometry = worm_table();
        assert!((geometry.angle_per_step() - 0.00625).abs() < 1e-9);
        assert_eq!(geometry.circle_steps(), 57_600);
    }

    #[test]
    fn test_inputs_saturate() {
        let geometry = Geometry::new(9999, 0, 400.0);
        assert_eq!(geometry.steps_per_rev(), 500);
        assert_eq!(geometry.micro_steps(), 1);
        assert!((geometry.degrees_per_rev() - 360.0).abs() < 1e-6);
    }

    #[test]
    fn test_non_positive_degrees_falls_back() {
        let geometry = Geometry::new(200, 4, 0.0);
        assert!(geometry.angle_per_step() > 0.0);
    }

    #[test]
    fn test_setters_recompute() {
        let mut geometry = worm_table();
        geometry.set_steps_per_rev(100);
        assert!((geometry.angle_per_step() - 0.0125).abs() < 1e-9);
        assert_eq!(geometry.circle_steps(), 28_800);
    }

    #[test]
    fn test_degrees_per_rev_floor_is_one_step() {
        let mut geometry = worm_table();
        geometry.set_degrees_per_rev(0.0001);
        assert!((geometry.degrees_per_rev() - 0.00625).abs() < 1e-9);
    }

    #[test]
    fn test_rescale_preserves_angle() {
        let mut geometry = worm_table();
        let old_aps = geometry.angle_per_step();
        // 14400 steps at 0.00625 deg/step is 90 degrees
        let steps = 14_400;

        geometry.set_steps_per_rev(100);
        let rescaled = geometry.rescaled_steps(steps, old_aps);
        let angle = rescaled as f32 * geometry.angle_per_step();
        assert!((angle - 90.0).abs() < 0.01);
    }

    #[test]
    fn test_jog_angles_are_step_multiples() {
        let geometry = worm_table();
        let jog = geometry.jog_angles();
        assert!((jog.single - 0.00625).abs() < 1e-9);
        assert!((jog.ten - 0.0625).abs() < 1e-9);
        assert!((jog.hundred - 0.625).abs() < 1e-9);
        assert!((jog.thousand - 6.25).abs() < 1e-9);
    }

    #[test]
    fn test_step_rates() {
        let geometry = worm_table();
        let rates = MotionRates::new(20, 20);
        // 20 deg/s at 160 steps/deg
        assert!((rates.step_rate(&geometry) - 3200.0).abs() < 0.5);
        assert!((rates.step_acceleration(&geometry) - 3200.0).abs() < 0.5);
    }

    #[test]
    fn test_rates_saturate() {
        let rates = MotionRates::new(500, 1_000_000);
        assert_eq!(rates.degrees_per_sec(), 100);
        assert_eq!(rates.degrees_accel(), 100_000);
    }
}
