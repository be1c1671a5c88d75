//! Stepper motion device boundary.
//!
//! The core never generates step pulses itself; it hands signed step deltas
//! and run/stop commands to a [`MotionDevice`] and reads back the accumulated
//! step count. The device executes moves in the background - commands are
//! non-blocking and the core never waits for completion.

use crate::error::DeviceError;

/// Abstract stepper motion engine.
///
/// Positive steps and `run_forward` turn the table clockwise; the integrator
/// flips direction at the pin level if the mechanics disagree.
pub trait MotionDevice {
    /// Start a relative move of the given signed step count.
    fn move_relative(&mut self, steps: i64) -> Result<(), DeviceError>;

    /// Run clockwise until stopped.
    fn run_forward(&mut self) -> Result<(), DeviceError>;

    /// Run counter-clockwise until stopped.
    fn run_backward(&mut self) -> Result<(), DeviceError>;

    /// Decelerate to a stop.
    fn stop(&mut self) -> Result<(), DeviceError>;

    /// Whether a move or continuous run is in progress.
    fn is_running(&self) -> bool;

    /// Accumulated step count from the zero position.
    fn position(&self) -> i64;

    /// Overwrite the accumulated step count.
    fn set_position(&mut self, steps: i64) -> Result<(), DeviceError>;

    /// Set the step rate in steps per second.
    fn set_speed_hz(&mut self, steps_per_sec: f32) -> Result<(), DeviceError>;

    /// Set the acceleration in steps per second squared.
    fn set_acceleration(&mut self, steps_per_sec2: f32) -> Result<(), DeviceError>;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RunState {
    Idle,
    Forward,
    Backward,
}

/// Instantaneous-motion device for host-side testing.
///
/// Directed moves complete immediately; continuous runs latch a direction and
/// accumulate steps only when the test advances simulated time with
/// [`SimulatedDevice::advance`].
#[derive(Debug, Clone)]
pub struct SimulatedDevice {
    position: i64,
    speed_hz: f32,
    acceleration: f32,
    run_state: RunState,
}

impl SimulatedDevice {
    /// Create a device at step position zero.
    pub const fn new() -> Self {
        Self {
            position: 0,
            speed_hz: 0.0,
            acceleration: 0.0,
            run_state: RunState::Idle,
        }
    }

    /// Create a device at a given step position.
    pub const fn at(position: i64) -> Self {
        Self {
            position,
            speed_hz: 0.0,
            acceleration: 0.0,
            run_state: RunState::Idle,
        }
    }

    /// Last configured step rate.
    pub fn speed_hz(&self) -> f32 {
        self.speed_hz
    }

    /// Last configured acceleration.
    pub fn acceleration(&self) -> f32 {
        self.acceleration
    }

    /// Advance a continuous run by the given number of steps.
    ///
    /// No-op unless a run is active; the sign of the accumulated steps follows
    /// the run direction.
    pub fn advance(&mut self, steps: i64) {
        match self.run_state {
            RunState::Idle => {}
            RunState::Forward => self.position += steps,
            RunState::Backward => self.position -= steps,
        }
    }
}

impl Default for SimulatedDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl MotionDevice for SimulatedDevice {
    fn move_relative(&mut self, steps: i64) -> Result<(), DeviceError> {
        self.position += steps;
        Ok(())
    }

    fn run_forward(&mut self) -> Result<(), DeviceError> {
        self.run_state = RunState::Forward;
        Ok(())
    }

    fn run_backward(&mut self) -> Result<(), DeviceError> {
        self.run_state = RunState::Backward;
        Ok(())
    }

    fn stop(&mut self) -> Result<(), DeviceError> {
        self.run_state = RunState::Idle;
        Ok(())
    }

    fn is_running(&self) -> bool {
        self.run_state != RunState::Idle
    }

    fn position(&self) -> i64 {
        self.position
    }

    fn set_position(&mut self, steps: i64) -> Result<(), DeviceError> {
        self.position = steps;
        Ok(())
    }

    fn set_speed_hz(&mut self, steps_per_sec: f32) -> Result<(), DeviceError> {
        self.speed_hz = steps_per_sec;
        Ok(())
    }

    fn set_acceleration(&mut self, steps_per_sec2: f32) -> Result<(), DeviceError> {
        self.acceleration = steps_per_sec2;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directed_move_is_instantaneous() {
        let mut device = SimulatedDevice::new();
        device.move_relative(1200).unwrap();
        device.move_relative(-200).unwrap();

        assert_eq!(device.position(), 1000);
        assert!(!device.is_running());
    }

    #[test]
    fn test_continuous_run_accumulates_on_advance() {
        let mut device = SimulatedDevice::new();
        device.run_backward().unwrap();
        assert!(device.is_running());

        device.advance(500);
        assert_eq!(device.position(), -500);

        device.stop().unwrap();
        device.advance(500);
        assert_eq!(device.position(), -500);
    }
}
