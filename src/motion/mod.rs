//! Motion module for rotary-table.
//!
//! Provides the step-delta planner for each move kind and the division
//! sequencer.

mod division;
pub mod planner;

pub use division::{DivisionMove, DivisionNav, DivisionSequencer, DivisionSpec, DivisionStatus};
pub use planner::fix_angle;

/// Direction of table motion.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    /// Clockwise (positive step count).
    Clockwise,
    /// Counter-clockwise (negative step count).
    CounterClockwise,
}

impl Direction {
    /// The opposite direction.
    #[inline]
    pub fn reverse(self) -> Self {
        match self {
            Direction::Clockwise => Direction::CounterClockwise,
            Direction::CounterClockwise => Direction::Clockwise,
        }
    }

    /// Sign multiplier for step counts.
    #[inline]
    pub fn sign(self) -> i64 {
        match self {
            Direction::Clockwise => 1,
            Direction::CounterClockwise => -1,
        }
    }

    /// Sign multiplier for angles.
    #[inline]
    pub fn sign_f32(self) -> f32 {
        match self {
            Direction::Clockwise => 1.0,
            Direction::CounterClockwise => -1.0,
        }
    }

    /// Direction represented by the sign of an angle (non-negative is clockwise).
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        if angle < 0.0 {
            Direction::CounterClockwise
        } else {
            Direction::Clockwise
        }
    }
}

/// Continuous jog command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum JogCommand {
    /// Decelerate to a stop.
    #[default]
    Stop,
    /// Run clockwise until stopped.
    Forward,
    /// Run counter-clockwise until stopped.
    Backward,
}
