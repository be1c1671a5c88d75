//! Step-delta planning for each move kind.
//!
//! Every planner function is pure: it reads the current normalized position
//! and the per-step angle and returns the signed step count to hand to the
//! motion device. Nothing here mutates state or talks to hardware.
//!
//! Rounding is direction-dependent for every move kind except the relative
//! move: a negative required angle truncates from `angle/step - 0.5` and a
//! non-negative one from `angle/step + 0.5`. The asymmetry compensates
//! direction-dependent truncation so repeated zero-seeks from either side
//! converge on the same physical zero.

use super::Direction;

/// Round a required angle to steps, half away from zero by the angle's sign.
#[inline]
pub fn steps_for_angle(angle: f32, angle_per_step: f32) -> i64 {
    if angle < 0.0 {
        (angle / angle_per_step - 0.5) as i64
    } else {
        (angle / angle_per_step + 0.5) as i64
    }
}

/// Round a required angle to steps, half away from zero by an explicit
/// direction (used by the division sequencer, which keys rounding on the
/// effective travel direction rather than the sign of the angle).
#[inline]
pub fn steps_for_direction(direction: Direction, angle: f32, angle_per_step: f32) -> i64 {
    match direction {
        Direction::CounterClockwise => (angle / angle_per_step - 0.5) as i64,
        Direction::Clockwise => (angle / angle_per_step + 0.5) as i64,
    }
}

/// Steps to reach the zero position going in the given direction.
pub fn goto_zero(current_position: f32, direction: Direction, angle_per_step: f32) -> i64 {
    let angle = match direction {
        Direction::Clockwise => 360.0 - current_position,
        Direction::CounterClockwise => -current_position,
    };
    steps_for_angle(angle, angle_per_step)
}

/// Steps to reach an absolute target angle going in the given direction.
///
/// Clockwise requests that land within one step of the current position (or
/// behind it) wrap forward a full revolution; sub-step remainders are
/// rounding noise, not a move. Counter-clockwise requests below a full
/// negative revolution wrap the same way.
pub fn absolute_move(
    target: f32,
    current_position: f32,
    direction: Direction,
    angle_per_step: f32,
) -> i64 {
    let angle = match direction {
        Direction::Clockwise => {
            let angle = target - current_position;
            if angle < angle_per_step {
                angle + 360.0
            } else {
                angle
            }
        }
        Direction::CounterClockwise => {
            let angle = target - current_position - 360.0;
            if angle < -360.0 {
                angle + 360.0
            } else {
                angle
            }
        }
    };
    steps_for_angle(angle, angle_per_step)
}

/// Steps for a relative move of the given distance.
///
/// Rounds half-up regardless of direction, unlike every other move kind;
/// preserved as observed firmware behavior.
pub fn relative_move(distance: f32, direction: Direction, angle_per_step: f32) -> i64 {
    (distance / angle_per_step + 0.5) as i64 * direction.sign()
}

/// Steps for an incremental jog of the given signed angle.
pub fn incremental_jog(value: f32, angle_per_step: f32) -> i64 {
    steps_for_angle(value, angle_per_step)
}

/// Fold an angle into `(-180, 180]`, mapping an exact zero to a full turn.
///
/// Used for the division boundary moves: when the start and end coincide at
/// the revolution boundary the closing move must be a full revolution, not a
/// zero-length move.
pub fn fix_angle(angle: f32) -> f32 {
    if angle > 180.0 {
        angle - 360.0
    } else if angle < -180.0 {
        angle + 360.0
    } else if angle == 0.0 {
        360.0
    } else {
        angle
    }
}
