//! Equal-division indexing of a configured arc.
//!
//! A division job is described by a start angle, an end angle and a division
//! count; the table then steps through the arc one slice at a time. The
//! sequencer tracks which division the table sits on and produces one signed
//! step delta per next/previous request. Intermediate moves are equal
//! fractions of the configured arc; the moves that close either end of the
//! sequence re-aim at the entered boundary angle instead, which absorbs the
//! rounding drift accumulated across the intermediate slices.

use crate::config::ranges;

use super::planner::{fix_angle, steps_for_direction};
use super::Direction;

/// Division job description with derived arc and direction.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DivisionSpec {
    start: f32,
    end: f32,
    steps: i32,
    direction: Direction,
    angle: f32,
}

impl Default for DivisionSpec {
    fn default() -> Self {
        Self {
            start: 0.0,
            end: 0.0,
            steps: 1,
            direction: Direction::Clockwise,
            angle: 360.0,
        }
    }
}

impl DivisionSpec {
    /// Start angle of the arc.
    #[inline]
    pub fn start(&self) -> f32 {
        self.start
    }

    /// End angle of the arc. A negative end runs the divisions
    /// counter-clockwise.
    #[inline]
    pub fn end(&self) -> f32 {
        self.end
    }

    /// Number of divisions.
    #[inline]
    pub fn steps(&self) -> i32 {
        self.steps
    }

    /// Direction of travel for "next" moves.
    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Signed total arc covered by the divisions.
    #[inline]
    pub fn angle(&self) -> f32 {
        self.angle
    }

    /// Angle of a single division slice (unsigned).
    #[inline]
    pub fn slice_angle(&self) -> f32 {
        libm::fabsf(self.angle) / self.steps as f32
    }

    /// Set the start angle, saturating to one revolution either way.
    pub fn set_start(&mut self, value: f32) {
        self.start = ranges::DIVISION_BOUNDARY.clamp(value);
        self.recompute();
    }

    /// Set the end angle, saturating to one revolution either way.
    pub fn set_end(&mut self, value: f32) {
        self.end = ranges::DIVISION_BOUNDARY.clamp(value);
        self.recompute();
    }

    /// Set the division count, saturating to the valid range.
    pub fn set_steps(&mut self, value: i32) {
        self.steps = ranges::DIVISION_STEPS.clamp(value);
    }

    // The arc runs from the start to the magnitude of the end, measured the
    // way the end's sign dictates; a zero-length result means the boundaries
    // coincide and the arc is the whole revolution.
    fn recompute(&mut self) {
        self.direction = Direction::from_angle(self.end);
        let end_magnitude = libm::fabsf(self.end);
        let mut raw = if self.end >= 0.0 {
            end_magnitude - self.start
        } else {
            self.start - end_magnitude
        };
        if raw < 0.0 {
            raw += 360.0;
        }
        if raw == 0.0 {
            raw = 360.0;
        }
        self.angle = match self.direction {
            Direction::Clockwise => raw,
            Direction::CounterClockwise => -raw,
        };
    }
}

/// Navigation request for the division sequencer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum DivisionNav {
    /// Advance one division toward the end.
    Next,
    /// Retreat one division toward the start.
    Previous,
}

/// Sequencer result reported back to the UI collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DivisionStatus {
    /// Division the table now sits on, `0..=division_steps`.
    pub current_division: i32,
    /// Whether a further "next" request is meaningful.
    pub next_enabled: bool,
    /// Whether a further "previous" request is meaningful.
    pub prev_enabled: bool,
}

impl DivisionStatus {
    /// Status flags for an index within a sequence of the given length.
    pub fn for_index(current_division: i32, division_steps: i32) -> Self {
        Self {
            current_division,
            next_enabled: current_division != division_steps,
            prev_enabled: current_division != 0,
        }
    }
}

/// A planned division move: the step delta plus the resulting status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DivisionMove {
    /// Signed step delta to hand to the motion device.
    pub steps: i64,
    /// Sequencer state after the move.
    pub status: DivisionStatus,
}

/// Tracks progress through a division sequence.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct DivisionSequencer {
    current: i32,
}

impl DivisionSequencer {
    /// Create a sequencer at division zero.
    pub const fn new() -> Self {
        Self { current: 0 }
    }

    /// Division the table currently sits on.
    #[inline]
    pub fn current_division(&self) -> i32 {
        self.current
    }

    /// Reset to division zero (issued with a go-to-division-start move).
    pub fn reset(&mut self, spec: &DivisionSpec) -> DivisionStatus {
        self.current = 0;
        DivisionStatus::for_index(0, spec.steps())
    }

    /// Keep the index inside `0..=division_steps` after the count changes.
    pub fn clamp_to(&mut self, division_steps: i32) {
        if self.current > division_steps {
            self.current = division_steps;
        }
    }

    /// Plan one next/previous move from the current table position.
    ///
    /// Returns `None` when the request runs past either end of the sequence;
    /// out-of-range navigation is ignored rather than reported as an error.
    pub fn advance(
        &mut self,
        spec: &DivisionSpec,
        angle_per_step: f32,
        current_position: f32,
        nav: DivisionNav,
    ) -> Option<DivisionMove> {
        let direction = match nav {
            DivisionNav::Next if self.current != spec.steps() => {
                self.current += 1;
                spec.direction()
            }
            DivisionNav::Previous if self.current != 0 => {
                self.current -= 1;
                spec.direction().reverse()
            }
            _ => return None,
        };

        let closes_start = self.current == 0 && spec.steps() > 1;
        let closes_end = self.current == spec.steps() && spec.steps() > 1;

        let angle = if closes_start {
            // Re-aim at the entered start boundary
            let gap = match spec.direction() {
                Direction::Clockwise => current_position - libm::fabsf(spec.start()),
                Direction::CounterClockwise => libm::fabsf(spec.start()) - current_position,
            };
            fix_angle(gap) * direction.sign_f32()
        } else if closes_end {
            // Re-aim at the entered end boundary
            let gap = match spec.direction() {
                Direction::Clockwise => libm::fabsf(spec.end()) - current_position,
                Direction::CounterClockwise => current_position - libm::fabsf(spec.end()),
            };
            fix_angle(gap) * direction.sign_f32()
        } else {
            spec.slice_angle() * direction.sign_f32()
        };

        Some(DivisionMove {
            steps: steps_for_direction(direction, angle, angle_per_step),
            status: DivisionStatus::for_index(self.current, spec.steps()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const APS: f32 = 0.00625; // 200 steps, 4 microsteps, 5 deg/rev

    fn quarter_in_four() -> DivisionSpec {
        let mut spec = DivisionSpec::default();
        spec.set_start(0.0);
        spec.set_end(90.0);
        spec.set_steps(4);
        spec
    }

    #[test]
    fn test_angle_derivation_forward_quarter() {
        let spec = quarter_in_four();
        assert_eq!(spec.direction(), Direction::Clockwise);
        assert!((spec.angle() - 90.0).abs() < 1e-6);
        assert!((spec.slice_angle() - 22.5).abs() < 1e-6);
    }

    #[test]
    fn test_angle_derivation_coincident_boundaries_negative() {
        let mut spec = DivisionSpec::default();
        spec.set_start(90.0);
        spec.set_end(-90.0);
        // start and |end| coincide: the arc is the whole revolution, run
        // counter-clockwise
        assert_eq!(spec.direction(), Direction::CounterClockwise);
        assert!((spec.angle() + 360.0).abs() < 1e-6);
    }

    #[test]
    fn test_angle_derivation_wraps_negative_raw() {
        let mut spec = DivisionSpec::default();
        spec.set_start(270.0);
        spec.set_end(90.0);
        // 90 - 270 = -180, wrapped to 180
        assert!((spec.angle() - 180.0).abs() < 1e-6);
    }

    #[test]
    fn test_boundaries_saturate() {
        let mut spec = DivisionSpec::default();
        spec.set_start(-720.0);
        spec.set_end(720.0);
        assert_eq!(spec.start(), -360.0);
        assert_eq!(spec.end(), 360.0);
    }

    #[test]
    fn test_sequence_walks_and_saturates() {
        let spec = quarter_in_four();
        let mut seq = DivisionSequencer::new();
        let mut position = 0.0f32;

        for expected in 1..=4 {
            let mv = seq.advance(&spec, APS, position, DivisionNav::Next).unwrap();
            assert_eq!(mv.status.current_division, expected);
            position += mv.steps as f32 * APS;
        }

        // A fifth "next" is a no-op
        assert!(seq.advance(&spec, APS, position, DivisionNav::Next).is_none());
        assert_eq!(seq.current_division(), 4);
    }

    #[test]
    fn test_previous_at_zero_is_ignored() {
        let spec = quarter_in_four();
        let mut seq = DivisionSequencer::new();
        assert!(seq
            .advance(&spec, APS, 0.0, DivisionNav::Previous)
            .is_none());
        assert_eq!(seq.current_division(), 0);
    }

    #[test]
    fn test_intermediate_slice_steps() {
        let spec = quarter_in_four();
        let mut seq = DivisionSequencer::new();

        // 22.5 degrees at 160 steps/degree
        let mv = seq.advance(&spec, APS, 0.0, DivisionNav::Next).unwrap();
        assert_eq!(mv.steps, 3600);
    }

    #[test]
    fn test_final_move_snaps_to_entered_end() {
        let spec = quarter_in_four();
        let mut seq = DivisionSequencer::new();

        // Walk to division 3, then pretend rounding drifted the table a bit
        for _ in 0..3 {
            seq.advance(&spec, APS, 0.0, DivisionNav::Next).unwrap();
        }
        let drifted = 67.53f32;
        let mv = seq.advance(&spec, APS, drifted, DivisionNav::Next).unwrap();

        // The closing move re-aims at the entered 90 degree boundary
        let landed = drifted + mv.steps as f32 * APS;
        assert!((landed - 90.0).abs() < APS);
        assert_eq!(mv.status.current_division, 4);
        assert!(!mv.status.next_enabled);
        assert!(mv.status.prev_enabled);
    }

    #[test]
    fn test_closing_move_back_to_start() {
        let spec = quarter_in_four();
        let mut seq = DivisionSequencer::new();

        seq.advance(&spec, APS, 0.0, DivisionNav::Next).unwrap();
        // Back from division 1: the move targets the entered start boundary
        let position = 22.5f32;
        let mv = seq
            .advance(&spec, APS, position, DivisionNav::Previous)
            .unwrap();

        let landed = position + mv.steps as f32 * APS;
        assert!(libm::fabsf(landed) < APS);
        assert_eq!(mv.status.current_division, 0);
        assert!(mv.status.next_enabled);
        assert!(!mv.status.prev_enabled);
    }

    #[test]
    fn test_coincident_boundaries_close_with_full_turn() {
        // Start and end both at the revolution boundary
        let mut spec = DivisionSpec::default();
        spec.set_start(0.0);
        spec.set_end(0.0);
        spec.set_steps(2);

        let mut seq = DivisionSequencer::new();
        seq.advance(&spec, APS, 0.0, DivisionNav::Next).unwrap();

        // Closing next with the table already sitting on the boundary: the
        // zero-length gap folds to a full revolution instead of a no-move
        let mv = seq.advance(&spec, APS, 0.0, DivisionNav::Next).unwrap();
        assert_eq!(mv.steps, 57_600);
    }

    #[test]
    fn test_counter_clockwise_sequence() {
        // End of -90: the boundary sits at +90, approached counter-clockwise,
        // so the arc from 0 spans 270 degrees
        let mut spec = DivisionSpec::default();
        spec.set_start(0.0);
        spec.set_end(-90.0);
        spec.set_steps(2);
        assert_eq!(spec.direction(), Direction::CounterClockwise);
        assert!((spec.angle() + 270.0).abs() < 1e-6);

        let mut seq = DivisionSequencer::new();
        let mv = seq.advance(&spec, APS, 0.0, DivisionNav::Next).unwrap();
        // 135 degree slice travelling counter-clockwise, rounded half-down
        assert_eq!(mv.steps, -21_600);
    }

    #[test]
    fn test_clamp_to_shrunk_count() {
        let spec = quarter_in_four();
        let mut seq = DivisionSequencer::new();
        for _ in 0..4 {
            seq.advance(&spec, APS, 0.0, DivisionNav::Next).unwrap();
        }

        seq.clamp_to(2);
        assert_eq!(seq.current_division(), 2);
    }
}
