//! Rotary table controller.
//!
//! Owns all table state - geometry, motion rates, move targets, division
//! progress, tracked position - and turns typed UI intents into device
//! commands. The UI collaborator drives [`RotaryController::tick`] from its
//! periodic update (every ~10 ms), feeds confirmed numeric entries through
//! the apply methods, and applies the returned statuses to its widgets; the
//! controller never touches UI objects.
//!
//! Moves are handed to the device as non-blocking commands. The input
//! collaborator is expected to suppress new move requests while the device
//! reports running, except during a continuous jog, which must stay
//! interactive so it can be stopped - see [`RotaryController::accepts_input`].

use core::fmt::Write;

use crate::config::{ranges, Geometry, JogAngles, MotionRates};
use crate::device::MotionDevice;
use crate::error::Result;
use crate::motion::planner;
use crate::motion::{
    Direction, DivisionMove, DivisionNav, DivisionSequencer, DivisionSpec, DivisionStatus,
    JogCommand,
};
use crate::position::PositionTracker;
use crate::settings::{binder, SettingKey, SettingsStore};

/// Text buffer for entry-box round-trips.
pub type EntryText = heapless::String<16>;

/// A discrete user intent delivered by the UI event source.
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Command {
    /// Seek the zero position in the given direction.
    GotoZero(Direction),
    /// Move to the persisted absolute target in the given direction.
    AbsoluteMove(Direction),
    /// Move to the division start angle in the given direction and reset
    /// division progress.
    GotoDivisionStart(Direction),
    /// Move by the persisted relative distance in the given direction.
    RelativeMove(Direction),
    /// Jog by a signed angle taken from a UI preset label.
    JogIncremental(f32),
    /// Start or stop a continuous jog.
    Jog(JogCommand),
    /// Advance one division toward the end.
    DivisionNext,
    /// Retreat one division toward the start.
    DivisionPrevious,
    /// Declare the current position to be zero.
    SetZero,
}

/// Controller reaction to a [`Command`].
#[derive(Debug, Clone, Copy, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Response {
    /// A directed move was issued to the device.
    Moved {
        /// Signed step delta sent to the device.
        steps: i64,
    },
    /// A move to the division start was issued; division progress reset.
    DivisionStart {
        /// Signed step delta sent to the device.
        steps: i64,
        /// Division state for the UI to apply.
        status: DivisionStatus,
    },
    /// A division next/previous move was issued.
    DivisionMoved {
        /// Signed step delta sent to the device.
        steps: i64,
        /// Division state for the UI to apply.
        status: DivisionStatus,
    },
    /// A division request past either end of the sequence was ignored.
    DivisionIgnored,
    /// The continuous jog state changed.
    Jogging(JogCommand),
    /// The device step count was reset to zero.
    ZeroSet,
}

/// Persisted float entry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FloatField {
    /// Relative move distance in degrees.
    RelativeMove,
    /// Absolute move target in degrees.
    AbsolutePosition,
    /// Table degrees per motor revolution.
    DegreesPerRev,
    /// Division start angle (session-only).
    DivisionStart,
    /// Division end angle (session-only).
    DivisionEnd,
}

/// Persisted integer entry fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum IntField {
    /// Motor steps per revolution.
    StepsPerRev,
    /// Driver microstep setting.
    MicroSteps,
    /// Velocity in degrees per second.
    DegreesPerSec,
    /// Acceleration in degrees per second squared.
    DegreesAccel,
    /// Number of divisions (session-only).
    DivisionSteps,
}

/// The rotary table controller aggregate.
pub struct RotaryController<D, S> {
    device: D,
    store: S,
    geometry: Geometry,
    rates: MotionRates,
    tracker: PositionTracker,
    relative_move: f32,
    absolute_position: f32,
    division: DivisionSpec,
    sequencer: DivisionSequencer,
    jog: JogCommand,
}

impl<D: MotionDevice, S: SettingsStore> RotaryController<D, S> {
    /// Create a controller, seeding missing settings with defaults and
    /// pushing the derived step rates to the device.
    pub fn new(device: D, store: S) -> Result<Self> {
        let mut store = store;
        let stored = binder::load_or_init(&mut store)?;

        let geometry = Geometry::new(
            stored.steps_per_rev,
            stored.micro_steps,
            stored.degrees_per_rev,
        );
        let rates = MotionRates::new(stored.degrees_per_sec, stored.degrees_accel);

        let mut controller = Self {
            device,
            store,
            relative_move: ranges::per_step_floor(geometry.angle_per_step())
                .clamp(stored.relative_move),
            absolute_position: ranges::ABSOLUTE_POSITION.clamp(stored.absolute_position),
            geometry,
            rates,
            tracker: PositionTracker::new(),
            division: DivisionSpec::default(),
            sequencer: DivisionSequencer::new(),
            jog: JogCommand::Stop,
        };

        controller.push_rates()?;
        controller
            .tracker
            .update(controller.device.position(), &controller.geometry);
        Ok(controller)
    }

    /// Handle a discrete UI intent.
    pub fn handle(&mut self, command: Command) -> Result<Response> {
        match command {
            Command::GotoZero(direction) => {
                self.goto_zero(direction).map(|steps| Response::Moved { steps })
            }
            Command::AbsoluteMove(direction) => self
                .absolute_move(direction)
                .map(|steps| Response::Moved { steps }),
            Command::GotoDivisionStart(direction) => self
                .goto_division_start(direction)
                .map(|(steps, status)| Response::DivisionStart { steps, status }),
            Command::RelativeMove(direction) => self
                .relative_move(direction)
                .map(|steps| Response::Moved { steps }),
            Command::JogIncremental(value) => self
                .jog_incremental(value)
                .map(|steps| Response::Moved { steps }),
            Command::Jog(jog) => self.jog(jog).map(|_| Response::Jogging(jog)),
            Command::DivisionNext => Ok(match self.division_next()? {
                Some(mv) => Response::DivisionMoved {
                    steps: mv.steps,
                    status: mv.status,
                },
                None => Response::DivisionIgnored,
            }),
            Command::DivisionPrevious => Ok(match self.division_previous()? {
                Some(mv) => Response::DivisionMoved {
                    steps: mv.steps,
                    status: mv.status,
                },
                None => Response::DivisionIgnored,
            }),
            Command::SetZero => self.set_zero().map(|_| Response::ZeroSet),
        }
    }

    /// Periodic update: refresh the tracked position from the device's live
    /// step count. Returns the normalized angle for display.
    pub fn tick(&mut self) -> f32 {
        self.tracker.update(self.device.position(), &self.geometry)
    }

    /// Most recently tracked position in `[0, 360)`.
    #[inline]
    pub fn position(&self) -> f32 {
        self.tracker.angle()
    }

    /// Whether the input collaborator should deliver touches: always, except
    /// while a directed move is running.
    pub fn accepts_input(&self) -> bool {
        !self.device.is_running() || self.jog != JogCommand::Stop
    }

    /// Table geometry.
    #[inline]
    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    /// Jog preset distances for the UI labels.
    #[inline]
    pub fn jog_angles(&self) -> JogAngles {
        self.geometry.jog_angles()
    }

    /// Division state for the UI next/previous buttons.
    pub fn division_status(&self) -> DivisionStatus {
        DivisionStatus::for_index(self.sequencer.current_division(), self.division.steps())
    }

    /// Borrow the motion device.
    #[inline]
    pub fn device(&self) -> &D {
        &self.device
    }

    /// Seek the zero position in the given direction.
    pub fn goto_zero(&mut self, direction: Direction) -> Result<i64> {
        let steps = planner::goto_zero(
            self.tracker.angle(),
            direction,
            self.geometry.angle_per_step(),
        );
        self.device.move_relative(steps)?;
        Ok(steps)
    }

    /// Move to the persisted absolute target in the given direction.
    pub fn absolute_move(&mut self, direction: Direction) -> Result<i64> {
        let steps = planner::absolute_move(
            self.absolute_position,
            self.tracker.angle(),
            direction,
            self.geometry.angle_per_step(),
        );
        self.device.move_relative(steps)?;
        Ok(steps)
    }

    /// Move to the division start angle and reset division progress.
    pub fn goto_division_start(&mut self, direction: Direction) -> Result<(i64, DivisionStatus)> {
        let steps = planner::absolute_move(
            self.division.start(),
            self.tracker.angle(),
            direction,
            self.geometry.angle_per_step(),
        );
        self.device.move_relative(steps)?;
        let status = self.sequencer.reset(&self.division);
        Ok((steps, status))
    }

    /// Move by the persisted relative distance in the given direction.
    pub fn relative_move(&mut self, direction: Direction) -> Result<i64> {
        let steps = planner::relative_move(
            self.relative_move,
            direction,
            self.geometry.angle_per_step(),
        );
        self.device.move_relative(steps)?;
        Ok(steps)
    }

    /// Jog by a signed angle taken from a UI preset label.
    pub fn jog_incremental(&mut self, value: f32) -> Result<i64> {
        let steps = planner::incremental_jog(value, self.geometry.angle_per_step());
        self.device.move_relative(steps)?;
        Ok(steps)
    }

    /// Start or stop a continuous jog.
    pub fn jog(&mut self, command: JogCommand) -> Result<()> {
        match command {
            JogCommand::Stop => self.device.stop()?,
            JogCommand::Forward => self.device.run_forward()?,
            JogCommand::Backward => self.device.run_backward()?,
        }
        self.jog = command;
        Ok(())
    }

    /// Advance one division toward the end. `Ok(None)` when already there.
    pub fn division_next(&mut self) -> Result<Option<DivisionMove>> {
        self.division_nav(DivisionNav::Next)
    }

    /// Retreat one division toward the start. `Ok(None)` when already there.
    pub fn division_previous(&mut self) -> Result<Option<DivisionMove>> {
        self.division_nav(DivisionNav::Previous)
    }

    fn division_nav(&mut self, nav: DivisionNav) -> Result<Option<DivisionMove>> {
        let mv = self.sequencer.advance(
            &self.division,
            self.geometry.angle_per_step(),
            self.tracker.angle(),
            nav,
        );
        match mv {
            Some(mv) => {
                self.device.move_relative(mv.steps)?;
                Ok(Some(mv))
            }
            None => Ok(None),
        }
    }

    /// Declare the current position to be zero.
    pub fn set_zero(&mut self) -> Result<()> {
        self.device.set_position(0)?;
        self.tracker.update(self.device.position(), &self.geometry);
        Ok(())
    }

    /// Current value of a float entry field, formatted for the entry box.
    pub fn float_entry(&self, field: FloatField) -> EntryText {
        let value = match field {
            FloatField::RelativeMove => self.relative_move,
            FloatField::AbsolutePosition => self.absolute_position,
            FloatField::DegreesPerRev => self.geometry.degrees_per_rev(),
            FloatField::DivisionStart => self.division.start(),
            FloatField::DivisionEnd => self.division.end(),
        };
        let mut text = EntryText::new();
        let _ = write!(text, "{:.3}", value);
        text
    }

    /// Current value of an integer entry field, formatted for the entry box.
    pub fn int_entry(&self, field: IntField) -> EntryText {
        let value = match field {
            IntField::StepsPerRev => self.geometry.steps_per_rev(),
            IntField::MicroSteps => self.geometry.micro_steps(),
            IntField::DegreesPerSec => self.rates.degrees_per_sec(),
            IntField::DegreesAccel => self.rates.degrees_accel(),
            IntField::DivisionSteps => self.division.steps(),
        };
        let mut text = EntryText::new();
        let _ = write!(text, "{}", value);
        text
    }

    /// Apply a confirmed float entry: saturate to the field's range, persist
    /// where the field is persisted, then recompute derived state.
    pub fn apply_float_entry(&mut self, field: FloatField, value: f32) -> Result<()> {
        match field {
            FloatField::RelativeMove => {
                let value =
                    ranges::per_step_floor(self.geometry.angle_per_step()).clamp(value);
                self.store.put_float(SettingKey::RelativeMove, value)?;
                self.relative_move = value;
            }
            FloatField::AbsolutePosition => {
                let value = ranges::ABSOLUTE_POSITION.clamp(value);
                self.store.put_float(SettingKey::AbsolutePosition, value)?;
                self.absolute_position = value;
            }
            FloatField::DegreesPerRev => {
                let value =
                    ranges::per_step_floor(self.geometry.angle_per_step()).clamp(value);
                self.store.put_float(SettingKey::DegreesPerRev, value)?;
                self.reshape_geometry(|geometry| geometry.set_degrees_per_rev(value))?;
            }
            FloatField::DivisionStart => self.division.set_start(value),
            FloatField::DivisionEnd => self.division.set_end(value),
        }
        Ok(())
    }

    /// Apply a confirmed integer entry: saturate to the field's range,
    /// persist where the field is persisted, then recompute derived state.
    pub fn apply_int_entry(&mut self, field: IntField, value: i32) -> Result<()> {
        match field {
            IntField::StepsPerRev => {
                let value = ranges::STEPS_PER_REV.clamp(value);
                self.store.put_int(SettingKey::StepsPerRev, value)?;
                self.reshape_geometry(|geometry| geometry.set_steps_per_rev(value))?;
            }
            IntField::MicroSteps => {
                let value = ranges::MICRO_STEPS.clamp(value);
                self.store.put_int(SettingKey::MicroSteps, value)?;
                self.reshape_geometry(|geometry| geometry.set_micro_steps(value))?;
            }
            IntField::DegreesPerSec => {
                self.rates.set_degrees_per_sec(value);
                self.store
                    .put_int(SettingKey::DegreesPerSec, self.rates.degrees_per_sec())?;
                self.device.set_speed_hz(self.rates.step_rate(&self.geometry))?;
            }
            IntField::DegreesAccel => {
                self.rates.set_degrees_accel(value);
                self.store
                    .put_int(SettingKey::DegreesAccel, self.rates.degrees_accel())?;
                self.device
                    .set_acceleration(self.rates.step_acceleration(&self.geometry))?;
            }
            IntField::DivisionSteps => {
                self.division.set_steps(value);
                self.sequencer.clamp_to(self.division.steps());
            }
        }
        Ok(())
    }

    // Apply a geometry edit, rescale the device step count so the represented
    // angle survives the change, and re-derive the device step rates.
    fn reshape_geometry<F: FnOnce(&mut Geometry)>(&mut self, edit: F) -> Result<()> {
        let old_angle_per_step = self.geometry.angle_per_step();
        edit(&mut self.geometry);

        let rescaled = self
            .geometry
            .rescaled_steps(self.device.position(), old_angle_per_step);
        self.device.set_position(rescaled)?;
        self.push_rates()?;
        self.tracker.update(self.device.position(), &self.geometry);
        Ok(())
    }

    fn push_rates(&mut self) -> Result<()> {
        self.device.set_speed_hz(self.rates.step_rate(&self.geometry))?;
        self.device
            .set_acceleration(self.rates.step_acceleration(&self.geometry))?;
        Ok(())
    }
}
