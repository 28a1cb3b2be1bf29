//! Bounded ramp oscillator shared by every animation program

use super::ProgramError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Direction {
    Rising,
    Falling,
}

/// Up/down ramp between 0 and `bound`.
///
/// The ramped value lives with the caller so one program can keep a plain array of
/// intensities and still drive each entry with its own oscillator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RampState {
    bound: u8,
    direction: Direction,
}

impl RampState {
    pub const fn new(bound: u8) -> Self {
        Self {
            bound,
            direction: Direction::Rising,
        }
    }

    pub const fn with_direction(bound: u8, direction: Direction) -> Self {
        Self { bound, direction }
    }

    #[inline]
    pub fn direction(&self) -> Direction {
        self.direction
    }

    /// Rejects step sizes the oscillator cannot honour: zero, or more than `bound + 1`.
    pub fn check_step(&self, step: u8) -> Result<(), ProgramError> {
        if step == 0 || step as u16 > self.bound as u16 + 1 {
            return Err(ProgramError::InvalidStep);
        }
        Ok(())
    }

    /// Moves `value` one step and returns true once a falling excursion lands on 0,
    /// i.e. after one complete up-then-down traversal.
    pub fn step(&mut self, value: &mut u8, step: u8) -> bool {
        debug_assert!(self.check_step(step).is_ok());

        match self.direction {
            Direction::Rising => {
                if *value as u16 + step as u16 <= self.bound as u16 {
                    *value += step;
                    if *value == self.bound {
                        self.direction = Direction::Falling;
                    }
                } else {
                    // step does not divide the range
                    *value = self.bound;
                    self.direction = Direction::Falling;
                }
                false
            }
            Direction::Falling => {
                if *value >= step {
                    *value -= step;
                    if *value == 0 {
                        self.direction = Direction::Rising;
                        return true;
                    }
                    false
                } else {
                    *value = 0;
                    self.direction = Direction::Rising;
                    true
                }
            }
        }
    }
}

/// One-directional ramp: adds `step` and wraps to 0 once `bound` would be exceeded.
/// Returns true on wraparound.
pub fn ramp_up(value: &mut u8, bound: u8, step: u8) -> bool {
    if (*value as u16) + (step as u16) <= bound as u16 {
        *value += step;
        false
    } else {
        *value = 0;
        true
    }
}
