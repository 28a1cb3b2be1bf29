//! Coloured conveyor: a triangle wave on the red channel travels along the pixels

use super::{Direction, IntensitySink, ProgramError, RampState};
use crate::config::{CONVEYOR_CYCLE_FRAMES, CONVEYOR_PHASE_STEP, MAX_INTENSITY, NUM_PIXELS};

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorConveyor {
    ramps: [RampState; NUM_PIXELS],
    red: [u8; NUM_PIXELS],
    frame: u16,
}

impl ColorConveyor {
    pub fn new() -> Result<Self, ProgramError> {
        if NUM_PIXELS == 0 {
            return Err(ProgramError::NoPixels);
        }
        RampState::new(MAX_INTENSITY).check_step(1)?;

        let period = 2 * MAX_INTENSITY as u16;
        let mut ramps = [RampState::new(MAX_INTENSITY); NUM_PIXELS];
        let mut red = [0; NUM_PIXELS];
        for (i, (ramp, value)) in ramps.iter_mut().zip(red.iter_mut()).enumerate() {
            let phase = (i as u16 * CONVEYOR_PHASE_STEP as u16) % period;
            let (v, direction) = triangle(phase);
            *ramp = RampState::with_direction(MAX_INTENSITY, direction);
            *value = v;
        }

        Ok(Self {
            ramps,
            red,
            frame: 0,
        })
    }

    pub fn red(&self) -> &[u8; NUM_PIXELS] {
        &self.red
    }

    pub fn execute<S: IntensitySink>(&mut self, sink: &mut S) -> bool {
        for (pixel, &r) in self.red.iter().enumerate() {
            sink.set_intensity(pixel, r, 0, 0);
        }

        for (ramp, value) in self.ramps.iter_mut().zip(self.red.iter_mut()) {
            ramp.step(value, 1);
        }

        self.frame += 1;
        if self.frame >= CONVEYOR_CYCLE_FRAMES {
            self.frame = 0;
            return true;
        }
        false
    }
}

/// Value and heading of a triangle wave of period `2 * MAX_INTENSITY` at `phase`
fn triangle(phase: u16) -> (u8, Direction) {
    let max = MAX_INTENSITY as u16;
    if phase < max {
        (phase as u8, Direction::Rising)
    } else {
        ((2 * max - phase) as u8, Direction::Falling)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::testing::Frame;

    #[test]
    fn pixels_start_at_staggered_phases() {
        let conveyor = ColorConveyor::new().unwrap();
        assert_eq!(conveyor.red(), &[0, 25, 50, 51, 26]);
    }

    #[test]
    fn wave_travels_one_phase_step_per_pixel() {
        let mut conveyor = ColorConveyor::new().unwrap();
        let mut history = [[0u8; NUM_PIXELS]; 2 * MAX_INTENSITY as usize];
        let mut frame = Frame::default();
        for row in history.iter_mut() {
            conveyor.execute(&mut frame);
            for (v, p) in row.iter_mut().zip(frame.pixels.iter()) {
                *v = p[0];
            }
        }
        // pixel 1 at frame t equals pixel 0 at frame t + phase step
        let lag = CONVEYOR_PHASE_STEP as usize;
        for t in 0..history.len() - lag {
            assert_eq!(history[t][1], history[t + lag][0], "frame {}", t);
        }
        assert!(frame.pixels.iter().all(|p| p[1] == 0 && p[2] == 0));
    }

    #[test]
    fn triangle_has_period_twice_max_intensity() {
        let mut conveyor = ColorConveyor::new().unwrap();
        let start = *conveyor.red();
        for _ in 0..2 * MAX_INTENSITY as u16 {
            conveyor.execute(&mut Frame::default());
        }
        assert_eq!(conveyor.red(), &start);
    }

    #[test]
    fn reports_cycle_every_125_frames() {
        let mut conveyor = ColorConveyor::new().unwrap();
        let mut frame = Frame::default();
        for i in 1..=2 * CONVEYOR_CYCLE_FRAMES {
            let done = conveyor.execute(&mut frame);
            assert_eq!(done, i % CONVEYOR_CYCLE_FRAMES == 0, "frame {}", i);
        }
    }
}
