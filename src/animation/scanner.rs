//! Bouncing scanner: a bright dot sweeps back and forth leaving a fading tail

use super::{IntensitySink, ProgramError, RampState};
use crate::config::{
    FADE_LEVELS, NUM_FADE_STATES, NUM_PIXELS, SCANNER_CYCLE_FRAMES, SCANNER_MOVE_FRAMES,
};

const TOP_FADE: u8 = (NUM_FADE_STATES - 1) as u8;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BouncingScanner {
    ramp: RampState,
    position: u8,
    fade: [u8; NUM_PIXELS],
    frame: u8,
}

impl BouncingScanner {
    pub fn new() -> Result<Self, ProgramError> {
        if NUM_PIXELS == 0 {
            return Err(ProgramError::NoPixels);
        }
        let ramp = RampState::new((NUM_PIXELS - 1) as u8);
        ramp.check_step(1)?;

        let mut fade = [0; NUM_PIXELS];
        fade[0] = TOP_FADE;
        Ok(Self {
            ramp,
            position: 0,
            fade,
            frame: 0,
        })
    }

    /// Fade level per pixel, `0..NUM_FADE_STATES`
    pub fn fade_levels(&self) -> &[u8; NUM_PIXELS] {
        &self.fade
    }

    pub fn execute<S: IntensitySink>(&mut self, sink: &mut S) -> bool {
        for (pixel, &level) in self.fade.iter().enumerate() {
            sink.set_intensity(pixel, FADE_LEVELS[level as usize], 0, 0);
        }

        self.frame += 1;
        let finished = self.frame >= SCANNER_CYCLE_FRAMES;
        if finished {
            self.frame = 0;
        }

        for level in self.fade.iter_mut() {
            *level = level.saturating_sub(1);
        }

        if self.frame < SCANNER_MOVE_FRAMES {
            // the cycle restarts where the previous sweep stopped
            if self.frame != 0 {
                self.ramp.step(&mut self.position, 1);
            }
            self.fade[self.position as usize] = TOP_FADE;
        }

        finished
    }
}
