use super::{IntensitySink, ProgramError, RampState};
use crate::config::{BLEND_LENGTH, BLEND_START, BLEND_STEPS, MAX_INTENSITY, NUM_PIXELS};

/// All pixels show one colour whose channels ramp up and down at different speeds
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ColorBlend {
    ramps: [RampState; 3],
    rgb: [u8; 3],
    steps: [u8; 3],
    frame: u16,
    length: u16,
}

impl ColorBlend {
    pub fn new() -> Result<Self, ProgramError> {
        Self::with_params(MAX_INTENSITY, BLEND_START, BLEND_STEPS, BLEND_LENGTH)
    }

    pub fn with_params(
        bound: u8,
        start: [u8; 3],
        steps: [u8; 3],
        length: u16,
    ) -> Result<Self, ProgramError> {
        let ramps = [RampState::new(bound); 3];
        for (ramp, step) in ramps.iter().zip(steps) {
            ramp.check_step(step)?;
        }
        Ok(Self {
            ramps,
            rgb: start.map(|v| v.min(bound)),
            steps,
            frame: 0,
            length,
        })
    }

    pub fn rgb(&self) -> [u8; 3] {
        self.rgb
    }

    pub fn ramps(&self) -> &[RampState; 3] {
        &self.ramps
    }

    pub fn execute<S: IntensitySink>(&mut self, sink: &mut S) -> bool {
        let [r, g, b] = self.rgb;
        for pixel in 0..NUM_PIXELS {
            sink.set_intensity(pixel, r, g, b);
        }

        let channels = self.ramps.iter_mut().zip(self.rgb.iter_mut());
        for ((ramp, value), step) in channels.zip(self.steps) {
            ramp.step(value, step);
        }

        self.frame += 1;
        if self.frame >= self.length {
            self.frame = 0;
            return true;
        }
        false
    }
}
