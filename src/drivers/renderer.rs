//! Software PWM intensity renderer
//!
//! The foreground loop hands logical intensities to a [`Renderer`], which converts them
//! through [`GAMMA`] into duty cycles stored in a shared [`DutyCycles`] buffer. The PWM
//! step interrupt compares a free-running counter against those duty cycles and switches
//! the outputs. [`PwmStepper`] does that pin by pin through `OutputPin`; [`PortStepper`]
//! builds one byte per port so the firmware writes each port register once per step.
//!
//! Every channel lives in its own `AtomicU8`, so the interrupt always reads either the
//! old or the new duty of a channel, never a torn value. Whole-pixel consistency is up to
//! the caller (the firmware writes pixels inside a critical section).

use core::sync::atomic::{AtomicU8, Ordering};

use embedded_hal::digital::v2::OutputPin;

use crate::animation::IntensitySink;
use crate::config::{MAX_INTENSITY, PWM_STEPS};

/// Logical intensity to PWM steps. Brighter levels need the output on for
/// disproportionately more steps: `round(255 ^ (i / 63))`.
#[rustfmt::skip]
pub const GAMMA: [u8; MAX_INTENSITY as usize + 1] = [
      0,   1,   1,   1,   1,   2,   2,   2,
      2,   2,   2,   3,   3,   3,   3,   4,
      4,   4,   5,   5,   6,   6,   7,   8,
      8,   9,  10,  11,  12,  13,  14,  15,
     17,  18,  20,  22,  24,  26,  28,  31,
     34,  37,  40,  44,  48,  52,  57,  62,
     68,  74,  81,  89,  97, 106, 116, 126,
    138, 150, 164, 179, 196, 214, 234, 255,
];

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Channel {
    Red = 0,
    Green = 1,
    Blue = 2,
}

impl Channel {
    pub const ALL: [Channel; 3] = [Channel::Red, Channel::Green, Channel::Blue];
}

/// Per-pixel, per-channel duty cycles shared between the frame loop and the PWM interrupt
pub struct DutyCycles<const N: usize> {
    cells: [[AtomicU8; 3]; N],
}

impl<const N: usize> DutyCycles<N> {
    pub const fn new() -> Self {
        #[allow(clippy::declare_interior_mutable_const)]
        const OFF: AtomicU8 = AtomicU8::new(0);
        #[allow(clippy::declare_interior_mutable_const)]
        const PIXEL: [AtomicU8; 3] = [OFF; 3];
        Self { cells: [PIXEL; N] }
    }

    #[inline]
    pub fn load(&self, pixel: usize, channel: Channel) -> u8 {
        self.cells[pixel][channel as usize].load(Ordering::Relaxed)
    }

    #[inline]
    pub fn store(&self, pixel: usize, channel: Channel, duty: u8) {
        self.cells[pixel][channel as usize].store(duty, Ordering::Relaxed)
    }
}

impl<const N: usize> Default for DutyCycles<N> {
    fn default() -> Self {
        Self::new()
    }
}

/// Write side of the duty-cycle buffer
pub struct Renderer<'a, const N: usize> {
    duty: &'a DutyCycles<N>,
}

impl<'a, const N: usize> Renderer<'a, N> {
    pub fn new(duty: &'a DutyCycles<N>) -> Self {
        Self { duty }
    }

    /// Stores duty cycles as given, skipping the gamma table
    pub fn set_intensity_raw(&mut self, pixel: usize, r: u8, g: u8, b: u8) {
        if pixel >= N {
            return;
        }
        for (channel, value) in Channel::ALL.into_iter().zip([r, g, b]) {
            self.duty.store(pixel, channel, value);
        }
    }

    /// Switches every output off
    pub fn clear(&mut self) {
        for pixel in 0..N {
            self.set_intensity_raw(pixel, 0, 0, 0);
        }
    }
}

impl<const N: usize> IntensitySink for Renderer<'_, N> {
    fn set_intensity(&mut self, pixel: usize, r: u8, g: u8, b: u8) {
        if pixel >= N {
            return;
        }
        for (channel, value) in Channel::ALL.into_iter().zip([r, g, b]) {
            // out of range keeps the previous duty
            if let Some(&duty) = GAMMA.get(value as usize) {
                self.duty.store(pixel, channel, duty);
            }
        }
    }
}

/// Drives the outputs for one PWM step at a time
pub struct PwmStepper<P, const N: usize> {
    pins: [[P; 3]; N],
    counter: u8,
}

impl<P: OutputPin, const N: usize> PwmStepper<P, N> {
    pub fn new(pins: [[P; 3]; N]) -> Self {
        Self { pins, counter: 0 }
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Switches every output on whose duty exceeds the step counter, then advances the
    /// counter. The counter wraps after `PWM_STEPS` steps.
    pub fn step(&mut self, duty: &DutyCycles<N>) -> Result<(), P::Error> {
        let counter = self.counter;
        for (pixel, pins) in self.pins.iter_mut().enumerate() {
            for (pin, channel) in pins.iter_mut().zip(Channel::ALL) {
                if counter < duty.load(pixel, channel) {
                    pin.set_high()?;
                } else {
                    pin.set_low()?;
                }
            }
        }

        self.counter = next_step(counter);
        Ok(())
    }

    pub fn release(self) -> [[P; 3]; N] {
        self.pins
    }
}

#[inline]
fn next_step(counter: u8) -> u8 {
    let next = counter.wrapping_add(1);
    if next >= PWM_STEPS {
        0
    } else {
        next
    }
}

/// Where one channel's output sits: port index and bit mask within that port
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PortBit {
    pub port: u8,
    pub mask: u8,
}

impl PortBit {
    pub const fn new(port: u8, bit: u8) -> Self {
        Self {
            port,
            mask: 1 << bit,
        }
    }
}

/// PWM step computed a whole port at a time.
///
/// `step` returns the bits to drive high on each of the `P` ports. Only the bits listed
/// in [`owned`](Self::owned) belong to the stepper; the caller keeps every other bit of
/// the port register as it is.
pub struct PortStepper<const N: usize, const P: usize> {
    map: [[PortBit; 3]; N],
    owned: [u8; P],
    counter: u8,
}

impl<const N: usize, const P: usize> PortStepper<N, P> {
    /// Outputs on a port index of `P` or above are never driven
    pub fn new(mut map: [[PortBit; 3]; N]) -> Self {
        let mut owned = [0; P];
        for out in map.iter_mut().flatten() {
            match owned.get_mut(out.port as usize) {
                Some(bits) => *bits |= out.mask,
                None => out.mask = 0,
            }
        }
        Self {
            map,
            owned,
            counter: 0,
        }
    }

    pub fn owned(&self) -> &[u8; P] {
        &self.owned
    }

    pub fn counter(&self) -> u8 {
        self.counter
    }

    /// Same comparison as [`PwmStepper::step`], collected into one byte per port
    #[inline]
    pub fn step(&mut self, duty: &DutyCycles<N>) -> [u8; P] {
        let counter = self.counter;
        let mut on = [0; P];
        for (pixel, outs) in self.map.iter().enumerate() {
            for (out, channel) in outs.iter().zip(Channel::ALL) {
                if counter < duty.load(pixel, channel) {
                    if let Some(bits) = on.get_mut(out.port as usize) {
                        *bits |= out.mask;
                    }
                }
            }
        }
        self.counter = next_step(counter);
        on
    }
}
