//! Animation programs
//!
//! Every program owns its oscillators and per-pixel state and is advanced exactly one
//! frame per [`Program::execute`] call. A program pushes its current intensities to an
//! [`IntensitySink`] first, then advances, and finally reports whether one full cycle of
//! the program has elapsed.

pub mod color_blend;
pub mod conveyor;
pub mod ramp;
pub mod scanner;

pub use color_blend::ColorBlend;
pub use conveyor::ColorConveyor;
pub use display_test::DisplayTest;
pub use ramp::{ramp_up, Direction, RampState};
pub use scanner::BouncingScanner;

use ufmt::derive::uDebug;

/// Receives logical `0..=MAX_INTENSITY` channel values for one pixel.
///
/// The renderer implements this for the real outputs. Values outside the logical range
/// and unknown pixel indices are ignored by implementors.
pub trait IntensitySink {
    fn set_intensity(&mut self, pixel: usize, r: u8, g: u8, b: u8);
}

impl<T: IntensitySink + ?Sized> IntensitySink for &mut T {
    fn set_intensity(&mut self, pixel: usize, r: u8, g: u8, b: u8) {
        (**self).set_intensity(pixel, r, g, b)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum ProgramError {
    /// Ramp step size is zero or larger than `bound + 1`
    InvalidStep,
    /// The board has no pixels to animate
    NoPixels,
    /// The playlist has no modules
    EmptyPlaylist,
    /// A playlist module asks for zero repetitions
    ZeroRepetitions,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub enum ProgramKind {
    MixedColorBlending,
    KnightRider,
    ColoredConveyor,
    TestDisplays,
}

/// The one live animation program
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Program {
    MixedColorBlending(ColorBlend),
    KnightRider(BouncingScanner),
    ColoredConveyor(ColorConveyor),
    TestDisplays(DisplayTest),
}

impl Program {
    pub fn new(kind: ProgramKind) -> Result<Self, ProgramError> {
        Ok(match kind {
            ProgramKind::MixedColorBlending => Program::MixedColorBlending(ColorBlend::new()?),
            ProgramKind::KnightRider => Program::KnightRider(BouncingScanner::new()?),
            ProgramKind::ColoredConveyor => Program::ColoredConveyor(ColorConveyor::new()?),
            ProgramKind::TestDisplays => Program::TestDisplays(DisplayTest::new()?),
        })
    }

    pub fn kind(&self) -> ProgramKind {
        match self {
            Program::MixedColorBlending(_) => ProgramKind::MixedColorBlending,
            Program::KnightRider(_) => ProgramKind::KnightRider,
            Program::ColoredConveyor(_) => ProgramKind::ColoredConveyor,
            Program::TestDisplays(_) => ProgramKind::TestDisplays,
        }
    }

    /// Advances the program one frame. Returns true when a full program cycle has finished.
    pub fn execute<S: IntensitySink>(&mut self, sink: &mut S) -> bool {
        match self {
            Program::MixedColorBlending(p) => p.execute(sink),
            Program::KnightRider(p) => p.execute(sink),
            Program::ColoredConveyor(p) => p.execute(sink),
            Program::TestDisplays(p) => p.execute(sink),
        }
    }
}
