//! Animation dispatcher
//!
//! Walks a fixed playlist of [`AnimationModule`]s. Each module runs its program for a
//! number of full program cycles at its own frame period, then the next module takes
//! over. After the last module the playlist starts again from the first one.

use ufmt::derive::uDebug;

use crate::animation::{IntensitySink, Program, ProgramError, ProgramKind};
use crate::os::FrameDivider;

/// Reconfigures the frame tick when a new module starts
pub trait FrameTimer {
    fn set_period(&mut self, period_ms: u16);
}

impl FrameTimer for FrameDivider {
    fn set_period(&mut self, period_ms: u16) {
        FrameDivider::set_period(self, period_ms)
    }
}

/// One playlist entry
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AnimationModule {
    pub kind: ProgramKind,
    pub repetitions: u8,
    pub frame_period_ms: u16,
}

impl AnimationModule {
    pub const fn new(kind: ProgramKind, repetitions: u8, frame_period_ms: u16) -> Self {
        Self {
            kind,
            repetitions,
            frame_period_ms,
        }
    }
}

/// Reported by [`Dispatcher::tick`] when a module was loaded
#[derive(Clone, Copy, Debug, PartialEq, Eq, uDebug)]
pub struct ModuleChange {
    pub index: usize,
    pub kind: ProgramKind,
    pub repetitions: u8,
    pub frame_period_ms: u16,
}

pub struct Dispatcher<'p> {
    playlist: &'p [AnimationModule],
    index: usize,
    remaining: u8,
    current: Option<Program>,
}

impl<'p> Dispatcher<'p> {
    pub fn new(playlist: &'p [AnimationModule]) -> Result<Self, ProgramError> {
        if playlist.is_empty() {
            return Err(ProgramError::EmptyPlaylist);
        }
        if playlist.iter().any(|m| m.repetitions == 0) {
            return Err(ProgramError::ZeroRepetitions);
        }

        // one before the first entry, so the first tick loads module 0
        Ok(Self {
            playlist,
            index: playlist.len() - 1,
            remaining: 0,
            current: None,
        })
    }

    /// Index of the current (or, between modules, the last) playlist entry
    pub fn index(&self) -> usize {
        self.index
    }

    /// Program cycles left for the current module
    pub fn remaining(&self) -> u8 {
        self.remaining
    }

    pub fn current_kind(&self) -> Option<ProgramKind> {
        self.current.as_ref().map(Program::kind)
    }

    /// Runs one frame: loads the next module if the current one is used up, then
    /// executes the active program once.
    pub fn tick<S, T>(
        &mut self,
        sink: &mut S,
        timer: &mut T,
    ) -> Result<Option<ModuleChange>, ProgramError>
    where
        S: IntensitySink,
        T: FrameTimer,
    {
        let mut change = None;

        if self.remaining == 0 {
            self.current = None;
            self.index = (self.index + 1) % self.playlist.len();

            let module = self.playlist[self.index];
            self.current = Some(Program::new(module.kind)?);
            self.remaining = module.repetitions;
            timer.set_period(module.frame_period_ms);

            change = Some(ModuleChange {
                index: self.index,
                kind: module.kind,
                repetitions: module.repetitions,
                frame_period_ms: module.frame_period_ms,
            });
        }

        if let Some(program) = self.current.as_mut() {
            if program.execute(sink) {
                self.remaining -= 1;
                if self.remaining == 0 {
                    self.current = None;
                }
            }
        }

        Ok(change)
    }
}
