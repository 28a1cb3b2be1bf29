//! Frame timing shared between the timer interrupts and the foreground loop

use core::convert::Infallible;
use core::sync::atomic::{AtomicU8, Ordering};

use crate::config::{MAX_FRAME_PERIOD_MS, MIN_FRAME_PERIOD_MS};

/// Frame-ready flag.
///
/// Raised from the frame interrupt, consumed by the foreground loop. Ticks that arrive
/// before the loop took the previous one collapse into a single pending frame.
///
/// AVR has no atomic read-modify-write, so each side owns one counter: `raise` bumps
/// `raised` and must only be called from a single interrupt handler; `poll` copies what
/// it saw into `taken`. A raise landing in the middle of a `poll` leaves the counters
/// unequal, so that frame is still pending afterwards. More than 255 raises between two
/// polls can wrap back to equal and read as no frame.
pub struct FrameFlag {
    raised: AtomicU8,
    taken: AtomicU8,
}

impl FrameFlag {
    pub const fn new() -> Self {
        Self {
            raised: AtomicU8::new(0),
            taken: AtomicU8::new(0),
        }
    }

    #[inline]
    pub fn raise(&self) {
        let raised = self.raised.load(Ordering::Relaxed);
        self.raised.store(raised.wrapping_add(1), Ordering::Release);
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.raised.load(Ordering::Acquire) != self.taken.load(Ordering::Relaxed)
    }

    /// Takes the pending frame, or `WouldBlock` if there is none. Use with `nb::block!`.
    pub fn poll(&self) -> nb::Result<(), Infallible> {
        let raised = self.raised.load(Ordering::Acquire);
        if raised != self.taken.load(Ordering::Relaxed) {
            self.taken.store(raised, Ordering::Relaxed);
            Ok(())
        } else {
            Err(nb::Error::WouldBlock)
        }
    }
}

impl Default for FrameFlag {
    fn default() -> Self {
        Self::new()
    }
}

/// Global frame flag
pub static FRAME_READY: FrameFlag = FrameFlag::new();

/// Counts base ticks (1 ms each) down to the next frame
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct FrameDivider {
    period: u16,
    remaining: u16,
}

impl FrameDivider {
    pub const fn new(period_ms: u16) -> Self {
        let period = clamp_period(period_ms);
        Self {
            period,
            remaining: period,
        }
    }

    pub fn period(&self) -> u16 {
        self.period
    }

    /// Restarts the countdown with a new period
    pub fn set_period(&mut self, period_ms: u16) {
        self.period = clamp_period(period_ms);
        self.remaining = self.period;
    }

    /// Call once per base tick. Returns true when a frame is due.
    #[inline]
    pub fn tick(&mut self) -> bool {
        self.remaining -= 1;
        if self.remaining == 0 {
            self.remaining = self.period;
            true
        } else {
            false
        }
    }
}

pub const fn clamp_period(period_ms: u16) -> u16 {
    if period_ms < MIN_FRAME_PERIOD_MS {
        MIN_FRAME_PERIOD_MS
    } else if period_ms > MAX_FRAME_PERIOD_MS {
        MAX_FRAME_PERIOD_MS
    } else {
        period_ms
    }
}
