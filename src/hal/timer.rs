//! The two interrupt sources: Timer1 for PWM steps, Timer2 for the 1 kHz frame base

use avr_device::atmega8::{TC1, TC2};

use crate::config::{FRAME_TIMER_COMPARE, PWM_TIMER_COMPARE};

// TCCR1B
const WGM12: u8 = 1 << 3;
// TCCR2
const WGM21: u8 = 1 << 3;
// TIMSK
const OCIE1A: u8 = 1 << 4;
const OCIE2: u8 = 1 << 7;

/// Clock select bits. Timer1 and Timer2 encode prescalers differently above /8.
/// Writing zero stops a timer.
#[derive(Clone, Copy)]
#[repr(u8)]
pub enum Prescaler {
    Direct = 1,
    /// Timer2 only
    Timer2Div64 = 4,
}

/// Fires `TIMER1_COMPA` once per PWM step
pub struct PwmStepTimer {
    _private: (),
}

impl PwmStepTimer {
    pub fn new() -> Self {
        unsafe {
            let p = TC1::ptr();
            (*p).tccr1a.write(|w| w.bits(0));
            (*p).tccr1b.write(|w| w.bits(0));
            (*p).tcnt1.write(|w| w.bits(0));
            (*p).ocr1a.write(|w| w.bits(PWM_TIMER_COMPARE));
        }
        Self { _private: () }
    }

    /// Clear-timer-on-compare, no prescaler, compare interrupt on
    pub fn start(&mut self) {
        unsafe {
            let p = TC1::ptr();
            (*p).tccr1b.write(|w| w.bits(WGM12 | Prescaler::Direct as u8));
            (*p).timsk.modify(|r, w| w.bits(r.bits() | OCIE1A));
        }
    }
}

impl Default for PwmStepTimer {
    fn default() -> Self {
        Self::new()
    }
}

/// Fires `TIMER2_COMP` every millisecond. The frame divider turns that into frames.
pub struct FrameBaseTimer {
    _private: (),
}

impl FrameBaseTimer {
    pub fn new() -> Self {
        unsafe {
            let p = TC2::ptr();
            (*p).tccr2.write(|w| w.bits(0));
            (*p).tcnt2.write(|w| w.bits(0));
            (*p).ocr2.write(|w| w.bits(FRAME_TIMER_COMPARE));
        }
        Self { _private: () }
    }

    pub fn start(&mut self) {
        unsafe {
            let p = TC2::ptr();
            (*p).tccr2.write(|w| w.bits(WGM21 | Prescaler::Timer2Div64 as u8));
            (*p).timsk.modify(|r, w| w.bits(r.bits() | OCIE2));
        }
    }
}

impl Default for FrameBaseTimer {
    fn default() -> Self {
        Self::new()
    }
}
