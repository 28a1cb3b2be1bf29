//! Configuration constants for the ledterne firmware
//!
//! Everything here is fixed at build time. The playlist at the bottom decides which
//! animation programs run, how often, and at which frame rate.

use crate::animation::ProgramKind;
use crate::dispatcher::AnimationModule;

/// CPU frequency in Hz, exported by `build.rs`
pub const CPU_FREQ_HZ: u32 = parse_hz(env!("MCU_FREQ_HZ"));

const fn parse_hz(s: &str) -> u32 {
    let bytes = s.as_bytes();
    let mut value = 0u32;
    let mut i = 0;
    while i < bytes.len() {
        let digit = bytes[i];
        assert!(digit.is_ascii_digit(), "MCU_FREQ_HZ must be decimal");
        value = value * 10 + (digit - b'0') as u32;
        i += 1;
    }
    value
}

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// Number of RGB pixels on the board
pub const NUM_PIXELS: usize = 5;

/// Highest logical brightness of a single colour channel
pub const MAX_INTENSITY: u8 = 63;

/// PWM steps per period. The step counter wraps here, so a duty of 255 is always on.
pub const PWM_STEPS: u8 = 255;

/// PWM step rate. 255 steps make a full period of ~78 Hz.
pub const PWM_STEP_HZ: u32 = 20_000;

/// Timer1 compare value for one PWM step, f = CPU_FREQ_HZ / (1 + OCR1A).
///
/// The step interrupt has `PWM_TIMER_COMPARE + 1` cycles (400 at 8 MHz). It spends
/// roughly 40 on entry and exit, about 12 per channel to compare 15 duty cycles and
/// collect port bits, and about 6 per port register write: ~240 in total. Frame work and
/// the UART run in what is left.
pub const PWM_TIMER_COMPARE: u16 = (CPU_FREQ_HZ / PWM_STEP_HZ - 1) as u16;

/// Frame base tick rate. Timer2 fires this often and the frame divider counts it down.
pub const FRAME_BASE_HZ: u32 = 1000;

/// Timer2 prescaler used for the frame base tick
pub const FRAME_TIMER_PRESCALER: u32 = 64;

/// Timer2 compare value for the frame base tick (8 MHz / 64 / 125 = 1 kHz)
pub const FRAME_TIMER_COMPARE: u8 =
    (CPU_FREQ_HZ / FRAME_TIMER_PRESCALER / FRAME_BASE_HZ - 1) as u8;

/// Shortest frame period a module may request
pub const MIN_FRAME_PERIOD_MS: u16 = 10;

/// Longest frame period a module may request
pub const MAX_FRAME_PERIOD_MS: u16 = 1000;

// Color blend
pub const BLEND_STEPS: [u8; 3] = [2, 1, 3];
pub const BLEND_START: [u8; 3] = [0, 10, 21];
pub const BLEND_LENGTH: u16 = 100;

// Bouncing scanner
pub const NUM_FADE_STATES: usize = 4;
pub const FADE_LEVELS: [u8; NUM_FADE_STATES] = [0, 4, 16, MAX_INTENSITY];
pub const SCANNER_MOVE_FRAMES: u8 = 17;
pub const SCANNER_CYCLE_FRAMES: u8 = 25;

// Color conveyor
pub const CONVEYOR_PHASE_STEP: u8 = (2 * MAX_INTENSITY as u16 / NUM_PIXELS as u16) as u8;
pub const CONVEYOR_CYCLE_FRAMES: u16 = 2 * MAX_INTENSITY as u16 - 1;

// Display test
pub const DISPLAY_TEST_DIVIDER: u8 = 4;

/// The playlist. Wraps around to the first entry after the last one.
pub const PLAYLIST: [AnimationModule; 4] = [
    AnimationModule::new(ProgramKind::TestDisplays, 1, 50),
    AnimationModule::new(ProgramKind::MixedColorBlending, 4, 65),
    AnimationModule::new(ProgramKind::KnightRider, 6, 40),
    AnimationModule::new(ProgramKind::ColoredConveyor, 2, 20),
];

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timer_constants_match_reference_clock() {
        assert_eq!(CPU_FREQ_HZ, 8_000_000);
        assert_eq!(PWM_TIMER_COMPARE, 399);
        assert_eq!(FRAME_TIMER_COMPARE, 124);
    }

    #[test]
    fn pwm_period_stays_above_flicker_rate() {
        let cycles_per_step = PWM_TIMER_COMPARE as u32 + 1;
        assert!(cycles_per_step >= 400);
        assert!(CPU_FREQ_HZ / cycles_per_step / PWM_STEPS as u32 >= 75);
    }

    #[test]
    fn fade_levels_end_at_full_brightness() {
        assert_eq!(FADE_LEVELS[0], 0);
        assert_eq!(FADE_LEVELS[NUM_FADE_STATES - 1], MAX_INTENSITY);
        assert!(FADE_LEVELS.windows(2).all(|w| w[0] < w[1]));
    }

    #[test]
    fn conveyor_cycle_is_one_short_of_triangle_period() {
        assert_eq!(CONVEYOR_CYCLE_FRAMES, 125);
        assert_eq!(CONVEYOR_PHASE_STEP, 25);
    }
}
