//! ledterne: RGB indicator pixels with software PWM
//!
//! Two rates drive everything. A fast PWM-step interrupt runs [`PortStepper::step`],
//! switching each output against its stored duty cycle. A slow frame tick lets the
//! [`Dispatcher`] advance the active animation program by one frame, which pushes new
//! intensities through the [`Renderer`].
//!
//! The core here is hardware independent; `hal` and the firmware binary bind it to the
//! ATmega8 board.

#![cfg_attr(not(test), no_std)]
#![cfg_attr(target_arch = "avr", feature(abi_avr_interrupt))]

pub mod animation;
pub mod config;
pub mod console;
pub mod dispatcher;
pub mod drivers;
pub mod os;

#[cfg(all(target_arch = "avr", not(feature = "atmega8")))]
compile_error!("enable the `atmega8` feature to build the firmware");

#[cfg(target_arch = "avr")]
pub mod hal;

pub use animation::{IntensitySink, Program, ProgramError, ProgramKind};
pub use console::Console;
pub use dispatcher::{AnimationModule, Dispatcher, FrameTimer, ModuleChange};
pub use drivers::{Channel, DutyCycles, PortBit, PortStepper, PwmStepper, Renderer};
pub use os::{FrameDivider, FrameFlag, FRAME_READY};
