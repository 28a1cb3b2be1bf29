//! ATmega8 bindings for the reference board. Only built for AVR targets.

pub mod gpio;
pub mod timer;
pub mod uart;

// Re-export commonly used types
pub use gpio::{board, write_ports, Input, Output, Pin, Port, NUM_PORTS};
pub use timer::{FrameBaseTimer, Prescaler, PwmStepTimer};
pub use uart::Uart;
