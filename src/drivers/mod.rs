pub mod renderer;

pub use renderer::{Channel, DutyCycles, PortBit, PortStepper, PwmStepper, Renderer, GAMMA};
