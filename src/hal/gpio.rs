use avr_device::atmega8::{PORTB, PORTC, PORTD};
use core::marker::PhantomData;

use crate::drivers::PortBit;

pub trait PinMode {}
pub struct Input;
pub struct Output;
impl PinMode for Input {}
impl PinMode for Output {}

/// Number of I/O ports, indexed by `Port as usize`
pub const NUM_PORTS: usize = 3;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[repr(u8)]
pub enum Port {
    B = 0,
    C = 1,
    D = 2,
}

/// A single port pin. The bit mask is computed once here; AVR shifts by a runtime
/// amount one position per cycle.
#[derive(Debug)]
pub struct Pin<MODE> {
    port: Port,
    mask: u8,
    _mode: PhantomData<MODE>,
}

// Read-modify-write of one port register
macro_rules! modify_reg {
    ($port:expr, ($b:ident, $c:ident, $d:ident), |$bits:ident| $update:expr) => {
        unsafe {
            match $port {
                Port::B => (*PORTB::ptr()).$b.modify(|r, w| {
                    let $bits = r.bits();
                    w.bits($update)
                }),
                Port::C => (*PORTC::ptr()).$c.modify(|r, w| {
                    let $bits = r.bits();
                    w.bits($update)
                }),
                Port::D => (*PORTD::ptr()).$d.modify(|r, w| {
                    let $bits = r.bits();
                    w.bits($update)
                }),
            }
        }
    };
}

impl Pin<Input> {
    /// Pins come out of reset as inputs
    pub const fn new(port: Port, bit: u8) -> Self {
        Pin {
            port,
            mask: 1 << bit,
            _mode: PhantomData,
        }
    }
}

impl<MODE: PinMode> Pin<MODE> {
    /// Sets the DDR bit, output driven low
    pub fn into_output(self) -> Pin<Output> {
        let mask = self.mask;
        modify_reg!(self.port, (portb, portc, portd), |bits| bits & !mask);
        modify_reg!(self.port, (ddrb, ddrc, ddrd), |bits| bits | mask);
        Pin {
            port: self.port,
            mask,
            _mode: PhantomData,
        }
    }

    pub fn port_bit(&self) -> PortBit {
        PortBit {
            port: self.port as u8,
            mask: self.mask,
        }
    }
}

/// Writes the bits of all three ports in one pass. Bits outside `owned` keep their
/// current level.
#[inline(always)]
pub fn write_ports(owned: &[u8; NUM_PORTS], on: &[u8; NUM_PORTS]) {
    unsafe {
        (*PORTB::ptr())
            .portb
            .modify(|r, w| w.bits((r.bits() & !owned[0]) | on[0]));
        (*PORTC::ptr())
            .portc
            .modify(|r, w| w.bits((r.bits() & !owned[1]) | on[1]));
        (*PORTD::ptr())
            .portd
            .modify(|r, w| w.bits((r.bits() & !owned[2]) | on[2]));
    }
}

// Reference board wiring (LED anodes)
pub mod board {
    use super::*;
    use crate::config::NUM_PIXELS;
    use crate::drivers::PortStepper;

    /// `[red, green, blue]` per pixel. PD0/PD1 stay free for the UART.
    pub const PIXEL_PINS: [[(Port, u8); 3]; NUM_PIXELS] = [
        [(Port::B, 2), (Port::B, 1), (Port::B, 3)],
        [(Port::B, 4), (Port::B, 5), (Port::B, 0)],
        [(Port::C, 0), (Port::C, 1), (Port::C, 2)],
        [(Port::C, 3), (Port::C, 4), (Port::C, 5)],
        [(Port::D, 2), (Port::D, 3), (Port::D, 4)],
    ];

    /// Configures every pixel pin as a low output and maps it for the PWM interrupt
    pub fn pixel_ports() -> PortStepper<NUM_PIXELS, NUM_PORTS> {
        let map = PIXEL_PINS.map(|rgb| {
            rgb.map(|(port, bit)| Pin::new(port, bit).into_output().port_bit())
        });
        PortStepper::new(map)
    }
}
