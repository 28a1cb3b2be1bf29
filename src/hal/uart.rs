//! Interrupt driven, transmit-only USART for the log console

use avr_device::atmega8::USART;
use avr_device::interrupt::Mutex;
use core::cell::RefCell;
use core::convert::Infallible;

use crate::config::{CPU_FREQ_HZ, UART_BAUD};

// Buffer size must be power of 2 for efficient masking
const BUFFER_SIZE: usize = 64;
const BUFFER_MASK: usize = BUFFER_SIZE - 1;

const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;

// UCSRB
const TXEN: u8 = 1 << 3;
const UDRIE: u8 = 1 << 5;
// UCSRC: URSEL | 8 data bits
const UCSRC_8N1: u8 = (1 << 7) | (1 << 2) | (1 << 1);

struct Buffer {
    data: [u8; BUFFER_SIZE],
    write_idx: usize,
    read_idx: usize,
}

impl Buffer {
    const fn new() -> Self {
        Self {
            data: [0; BUFFER_SIZE],
            write_idx: 0,
            read_idx: 0,
        }
    }

    fn write(&mut self, byte: u8) -> bool {
        let next_write = (self.write_idx + 1) & BUFFER_MASK;
        if next_write != self.read_idx {
            self.data[self.write_idx] = byte;
            self.write_idx = next_write;
            true
        } else {
            false
        }
    }

    fn read(&mut self) -> Option<u8> {
        if self.read_idx != self.write_idx {
            let byte = self.data[self.read_idx];
            self.read_idx = (self.read_idx + 1) & BUFFER_MASK;
            Some(byte)
        } else {
            None
        }
    }
}

static TX_BUFFER: Mutex<RefCell<Buffer>> = Mutex::new(RefCell::new(Buffer::new()));

pub struct Uart {
    _private: (),
}

impl Uart {
    pub fn new() -> Self {
        unsafe {
            let p = USART::ptr();
            (*p).ubrrh.write(|w| w.bits((UBRR >> 8) as u8));
            (*p).ubrrl.write(|w| w.bits(UBRR as u8));
            (*p).ucsrc.write(|w| w.bits(UCSRC_8N1));
            (*p).ucsrb.write(|w| w.bits(TXEN));
        }
        Self { _private: () }
    }

    /// Queues a byte, spinning while the buffer is full
    pub fn write_byte(&mut self, byte: u8) {
        loop {
            let queued =
                avr_device::interrupt::free(|cs| TX_BUFFER.borrow(cs).borrow_mut().write(byte));
            unsafe {
                (*USART::ptr()).ucsrb.modify(|r, w| w.bits(r.bits() | UDRIE));
            }
            if queued {
                break;
            }
        }
    }
}

impl Default for Uart {
    fn default() -> Self {
        Self::new()
    }
}

impl ufmt::uWrite for Uart {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Infallible> {
        for byte in s.bytes() {
            self.write_byte(byte);
        }
        Ok(())
    }
}

#[avr_device::interrupt(atmega8)]
fn USART_UDRE() {
    avr_device::interrupt::free(|cs| {
        let p = USART::ptr();
        if let Some(byte) = TX_BUFFER.borrow(cs).borrow_mut().read() {
            unsafe {
                (*p).udr.write(|w| w.bits(byte));
            }
        } else {
            // Buffer empty - disable TX interrupt
            unsafe {
                (*p).ucsrb.modify(|r, w| w.bits(r.bits() & !UDRIE));
            }
        }
    });
}
