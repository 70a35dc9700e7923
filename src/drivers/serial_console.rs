use crate::config::{CPU_FREQ_HZ, UART_BAUD};
use avr_device::atmega128a::USART0;
use core::convert::Infallible;

// (16_000_000 / (16 * 9600)) - 1 = 103
const UBRR: u16 = (CPU_FREQ_HZ / (16 * UART_BAUD) - 1) as u16;
// UDRE0
const DATA_REGISTER_EMPTY: u8 = 1 << 5;
// TXEN0
const TX_ENABLE: u8 = 1 << 3;
// 8N1
const FRAME_8N1: u8 = 0x06;

/// Blocking transmit-only console on USART0. Clones share the one USART.
#[derive(Clone)]
pub struct SerialConsole {
    _private: (),
}

impl SerialConsole {
    pub fn new() -> Self {
        unsafe {
            let p = USART0::ptr();
            (*p).ubrr0h.write(|w| w.bits((UBRR >> 8) as u8));
            (*p).ubrr0l.write(|w| w.bits(UBRR as u8));
            (*p).ucsr0c.write(|w| w.bits(FRAME_8N1));
            (*p).ucsr0b.write(|w| w.bits(TX_ENABLE));
        }
        Self { _private: () }
    }

    pub fn write_byte(&mut self, byte: u8) {
        unsafe {
            let p = USART0::ptr();
            while (*p).ucsr0a.read().bits() & DATA_REGISTER_EMPTY == 0 {}
            (*p).udr0.write(|w| w.bits(byte));
        }
    }
}

impl ufmt::uWrite for SerialConsole {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        for byte in s.bytes() {
            if byte == b'\n' {
                self.write_byte(b'\r');
            }
            self.write_byte(byte);
        }
        Ok(())
    }
}

impl Default for SerialConsole {
    fn default() -> Self {
        Self::new()
    }
}
