use avr_device::atmega128a::{PORTA, PORTB, PORTE};
use core::convert::Infallible;
use embedded_hal::digital::v2::OutputPin;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Port {
    A,
    B,
    E,
}

#[derive(Clone, Copy)]
enum Reg {
    Ddr,
    Port,
}

/// A single GPIO line. Direction is set with [`configure_output`] or
/// [`configure_input_pullup`] before the handle is used.
#[derive(Clone, Copy, Debug)]
pub struct Pin {
    port: Port,
    bit: u8,
}

impl Pin {
    pub const fn new(port: Port, bit: u8) -> Self {
        Self { port, bit }
    }

    #[inline]
    fn mask(&self) -> u8 {
        1 << self.bit
    }
}

macro_rules! write_bit {
    ($PORT:ident, $reg:ident, $mask:expr, $set:expr) => {
        unsafe {
            (*$PORT::ptr()).$reg.modify(|r, w| {
                if $set {
                    w.bits(r.bits() | $mask)
                } else {
                    w.bits(r.bits() & !$mask)
                }
            });
        }
    };
}

fn write(port: Port, reg: Reg, mask: u8, set: bool) {
    match (port, reg) {
        (Port::A, Reg::Ddr) => write_bit!(PORTA, ddra, mask, set),
        (Port::A, Reg::Port) => write_bit!(PORTA, porta, mask, set),
        (Port::B, Reg::Ddr) => write_bit!(PORTB, ddrb, mask, set),
        (Port::B, Reg::Port) => write_bit!(PORTB, portb, mask, set),
        (Port::E, Reg::Ddr) => write_bit!(PORTE, ddre, mask, set),
        (Port::E, Reg::Port) => write_bit!(PORTE, porte, mask, set),
    }
}

/// Make `pin` a push-pull output, driven low
pub fn configure_output(pin: Pin) {
    write(pin.port, Reg::Port, pin.mask(), false);
    write(pin.port, Reg::Ddr, pin.mask(), true);
}

/// Make `pin` an input with the internal pull-up enabled (buttons are active low)
pub fn configure_input_pullup(pin: Pin) {
    write(pin.port, Reg::Ddr, pin.mask(), false);
    write(pin.port, Reg::Port, pin.mask(), true);
}

impl OutputPin for Pin {
    type Error = Infallible;

    #[inline]
    fn set_low(&mut self) -> Result<(), Self::Error> {
        write(self.port, Reg::Port, self.mask(), false);
        Ok(())
    }

    #[inline]
    fn set_high(&mut self) -> Result<(), Self::Error> {
        write(self.port, Reg::Port, self.mask(), true);
        Ok(())
    }
}

/// Board pin definitions
pub mod board {
    use super::{Pin, Port};
    use crate::config::{
        BOOTLOADER_LINE, BUZZER_BIT, DECREMENT_LINE, INCREMENT_LINE, STATUS_LED_BIT,
    };

    pub const DIGIT_LEDS: [Pin; 4] = [
        Pin::new(Port::A, 0),
        Pin::new(Port::A, 1),
        Pin::new(Port::A, 2),
        Pin::new(Port::A, 3),
    ];

    pub const STATUS_LED: Pin = Pin::new(Port::B, STATUS_LED_BIT);
    pub const BUZZER: Pin = Pin::new(Port::B, BUZZER_BIT);

    pub const BTN_INCREMENT: Pin = Pin::new(Port::E, INCREMENT_LINE);
    pub const BTN_DECREMENT: Pin = Pin::new(Port::E, DECREMENT_LINE);
    pub const BTN_BOOTLOADER: Pin = Pin::new(Port::E, BOOTLOADER_LINE);
}
