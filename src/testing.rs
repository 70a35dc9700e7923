//! Host-side fixtures standing in for the board.

use crate::bootloader::BootloaderEntry;
use crate::drivers::DisplayAdapter;
use crate::hal::{Monotonic, PwmConfig, PwmSlice};
use core::convert::Infallible;
use embedded_hal::blocking::delay::DelayMs;
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Clone, Debug, PartialEq)]
pub enum Event {
    Color(u8, u8, u8),
    Digit(u8),
    Clear,
    Bootloader,
    Pwm(PwmConfig),
    Delay(u16),
}

/// Records every call made on the display, bootloader, PWM and delay it
/// stands in for, in order. Clones share one record.
#[derive(Clone, Default)]
pub struct Journal(Rc<RefCell<Vec<Event>>>);

impl Journal {
    fn push(&self, event: Event) {
        self.0.borrow_mut().push(event);
    }

    pub fn events(&self) -> Vec<Event> {
        self.0.borrow().clone()
    }

    pub fn pwm_configs(&self) -> Vec<PwmConfig> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Pwm(config) => Some(*config),
                _ => None,
            })
            .collect()
    }

    pub fn digits(&self) -> Vec<u8> {
        self.0
            .borrow()
            .iter()
            .filter_map(|event| match event {
                Event::Digit(digit) => Some(*digit),
                _ => None,
            })
            .collect()
    }
}

impl DisplayAdapter for Journal {
    fn set_color(&mut self, r: u8, g: u8, b: u8) {
        self.push(Event::Color(r, g, b));
    }

    fn render_digit(&mut self, digit: u8) {
        self.push(Event::Digit(digit));
    }

    fn clear(&mut self) {
        self.push(Event::Clear);
    }
}

impl BootloaderEntry for Journal {
    fn enter_bootloader(&mut self) {
        self.push(Event::Bootloader);
    }
}

impl PwmSlice for Journal {
    fn configure_pwm(&mut self, config: PwmConfig) {
        self.push(Event::Pwm(config));
    }
}

impl DelayMs<u16> for Journal {
    fn delay_ms(&mut self, ms: u16) {
        self.push(Event::Delay(ms));
    }
}

/// Console capture
#[derive(Default)]
pub struct LogBuffer(pub String);

impl LogBuffer {
    pub fn lines(&self) -> Vec<&str> {
        self.0.lines().collect()
    }
}

impl ufmt::uWrite for LogBuffer {
    type Error = Infallible;

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.0.push_str(s);
        Ok(())
    }
}

/// Manually advanced microsecond clock
#[derive(Default)]
pub struct SimClock {
    now_us: Cell<u32>,
}

impl SimClock {
    pub fn advance_ms(&self, ms: u32) {
        self.now_us.set(self.now_us.get().wrapping_add(ms * 1000));
    }
}

impl Monotonic for SimClock {
    fn monotonic_time_us(&self) -> u32 {
        self.now_us.get()
    }
}
