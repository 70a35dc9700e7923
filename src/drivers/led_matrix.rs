use super::DisplayAdapter;
use crate::hal::gpio::{board::DIGIT_LEDS, configure_output, Pin};
use embedded_hal::digital::v2::OutputPin;

/// Four LEDs on PORTA showing the digit in binary, PA0 = least significant bit
pub struct LedMatrix {
    leds: [Pin; 4],
    lit: bool,
}

impl LedMatrix {
    pub fn new() -> Self {
        for led in DIGIT_LEDS {
            configure_output(led);
        }
        LedMatrix {
            leds: DIGIT_LEDS,
            lit: true,
        }
    }

    pub fn set_pattern(&mut self, pattern: u8) {
        for (i, led) in self.leds.iter_mut().enumerate() {
            let on = self.lit && (pattern & (1 << i)) != 0;
            if on {
                led.set_high().ok();
            } else {
                led.set_low().ok();
            }
        }
    }
}

impl DisplayAdapter for LedMatrix {
    // Single-color LEDs, black means dark
    fn set_color(&mut self, r: u8, g: u8, b: u8) {
        self.lit = (r | g | b) != 0;
    }

    fn render_digit(&mut self, digit: u8) {
        self.set_pattern(digit.min(9));
    }

    fn clear(&mut self) {
        self.set_pattern(0);
    }
}

impl Default for LedMatrix {
    fn default() -> Self {
        Self::new()
    }
}
