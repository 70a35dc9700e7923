//! Buzzer PWM on Timer1, output compare A (PB5).
//!
//! Timer1 runs in fast PWM mode with ICR1 as TOP. The requested divider and
//! wrap describe one PWM period in CPU cycles (`divider * wrap`); that
//! period is mapped onto a fixed /8 prescaler.

use super::{PwmConfig, PwmSlice};
use avr_device::atmega128a::TC1;

const PRESCALER: f32 = 8.0;
// CS11
const CLOCK_SELECT_DIV8: u8 = 0x02;
// WGM13:WGM12 (TCCR1B), WGM11 (TCCR1A) -> mode 14, fast PWM, TOP = ICR1
const WGM_B: u8 = 0x18;
const WGM_A: u8 = 0x02;
// COM1A1, clear OC1A on compare match
const COM1A_CLEAR: u8 = 0x80;

pub struct Timer1Pwm {
    _private: (),
}

impl Timer1Pwm {
    /// The buzzer pin must already be configured as an output
    pub fn new() -> Self {
        unsafe {
            let p = TC1::ptr();
            (*p).tccr1a.write(|w| w.bits(WGM_A));
            (*p).tccr1b.write(|w| w.bits(WGM_B));
        }
        Self { _private: () }
    }

    fn period_counts(config: &PwmConfig) -> u16 {
        let counts = config.clock_divider * config.wrap as f32 / PRESCALER;
        if counts >= u16::MAX as f32 {
            u16::MAX
        } else if counts < 2.0 {
            2
        } else {
            counts as u16
        }
    }
}

impl PwmSlice for Timer1Pwm {
    fn configure_pwm(&mut self, config: PwmConfig) {
        unsafe {
            let p = TC1::ptr();

            if config.duty == 0 || config.wrap == 0 {
                // Disconnect OC1A, the port latch holds the pin low
                (*p).tccr1a.write(|w| w.bits(WGM_A));
                (*p).tccr1b.write(|w| w.bits(WGM_B));
                return;
            }

            let top = Self::period_counts(&config);
            let compare = (config.duty as u32 * top as u32 / config.wrap as u32) as u16;

            (*p).tccr1b.write(|w| w.bits(WGM_B));
            (*p).tcnt1.write(|w| w.bits(0));
            (*p).icr1.write(|w| w.bits(top - 1));
            (*p).ocr1a.write(|w| w.bits(compare));
            (*p).tccr1a.write(|w| w.bits(WGM_A | COM1A_CLEAR));
            (*p).tccr1b.write(|w| w.bits(WGM_B | CLOCK_SELECT_DIV8));
        }
    }
}

impl Default for Timer1Pwm {
    fn default() -> Self {
        Self::new()
    }
}
