//! Buzzer tone generation.
//!
//! A tone is a PWM signal at the note frequency. The clock divider is
//! picked so one period spans `PWM_WRAP` counts, and loudness is a
//! two-level choice made from the pitch alone.

use crate::config::{LOUD_ABOVE_HZ, LOUD_DUTY, PWM_WRAP, SOFT_DUTY, TONE_SETTLE_MS};
use crate::hal::{PwmConfig, PwmSlice};
use core::num::NonZeroU32;
use embedded_hal::blocking::delay::DelayMs;

/// Note frequencies in Hz
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
#[repr(u16)]
pub enum Note {
    C = 261,
    D = 294,
    E = 329,
    F = 349,
    G = 391,
    GSharp = 415,
    A = 440,
    ASharp = 455,
    B = 466,
    CHigh = 523,
    CSharpHigh = 554,
    DHigh = 587,
    DSharp = 622,
    EHigh = 659,
    FHigh = 698,
    FSharpHigh = 740,
    GHigh = 784,
    GSharpHigh = 830,
    AHigh = 880,
}

impl Note {
    pub const fn hz(self) -> u16 {
        self as u16
    }

    pub fn frequency(self) -> NonZeroU32 {
        // Every discriminant is non-zero
        NonZeroU32::new(self.hz() as u32).unwrap_or(NonZeroU32::MIN)
    }

    pub fn tone(self, duration_ms: u16) -> ToneSpec {
        ToneSpec {
            frequency_hz: self.frequency(),
            duration_ms,
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ToneSpec {
    pub frequency_hz: NonZeroU32,
    pub duration_ms: u16,
}

impl ToneSpec {
    /// `None` for a zero frequency, which has no PWM divider
    pub fn new(frequency_hz: u32, duration_ms: u16) -> Option<Self> {
        NonZeroU32::new(frequency_hz).map(|frequency_hz| Self {
            frequency_hz,
            duration_ms,
        })
    }
}

/// Duty cycle (out of `PWM_WRAP`) for a note: louder above `LOUD_ABOVE_HZ`
pub fn duty_for(frequency_hz: NonZeroU32) -> u16 {
    if frequency_hz.get() > LOUD_ABOVE_HZ {
        LOUD_DUTY
    } else {
        SOFT_DUTY
    }
}

/// PWM setup sounding `frequency_hz` with a system clock of `sys_clock_hz`
pub fn pwm_config(sys_clock_hz: u32, frequency_hz: NonZeroU32) -> PwmConfig {
    PwmConfig {
        clock_divider: sys_clock_hz as f32 / (frequency_hz.get() as f32 * PWM_WRAP as f32),
        wrap: PWM_WRAP,
        duty: duty_for(frequency_hz),
    }
}

/// Plays tones on one PWM output. Blocking, main-loop context only.
pub struct ToneGenerator<P> {
    pwm: P,
    sys_clock_hz: u32,
}

impl<P: PwmSlice> ToneGenerator<P> {
    pub fn new(pwm: P, sys_clock_hz: u32) -> Self {
        Self { pwm, sys_clock_hz }
    }

    /// Sound `tone`, then hold silence for `TONE_SETTLE_MS`
    pub fn play<D: DelayMs<u16>>(&mut self, tone: ToneSpec, delay: &mut D) {
        let config = pwm_config(self.sys_clock_hz, tone.frequency_hz);
        self.pwm.configure_pwm(config);
        delay.delay_ms(tone.duration_ms);

        self.pwm.configure_pwm(PwmConfig { duty: 0, ..config });
        delay.delay_ms(TONE_SETTLE_MS);
    }

    pub fn play_note<D: DelayMs<u16>>(&mut self, note: Note, duration_ms: u16, delay: &mut D) {
        self.play(note.tone(duration_ms), delay);
    }
}
