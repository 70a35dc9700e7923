//! Hardware capabilities consumed by the control core.
//!
//! The traits here are what the core needs from the board. The AVR
//! implementations live in the submodules and only build with the
//! `firmware` feature.

#[cfg(feature = "firmware")]
pub mod exint;
#[cfg(feature = "firmware")]
pub mod gpio;
#[cfg(feature = "firmware")]
pub mod pwm;
#[cfg(feature = "firmware")]
pub mod timer;

#[cfg(feature = "firmware")]
pub use gpio::{configure_input_pullup, configure_output, Pin, Port};
#[cfg(feature = "firmware")]
pub use pwm::Timer1Pwm;
#[cfg(feature = "firmware")]
pub use timer::{start_systick, SysClock};

use crate::config::{CPU_FREQ_HZ, SYSTICK_DIVISOR, SYSTICK_HZ};

/// Timer0 counts per system tick: 16MHz / 64 / 1kHz = 250
pub const SYSTICK_COUNTS: u32 = CPU_FREQ_HZ / SYSTICK_DIVISOR / SYSTICK_HZ;
/// Microseconds per Timer0 count
pub const US_PER_COUNT: u32 = 1_000_000 / (CPU_FREQ_HZ / SYSTICK_DIVISOR);

/// Microsecond timestamp from the tick count, the Timer0 count read after it
/// and the compare-match flag read after that.
///
/// With interrupts masked the tick handler can be pending: the counter has
/// already wrapped but `millis` is one tick behind. A pending flag next to a
/// small count means exactly that, so the missing tick is added. A pending
/// flag next to a large count was raised after the count was read.
pub const fn compose_us(millis: u32, counts: u32, compare_pending: bool) -> u32 {
    let millis = if compare_pending && counts < SYSTICK_COUNTS / 2 {
        millis.wrapping_add(1)
    } else {
        millis
    };
    millis
        .wrapping_mul(1000)
        .wrapping_add(counts * US_PER_COUNT)
}

/// Signal edge an input interrupt fires on
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Edge {
    Falling,
    Rising,
}

/// Free-running microsecond clock. Wraps around, so compare with `wrapping_sub`.
pub trait Monotonic {
    fn monotonic_time_us(&self) -> u32;
}

/// Parameters for one PWM generator.
///
/// The output frequency is `sys_clock / (clock_divider * wrap)` and the
/// signal is high for `duty / wrap` of every period.
#[derive(Clone, Copy, Debug, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct PwmConfig {
    pub clock_divider: f32,
    pub wrap: u16,
    pub duty: u16,
}

/// A PWM generator bound to a single output pin
pub trait PwmSlice {
    fn configure_pwm(&mut self, config: PwmConfig);
}
