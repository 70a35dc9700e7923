use super::{compose_us, Monotonic, SYSTICK_COUNTS};
use crate::os::SysTick;
use avr_device::atmega128a::TC0;

#[derive(Clone, Copy)]
pub enum Prescaler {
    Direct = 1,
    Div8 = 2,
    Div32 = 3,
    Div64 = 4,
    Div128 = 5,
    Div256 = 6,
    Div1024 = 7,
}

// Matches config::SYSTICK_DIVISOR
const SYSTICK_PRESCALER: Prescaler = Prescaler::Div64;
// OCIE0 in TIMSK, OCF0 in TIFR
const COMPARE_MATCH: u8 = 0x02;

/// Run Timer0 in CTC mode and raise TIMER0_COMP at `SYSTICK_HZ`.
///
/// The binary's TIMER0_COMP handler must call `SysTick::tick`.
pub fn start_systick() {
    unsafe {
        let p = TC0::ptr();
        (*p).tccr0.write(|w| w.bits(0));
        (*p).tcnt0.write(|w| w.bits(0));
        (*p).ocr0.write(|w| w.bits((SYSTICK_COUNTS - 1) as u8));
        // WGM01 = CTC, clock select in the low bits
        (*p).tccr0.write(|w| w.bits(0x08 | SYSTICK_PRESCALER as u8));
        // OCIE0
        (*p).timsk.modify(|r, w| w.bits(r.bits() | COMPARE_MATCH));
    }
}

/// Microsecond clock built from the millisecond tick count plus the
/// Timer0 position inside the current tick
pub struct SysClock<'a> {
    ticks: &'a SysTick,
}

impl<'a> SysClock<'a> {
    pub const fn new(ticks: &'a SysTick) -> Self {
        Self { ticks }
    }
}

impl Monotonic for SysClock<'_> {
    fn monotonic_time_us(&self) -> u32 {
        // Only called with interrupts disabled (from an ISR), so TIMER0_COMP
        // cannot run between the reads. Order matters: millis, count, flag.
        let millis = self.ticks.millis();
        let (counts, pending) = unsafe {
            let p = TC0::ptr();
            let counts = (*p).tcnt0.read().bits() as u32;
            let pending = (*p).tifr.read().bits() & COMPARE_MATCH != 0;
            (counts, pending)
        };
        compose_us(millis, counts, pending)
    }
}
