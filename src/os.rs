//! Time base and interrupt-to-main-loop plumbing.
//!
//! Everything here is statically allocated and safe to share between the
//! timer/edge interrupts and the main loop: each field sits in a
//! `critical_section::Mutex`.

use crate::config::{LOG_CAPACITY, LOG_LINE_CAPACITY};
use crate::drivers::tone::Note;
use core::cell::{Cell, RefCell};
use core::convert::Infallible;
use critical_section::Mutex;
use embedded_hal::blocking::delay::DelayMs;
use embedded_hal::digital::v2::OutputPin;
use heapless::spsc::Queue;
use ufmt::uWrite;

/// Millisecond tick counter advanced by the timer interrupt
pub struct SysTick {
    millis: Mutex<Cell<u32>>,
}

impl SysTick {
    pub const fn new() -> Self {
        Self {
            millis: Mutex::new(Cell::new(0)),
        }
    }

    /// Advance by one tick, returns the new count
    #[inline]
    pub fn tick(&self) -> u32 {
        critical_section::with(|cs| {
            let cell = self.millis.borrow(cs);
            let next = cell.get().wrapping_add(1);
            cell.set(next);
            next
        })
    }

    #[inline]
    pub fn millis(&self) -> u32 {
        critical_section::with(|cs| self.millis.borrow(cs).get())
    }
}

impl Default for SysTick {
    fn default() -> Self {
        Self::new()
    }
}

/// Busy-wait delay on a running `SysTick`. Never use it inside an interrupt:
/// the tick would not advance.
pub struct TickDelay<'a> {
    ticks: &'a SysTick,
}

impl<'a> TickDelay<'a> {
    pub const fn new(ticks: &'a SysTick) -> Self {
        Self { ticks }
    }
}

impl DelayMs<u16> for TickDelay<'_> {
    fn delay_ms(&mut self, ms: u16) {
        let start = self.ticks.millis();
        while self.ticks.millis().wrapping_sub(start) < ms as u32 {
            core::hint::spin_loop();
        }
    }
}

/// Divides the system tick down to a periodic callback.
///
/// The timer interrupt calls [`PeriodicTimer::tick`] once per tick and runs
/// the callback whenever it returns `true`.
pub struct PeriodicTimer {
    interval_ms: u16,
    elapsed: Mutex<Cell<u16>>,
}

impl PeriodicTimer {
    pub const fn new(interval_ms: u16) -> Self {
        Self {
            interval_ms,
            elapsed: Mutex::new(Cell::new(0)),
        }
    }

    pub fn tick(&self) -> bool {
        critical_section::with(|cs| {
            let elapsed = self.elapsed.borrow(cs);
            let next = elapsed.get() + 1;
            if next >= self.interval_ms {
                elapsed.set(0);
                true
            } else {
                elapsed.set(next);
                false
            }
        })
    }
}

/// Status LED blinker. Runs from the timer interrupt only, so it keeps
/// going while the main loop is stuck playing a tone.
pub struct BlinkTimer {
    period: PeriodicTimer,
    lit: Mutex<Cell<bool>>,
}

impl BlinkTimer {
    pub const fn new(interval_ms: u16) -> Self {
        Self {
            period: PeriodicTimer::new(interval_ms),
            lit: Mutex::new(Cell::new(false)),
        }
    }

    /// Per-tick entry point. Toggles the LED when the interval is up and
    /// reports whether it did.
    pub fn on_tick<P: OutputPin>(&self, led: &mut P) -> Result<bool, P::Error> {
        if self.period.tick() {
            self.toggle(led)?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub fn toggle<P: OutputPin>(&self, led: &mut P) -> Result<(), P::Error> {
        let lit = critical_section::with(|cs| {
            let cell = self.lit.borrow(cs);
            let lit = !cell.get();
            cell.set(lit);
            lit
        });
        if lit {
            led.set_high()
        } else {
            led.set_low()
        }
    }

    pub fn is_lit(&self) -> bool {
        critical_section::with(|cs| self.lit.borrow(cs).get())
    }
}

/// Single-slot mailbox carrying one note from interrupt context to the
/// main loop. While a note is pending, new requests are dropped.
pub struct DeferredToneQueue {
    slot: Mutex<Cell<Option<Note>>>,
}

impl DeferredToneQueue {
    pub const fn new() -> Self {
        Self {
            slot: Mutex::new(Cell::new(None)),
        }
    }

    /// Producer side. Returns `false` (and keeps the pending note) when full.
    pub fn try_enqueue(&self, note: Note) -> bool {
        critical_section::with(|cs| {
            let slot = self.slot.borrow(cs);
            if slot.get().is_some() {
                false
            } else {
                slot.set(Some(note));
                true
            }
        })
    }

    /// Consumer side. Returns and clears the pending note in one step.
    pub fn take_if_pending(&self) -> Option<Note> {
        critical_section::with(|cs| self.slot.borrow(cs).take())
    }

    /// `take_if_pending` for `nb::block!`
    pub fn poll(&self) -> nb::Result<Note, Infallible> {
        self.take_if_pending().ok_or(nb::Error::WouldBlock)
    }

    pub fn is_pending(&self) -> bool {
        critical_section::with(|cs| self.slot.borrow(cs).get().is_some())
    }
}

impl Default for DeferredToneQueue {
    fn default() -> Self {
        Self::new()
    }
}

/// One diagnostic line, formatted with `ufmt::uwrite!` before it is queued.
/// Text past `LOG_LINE_CAPACITY` is cut off.
pub struct LogLine {
    bytes: heapless::Vec<u8, LOG_LINE_CAPACITY>,
}

impl LogLine {
    pub const fn new() -> Self {
        Self {
            bytes: heapless::Vec::new(),
        }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }
}

impl Default for LogLine {
    fn default() -> Self {
        Self::new()
    }
}

impl uWrite for LogLine {
    type Error = ();

    fn write_str(&mut self, s: &str) -> Result<(), Self::Error> {
        self.bytes.extend_from_slice(s.as_bytes()).map_err(|_| ())
    }
}

/// Diagnostic lines on their way from interrupt context to the console.
///
/// Producers only copy bytes and never wait. The main loop owns the console
/// and drains the queue between tones. A line goes in whole or is dropped.
pub struct LogQueue<const N: usize = LOG_CAPACITY> {
    bytes: Mutex<RefCell<Queue<u8, N>>>,
}

impl<const N: usize> LogQueue<N> {
    pub const fn new() -> Self {
        Self {
            bytes: Mutex::new(RefCell::new(Queue::new())),
        }
    }

    /// Producer side. Returns `false` when the line does not fit.
    pub fn push(&self, line: &LogLine) -> bool {
        critical_section::with(|cs| {
            let mut queue = self.bytes.borrow_ref_mut(cs);
            let free = queue.capacity() - queue.len();
            if line.as_bytes().len() + 1 > free {
                return false;
            }
            for &byte in line.as_bytes().iter().chain(b"\n") {
                queue.enqueue(byte).ok();
            }
            true
        })
    }

    /// Consumer side. Removes the oldest line, newline stripped.
    pub fn pop_line(&self) -> Option<LogLine> {
        critical_section::with(|cs| {
            let mut queue = self.bytes.borrow_ref_mut(cs);
            if queue.is_empty() {
                return None;
            }
            let mut line = LogLine::new();
            while let Some(byte) = queue.dequeue() {
                if byte == b'\n' {
                    break;
                }
                line.bytes.push(byte).ok();
            }
            Some(line)
        })
    }

    /// Write every buffered line to `console` and return how many there were.
    /// Main loop only: the console may block.
    pub fn drain<W: uWrite>(&self, console: &mut W) -> usize {
        let mut lines = 0;
        while let Some(line) = self.pop_line() {
            if let Ok(text) = core::str::from_utf8(line.as_bytes()) {
                console.write_str(text).ok();
                console.write_str("\n").ok();
            }
            lines += 1;
        }
        lines
    }

    pub fn is_empty(&self) -> bool {
        critical_section::with(|cs| self.bytes.borrow_ref(cs).is_empty())
    }
}

impl<const N: usize> Default for LogQueue<N> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::LogBuffer;
    use embedded_hal_mock::pin::{Mock as PinMock, State, Transaction};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::thread;
    use std::time::Duration;

    #[test]
    fn queue_holds_at_most_one_note() {
        let queue = DeferredToneQueue::new();
        assert!(!queue.is_pending());

        assert!(queue.try_enqueue(Note::A));
        assert!(!queue.try_enqueue(Note::C));
        assert!(!queue.try_enqueue(Note::AHigh));
        assert!(queue.is_pending());

        // The first note wins, later ones were dropped
        assert_eq!(queue.take_if_pending(), Some(Note::A));
        assert_eq!(queue.take_if_pending(), None);
        assert!(!queue.is_pending());

        assert!(queue.try_enqueue(Note::C));
        assert_eq!(queue.take_if_pending(), Some(Note::C));
    }

    #[test]
    fn poll_would_block_when_empty() {
        let queue = DeferredToneQueue::new();
        assert_eq!(queue.poll(), Err(nb::Error::WouldBlock));

        queue.try_enqueue(Note::A);
        assert_eq!(nb::block!(queue.poll()), Ok(Note::A));
        assert_eq!(queue.poll(), Err(nb::Error::WouldBlock));
    }

    #[test]
    fn periodic_timer_fires_every_interval() {
        let timer = PeriodicTimer::new(200);
        let fired: Vec<u32> = (1..=1000).filter(|_| timer.tick()).collect();
        assert_eq!(fired.len(), 5);

        let timer = PeriodicTimer::new(3);
        let pattern: Vec<bool> = (0..7).map(|_| timer.tick()).collect();
        assert_eq!(pattern, [false, false, true, false, false, true, false]);
    }

    #[test]
    fn blink_toggles_led_on_schedule() {
        let blink = BlinkTimer::new(200);
        let mut led = PinMock::new(&[
            Transaction::set(State::High),
            Transaction::set(State::Low),
            Transaction::set(State::High),
        ]);

        let mut toggles = 0;
        for _ in 0..600 {
            if blink.on_tick(&mut led).unwrap() {
                toggles += 1;
            }
        }

        assert_eq!(toggles, 3);
        assert!(blink.is_lit());
        led.done();
    }

    #[test]
    fn systick_wraps() {
        let ticks = SysTick::new();
        assert_eq!(ticks.tick(), 1);
        assert_eq!(ticks.tick(), 2);
        assert_eq!(ticks.millis(), 2);

        critical_section::with(|cs| ticks.millis.borrow(cs).set(u32::MAX));
        assert_eq!(ticks.tick(), 0);
    }

    #[test]
    fn tick_delay_waits_for_ticks() {
        static TICKS: SysTick = SysTick::new();
        static DONE: AtomicBool = AtomicBool::new(false);

        let ticker = thread::spawn(|| {
            while !DONE.load(Ordering::Acquire) {
                TICKS.tick();
                thread::sleep(Duration::from_millis(1));
            }
        });

        let start = TICKS.millis();
        TickDelay::new(&TICKS).delay_ms(5);
        let waited = TICKS.millis().wrapping_sub(start);

        DONE.store(true, Ordering::Release);
        ticker.join().unwrap();
        assert!(waited >= 5);
    }

    fn line(text: &str) -> LogLine {
        let mut line = LogLine::new();
        ufmt::uwrite!(&mut line, "{}", text).ok();
        line
    }

    #[test]
    fn log_lines_come_out_in_order() {
        let log: LogQueue<64> = LogQueue::new();
        assert!(log.is_empty());
        assert!(log.push(&line("counter: 9")));
        assert!(log.push(&line("boundary: tone queued")));

        let mut console = LogBuffer::default();
        assert_eq!(log.drain(&mut console), 2);
        assert_eq!(console.lines(), ["counter: 9", "boundary: tone queued"]);
        assert!(log.is_empty());
        assert_eq!(log.drain(&mut console), 0);
    }

    #[test]
    fn full_log_drops_whole_lines() {
        // 15 usable bytes: one 10-byte line plus its newline fits, a second does not
        let log: LogQueue<16> = LogQueue::new();
        assert!(log.push(&line("counter: 1")));
        assert!(!log.push(&line("counter: 2")));
        assert!(log.push(&line("ok")));

        let mut console = LogBuffer::default();
        log.drain(&mut console);
        assert_eq!(console.lines(), ["counter: 1", "ok"]);
    }

    #[test]
    fn long_line_is_cut_at_capacity() {
        let mut long = LogLine::new();
        assert!(ufmt::uwrite!(&mut long, "{}", "x".repeat(40).as_str()).is_err());
        assert!(long.as_bytes().len() <= LOG_LINE_CAPACITY);

        let mut fitted = LogLine::new();
        ufmt::uwrite!(&mut fitted, "counter: {}", 7u8).ok();
        assert_eq!(fitted.as_bytes(), b"counter: 7");
    }
}
