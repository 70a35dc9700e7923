//! Control core: button edges in interrupt context, tone playback in the
//! main loop.
//!
//! The edge handler only touches non-blocking state (debounce records, the
//! counter, the tone mailbox, the log queue) and the display. Anything that
//! waits, the serial console included, is left to [`Controller::service`],
//! which runs in the main loop.

use crate::bootloader::BootloaderEntry;
use crate::config::{BOUNDARY_TONE_MS, DISPLAY_COLOR};
use crate::counter::{Counter, Direction, Transition};
use crate::drivers::{Button, DebounceGate, DisplayAdapter, Note, ToneGenerator};
use crate::hal::{Monotonic, PwmSlice};
use crate::os::{DeferredToneQueue, LogLine, LogQueue};
use core::convert::Infallible;
use embedded_hal::blocking::delay::DelayMs;
use ufmt::{uWrite, uwrite};

/// Warning tone played when the counter is pushed past either end
pub const BOUNDARY_NOTE: Note = Note::A;

/// What an edge interrupt did
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ButtonOutcome {
    /// Rejected as contact bounce
    Debounced,
    Counted(Transition),
    Bootloader,
}

pub struct Controller {
    gate: DebounceGate,
    counter: Counter,
    tones: DeferredToneQueue,
    log: LogQueue,
}

impl Controller {
    pub const fn new() -> Self {
        Self {
            gate: DebounceGate::new(),
            counter: Counter::new(),
            tones: DeferredToneQueue::new(),
            log: LogQueue::new(),
        }
    }

    pub const fn starting_at(value: u8) -> Self {
        Self {
            gate: DebounceGate::new(),
            counter: Counter::starting_at(value),
            tones: DeferredToneQueue::new(),
            log: LogQueue::new(),
        }
    }

    pub fn counter(&self) -> u8 {
        self.counter.value()
    }

    pub fn tone_pending(&self) -> bool {
        self.tones.is_pending()
    }

    fn log_counter(&self, value: u8) {
        let mut line = LogLine::new();
        uwrite!(&mut line, "counter: {}", value).ok();
        self.log.push(&line);
    }

    fn log_text(&self, text: &str) {
        let mut line = LogLine::new();
        uwrite!(&mut line, "{}", text).ok();
        self.log.push(&line);
    }

    /// Bring the display up with the initial value
    pub fn start<D: DisplayAdapter>(&self, display: &mut D) {
        let (r, g, b) = DISPLAY_COLOR;
        display.set_color(r, g, b);
        let value = self.counter();
        display.render_digit(value);
        self.log_text("digit counter ready");
        self.log_counter(value);
    }

    /// Write queued diagnostic lines to `console`. Blocks on the console, so
    /// never call it from an interrupt that must stay short.
    pub fn flush_log<W: uWrite>(&self, console: &mut W) -> usize {
        self.log.drain(console)
    }

    /// Edge interrupt entry point. Must not block: log lines are only queued.
    pub fn on_button_edge<M, D, B>(
        &self,
        button: Button,
        clock: &M,
        display: &mut D,
        bootloader: &mut B,
    ) -> ButtonOutcome
    where
        M: Monotonic,
        D: DisplayAdapter,
        B: BootloaderEntry,
    {
        if !self.gate.accept(button, clock.monotonic_time_us()) {
            return ButtonOutcome::Debounced;
        }

        match button {
            Button::Increment => self.count(Direction::Up, display),
            Button::Decrement => self.count(Direction::Down, display),
            Button::Bootloader => {
                self.log_text("entering bootloader mode");
                display.clear();
                bootloader.enter_bootloader();
                ButtonOutcome::Bootloader
            }
        }
    }

    fn count<D: DisplayAdapter>(&self, direction: Direction, display: &mut D) -> ButtonOutcome {
        let transition = self.counter.step(direction);
        if transition.boundary_hit {
            if self.tones.try_enqueue(BOUNDARY_NOTE) {
                self.log_text("boundary: tone queued");
            } else {
                self.log_text("boundary: tone dropped");
            }
        }

        display.render_digit(transition.value);
        self.log_counter(transition.value);
        ButtonOutcome::Counted(transition)
    }

    /// Play the pending tone, if any
    pub fn service_tones<P, D>(&self, tone: &mut ToneGenerator<P>, delay: &mut D) -> Option<Note>
    where
        P: PwmSlice,
        D: DelayMs<u16>,
    {
        let note = self.tones.take_if_pending()?;
        tone.play_note(note, BOUNDARY_TONE_MS, delay);
        Some(note)
    }

    /// One main-loop pass: flush the log, then play the pending tone.
    /// `WouldBlock` when there was no tone to play.
    pub fn service<P, D, W>(
        &self,
        tone: &mut ToneGenerator<P>,
        delay: &mut D,
        console: &mut W,
    ) -> nb::Result<Note, Infallible>
    where
        P: PwmSlice,
        D: DelayMs<u16>,
        W: uWrite,
    {
        self.flush_log(console);
        self.service_tones(tone, delay).ok_or(nb::Error::WouldBlock)
    }

    /// Main loop, the only context allowed to block
    pub fn run<P, D, W>(&self, tone: &mut ToneGenerator<P>, delay: &mut D, console: &mut W) -> !
    where
        P: PwmSlice,
        D: DelayMs<u16>,
        W: uWrite,
    {
        loop {
            match self.service(tone, delay, console) {
                Ok(_) | Err(nb::Error::WouldBlock) => {}
                Err(nb::Error::Other(never)) => match never {},
            }
        }
    }
}

impl Default for Controller {
    fn default() -> Self {
        Self::new()
    }
}
