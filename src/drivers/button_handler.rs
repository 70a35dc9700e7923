use crate::config::{BOOTLOADER_LINE, DEBOUNCE_US, DECREMENT_LINE, INCREMENT_LINE};
use core::cell::Cell;
use critical_section::Mutex;

const BUTTON_COUNT: usize = 3;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Button {
    Increment,
    Decrement,
    Bootloader,
}

impl Button {
    /// Button wired to external interrupt `line`
    pub fn from_line(line: u8) -> Option<Self> {
        match line {
            INCREMENT_LINE => Some(Button::Increment),
            DECREMENT_LINE => Some(Button::Decrement),
            BOOTLOADER_LINE => Some(Button::Bootloader),
            _ => None,
        }
    }

    pub const fn line(self) -> u8 {
        match self {
            Button::Increment => INCREMENT_LINE,
            Button::Decrement => DECREMENT_LINE,
            Button::Bootloader => BOOTLOADER_LINE,
        }
    }

    const fn index(self) -> usize {
        match self {
            Button::Increment => 0,
            Button::Decrement => 1,
            Button::Bootloader => 2,
        }
    }
}

/// Minimum-interval filter against contact bounce, one record per button.
///
/// Called from the edge interrupt: O(1), never blocks.
///
/// Records are wrapping `u32` microsecond stamps, so the clock repeats every
/// 2^32 us (about 71.6 minutes). A press landing within the threshold of a
/// whole number of wraps after the last accepted one is rejected as bounce.
pub struct DebounceGate {
    threshold_us: u32,
    last_accepted: Mutex<Cell<[Option<u32>; BUTTON_COUNT]>>,
}

impl DebounceGate {
    pub const fn new() -> Self {
        Self::with_threshold(DEBOUNCE_US)
    }

    pub const fn with_threshold(threshold_us: u32) -> Self {
        Self {
            threshold_us,
            last_accepted: Mutex::new(Cell::new([None; BUTTON_COUNT])),
        }
    }

    /// Accept an edge of `button` seen at `now_us`.
    ///
    /// The first edge of a button is always accepted. After that an edge is
    /// accepted only when strictly more than the threshold has elapsed since
    /// the last accepted one. Rejected edges leave the record untouched.
    pub fn accept(&self, button: Button, now_us: u32) -> bool {
        critical_section::with(|cs| {
            let cell = self.last_accepted.borrow(cs);
            let mut records = cell.get();
            let slot = &mut records[button.index()];

            let accepted = match *slot {
                None => true,
                Some(last) => now_us.wrapping_sub(last) > self.threshold_us,
            };
            if accepted {
                *slot = Some(now_us);
                cell.set(records);
            }
            accepted
        })
    }
}

impl Default for DebounceGate {
    fn default() -> Self {
        Self::new()
    }
}
