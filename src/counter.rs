//! Bounded 0..=9 counter driven by the increment/decrement buttons.
//!
//! Moving past either end leaves the value alone and reports a boundary
//! hit instead, which the controller turns into a warning tone.

use crate::config::{COUNTER_MAX, COUNTER_START};
use core::cell::Cell;
use critical_section::Mutex;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Direction {
    Up,
    Down,
}

/// Result of one counter step
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Transition {
    pub value: u8,
    pub boundary_hit: bool,
}

/// Pure transition rule
pub const fn next(value: u8, direction: Direction) -> Transition {
    match direction {
        Direction::Up if value < COUNTER_MAX => Transition {
            value: value + 1,
            boundary_hit: false,
        },
        Direction::Down if value > 0 => Transition {
            value: value - 1,
            boundary_hit: false,
        },
        _ => Transition {
            value,
            boundary_hit: true,
        },
    }
}

pub struct Counter {
    value: Mutex<Cell<u8>>,
}

impl Counter {
    pub const fn new() -> Self {
        Self::starting_at(COUNTER_START)
    }

    /// Values above the range are clamped to `COUNTER_MAX`
    pub const fn starting_at(value: u8) -> Self {
        let value = if value > COUNTER_MAX { COUNTER_MAX } else { value };
        Self {
            value: Mutex::new(Cell::new(value)),
        }
    }

    pub fn value(&self) -> u8 {
        critical_section::with(|cs| self.value.borrow(cs).get())
    }

    pub fn increment(&self) -> Transition {
        self.step(Direction::Up)
    }

    pub fn decrement(&self) -> Transition {
        self.step(Direction::Down)
    }

    pub fn step(&self, direction: Direction) -> Transition {
        critical_section::with(|cs| {
            let cell = self.value.borrow(cs);
            let transition = next(cell.get(), direction);
            cell.set(transition.value);
            transition
        })
    }
}

impl Default for Counter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn steps_inside_range() {
        assert_eq!(next(5, Direction::Down), Transition { value: 4, boundary_hit: false });
        assert_eq!(next(5, Direction::Up), Transition { value: 6, boundary_hit: false });
        assert_eq!(next(0, Direction::Up), Transition { value: 1, boundary_hit: false });
        assert_eq!(next(9, Direction::Down), Transition { value: 8, boundary_hit: false });
    }

    #[test]
    fn boundaries_hold_value_and_signal() {
        assert_eq!(next(9, Direction::Up), Transition { value: 9, boundary_hit: true });
        assert_eq!(next(0, Direction::Down), Transition { value: 0, boundary_hit: true });
    }

    #[test]
    fn start_value_is_clamped() {
        assert_eq!(Counter::new().value(), 0);
        assert_eq!(Counter::starting_at(7).value(), 7);
        assert_eq!(Counter::starting_at(42).value(), 9);
    }

    #[test]
    fn stays_in_range_for_any_sequence() {
        let counter = Counter::new();
        // xorshift, deterministic
        let mut seed: u32 = 0x1234_5678;
        for _ in 0..10_000 {
            seed ^= seed << 13;
            seed ^= seed >> 17;
            seed ^= seed << 5;
            let before = counter.value();
            let t = if seed & 1 == 0 {
                counter.increment()
            } else {
                counter.decrement()
            };
            assert!(t.value <= 9);
            assert_eq!(counter.value(), t.value);
            assert_eq!(t.boundary_hit, t.value == before);
        }
    }

    #[test]
    fn climbs_to_nine_then_sticks() {
        let counter = Counter::new();
        for expected in 1..=9 {
            assert_eq!(counter.increment().value, expected);
        }
        assert!(counter.increment().boundary_hit);
        assert_eq!(counter.value(), 9);
    }
}
