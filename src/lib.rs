//! Digit counter firmware.
//!
//! Two debounced buttons move a 0..=9 counter shown on the LED display, a
//! third drops into the bootloader. Pushing the counter past either end
//! queues a warning tone that the main loop plays on the buzzer, while the
//! system tick keeps the status LED blinking.
//!
//! Everything except the register-level board support (feature `firmware`)
//! is portable and tested on the host.
#![cfg_attr(not(test), no_std)]

pub mod application;
pub mod bootloader;
pub mod config;
pub mod counter;
pub mod drivers;
pub mod hal;
pub mod os;

#[cfg(test)]
mod testing;
