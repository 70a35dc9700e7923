//! Hand-off to the on-chip bootloader for firmware updates.
//!
//! With the BOOTRST fuse programmed the reset vector points at the boot
//! section, so any reset lands in the bootloader. The firmware forces one
//! through the watchdog.

/// Leaves the application for the bootloader. On hardware this does not return.
pub trait BootloaderEntry {
    fn enter_bootloader(&mut self);
}

#[cfg(feature = "firmware")]
pub use self::watchdog_reset::WatchdogReset;

#[cfg(feature = "firmware")]
mod watchdog_reset {
    use super::BootloaderEntry;
    use avr_device::atmega128a::WDT;

    // WDCE | WDE, opens the timed change window
    const CHANGE_ENABLE: u8 = 0x18;
    const ENABLE: u8 = 0x08;
    // WDP2:0 = 000, about 16ms
    const TIMEOUT_16MS: u8 = 0x00;

    /// Resets the MCU through the watchdog
    pub struct WatchdogReset {
        _private: (),
    }

    impl WatchdogReset {
        pub fn new() -> Self {
            Self { _private: () }
        }

        /// Stop a watchdog still running from the reset that got us here
        pub fn disarm() {
            avr_device::asm::wdr();
            unsafe {
                let p = WDT::ptr();
                (*p).wdtcr.write(|w| w.bits(CHANGE_ENABLE));
                (*p).wdtcr.write(|w| w.bits(0x00));
            }
        }
    }

    impl Default for WatchdogReset {
        fn default() -> Self {
            Self::new()
        }
    }

    impl BootloaderEntry for WatchdogReset {
        fn enter_bootloader(&mut self) {
            avr_device::interrupt::disable();
            unsafe {
                let p = WDT::ptr();
                (*p).wdtcr.write(|w| w.bits(CHANGE_ENABLE));
                (*p).wdtcr.write(|w| w.bits(ENABLE | TIMEOUT_16MS));
            }
            #[allow(clippy::empty_loop)]
            loop {}
        }
    }
}
