#![no_std]
#![no_main]
#![feature(abi_avr_interrupt)]

use panic_halt as _;
use avr_device::interrupt::{self, Mutex};
use core::cell::RefCell;

use digit_counter_firmware::application::Controller;
use digit_counter_firmware::bootloader::{BootloaderEntry, WatchdogReset};
use digit_counter_firmware::config::{
    BLINK_INTERVAL_MS, BOOTLOADER_LINE, CPU_FREQ_HZ, DECREMENT_LINE, INCREMENT_LINE,
};
use digit_counter_firmware::drivers::{Button, LedMatrix, SerialConsole, ToneGenerator};
use digit_counter_firmware::hal::exint::register_edge_interrupt;
use digit_counter_firmware::hal::gpio::board;
use digit_counter_firmware::hal::{
    configure_input_pullup, configure_output, start_systick, Edge, SysClock, Timer1Pwm,
};
use digit_counter_firmware::os::{BlinkTimer, SysTick, TickDelay};

/// Everything the edge handler writes to besides the controller itself
struct Panel {
    display: LedMatrix,
    bootloader: FlushThenReset,
}

/// Bootloader entry from the edge handler. Nothing runs after the reset, so
/// queued log lines are written out first.
struct FlushThenReset {
    console: SerialConsole,
    reset: WatchdogReset,
}

impl BootloaderEntry for FlushThenReset {
    fn enter_bootloader(&mut self) {
        CONTROLLER.flush_log(&mut self.console);
        self.reset.enter_bootloader();
    }
}

static CONTROLLER: Controller = Controller::new();
static SYSTICK: SysTick = SysTick::new();
static BLINK: BlinkTimer = BlinkTimer::new(BLINK_INTERVAL_MS);
static PANEL: Mutex<RefCell<Option<Panel>>> = Mutex::new(RefCell::new(None));

#[avr_device::entry]
fn main() -> ! {
    // A watchdog reset into the bootloader may have left it running
    WatchdogReset::disarm();

    configure_output(board::STATUS_LED);
    configure_output(board::BUZZER);
    for button in [board::BTN_INCREMENT, board::BTN_DECREMENT, board::BTN_BOOTLOADER] {
        configure_input_pullup(button);
    }

    let mut console = SerialConsole::new();
    let mut panel = Panel {
        display: LedMatrix::new(),
        bootloader: FlushThenReset {
            console: console.clone(),
            reset: WatchdogReset::new(),
        },
    };
    CONTROLLER.start(&mut panel.display);

    interrupt::free(|cs| {
        PANEL.borrow(cs).replace(Some(panel));
    });

    for line in [INCREMENT_LINE, DECREMENT_LINE, BOOTLOADER_LINE] {
        register_edge_interrupt(line, Edge::Falling);
    }
    start_systick();

    let mut tone = ToneGenerator::new(Timer1Pwm::new(), CPU_FREQ_HZ);
    let mut delay = TickDelay::new(&SYSTICK);

    // Enable interrupts globally
    unsafe { avr_device::interrupt::enable() };

    CONTROLLER.run(&mut tone, &mut delay, &mut console)
}

fn on_edge(line: u8) {
    let Some(button) = Button::from_line(line) else {
        return;
    };
    interrupt::free(|cs| {
        if let Some(panel) = PANEL.borrow(cs).borrow_mut().as_mut() {
            CONTROLLER.on_button_edge(
                button,
                &SysClock::new(&SYSTICK),
                &mut panel.display,
                &mut panel.bootloader,
            );
        }
    });
}

#[avr_device::interrupt(atmega128a)]
fn INT4() {
    on_edge(INCREMENT_LINE);
}

#[avr_device::interrupt(atmega128a)]
fn INT5() {
    on_edge(DECREMENT_LINE);
}

#[avr_device::interrupt(atmega128a)]
fn INT6() {
    on_edge(BOOTLOADER_LINE);
}

#[avr_device::interrupt(atmega128a)]
fn TIMER0_COMP() {
    SYSTICK.tick();
    let mut led = board::STATUS_LED;
    BLINK.on_tick(&mut led).ok();
}
