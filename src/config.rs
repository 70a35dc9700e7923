//! Configuration constants for the digit counter firmware

/// CPU frequency in Hz
pub const CPU_FREQ_HZ: u32 = 16_000_000;

/// UART baud rate
pub const UART_BAUD: u32 = 9600;

/// System tick rate driving the monotonic clock and periodic timers
pub const SYSTICK_HZ: u32 = 1000;
/// Timer0 prescaler for the system tick
pub const SYSTICK_DIVISOR: u32 = 64;

/// Minimum gap between two accepted presses of the same button, in microseconds.
/// A press is accepted only when strictly more time than this has passed.
pub const DEBOUNCE_US: u32 = 300_000;

/// Status LED toggle period in milliseconds
pub const BLINK_INTERVAL_MS: u16 = 200;

/// Counter range is `0..=COUNTER_MAX`
pub const COUNTER_MAX: u8 = 9;
pub const COUNTER_START: u8 = 0;

/// PWM period resolution used for every tone
pub const PWM_WRAP: u16 = 10_000;
pub const LOUD_DUTY: u16 = 5000;
pub const SOFT_DUTY: u16 = 3000;
/// Notes strictly above this frequency play with `LOUD_DUTY`
pub const LOUD_ABOVE_HZ: u32 = 400;

/// Warning tone length when the counter hits a boundary
pub const BOUNDARY_TONE_MS: u16 = 500;
/// Silence held after every tone
pub const TONE_SETTLE_MS: u16 = 50;

/// Bytes of diagnostic text buffered between the interrupts and the main loop
pub const LOG_CAPACITY: usize = 256;
/// Longest single diagnostic line, newline excluded
pub const LOG_LINE_CAPACITY: usize = 32;

/// Display color applied once at start-up
pub const DISPLAY_COLOR: (u8, u8, u8) = (20, 20, 20);

// Pin map (BigAVR2 board)
// Purpose            AVR Pin
// Increment button   PE4 / INT4
// Decrement button   PE5 / INT5
// Bootloader button  PE6 / INT6
// Status LED         PB0
// Buzzer             PB5 / OC1A
// Digit LEDs         PA0..PA3
pub const INCREMENT_LINE: u8 = 4;
pub const DECREMENT_LINE: u8 = 5;
pub const BOOTLOADER_LINE: u8 = 6;
pub const STATUS_LED_BIT: u8 = 0;
pub const BUZZER_BIT: u8 = 5;
