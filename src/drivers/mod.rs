pub mod button_handler;
pub mod display;
#[cfg(feature = "firmware")]
pub mod led_matrix;
#[cfg(feature = "firmware")]
pub mod serial_console;
pub mod tone;

pub use button_handler::{Button, DebounceGate};
pub use display::DisplayAdapter;
#[cfg(feature = "firmware")]
pub use led_matrix::LedMatrix;
#[cfg(feature = "firmware")]
pub use serial_console::SerialConsole;
pub use tone::{Note, ToneGenerator, ToneSpec};
