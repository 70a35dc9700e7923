//! External interrupt lines INT0..INT7.
//!
//! The handler for a line is the matching `#[avr_device::interrupt]`
//! function in the binary; registering only arms the line.

use super::Edge;
use avr_device::atmega128a::EXINT;

/// Sense control bits for `edge` (ISCn1:ISCn0)
const fn sense_bits(edge: Edge) -> u8 {
    match edge {
        Edge::Falling => 0b10,
        Edge::Rising => 0b11,
    }
}

/// Arm external interrupt `line` (0..=7) to fire on `edge`
pub fn register_edge_interrupt(line: u8, edge: Edge) {
    let line = line & 0x07;
    let shift = (line & 0x03) * 2;
    let bits = sense_bits(edge) << shift;
    let mask = 0b11 << shift;

    unsafe {
        let p = EXINT::ptr();
        // Changing ISC bits can raise a spurious flag, keep the line masked meanwhile
        (*p).eimsk.modify(|r, w| w.bits(r.bits() & !(1 << line)));
        if line < 4 {
            (*p).eicra.modify(|r, w| w.bits((r.bits() & !mask) | bits));
        } else {
            (*p).eicrb.modify(|r, w| w.bits((r.bits() & !mask) | bits));
        }
        // Writing one clears the flag
        (*p).eifr.write(|w| w.bits(1 << line));
        (*p).eimsk.modify(|r, w| w.bits(r.bits() | (1 << line)));
    }
}
