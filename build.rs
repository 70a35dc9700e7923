use std::env;

fn main() {
    println!("cargo:rerun-if-changed=build.rs");

    let target = env::var("TARGET").unwrap_or_default();
    let is_avr = target.contains("avr");

    // The portable core builds anywhere, the board support does not
    if env::var("CARGO_FEATURE_FIRMWARE").is_ok() && !is_avr {
        panic!("The `firmware` feature only supports AVR targets!");
    }

    if is_avr {
        println!("cargo:rustc-link-arg=-mmcu=atmega128");
        println!("cargo:warning=Building for ATmega128 at 16MHz");
    }
}
