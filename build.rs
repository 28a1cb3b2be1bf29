use std::env;

fn main() {
    // Pass CPU frequency for timing calculations
    println!("cargo:rustc-env=MCU_FREQ_HZ=8000000");
    println!("cargo:rerun-if-changed=build.rs");

    // Host builds only compile the animation core for tests
    let target = env::var("TARGET").unwrap_or_default();
    if !target.contains("avr") {
        return;
    }

    println!("cargo:rustc-link-arg=-mmcu=atmega8");

    if env::var("CARGO_FEATURE_DEBUG").is_ok() {
        println!("cargo:warning=Building ledterne for ATmega8 at 8MHz with frame logging");
    }
}
