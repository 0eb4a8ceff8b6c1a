#![no_main]

use libfuzzer_sys::fuzz_target;
use gdbprobe::harness::fixtures::classify;

fuzz_target!(|data: &[u8]| {
    // Garbage headers must be rejected, not panic
    let _ = classify(data);
});
