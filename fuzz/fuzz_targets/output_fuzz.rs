#![no_main]

use libfuzzer_sys::fuzz_target;
use gdbprobe::harness::fixtures::Fixtures;
use gdbprobe::{normalize, Scenario};

fuzz_target!(|data: &[u8]| {
    // Only valid UTF-8 reaches the checks; everything else is a decode error
    if let Ok(s) = std::str::from_utf8(data) {
        let normalized = normalize(s);
        assert_eq!(normalize(&normalized), normalized);

        // Matching arbitrary output must never panic
        let fixtures = Fixtures::default();
        for scenario in Scenario::ALL {
            let _ = scenario.expected(&fixtures).check(&normalized);
        }
    }
});
