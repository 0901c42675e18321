//! Fuzz target for VOC XML parsing.
//!
//! This fuzzer feeds arbitrary byte sequences to the VOC XML parser,
//! checking for panics, crashes, or hangs.

#![no_main]

use boxscope::formats::voc;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid excessive memory usage.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let _ = voc::parse("fuzz.xml", text);
});
