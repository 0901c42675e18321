//! Fuzz target for the JSON annotation dispatch path.
//!
//! Arbitrary bytes run through variant detection (COCO, COCO-Text,
//! generic) and the matching parser, checking for panics or hangs.
//!
//! Run with:
//!   cargo +nightly fuzz run annotation_json_parse

#![no_main]

use boxscope::formats::{parse_file, ParseContext};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    // Cap input size to avoid OOM on very large inputs.
    if data.len() > 10 * 1024 * 1024 {
        return;
    }

    let Ok(text) = std::str::from_utf8(data) else {
        return;
    };

    let ctx = ParseContext {
        natural_size: Some((640, 480)),
        image_name: Some("fuzz.png"),
    };
    let _ = parse_file("fuzz.json", text, ctx);
});
