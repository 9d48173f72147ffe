#![no_main]

use libfuzzer_sys::fuzz_target;
use lzhuff::{decompress, inspect, CodecConfig};

fuzz_target!(|data: &[u8]| {
    // Decoding may fail on invalid input - that's OK
    // We're looking for panics/crashes, not errors
    let config = CodecConfig::default();
    let _ = decompress(data, &config);
    let _ = inspect(data);
});
