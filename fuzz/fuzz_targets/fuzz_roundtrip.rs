#![no_main]

use libfuzzer_sys::fuzz_target;
use lzhuff::{compress, decompress, CodecConfig, ContainerFormat};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }

    // First two bytes pick the parameters
    let window = 1 + (data[0] as u32) * 64;
    let max_match = 3 + data[1] as u16;
    let format = if data[1] & 1 == 0 { ContainerFormat::Raw } else { ContainerFormat::Framed };
    let config = CodecConfig::default()
        .with_window_size(window)
        .with_max_match(max_match)
        .with_format(format);

    let payload = &data[2..];
    let container = compress(payload, &config).expect("compression failed");
    let restored = decompress(&container, &config).expect("decompression failed");
    assert_eq!(restored, payload);
});
