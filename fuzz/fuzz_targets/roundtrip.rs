#![no_main]
use libfuzzer_sys::fuzz_target;
use rangecoder::codec::{
    adaptive_compress, adaptive_decompress, static_compress, static_decompress,
};

fuzz_target!(|data: &[u8]| {
    let compressed = adaptive_compress(data).unwrap();
    assert_eq!(adaptive_decompress(&compressed).unwrap(), data);

    let compressed = static_compress(data).unwrap();
    assert_eq!(static_decompress(&compressed).unwrap(), data);

    // Feeding the raw input to the decoders must fail cleanly or produce
    // some output, never panic or hang.
    let _ = adaptive_decompress(data);
    let _ = static_decompress(data);
});
