#![no_main]

use idxfile::legacy::LegacyImageReader;
use idxfile::reader::{IdxReader, ReaderConfig};
use libfuzzer_sys::fuzz_target;
use std::io::Cursor;

fuzz_target!(|data: &[u8]| {
    // Keep allocations bounded for corrupt headers
    let config = ReaderConfig::default().with_max_record_bytes(Some(1 << 20));

    // Header parsing and record framing must fail cleanly, never panic
    if let Ok(mut reader) = IdxReader::open_with_config(Cursor::new(data), config.clone()) {
        let record_len = reader.header().record_byte_len();
        for _ in 0..100 {
            match reader.read_raw() {
                Ok(record) => assert_eq!(record.len(), record_len),
                Err(_) => break,
            }
        }
    }

    if let Ok(mut legacy) = LegacyImageReader::open_with_config(Cursor::new(data), &config) {
        for image in legacy.images().take(100) {
            if image.is_err() {
                break;
            }
        }
    }
});
