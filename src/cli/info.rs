use anyhow::{Context, Result};
use idxfile::{Header, IdxReader};
use serde::Serialize;
use std::path::PathBuf;

#[derive(Serialize)]
struct FileInfo<'a> {
    file: String,
    file_bytes: u64,
    #[serde(flatten)]
    header: &'a Header,
    header_bytes: usize,
    record_byte_len: usize,
    payload_bytes: u64,
}

/// Display the header of an IDX file
pub fn run(file: PathBuf, json: bool) -> Result<()> {
    if !file.exists() {
        anyhow::bail!("File does not exist: {}", file.display());
    }

    let file_bytes = std::fs::metadata(&file)
        .with_context(|| format!("Failed to stat {}", file.display()))?
        .len();
    let reader = IdxReader::open_file(&file)
        .with_context(|| format!("Failed to read IDX header from {}", file.display()))?;
    let header = reader.header();

    let info = FileInfo {
        file: file.display().to_string(),
        file_bytes,
        header,
        header_bytes: header.encoded_len(),
        record_byte_len: header.record_byte_len(),
        payload_bytes: header.payload_byte_len(),
    };

    if json {
        println!(
            "{}",
            serde_json::to_string_pretty(&info).context("Failed to serialize file info")?
        );
        return Ok(());
    }

    println!("IDX File Information");
    println!("====================");
    println!("File: {}", info.file);
    println!();
    println!("Header:");
    println!("  Element type: {} (tag 0x{:02x})", header.element_type(), header.element_type().tag());
    println!("  Dimensions: {:?}", header.dimensions());
    println!("  Records: {}", header.record_count());
    println!("  Record shape: {:?}", header.record_shape());
    println!();
    println!("Sizes:");
    println!("  Header: {} bytes", info.header_bytes);
    println!(
        "  Record: {} elements, {} bytes",
        header.record_element_count(),
        info.record_byte_len
    );
    println!("  Payload: {} bytes", info.payload_bytes);
    println!("  File: {} bytes", info.file_bytes);

    let expected = info.header_bytes as u64 + info.payload_bytes;
    if info.file_bytes != expected {
        println!();
        println!(
            "Note: file length differs from the declared {} bytes; run `idx validate` for details",
            expected
        );
    }

    Ok(())
}
