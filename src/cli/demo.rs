use anyhow::{Context, Result};
use idxfile::{Element, ElementType, IdxWriter};
use log::info;
use std::fs::File;
use std::path::PathBuf;

/// Generate a synthetic IDX file
///
/// Record `i` holds a ramp offset by `i`, wrapped to the range of the element
/// type, so consecutive records are easy to tell apart in `idx dump`.
pub fn run(output: PathBuf, element_type: ElementType, count: u32, shape: Vec<u32>) -> Result<()> {
    let mut dimensions = Vec::with_capacity(shape.len() + 1);
    dimensions.push(count);
    dimensions.extend_from_slice(&shape);

    info!(
        "Creating IDX file: {} ({} x {:?})",
        output.display(),
        element_type,
        dimensions
    );

    let mut writer = IdxWriter::create(&output, element_type, dimensions)
        .with_context(|| format!("Failed to create {}", output.display()))?;
    let len = writer.header().record_element_count();

    match element_type {
        ElementType::U8 => write_ramp(&mut writer, count, len, |v| v as u8)?,
        ElementType::I8 => write_ramp(&mut writer, count, len, |v| v as i8)?,
        ElementType::I16 => write_ramp(&mut writer, count, len, |v| v as i16)?,
        ElementType::I32 => write_ramp(&mut writer, count, len, |v| v as i32)?,
        ElementType::F32 => write_ramp(&mut writer, count, len, |v| v as f32 / 8.0)?,
        ElementType::F64 => write_ramp(&mut writer, count, len, |v| v as f64 / 8.0)?,
    }

    let stats = writer.finish().context("Failed to finalize output")?;

    println!("{}", stats);
    println!("Output: {}", output.display());
    Ok(())
}

fn write_ramp<T: Element>(
    writer: &mut IdxWriter<File>,
    count: u32,
    len: usize,
    convert: impl Fn(u64) -> T,
) -> Result<()> {
    let mut record = Vec::with_capacity(len);
    for i in 0..count {
        record.clear();
        record.extend((0..len as u64).map(|j| convert(i as u64 + j)));
        writer
            .write(&record)
            .with_context(|| format!("Failed to write record {}", i))?;
    }
    Ok(())
}
