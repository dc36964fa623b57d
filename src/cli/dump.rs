use anyhow::{Context, Result};
use idxfile::channel::{spawn_record_channel, ChannelConfig};
use idxfile::normalize::{normalize_pixels, to_rows};
use idxfile::{Element, ElementType, IdxReader};
use log::info;
use std::fmt::Debug;
use std::fs::File;
use std::path::PathBuf;

use super::config::Config;

/// Elements printed per line before truncating
const PREVIEW_LEN: usize = 16;

/// Print decoded records of an IDX file
pub fn run(
    file: PathBuf,
    limit: Option<usize>,
    normalize: bool,
    config_path: Option<PathBuf>,
) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;
    let limit = limit.or(config.dump.limit).unwrap_or(usize::MAX);

    let reader = IdxReader::open_file_with_config(&file, config.reader_config())
        .with_context(|| format!("Failed to open {}", file.display()))?;
    let element_type = reader.header().element_type();
    info!(
        "Dumping {} ({} records of {:?})",
        file.display(),
        reader.header().record_count(),
        reader.header().record_shape()
    );

    if normalize && element_type != ElementType::U8 {
        anyhow::bail!("--normalize applies to u8 files only, this file holds {}", element_type);
    }

    let channel_config = config.channel_config();
    let printed = match element_type {
        ElementType::U8 if normalize => {
            print_records(reader, channel_config, limit, |r: Vec<u8>| normalize_pixels(&r))?
        }
        ElementType::U8 => print_records(reader, channel_config, limit, |r: Vec<u8>| r)?,
        ElementType::I8 => print_records(reader, channel_config, limit, |r: Vec<i8>| r)?,
        ElementType::I16 => print_records(reader, channel_config, limit, |r: Vec<i16>| r)?,
        ElementType::I32 => print_records(reader, channel_config, limit, |r: Vec<i32>| r)?,
        ElementType::F32 => print_records(reader, channel_config, limit, |r: Vec<f32>| r)?,
        ElementType::F64 => print_records(reader, channel_config, limit, |r: Vec<f64>| r)?,
    };

    info!("Printed {} records", printed);
    Ok(())
}

fn print_records<T, U, F>(
    reader: IdxReader<File>,
    config: ChannelConfig,
    limit: usize,
    map: F,
) -> Result<usize>
where
    T: Element,
    U: Copy + Debug,
    F: Fn(Vec<T>) -> Vec<U>,
{
    let shape = reader.header().record_shape().to_vec();
    let mut channel = spawn_record_channel::<_, T>(reader, config)?;

    let mut printed = 0;
    for (index, record) in channel.by_ref().take(limit).enumerate() {
        let values = map(record.with_context(|| format!("Failed to read record {}", index))?);
        print_record(index, &shape, &values)?;
        printed += 1;
    }

    channel.join()?;
    Ok(printed)
}

fn print_record<U: Copy + Debug>(index: usize, shape: &[u32], values: &[U]) -> Result<()> {
    match shape {
        [rows, cols] if *cols as usize <= PREVIEW_LEN => {
            println!("[{}]", index);
            for row in to_rows(values, *rows as usize, *cols as usize)? {
                println!("  {:?}", row);
            }
        }
        _ if values.len() > PREVIEW_LEN => {
            println!(
                "[{}] {:?} ... ({} more)",
                index,
                &values[..PREVIEW_LEN],
                values.len() - PREVIEW_LEN
            );
        }
        _ => println!("[{}] {:?}", index, values),
    }
    Ok(())
}
