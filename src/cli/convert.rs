use anyhow::{Context, Result};
use idxfile::legacy::convert_legacy_to_idx;
use log::info;
use std::fs::File;
use std::path::PathBuf;

/// Convert a legacy image file to a generic IDX file
pub fn run(input: PathBuf, output: PathBuf) -> Result<()> {
    if !input.exists() {
        anyhow::bail!("Input file does not exist: {}", input.display());
    }

    info!("Converting {} -> {}", input.display(), output.display());

    let source = File::open(&input)
        .with_context(|| format!("Failed to open {}", input.display()))?;
    let sink = File::create(&output)
        .with_context(|| format!("Failed to create {}", output.display()))?;

    let stats = convert_legacy_to_idx(source, sink).context("Conversion failed")?;

    println!("{}", stats);
    println!("Output: {}", output.display());
    Ok(())
}
