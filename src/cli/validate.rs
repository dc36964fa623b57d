use anyhow::Result;
use idxfile::validator::validate_idx_file;
use log::info;
use std::path::PathBuf;

use super::config::Config;

/// Validate IDX file integrity
pub fn run(file: PathBuf, config_path: Option<PathBuf>) -> Result<()> {
    let config = Config::load(config_path.as_deref())?;

    info!("IDX Validator");
    info!("File: {}", file.display());

    match validate_idx_file(&file, &config.reader_config()) {
        Ok(report) => {
            #[cfg(feature = "colorized_output")]
            {
                println!("{}", report.format_colored());
            }

            #[cfg(not(feature = "colorized_output"))]
            {
                println!("{}", report);
            }

            if report.has_failures() {
                std::process::exit(1);
            }

            Ok(())
        }
        Err(e) => {
            eprintln!("Validation error: {}", e);
            std::process::exit(1);
        }
    }
}
