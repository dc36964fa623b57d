//! TOML configuration file support.
//!
//! Reader and dump settings can be kept in a file instead of passed as flags:
//!
//! ```toml
//! # idx.toml
//! [reader]
//! buffer_capacity = 1048576
//! max_record_bytes = 268435456
//!
//! [channel]
//! capacity = 64
//!
//! [dump]
//! limit = 10
//! ```

use anyhow::{Context, Result};
use idxfile::channel::ChannelConfig;
use idxfile::reader::ReaderConfig;
use serde::Deserialize;
use std::path::Path;

/// Root configuration structure for idx.toml files.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// Reader settings.
    #[serde(default)]
    pub reader: ReaderSection,

    /// Record channel settings.
    #[serde(default)]
    pub channel: ChannelSection,

    /// Settings for the dump command.
    #[serde(default)]
    pub dump: DumpSection,
}

/// `[reader]` table.
#[derive(Debug, Default, Deserialize)]
pub struct ReaderSection {
    /// Minimum read buffer size in bytes.
    pub buffer_capacity: Option<usize>,

    /// Largest accepted record in bytes; 0 disables the limit.
    pub max_record_bytes: Option<usize>,
}

/// `[channel]` table.
#[derive(Debug, Default, Deserialize)]
pub struct ChannelSection {
    /// Records buffered between the reader thread and the printer.
    pub capacity: Option<usize>,
}

/// `[dump]` table.
#[derive(Debug, Default, Deserialize)]
pub struct DumpSection {
    /// Maximum number of records to print.
    pub limit: Option<usize>,
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    /// Load from `path` when given, defaults otherwise.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    /// Parse configuration from a TOML string.
    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse TOML configuration")
    }

    /// Reader configuration with file overrides applied.
    pub fn reader_config(&self) -> ReaderConfig {
        let mut config = ReaderConfig::default();
        if let Some(capacity) = self.reader.buffer_capacity {
            config = config.with_buffer_capacity(capacity);
        }
        match self.reader.max_record_bytes {
            Some(0) => config.with_max_record_bytes(None),
            Some(limit) => config.with_max_record_bytes(Some(limit)),
            None => config,
        }
    }

    /// Channel configuration with file overrides applied.
    pub fn channel_config(&self) -> ChannelConfig {
        let mut config = ChannelConfig::default();
        if let Some(capacity) = self.channel.capacity {
            config.capacity = capacity;
        }
        config
    }
}
