use anyhow::Result;
use clap::{Parser, Subcommand};
use idxfile::ElementType;
use std::path::PathBuf;

mod config;
mod convert;
mod demo;
mod dump;
mod info;
mod validate;

/// idx - Inspect, validate and generate IDX tensor files
#[derive(Parser)]
#[command(name = "idx")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Verbosity level (-v for info, -vv for debug)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Display the header and derived sizes of an IDX file
    Info {
        /// Input IDX file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Print as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print decoded records
    Dump {
        /// Input IDX file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Maximum number of records to print (overrides the config file)
        #[arg(short = 'n', long)]
        limit: Option<usize>,

        /// Scale u8 pixels to [0, 1]
        #[arg(long)]
        normalize: bool,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Validate IDX file integrity
    Validate {
        /// Input IDX file path
        #[arg(value_name = "FILE")]
        file: PathBuf,

        /// Load settings from a TOML config file
        #[arg(long, value_name = "FILE")]
        config: Option<PathBuf>,
    },

    /// Convert a legacy image file to IDX
    ConvertLegacy {
        /// Legacy image file path
        #[arg(value_name = "INPUT")]
        input: PathBuf,

        /// Output IDX file path
        #[arg(value_name = "OUTPUT")]
        output: PathBuf,
    },

    /// Generate a synthetic IDX file for testing
    Demo {
        /// Output IDX file path
        #[arg(value_name = "OUTPUT", default_value = "demo.idx")]
        output: PathBuf,

        /// Element type (u8, i8, i16, i32, f32, f64)
        #[arg(short = 't', long, default_value = "u8")]
        element_type: ElementType,

        /// Number of records
        #[arg(short = 'c', long, default_value_t = 10)]
        count: u32,

        /// Shape of each record
        #[arg(short = 's', long, num_args = 0.., value_delimiter = ',', default_values_t = [28u32, 28])]
        shape: Vec<u32>,
    },
}

impl Cli {
    pub fn verbosity(&self) -> u8 {
        self.verbose
    }
}

pub fn init_logging(verbosity: u8) {
    let log_level = match verbosity {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(log_level)).init();
}

pub fn dispatch(cli: Cli) -> Result<()> {
    match cli.command {
        Commands::Info { file, json } => info::run(file, json),
        Commands::Dump {
            file,
            limit,
            normalize,
            config,
        } => dump::run(file, limit, normalize, config),
        Commands::Validate { file, config } => validate::run(file, config),
        Commands::ConvertLegacy { input, output } => convert::run(input, output),
        Commands::Demo {
            output,
            element_type,
            count,
            shape,
        } => demo::run(output, element_type, count, shape),
    }
}
