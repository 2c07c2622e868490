use clap::Parser;
use std::path::PathBuf;

use crate::config::DEFAULT_CONFIG_PATH;

/// Downloads every URL listed in a text file into the configured directory.
#[derive(Debug, Parser)]
#[command(name = "listdl", version)]
pub struct Cli {
    /// Path to the input file, one URL per line.
    #[arg(short = 'i', value_name = "FILE")]
    pub input: PathBuf,

    /// Verbose mode: report each step and show download progress.
    #[arg(short = 'v')]
    pub verbose: bool,

    /// Config file holding the output directory.
    #[arg(short = 'c', long = "config", value_name = "FILE", default_value = DEFAULT_CONFIG_PATH)]
    pub config: PathBuf,
}
