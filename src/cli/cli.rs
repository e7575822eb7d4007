use std::path::PathBuf;

use clap::Parser;
use memfs::manifest::DEFAULT_MANIFEST_FILE_NAME;

use crate::application::data::{Command, LogLevel};

#[derive(Parser, Debug, Clone)]
#[command(version)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    #[clap(long, short, default_value = "warn", value_enum, global = true)]
    pub log_level: LogLevel,

    /// YAML manifest describing the tree to load
    #[clap(long, short, default_value = DEFAULT_MANIFEST_FILE_NAME, global = true)]
    pub manifest: PathBuf,
}
