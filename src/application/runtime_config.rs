use std::path::PathBuf;

use crate::application::data::Command;
use crate::cli::Cli;

#[derive(Debug, Clone)]
pub struct RuntimeConfig {
    pub manifest: PathBuf,
    pub command: Command,
}

impl From<Cli> for RuntimeConfig {
    fn from(cli: Cli) -> Self {
        Self {
            manifest: cli.manifest,
            command: cli.command,
        }
    }
}
