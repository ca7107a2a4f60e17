use std::path::PathBuf;
use std::time::Duration;

use anyhow::{bail, Result};

use crate::cli::Cli;

/// Runtime settings for one session. Nothing here is persisted.
#[derive(Debug, Clone)]
pub struct Config {
    pub tick_interval: Duration,
    pub log_file: Option<PathBuf>,
    pub seed_tasks: Vec<String>,
}

impl Config {
    pub fn from_cli(cli: &Cli) -> Result<Self> {
        if cli.tick_ms == 0 {
            bail!("--tick-ms must be greater than zero");
        }

        Ok(Config {
            tick_interval: Duration::from_millis(cli.tick_ms),
            log_file: cli.log_file.clone(),
            seed_tasks: cli.tasks.clone(),
        })
    }
}
