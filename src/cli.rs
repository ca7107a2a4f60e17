use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::timer::DEFAULT_TICK_MS;

#[derive(Parser)]
#[command(name = "neonpulse", author, version, about, long_about = None)]
pub struct Cli {
    /// Timer tick interval in milliseconds
    #[arg(long = "tick-ms", value_name = "MS", default_value_t = DEFAULT_TICK_MS)]
    pub tick_ms: u64,

    /// Pre-load a task at start-up (repeatable)
    #[arg(long = "task", value_name = "TITLE")]
    pub tasks: Vec<String>,

    /// Write diagnostics to this file
    #[arg(long = "log-file", value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Launch TUI interface
    Tui,
    /// Print a shell completion script
    Completions {
        #[arg(value_name = "SHELL")]
        shell: String,
    },
}
