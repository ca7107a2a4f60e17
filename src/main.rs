mod cli;
mod config;
mod dialog;
mod input;
mod logging;
mod models;
mod store;
mod theme;
mod timer;
mod ui;

use anyhow::{Context, Result};
use clap::{CommandFactory, Parser};
use cli::{Cli, Commands};
use config::Config;
use ui::run_tui;

fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = Config::from_cli(&cli)?;
    logging::init(config.log_file.as_deref())?;

    match cli.command {
        Some(Commands::Completions { shell }) => {
            use clap_complete::{generate, Shell};
            let shell = shell.to_lowercase();
            let shell_enum = match shell.as_str() {
                "bash" => Shell::Bash,
                "zsh" => Shell::Zsh,
                "fish" => Shell::Fish,
                "elvish" => Shell::Elvish,
                "powershell" => Shell::PowerShell,
                _ => {
                    println!("Unsupported shell: {}", shell);
                    return Ok(());
                }
            };
            let mut cmd = Cli::command();
            generate(shell_enum, &mut cmd, "neonpulse", &mut std::io::stdout());
        }
        Some(Commands::Tui) | None => {
            // The ticker runs here; the UI loop stays on the main thread.
            let rt = tokio::runtime::Runtime::new().context("start timer runtime")?;
            run_tui(&config, rt.handle().clone())?;
        }
    }

    Ok(())
}
