use anyhow::{Context, Result};
use clap::Parser;
use scopeyank::{cli, clipboard, workflow};
use std::fs::OpenOptions;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

fn init_tracing(cli_args: &cli::Cli) -> Result<()> {
    // The TUI owns the terminal, so interactive runs log nothing unless asked.
    let default_level = match (&cli_args.log_file, cli_args.headless) {
        (Some(_), _) => "scopeyank=debug",
        (None, true) => "warn",
        (None, false) => "off",
    };
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_level));

    match &cli_args.log_file {
        Some(log_path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(log_path)
                .with_context(|| format!("cannot open log file {}", log_path.display()))?;
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .init();
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(std::io::stderr)
                .init();
        }
    }
    Ok(())
}

fn main() -> Result<()> {
    // Handle daemon mode first. This should stay in main.rs as it's an early exit.
    if clipboard::check_and_run_daemon_if_requested()? {
        return Ok(());
    }

    let cli_args = cli::Cli::parse();
    init_tracing(&cli_args)?;

    workflow::run_scopeyank(cli_args)
}
