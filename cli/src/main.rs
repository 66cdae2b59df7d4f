mod app;
mod cli;
mod commands;
mod config;
mod data;
mod logging;
mod ui;

use clap::Parser;
use color_eyre::eyre::Result;

use cli::{Cli, Commands};
use config::{ensure_dirs, LogLevel, UserConfig};
use logging::LogMode;

fn main() -> Result<()> {
    color_eyre::install()?;
    let _ = ensure_dirs();

    let cli = Cli::parse();
    let config = UserConfig::load();
    let log_level_override = cli.log_level.as_deref().map(LogLevel::from_str);

    let _guard = logging::init(
        config.log_level,
        LogMode::for_command(cli.command.as_ref()),
        log_level_override,
    );

    match cli.command {
        Some(Commands::Pipe { samples, compact }) => commands::pipe::run(&config, samples, compact),
        Some(Commands::Debug) => commands::debug::run(&config),
        Some(Commands::Config { path, reset }) => commands::config::run(path, reset),
        Some(Commands::Ui) | None => app::run_dashboard(&config),
    }
}
