pub mod render;
pub mod stats;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use stats::{process_stats_command, StatsCommand};
use tracing::level_filters::LevelFilter;

use crate::utils::{
    clock::DefaultClock,
    dir::{create_application_default_path, ensure_dir},
    logging::{enable_logging, CLI_PREFIX},
};

#[derive(Parser, Debug)]
#[command(name = "Pushstats", version, long_about = None)]
#[command(about = "Streak and weekly statistics for your pushes", long_about = None)]
struct Args {
    #[command(subcommand)]
    commands: Commands,
    #[arg(long, help = "Also print logs to stderr")]
    log: bool,
    #[arg(long = "log-filter", help = "Log level. By default RUST_LOG or info")]
    log_filter: Option<LevelFilter>,
    #[arg(
        long,
        global = true,
        help = "Application directory. By default tries to use $XDG_STATE_HOME or $HOME/.local/state"
    )]
    dir: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
#[command(version, about, long_about = None)]
enum Commands {
    #[command(about = "Display streak, last 7 days and weekday statistics")]
    Stats {
        #[command(flatten)]
        command: StatsCommand,
    },
}

pub async fn run_cli() -> Result<()> {
    let args = Args::parse();

    let application_dir = match args.dir {
        Some(dir) => ensure_dir(dir)?,
        None => create_application_default_path()?,
    };

    let logging_level = match (args.log_filter, args.log) {
        (Some(level), _) => Some(level),
        (None, true) => Some(LevelFilter::TRACE),
        (None, false) => None,
    };
    enable_logging(CLI_PREFIX, &application_dir, logging_level, args.log)?;

    match args.commands {
        Commands::Stats { command } => {
            process_stats_command(command, application_dir, &DefaultClock).await
        }
    }
}
