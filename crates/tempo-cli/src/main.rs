use anyhow::{Context, Result};
use clap::Parser;
use tracing_subscriber::EnvFilter;

use tempo_cli::{Cli, Commands, Config};

fn main() -> Result<()> {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env()
    };
    // try_init so a second initialization (e.g. in tests) stays harmless.
    let _ = tracing_subscriber::fmt().with_env_filter(filter).try_init();

    let config = Config::load_from(cli.config.as_deref()).context("failed to load configuration")?;
    tracing::debug!(?config, "loaded configuration");

    match cli.command {
        Some(Commands::Track(args)) => tempo_cli::commands::track::run(&config, &args)?,
        Some(Commands::Stats { today }) => tempo_cli::commands::stats::run(&config, today)?,
        Some(Commands::Today) => tempo_cli::commands::today::run(&config)?,
        Some(Commands::Projects) => tempo_cli::commands::projects::run(&config)?,
        Some(Commands::Api(args)) => tempo_cli::commands::api::run(&config, &args)?,
        Some(Commands::Optimize) => tempo_cli::commands::optimize::run(&config)?,
        Some(Commands::RebuildSummaries) => tempo_cli::commands::rebuild::run(&config)?,
        Some(Commands::Info) => tempo_cli::commands::info::run(&config)?,
        None => {
            use clap::CommandFactory;
            Cli::command().print_help()?;
            println!();
        }
    }

    Ok(())
}
