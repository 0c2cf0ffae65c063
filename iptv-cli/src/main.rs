mod cli;
mod commands;
mod config;
mod error;
mod output;
mod sink;

use crate::{
    cli::{Args, Commands, SavedAction},
    commands::CommandExecutor,
    config::AppConfig,
    error::Result,
};
use clap::Parser;
#[cfg(feature = "colored-output")]
use colored::*;
use std::process;
use tracing::{Level, debug, error};
use tracing_subscriber::{filter::EnvFilter, fmt, prelude::*};

#[tokio::main(flavor = "current_thread")]
async fn main() {
    let result = run().await;

    if let Err(e) = result {
        error!("Application error: {}", e);
        #[cfg(feature = "colored-output")]
        {
            eprintln!("{} {}", "Error:".red().bold(), e);
        }
        #[cfg(not(feature = "colored-output"))]
        {
            eprintln!("Error: {}", e);
        }
        process::exit(1);
    }
}

async fn run() -> Result<()> {
    let args = Args::parse();

    init_logging(args.verbose, args.quiet);

    let mut config = AppConfig::load(args.config.as_deref())?;
    if let Some(timeout) = args.timeout {
        config.timeout = timeout;
    }
    if let Some(passthrough) = &args.passthrough {
        config.passthrough_base = passthrough.clone();
    }
    debug!(?config, "Loaded configuration");

    let proxy = config.proxy(args.proxy, args.proxy_username, args.proxy_password);
    let fetcher_config = config.fetcher_config(proxy);
    let saved_path = config.saved_sources_path(args.config.as_deref());

    let executor = CommandExecutor::new(config, fetcher_config, saved_path, !args.quiet);

    match args.command {
        Commands::Browse {
            source,
            search,
            group,
            page,
            output,
        } => {
            executor
                .browse(&source, search.as_deref(), &group, page, output)
                .await?;
        }

        Commands::Groups { source, output } => {
            executor.groups(&source, output).await?;
        }

        Commands::Presets { output } => {
            executor.presets(output)?;
        }

        Commands::Saved { action } => match action {
            SavedAction::List { output } => executor.saved_list(output)?,
            SavedAction::Add { url, name } => executor.saved_add(&url, name.as_deref()).await?,
            SavedAction::Remove { index } => executor.saved_remove(index)?,
        },

        Commands::Probe {
            source,
            channel,
            stream,
            wait,
            output,
        } => {
            executor
                .probe(&source, channel, stream.as_deref(), wait, output)
                .await?;
        }

        Commands::Completions { shell } => {
            use clap::CommandFactory;
            use clap_complete::generate;

            let mut cmd = Args::command();
            let bin_name = cmd.get_name().to_string();
            generate(shell, &mut cmd, bin_name, &mut std::io::stdout());
        }

        Commands::Config { show, reset } => {
            if reset {
                AppConfig::reset(args.config.as_deref())?;
                println!("✓ Configuration reset to defaults");
            } else if show {
                let config = AppConfig::load(args.config.as_deref())?;
                println!("{}", config.show()?);
            } else {
                println!(
                    "Use --show to display current configuration or --reset to reset to defaults"
                );
            }
        }
    }

    Ok(())
}

fn init_logging(verbose: bool, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::from_default_env().add_directive(Level::INFO.into())
    };

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_level(verbose),
        )
        .with(filter)
        .init();
}
