use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{fmt, EnvFilter};

use appbits::cli::{Cli, Commands};
use appbits::command;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Some(Commands::Push {
            path,
            app_guid,
            dry_run,
        }) => {
            command::run_push(path, app_guid, dry_run, cli.config_dir).await?;
        }
        Some(Commands::Preview { path, all }) => {
            command::run_preview(path, all).await?;
        }
        Some(Commands::Validate { file }) => {
            command::run_validate(file).await?;
        }
        Some(Commands::Target { action }) => {
            command::run_target(action, cli.config_dir).await?;
        }
        None => {
            // No command specified, show help
            eprintln!("No command specified. Use --help for usage information.");
            eprintln!("Use 'appbits target set' to configure a platform, then 'appbits push'.");
        }
    }

    Ok(())
}
