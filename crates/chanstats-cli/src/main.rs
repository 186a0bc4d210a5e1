mod collect;
mod report;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "chanstats")]
#[command(about = "Track a channel's recent uploads and report day-over-day changes")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch today's snapshot and merge it into the dataset
    Collect {
        /// Fetch and merge, but print a summary instead of writing the dataset
        #[arg(long)]
        dry_run: bool,
    },
    /// Render the day-over-day HTML report from the dataset
    Report {
        /// Print the HTML to stdout instead of writing the report file
        #[arg(long)]
        stdout: bool,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let config = chanstats_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    tracing::debug!(?config, "configuration loaded");

    match cli.command {
        Some(Commands::Collect { dry_run }) => {
            let client = collect::build_client(&config)?;
            let today = chrono::Local::now().date_naive();
            collect::run_collect(&config, &client, today, dry_run).await
        }
        Some(Commands::Report { stdout }) => report::run_report(&config, stdout),
        None => {
            println!("chanstats: run `chanstats collect` or `chanstats report` (see --help)");
            Ok(())
        }
    }
}

#[cfg(test)]
mod tests;
