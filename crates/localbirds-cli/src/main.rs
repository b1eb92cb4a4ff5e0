mod digest;
mod watch;

use std::sync::Arc;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "localbirds")]
#[command(about = "Digest of recent eBird sightings near you")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch recent sightings once, print the digest, and deliver it
    Run {
        /// Print the digest but do not send email or Telegram messages
        #[arg(long)]
        dry_run: bool,
        /// Print results as JSON instead of Markdown
        #[arg(long)]
        json: bool,
    },
    /// Print the eBird queries a run would issue
    Plan,
    /// Run the digest on a cron schedule until interrupted
    Watch {
        /// Six-field cron expression; overrides `LOCALBIRDS_SCHEDULE`
        #[arg(long)]
        schedule: Option<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let config = localbirds_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    let command = cli.command.unwrap_or(Commands::Run {
        dry_run: false,
        json: false,
    });
    match command {
        Commands::Run { dry_run, json } => {
            let ctx = digest::DigestContext::prepare(config).await?;
            digest::run_once(&ctx, dry_run, json).await?;
        }
        Commands::Plan => {
            let points = digest::resolve_points(&config).await?;
            digest::print_plan(&config, &points);
        }
        Commands::Watch { schedule } => {
            let schedule = schedule.unwrap_or_else(|| config.schedule.clone());
            let ctx = Arc::new(digest::DigestContext::prepare(config).await?);
            watch::run_watch(ctx, &schedule).await?;
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests;
