mod commands;

use std::path::PathBuf;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Result;
use chrono::{Local, NaiveDate};
use clap::{Parser, Subcommand};
use eventboard_core::env_non_empty;
use eventboard_storage::StorageBackend;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "eventboard")]
#[command(about = "Local wargame event board: API server, import and newsletter jobs, scraper", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the HTTP API.
    Serve {
        #[arg(short, long, default_value = "8000")]
        port: u16,
        #[arg(short = 'H', long, default_value = "127.0.0.1")]
        host: String,
    },
    /// Import scraped JSON files into the database.
    Import {
        /// Defaults to IMPORT_DATA_DIR, then `data`.
        #[arg(short, long)]
        data_dir: Option<PathBuf>,
    },
    /// Send the monthly newsletter to every active subscriber.
    Newsletter,
    /// Render this month's calendar email to a file.
    PreviewEmail {
        /// Defaults to `preview-email-YYYY-MM.html`.
        #[arg(short, long)]
        out: Option<PathBuf>,
    },
    /// Scheduled job: on the second-to-last Saturday, ask a running API to send the newsletter.
    NewsletterCron {
        /// Run as if today were this date.
        #[arg(long, hide = true)]
        date: Option<NaiveDate>,
    },
    /// Scrape Facebook pages and Discord servers into a JSON snapshot.
    Scrape {
        #[arg(long = "facebook-page")]
        facebook_pages: Vec<String>,
        #[arg(long = "discord-guild")]
        discord_guilds: Vec<String>,
        /// Discord channel name filter, applied to every guild.
        #[arg(long = "channel")]
        channels: Vec<String>,
        #[arg(long, default_value = "events_data")]
        out_dir: PathBuf,
        #[arg(long)]
        filename: Option<String>,
    },
}

/// Postgres when `DATABASE_URL` is set, the in-memory backend otherwise.
pub(crate) async fn open_storage() -> Result<Arc<StorageBackend>> {
    let backend = match env_non_empty("DATABASE_URL") {
        Some(url) => StorageBackend::new_postgres(&url).await?,
        None => {
            tracing::warn!("DATABASE_URL not set, using in-memory storage (data is lost on exit)");
            StorageBackend::new_memory()
        },
    };
    tracing::info!(backend = backend.kind(), "storage ready");
    Ok(Arc::new(backend))
}

#[tokio::main]
async fn main() -> Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { port, host } => commands::serve::run(port, &host).await,
        Commands::Import { data_dir } => commands::jobs::run_import(data_dir).await,
        Commands::Newsletter => commands::jobs::run_newsletter().await,
        Commands::PreviewEmail { out } => commands::jobs::run_preview(out).await,
        Commands::NewsletterCron { date } => {
            commands::cron::run(date.unwrap_or_else(|| Local::now().date_naive())).await
        },
        Commands::Scrape { facebook_pages, discord_guilds, channels, out_dir, filename } => {
            commands::scrape::run(
                &facebook_pages,
                &discord_guilds,
                channels,
                out_dir,
                filename.as_deref(),
            )
            .await
        },
    }
}
