use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use eventboard_core::env_non_empty;
use eventboard_scraper::{DiscordServer, GamingEventsScraper};

/// One `DiscordServer` per guild, sharing the channel filter when one was given.
fn discord_servers(guilds: &[String], channels: Vec<String>) -> Vec<DiscordServer> {
    guilds
        .iter()
        .map(|guild| {
            let server = DiscordServer::new(guild.as_str());
            if channels.is_empty() { server } else { server.with_channels(channels.clone()) }
        })
        .collect()
}

pub(crate) async fn run(
    facebook_pages: &[String],
    discord_guilds: &[String],
    channels: Vec<String>,
    out_dir: PathBuf,
    filename: Option<&str>,
) -> Result<ExitCode> {
    let scraper = GamingEventsScraper::new(
        env_non_empty("FACEBOOK_ACCESS_TOKEN"),
        env_non_empty("DISCORD_BOT_TOKEN"),
        out_dir,
    )
    .await?;
    let servers = discord_servers(discord_guilds, channels);

    match scraper.scrape_and_save(facebook_pages, &servers, filename).await? {
        Some(path) => println!("{}", path.display()),
        None => println!("No events found."),
    }
    Ok(ExitCode::SUCCESS)
}
