//! immich-album-sync — keep an Immich album filled with the photos of
//! selected people.
//!
//! Each cycle asks the Immich search API which assets show the configured
//! people, compares that set with the album's current contents, and adds
//! whatever is missing. Cycles repeat on a fixed interval until the process
//! is told to stop; a failing cycle is logged and never kills the service.

#![warn(clippy::all)]

mod cli;
mod config;
mod immich;
mod shutdown;
mod sync;
mod systemd;

use std::time::Duration;

use clap::Parser;
use tracing_subscriber::EnvFilter;

use immich::{ImmichApi, ImmichClient};

/// Look up an album id by exact name and print it.
async fn run_find_album(api: &dyn ImmichApi, name: &str) -> anyhow::Result<()> {
    let albums = api.list_albums().await?;
    match albums.iter().find(|a| a.album_name == name) {
        Some(album) => {
            println!("{}", album.id);
            Ok(())
        }
        None => {
            let available: Vec<&String> = albums.iter().map(|a| &a.album_name).collect();
            anyhow::bail!(
                "Album '{}' not found. Available albums: {:?}",
                name,
                available
            )
        }
    }
}

/// Print the named people known to the server.
async fn run_list_people(api: &dyn ImmichApi) -> anyhow::Result<()> {
    let people = api.list_people().await?;
    let mut names: Vec<&str> = people
        .iter()
        .filter_map(|p| p.name.as_deref())
        .filter(|n| !n.is_empty())
        .collect();
    names.sort_unstable();

    println!("People:");
    for name in names {
        println!("  {}", name);
    }
    Ok(())
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // .env first: clap reads env fallbacks during parse.
    dotenvy::dotenv().ok();
    let cli = cli::Cli::parse();

    let filter = match cli.log_level {
        cli::LogLevel::Debug => "debug",
        cli::LogLevel::Info => "info",
        cli::LogLevel::Warn => "warn",
        cli::LogLevel::Error => "error",
    };
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .init();

    // The lookup helpers run without album or person config.
    if let Some(name) = cli.find_album.as_deref() {
        let client = ImmichClient::new(&cli.base_url, &cli.api_key)?;
        return run_find_album(&client, name).await;
    }
    if cli.list_people {
        let client = ImmichClient::new(&cli.base_url, &cli.api_key)?;
        return run_list_people(&client).await;
    }

    let config = config::Config::from_cli(cli)?;
    let client = ImmichClient::new(&config.base_url, &config.api_key)?;
    tracing::debug!("{:?}", config);
    tracing::info!(
        "Starting immich-album-sync (interval: {}s)",
        config.interval_secs
    );
    tracing::info!(
        "Syncing album {} with the photos of: {}",
        config.album_id,
        config.person_names.join(", ")
    );
    if !config.name_filters.is_empty() {
        tracing::info!("Filename filters: {}", config.name_filters.join(", "));
    }
    if config.dry_run {
        tracing::info!("Dry run: the album will not be modified");
    }

    let notifier = systemd::SystemdNotifier::new(config.notify_systemd);
    let shutdown_token = shutdown::install_signal_handler();

    let sync_config = sync::SyncConfig {
        album_id: config.album_id,
        person_names: config.person_names,
        filter: config.filter,
        interval: Duration::from_secs(config.interval_secs),
        once: config.once,
        dry_run: config.dry_run,
    };

    sync::run(&client, &sync_config, &notifier, shutdown_token).await
}
