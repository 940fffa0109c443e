/// Aria Player - terminal client
mod commands;
mod config;

use anyhow::Context;
use aria_core::MusicService;
use aria_playback::{HeadlessEngine, Notice, Player};
use aria_server_client::{AriaServerClient, ServerConfig};
use clap::Parser;
use commands::Command;
use config::ClientConfig;
use std::{path::PathBuf, sync::Arc, time::Duration};
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::sync::broadcast;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[derive(Parser)]
#[command(name = "aria")]
#[command(about = "Aria Player terminal client", long_about = None, version)]
struct Cli {
    /// Configuration file path (defaults to ./aria.toml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Access token of the signed-in user
    #[arg(long, env = "ARIA_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Server URL, overriding the configuration
    #[arg(long)]
    server: Option<String>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let mut config = ClientConfig::load(cli.config.as_deref())?;
    if let Some(url) = cli.server {
        config.server.url = url;
    }
    config.validate()?;

    // Logs go to stderr so they do not interleave with command output
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(&config.log.filter)),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    tracing::info!(server = %config.server.url, "Starting Aria Player");

    let client = AriaServerClient::new(
        ServerConfig::new(config.server.url.clone())
            .with_timeout(Duration::from_secs(config.server.timeout_secs)),
    )
    .context("Failed to create server client")?;
    let service: Arc<dyn MusicService> = Arc::new(client);

    let player = Player::new(
        service,
        Arc::new(HeadlessEngine::new()),
        config.playback.clone(),
    );
    let printer = tokio::spawn(print_notices(player.subscribe_notices()));

    let token = cli.token.or(config.auth.access_token);
    if token.is_some() {
        player.auth().set_token(token);
    }

    if !player.mount().await {
        tracing::warn!("Playback engine unavailable, only browsing works");
    }
    println!(
        "{} songs loaded. Type `help` for commands.",
        player.catalog().snapshot().songs.len()
    );

    let result = run(&player).await;

    player.shutdown().await;
    printer.abort();
    result
}

async fn run(player: &Player) -> anyhow::Result<()> {
    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        let line = tokio::select! {
            line = lines.next_line() => line.context("Failed to read stdin")?,
            _ = tokio::signal::ctrl_c() => None,
        };
        let Some(line) = line else {
            break;
        };
        if line.trim().is_empty() {
            continue;
        }

        match line.parse::<Command>() {
            Ok(command) => {
                if !commands::execute(player, command).await {
                    break;
                }
            }
            Err(e) => println!("{e}"),
        }
    }
    Ok(())
}

async fn print_notices(mut notices: broadcast::Receiver<Notice>) {
    loop {
        match notices.recv().await {
            Ok(notice) => println!("! {notice}"),
            Err(broadcast::error::RecvError::Lagged(missed)) => {
                tracing::debug!(missed, "Notice printer fell behind");
            }
            Err(broadcast::error::RecvError::Closed) => break,
        }
    }
}
