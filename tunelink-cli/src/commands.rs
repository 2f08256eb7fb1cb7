//! CLI command implementations

use std::time::Duration;

use anyhow::Context;
use clap::{Args, Subcommand};
use tracing::info;
use tunelink_search::{SearchConfig, SearchQuery, SongSearchService};
use tunelink_web::{ServerConfig, run_server};

/// Available CLI commands
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Start the JSON API server
    Serve {
        /// Host to bind to [default: 0.0.0.0]
        #[arg(long)]
        host: Option<String>,
        /// Port to bind to [default: 3000]
        #[arg(short, long)]
        port: Option<u16>,
        /// Origin allowed to call the API, or `*` [default: http://localhost:5173]
        #[arg(long)]
        cors_origin: Option<String>,
        #[command(flatten)]
        providers: ProviderArgs,
    },
    /// Look up one song and print the JSON response
    Lookup {
        /// Artist name
        #[arg(short, long)]
        artist: String,
        /// Track name
        #[arg(short, long)]
        track: String,
        /// Pretty-print the JSON
        #[arg(long)]
        pretty: bool,
        #[command(flatten)]
        providers: ProviderArgs,
    },
}

/// Provider switches shared by every command.
#[derive(Debug, Args)]
pub struct ProviderArgs {
    /// Per-provider timeout in seconds
    #[arg(long)]
    timeout_secs: Option<u64>,
    /// Country code passed to song.link
    #[arg(long)]
    country: Option<String>,
    /// Skip the DuckDuckGo scrape
    #[arg(long)]
    no_scrape: bool,
    /// Skip song.link resolution
    #[arg(long)]
    no_song_link: bool,
}

impl ProviderArgs {
    /// Applies the flags on top of the environment configuration.
    fn into_config(self) -> SearchConfig {
        let mut config = SearchConfig::from_env();

        if let Some(seconds) = self.timeout_secs {
            config.provider_timeout = Duration::from_secs(seconds);
        }
        if let Some(country) = self.country {
            config.user_country = country.to_uppercase();
        }
        if self.no_scrape {
            config.enable_scrape = false;
        }
        if self.no_song_link {
            config.enable_song_link = false;
        }

        config
    }
}

/// Handle the CLI command
///
/// # Errors
/// Returns appropriate error based on the command that fails
pub async fn handle_command(command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Serve {
            host,
            port,
            cors_origin,
            providers,
        } => {
            let mut server_config = ServerConfig::from_env();
            if let Some(host) = host {
                server_config.host = host;
            }
            if let Some(port) = port {
                server_config.port = port;
            }
            if let Some(cors_origin) = cors_origin {
                server_config.cors_origin = cors_origin;
            }
            serve(server_config, providers.into_config()).await
        }
        Commands::Lookup {
            artist,
            track,
            pretty,
            providers,
        } => lookup(&artist, &track, pretty, providers.into_config()).await,
    }
}

async fn serve(server_config: ServerConfig, search_config: SearchConfig) -> anyhow::Result<()> {
    info!(
        timeout = ?search_config.provider_timeout,
        country = %search_config.user_country,
        scrape = search_config.enable_scrape,
        song_link = search_config.enable_song_link,
        "Starting Tunelink server"
    );

    let service = SongSearchService::from_config(&search_config)
        .context("failed to build lookup service")?;

    run_server(server_config, service)
        .await
        .context("server failed")
}

async fn lookup(
    artist: &str,
    track: &str,
    pretty: bool,
    search_config: SearchConfig,
) -> anyhow::Result<()> {
    let query = SearchQuery::new(artist, track)?;
    let service = SongSearchService::from_config(&search_config)
        .context("failed to build lookup service")?;

    let response = service.lookup(&query).await;

    let output = if pretty {
        serde_json::to_string_pretty(&response)?
    } else {
        serde_json::to_string(&response)?
    };
    println!("{output}");

    Ok(())
}
