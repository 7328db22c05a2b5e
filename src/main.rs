mod config;
mod database;
mod entities;
mod http_server;
mod logging;
mod ports;
mod seed;
mod services;
#[cfg(test)]
mod test_utils;

use std::path::{Path, PathBuf};
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::{Result, eyre::Context};

use crate::{
    config::Config, database::Database, http_server::app::HttpServerConfig,
    logging::init_tracing, seed::seed_sample_songs, services::song_store::SeaOrmSongStore,
};

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// The config file to use
    #[arg(short, long, env = "RIFF_CONFIG", global = true)]
    config: Option<PathBuf>,

    /// Log filter, e.g. `info` or `riff_catalog=debug,tower_http=debug`
    #[arg(long, default_value = "info", global = true, env = "LOG_LEVEL")]
    log_level: String,

    /// Also append logs to this file
    #[arg(long, env = "RIFF_LOG_FILE", global = true)]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Serve the song catalog HTTP API
    Serve {
        /// The port to run the server on
        #[arg(short, long, default_value = "8080", env = "RIFF_HTTP_PORT")]
        port: u16,

        /// Don't insert the sample songs into an empty catalog
        #[arg(long)]
        no_seed: bool,
    },
    /// Insert the sample songs if the catalog is empty
    Seed,
    #[command(subcommand)]
    Config(ConfigCommands),
}

#[derive(Subcommand, Debug)]
enum ConfigCommands {
    /// Create a default config file, if it doesn't exist
    CreateDefault,
    /// Print the path to the config file
    Path,
}

async fn open_catalog(config_path: Option<&Path>) -> Result<(Config, Arc<Database>)> {
    log::debug!("Loading configuration");
    let config = match config_path {
        Some(path) => Config::from_file(path),
        None => Config::load(),
    }
    .wrap_err("Failed to load riff-catalog config")?;

    let database = Database::open(&config.database_path()).await?;
    Ok((config, Arc::new(database)))
}

#[tokio::main]
async fn main() -> Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_tracing(&args.log_level, args.log_file.as_deref())?;

    log::debug!("Riff catalog starting");

    match args.command {
        Commands::Config(config_commands) => match config_commands {
            ConfigCommands::CreateDefault => {
                let path = Config::create_default()?;
                println!("{}", path.display());
            }
            ConfigCommands::Path => match Config::config_path() {
                Some(path) => println!("{}", path.display()),
                None => println!("No default config path found"),
            },
        },
        Commands::Serve { port, no_seed } => {
            let (config, database) = open_catalog(args.config.as_deref()).await?;
            if !no_seed {
                seed_sample_songs(&SeaOrmSongStore::new(database.clone())).await?;
            }
            log::info!("Starting HTTP server on port: {}", port);
            http_server::app::start(HttpServerConfig {
                port,
                database,
                media_directory: config.media_directory_path(),
                allowed_origins: config.allowed_origins().to_vec(),
            })
            .await?;
        }
        Commands::Seed => {
            let (_, database) = open_catalog(args.config.as_deref()).await?;
            let inserted = seed_sample_songs(&SeaOrmSongStore::new(database)).await?;
            log::info!("Seed command inserted {} songs", inserted);
        }
    }

    Ok(())
}
