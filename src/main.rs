use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use memvault::{api, MemoryStore, VaultConfig};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memvault", about = "Scrapbook memory vault server", version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Run the memory API server (the default)
    Serve {
        /// Listen port; overrides the PORT environment variable
        #[arg(long)]
        port: Option<u16>,
        /// JSON store file; overrides STORE_PATH. Without one, records
        /// live in memory and vanish on exit.
        #[arg(long)]
        store: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into()))
        .init();

    let cli = Cli::parse();
    let mut config = VaultConfig::from_env().context("reading configuration")?;

    let (port, store_path) = match cli.command {
        Some(Command::Serve { port, store }) => (port, store),
        None => (None, None),
    };
    if let Some(port) = port {
        config.port = port;
    }
    if let Some(store) = store_path {
        config.store_path = Some(store);
    }

    let store = match &config.store_path {
        Some(path) => MemoryStore::open(path).context("opening memory store")?,
        None => {
            tracing::warn!("no STORE_PATH configured; memories will not survive a restart");
            MemoryStore::ephemeral()
        }
    };

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    api::serve(api::shared(store), addr).await;
    Ok(())
}
