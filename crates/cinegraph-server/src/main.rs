//! Cinegraph server binary.
//!
//! Reads `cinegraph.toml` (or the path given with `--config`), opens the
//! configured store and serves the JSON API over HTTP.

use std::{path::PathBuf, sync::Arc};

use anyhow::Context as _;
use cinegraph_core::{MemoryStore, Service, store::FilmStore};
use cinegraph_server::{ServerConfig, StoreKind, app, expand_tilde, load_config};
use cinegraph_store_sqlite::SqliteStore;
use clap::Parser;
use tokio::net::TcpListener;
use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(author, version, about = "Cinegraph film catalogue server")]
struct Cli {
  /// Path to the TOML configuration file.
  #[arg(short, long, default_value = "cinegraph.toml")]
  config: PathBuf,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  tracing_subscriber::fmt()
    .with_env_filter(
      EnvFilter::builder()
        .with_default_directive(LevelFilter::INFO.into())
        .from_env_lossy(),
    )
    .init();

  let cli = Cli::parse();
  let server_cfg = load_config(&cli.config).context("failed to load configuration")?;

  match server_cfg.store {
    StoreKind::Sqlite => {
      let store_path = expand_tilde(&server_cfg.store_path);
      let store = SqliteStore::open(&store_path)
        .await
        .with_context(|| format!("failed to open store at {store_path:?}"))?;
      tracing::info!(path = %store_path.display(), "opened sqlite store");
      serve(&server_cfg, store).await
    }
    StoreKind::Memory => {
      tracing::warn!("using in-memory store; data is lost on exit");
      serve(&server_cfg, MemoryStore::new()).await
    }
  }
}

async fn serve<S: FilmStore + 'static>(server_cfg: &ServerConfig, store: S) -> anyhow::Result<()> {
  let app = app(Arc::new(Service::new(store)));
  let address = server_cfg.address();

  tracing::info!("Listening on http://{address}");
  let listener = TcpListener::bind(&address)
    .await
    .with_context(|| format!("failed to bind {address}"))?;

  axum::serve(listener, app).await.context("server error")?;

  Ok(())
}
