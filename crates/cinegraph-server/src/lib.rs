//! Runtime configuration and application assembly for the Cinegraph server.
//!
//! The binary in `main.rs` parses the command line, loads a
//! [`ServerConfig`], opens the configured store and serves [`app`].

use std::path::{Path, PathBuf};

use axum::Router;
use cinegraph_api::{AppState, api_router};
use cinegraph_core::store::FilmStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ───────────────────────────────────────────────────────────

/// Prefix for environment overrides, e.g. `CINEGRAPH_PORT=9000`.
pub const ENV_PREFIX: &str = "CINEGRAPH";

/// Which [`FilmStore`] backend to run on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StoreKind {
  /// SQLite database at `store_path`.
  Sqlite,
  /// Process-local state, lost on exit.
  Memory,
}

/// Runtime server configuration, deserialised from `cinegraph.toml` and
/// the environment.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
  pub host:       String,
  pub port:       u16,
  pub store:      StoreKind,
  pub store_path: PathBuf,
}

impl ServerConfig {
  pub fn address(&self) -> String { format!("{}:{}", self.host, self.port) }
}

/// Layer defaults, the optional TOML file at `path`, and `CINEGRAPH_*`
/// environment variables, in increasing order of precedence.
pub fn load_config(path: &Path) -> Result<ServerConfig, config::ConfigError> {
  config::Config::builder()
    .set_default("host", "127.0.0.1")?
    .set_default("port", 8080)?
    .set_default("store", "sqlite")?
    .set_default("store_path", "cinegraph.db")?
    .add_source(config::File::from(path).required(false))
    .add_source(config::Environment::with_prefix(ENV_PREFIX))
    .build()?
    .try_deserialize()
}

/// Expand a leading `~` to the user's home directory.
pub fn expand_tilde(path: &Path) -> PathBuf {
  let s = path.to_string_lossy();
  if let Some(rest) = s.strip_prefix("~/")
    && let Ok(home) = std::env::var("HOME")
  {
    return PathBuf::from(home).join(rest);
  }
  path.to_path_buf()
}

// ─── Application ─────────────────────────────────────────────────────────────

/// The API router with request tracing applied.
pub fn app<S>(service: AppState<S>) -> Router
where
  S: FilmStore + 'static,
{
  api_router(service).layer(TraceLayer::new_for_http())
}

#[cfg(test)]
mod tests {
  use std::{fs, sync::Arc};

  use axum::{
    body::Body,
    http::{Request, StatusCode},
  };
  use cinegraph_core::{MemoryStore, Service};
  use tower::ServiceExt as _;

  use super::*;

  #[test]
  fn missing_file_yields_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = load_config(&dir.path().join("absent.toml")).unwrap();
    assert_eq!(cfg.address(), "127.0.0.1:8080");
    assert_eq!(cfg.store, StoreKind::Sqlite);
    assert_eq!(cfg.store_path, PathBuf::from("cinegraph.db"));
  }

  #[test]
  fn file_values_override_defaults() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cinegraph.toml");
    fs::write(&path, "port = 9090\nstore = \"memory\"\n").unwrap();

    let cfg = load_config(&path).unwrap();
    assert_eq!(cfg.port, 9090);
    assert_eq!(cfg.store, StoreKind::Memory);
    assert_eq!(cfg.host, "127.0.0.1");
  }

  #[test]
  fn unknown_store_kind_is_rejected() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("cinegraph.toml");
    fs::write(&path, "store = \"postgres\"\n").unwrap();
    assert!(load_config(&path).is_err());
  }

  #[test]
  fn tilde_is_expanded_against_home() {
    let Ok(home) = std::env::var("HOME") else { return };
    assert_eq!(expand_tilde(Path::new("~/films.db")), PathBuf::from(home).join("films.db"));
    assert_eq!(expand_tilde(Path::new("/tmp/films.db")), PathBuf::from("/tmp/films.db"));
  }

  #[tokio::test]
  async fn app_serves_the_api() {
    let service = Arc::new(Service::new(MemoryStore::new()));
    let req = Request::builder().uri("/mpa").body(Body::empty()).unwrap();
    let resp = app(service).oneshot(req).await.unwrap();
    assert_eq!(resp.status(), StatusCode::OK);
  }
}
