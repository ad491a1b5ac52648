//! Development HTTP server for the local instance.
//!
//! Serves the working directory as static files. Blocks until the process
//! is terminated; there is no health check, retry, or graceful-shutdown
//! orchestration beyond default signal behavior.

use std::io;
use std::net::SocketAddr;
use std::path::PathBuf;

use axum::Router;
use thiserror::Error;
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;
use tracing::info;

/// Options for the dev server.
#[derive(Debug, Clone)]
pub struct ServeOptions {
  /// Directory served as the site root.
  pub root: PathBuf,

  /// Port to bind on all interfaces.
  pub port: u16,
}

/// Errors that can occur while serving.
#[derive(Debug, Error)]
pub enum ServeError {
  /// The working directory does not exist yet.
  #[error("working directory not found: {path} (run setup first)")]
  RootMissing { path: String },

  /// The listener could not bind the configured port.
  #[error("failed to bind port {port}: {source}")]
  Bind {
    port: u16,
    #[source]
    source: io::Error,
  },

  /// The server failed while running.
  #[error("server error: {0}")]
  Io(#[from] io::Error),
}

/// Serve `root` over HTTP on the configured port until terminated.
pub async fn serve(options: &ServeOptions) -> Result<(), ServeError> {
  if !options.root.is_dir() {
    return Err(ServeError::RootMissing {
      path: options.root.display().to_string(),
    });
  }

  let app = Router::new()
    .fallback_service(ServeDir::new(&options.root))
    .layer(TraceLayer::new_for_http());

  let addr = SocketAddr::from(([0, 0, 0, 0], options.port));
  let listener = tokio::net::TcpListener::bind(addr)
    .await
    .map_err(|source| ServeError::Bind { port: options.port, source })?;

  info!(%addr, root = %options.root.display(), "serving working directory");
  axum::serve(listener, app).await?;

  Ok(())
}
