//! Continuous deployment driven by filesystem changes.
//!
//! A change under the dependency manifest refreshes dependencies and
//! re-deploys; a change under the module source tree re-deploys. Events are
//! handled synchronously and one at a time, with no debouncing: each sync
//! runs to completion before the next change is considered. The loop has no
//! exit condition besides cancellation or process termination.
//!
//! The event loop is decoupled from the real filesystem watcher: [`run`]
//! consumes a channel of [`WatchEvent`]s and a [`CancelToken`], so tests
//! drive it with synthetic events, while [`watch`] wires a `notify` watcher
//! into the same loop.

use std::io;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{Receiver, RecvTimeoutError, channel};
use std::time::Duration;

use notify::{Event, RecursiveMode, Watcher};
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::consts;
use crate::deploy::{self, DeployError, DeployOptions};

/// How often the event loop re-checks the cancellation token while idle.
const POLL_INTERVAL: Duration = Duration::from_millis(200);

/// A detected change, classified by which watched root it falls under.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WatchEvent {
  /// The dependency manifest changed.
  Manifest,
  /// The module source tree changed.
  Source,
}

/// Cooperative cancellation flag for the watch loop.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
  pub fn new() -> Self {
    Self::default()
  }

  pub fn cancel(&self) {
    self.0.store(true, Ordering::SeqCst);
  }

  pub fn is_cancelled(&self) -> bool {
    self.0.load(Ordering::SeqCst)
  }
}

/// Options for continuous deployment.
#[derive(Debug, Clone)]
pub struct WatchOptions {
  /// Project directory the dependency refresh runs in.
  pub project_dir: PathBuf,

  /// Dependency manifest watched for changes.
  pub manifest: PathBuf,

  /// Module source tree watched recursively.
  pub source_dir: PathBuf,

  /// Dependency manager invoked when the manifest changes.
  pub composer_bin: String,

  /// Deploy settings used for every sync.
  pub deploy: DeployOptions,
}

impl WatchOptions {
  /// Standard layout relative to a project directory.
  pub fn for_project(project_dir: &Path) -> Self {
    WatchOptions {
      project_dir: project_dir.to_path_buf(),
      manifest: project_dir.join(consts::COMPOSER_MANIFEST),
      source_dir: project_dir.join(consts::MODULE_SRC_DIR),
      composer_bin: consts::COMPOSER_BIN.to_string(),
      deploy: DeployOptions::for_project(project_dir),
    }
  }
}

/// Errors that can occur while watching.
#[derive(Debug, Error)]
pub enum WatchError {
  /// The filesystem watcher could not be set up.
  #[error("watcher error: {0}")]
  Notify(#[from] notify::Error),

  /// A re-deploy failed.
  #[error("deploy failed: {0}")]
  Deploy(#[from] DeployError),

  /// The dependency refresh could not be spawned.
  #[error("failed to spawn dependency refresh: {0}")]
  RefreshSpawn(#[source] io::Error),

  /// The dependency refresh exited with a non-zero status.
  #[error("dependency refresh exited with status {code:?}")]
  RefreshFailed { code: Option<i32> },
}

/// Classify a raw change against the watched roots.
///
/// Manifest wins when a single event touches both roots.
fn classify(paths: &[PathBuf], manifest: &Path, source_dir: &Path) -> Option<WatchEvent> {
  if paths.iter().any(|p| p == manifest) {
    return Some(WatchEvent::Manifest);
  }
  if paths.iter().any(|p| p.starts_with(source_dir)) {
    return Some(WatchEvent::Source);
  }
  None
}

/// Drain classified events until cancelled or the sender hangs up.
///
/// `on_event` runs synchronously and exclusively; a second change arriving
/// mid-sync waits in the channel. Handler errors stop the loop.
pub fn run<F>(
  events: &Receiver<WatchEvent>,
  cancel: &CancelToken,
  mut on_event: F,
) -> Result<(), WatchError>
where
  F: FnMut(WatchEvent) -> Result<(), WatchError>,
{
  while !cancel.is_cancelled() {
    match events.recv_timeout(POLL_INTERVAL) {
      Ok(event) => {
        debug!(?event, "change detected");
        on_event(event)?;
      }
      Err(RecvTimeoutError::Timeout) => continue,
      Err(RecvTimeoutError::Disconnected) => break,
    }
  }
  Ok(())
}

/// Deploy once, then keep the working directory in sync until cancelled.
pub fn watch(options: &WatchOptions, cancel: &CancelToken) -> Result<(), WatchError> {
  deploy::deploy(&options.deploy)?;

  // notify reports absolute paths; resolve the roots once up front so
  // classification is a plain prefix check.
  let manifest = options.manifest.canonicalize().unwrap_or_else(|_| options.manifest.clone());
  let source_dir = options
    .source_dir
    .canonicalize()
    .unwrap_or_else(|_| options.source_dir.clone());

  let (tx, rx) = channel();
  let mut watcher = notify::recommended_watcher(move |result: notify::Result<Event>| {
    match result {
      Ok(event) => {
        if let Some(classified) = classify(&event.paths, &manifest, &source_dir) {
          let _ = tx.send(classified);
        }
      }
      Err(err) => warn!(error = %err, "watch error"),
    }
  })?;

  if options.manifest.exists() {
    watcher.watch(&options.manifest, RecursiveMode::NonRecursive)?;
  } else {
    warn!(path = %options.manifest.display(), "dependency manifest absent, not watched");
  }
  watcher.watch(&options.source_dir, RecursiveMode::Recursive)?;

  info!(
    source = %options.source_dir.display(),
    manifest = %options.manifest.display(),
    "watching for changes"
  );

  run(&rx, cancel, |event| handle_event(event, options))
}

fn handle_event(event: WatchEvent, options: &WatchOptions) -> Result<(), WatchError> {
  match event {
    WatchEvent::Manifest => {
      refresh_dependencies(options)?;
      deploy::deploy(&options.deploy)?;
    }
    WatchEvent::Source => {
      deploy::deploy(&options.deploy)?;
    }
  }
  Ok(())
}

/// Re-run the dependency manager after a manifest change.
fn refresh_dependencies(options: &WatchOptions) -> Result<(), WatchError> {
  info!(manifest = %options.manifest.display(), "dependency manifest changed, refreshing");

  let status = std::process::Command::new(&options.composer_bin)
    .arg("update")
    .current_dir(&options.project_dir)
    .status()
    .map_err(WatchError::RefreshSpawn)?;

  if !status.success() {
    return Err(WatchError::RefreshFailed { code: status.code() });
  }
  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn classify_prefers_manifest() {
    let manifest = PathBuf::from("/project/composer.json");
    let source = PathBuf::from("/project/src");
    let paths = vec![
      PathBuf::from("/project/src/upload/a.php"),
      PathBuf::from("/project/composer.json"),
    ];

    assert_eq!(classify(&paths, &manifest, &source), Some(WatchEvent::Manifest));
  }

  #[test]
  fn classify_detects_source_changes() {
    let manifest = PathBuf::from("/project/composer.json");
    let source = PathBuf::from("/project/src");
    let paths = vec![PathBuf::from("/project/src/install.xml")];

    assert_eq!(classify(&paths, &manifest, &source), Some(WatchEvent::Source));
  }

  #[test]
  fn classify_ignores_unrelated_paths() {
    let manifest = PathBuf::from("/project/composer.json");
    let source = PathBuf::from("/project/src");
    let paths = vec![PathBuf::from("/project/www/index.php")];

    assert_eq!(classify(&paths, &manifest, &source), None);
  }

  #[test]
  fn run_processes_events_in_order() {
    let (tx, rx) = channel();
    tx.send(WatchEvent::Source).unwrap();
    tx.send(WatchEvent::Manifest).unwrap();
    drop(tx);

    let mut seen = Vec::new();
    run(&rx, &CancelToken::new(), |event| {
      seen.push(event);
      Ok(())
    })
    .unwrap();

    assert_eq!(seen, vec![WatchEvent::Source, WatchEvent::Manifest]);
  }

  #[test]
  fn run_stops_when_cancelled() {
    let (tx, rx) = channel();
    tx.send(WatchEvent::Source).unwrap();

    let cancel = CancelToken::new();
    cancel.cancel();

    let mut seen = 0;
    run(&rx, &cancel, |_| {
      seen += 1;
      Ok(())
    })
    .unwrap();

    assert_eq!(seen, 0);
  }

  #[test]
  fn run_propagates_handler_errors() {
    let (tx, rx) = channel();
    tx.send(WatchEvent::Source).unwrap();

    let result = run(&rx, &CancelToken::new(), |_| {
      Err(WatchError::RefreshFailed { code: Some(2) })
    });

    assert!(matches!(result, Err(WatchError::RefreshFailed { code: Some(2) })));
  }
}
