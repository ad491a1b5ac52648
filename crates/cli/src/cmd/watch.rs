//! Implementation of the `ocdev watch` command.

use std::path::Path;

use anyhow::{Context, Result};

use ocdev_lib::watch::{CancelToken, WatchOptions, watch};

use crate::output::print_info;

/// Execute the watch command: deploy once, then re-deploy on every change
/// until the process is terminated.
pub fn cmd_watch() -> Result<()> {
  let options = WatchOptions::for_project(Path::new("."));

  print_info(&format!(
    "Watching {} and {} (Ctrl-C to stop)",
    options.source_dir.display(),
    options.manifest.display()
  ));

  // The loop only ends with the process; the token exists for callers that
  // need a cooperative stop (tests drive the loop directly).
  let cancel = CancelToken::new();
  watch(&options, &cancel).context("Watch failed")?;

  Ok(())
}
