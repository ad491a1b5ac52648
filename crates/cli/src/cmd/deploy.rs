//! Implementation of the `ocdev deploy` command.

use std::path::Path;

use anyhow::{Context, Result};

use ocdev_lib::deploy::{DeployOptions, deploy};

use crate::output::print_success;

/// Execute the deploy command: one-shot sync of the module source into the
/// working directory.
pub fn cmd_deploy() -> Result<()> {
  let options = DeployOptions::for_project(Path::new("."));
  let result = deploy(&options).context("Deploy failed")?;

  print_success(&format!("Deployed {} file(s)", result.files_copied));
  Ok(())
}
