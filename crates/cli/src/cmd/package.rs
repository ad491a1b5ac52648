//! Implementation of the `ocdev package` command.

use std::path::Path;

use anyhow::{Context, Result};

use ocdev_lib::package::{PackageOptions, package};

use crate::output::{format_bytes, print_stat, print_success};

/// Execute the package command: rebuild the distributable archive from the
/// module source tree.
pub fn cmd_package() -> Result<()> {
  let options = PackageOptions::for_project(Path::new("."));
  let result = package(&options).context("Package failed")?;

  print_success("Archive built");
  print_stat("Archive", &result.archive.display().to_string());
  print_stat(
    "Entries",
    &format!("{} file(s), {} dir(s)", result.files, result.dirs),
  );
  print_stat("Size", &format_bytes(result.bytes));

  Ok(())
}
