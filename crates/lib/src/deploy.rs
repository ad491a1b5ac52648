//! One-shot module deployment into the working directory.
//!
//! Mirrors the module's `upload` tree onto the installed application and
//! overlays the modification manifest. Destination files are overwritten
//! unconditionally; files the module does not ship are left untouched.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;

use crate::consts;
use crate::fsutil;

/// Options for a deploy run.
#[derive(Debug, Clone)]
pub struct DeployOptions {
  /// Module files copied into the working directory.
  pub source_dir: PathBuf,

  /// Module metadata file overlaid after the mirror.
  pub manifest_file: PathBuf,

  /// The working directory receiving the files.
  pub web_root: PathBuf,
}

impl DeployOptions {
  /// Standard layout relative to a project directory.
  pub fn for_project(project_dir: &Path) -> Self {
    DeployOptions {
      source_dir: project_dir.join(consts::MODULE_UPLOAD_DIR),
      manifest_file: project_dir.join(consts::MODULE_MANIFEST),
      web_root: project_dir.join(consts::WEB_ROOT),
    }
  }
}

/// Result of a deploy run.
#[derive(Debug)]
pub struct DeployResult {
  /// Files copied into the working directory, including the metadata overlay.
  pub files_copied: usize,
}

/// Errors that can occur during deploy.
#[derive(Debug, Error)]
pub enum DeployError {
  /// The module source tree is absent.
  #[error("module source tree not found: {path}")]
  SourceMissing { path: String },

  /// A copy failed.
  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

/// Copy the module source tree onto the working directory.
pub fn deploy(options: &DeployOptions) -> Result<DeployResult, DeployError> {
  if !options.source_dir.is_dir() {
    return Err(DeployError::SourceMissing {
      path: options.source_dir.display().to_string(),
    });
  }

  let copied = fsutil::mirror(&options.source_dir, &options.web_root)?;
  fsutil::overlay(
    &options.manifest_file,
    &options.web_root.join(consts::MANIFEST_DEST),
  )?;

  info!(files = copied + 1, dest = %options.web_root.display(), "deployed module source");
  Ok(DeployResult { files_copied: copied + 1 })
}
