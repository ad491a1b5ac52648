//! Local instance provisioning.
//!
//! Resets the working directory from the vendored application tree, resets
//! the database, then hands over to the application's own CLI installer.
//! Each run is a destructive reset; nothing incremental survives between
//! invocations. Concurrent runs against the same project directory are
//! unguarded.

use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tokio::process::Command;
use tracing::{info, warn};

use crate::config::Config;
use crate::consts;
use crate::db::{self, DbError, DbSettings};
use crate::fsutil;

/// What to do when the database reset fails.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum DbResetPolicy {
  /// Abort setup before the installer touches a database in an unknown state.
  #[default]
  FailFast,
  /// Report the failure and continue into installation anyway.
  BestEffort,
}

/// Options for provisioning a local instance.
#[derive(Debug, Clone)]
pub struct SetupOptions {
  /// Project directory containing `vendor/` and receiving `www/`.
  pub project_dir: PathBuf,

  /// Failure policy for the database reset step.
  pub db_policy: DbResetPolicy,

  /// Interpreter used to run the installer script.
  pub php_bin: String,
}

impl Default for SetupOptions {
  fn default() -> Self {
    SetupOptions {
      project_dir: PathBuf::from("."),
      db_policy: DbResetPolicy::default(),
      php_bin: consts::PHP_BIN.to_string(),
    }
  }
}

/// Outcome of the database reset step, surfaced in the setup summary.
#[derive(Debug)]
pub enum DbOutcome {
  /// The database was dropped and recreated.
  Reset,
  /// The reset failed and setup continued under [`DbResetPolicy::BestEffort`].
  Failed(DbError),
}

/// Result of a completed setup run.
#[derive(Debug)]
pub struct SetupResult {
  /// The provisioned working directory.
  pub web_root: PathBuf,

  /// Files copied from the vendored application tree.
  pub files_mirrored: usize,

  /// Outcome of the database reset step.
  pub db: DbOutcome,
}

/// Errors that can occur during setup.
#[derive(Debug, Error)]
pub enum SetupError {
  /// The vendored application tree is absent (dependencies not installed).
  #[error("vendored application tree not found: {path}")]
  VendorTreeMissing { path: String },

  /// The database reset failed under [`DbResetPolicy::FailFast`].
  #[error("database reset failed: {0}")]
  Db(#[from] DbError),

  /// The installer process could not be spawned.
  #[error("failed to spawn installer: {0}")]
  InstallerSpawn(#[source] io::Error),

  /// The installer ran but exited with a non-zero status. The installer
  /// directory is left in place for inspection.
  #[error("installer exited with status {code:?}")]
  InstallerFailed { code: Option<i32> },

  /// A filesystem step failed.
  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

/// Provision a local instance of the application for testing.
///
/// 1. Delete the working directory if present, mirror the vendored
///    application tree into it, overlay the test-support files, and relax
///    permissions recursively.
/// 2. Reset the database (drop-if-exists, create), honoring the configured
///    failure policy.
/// 3. Run the application's CLI installer with every configuration option
///    passed as a command-line option. On verified success the installer
///    directory is removed; on failure it is kept and an error returned.
pub async fn setup(config: &Config, options: &SetupOptions) -> Result<SetupResult, SetupError> {
  let web_root = options.project_dir.join(consts::WEB_ROOT);
  let vendor_upload = options.project_dir.join(consts::VENDOR_UPLOAD_DIR);

  if !vendor_upload.is_dir() {
    return Err(SetupError::VendorTreeMissing {
      path: vendor_upload.display().to_string(),
    });
  }

  info!(path = %web_root.display(), "resetting working directory");
  fsutil::remove_dir_if_exists(&web_root)?;
  let files_mirrored = fsutil::mirror(&vendor_upload, &web_root)?;

  for (src, dest) in consts::TEST_OVERLAYS {
    fsutil::overlay(&options.project_dir.join(src), &web_root.join(dest))?;
  }
  fsutil::chmod_recursive(&web_root, 0o777)?;

  let db = match reset_database(config).await {
    Ok(()) => DbOutcome::Reset,
    Err(err) => match options.db_policy {
      DbResetPolicy::FailFast => return Err(err.into()),
      DbResetPolicy::BestEffort => {
        warn!(error = %err, "database reset failed, continuing");
        DbOutcome::Failed(err)
      }
    },
  };

  run_installer(config, options, &web_root).await?;
  fsutil::remove_dir_if_exists(&web_root.join(consts::INSTALL_DIR))?;

  Ok(SetupResult { web_root, files_mirrored, db })
}

async fn reset_database(config: &Config) -> Result<(), DbError> {
  let settings = DbSettings::from_config(config)?;
  db::reset(&settings).await
}

/// Invoke the application's CLI installer with every configuration option.
///
/// Options are passed in map order, so the invocation is deterministic for
/// a given configuration. The installer's stdout/stderr are inherited.
async fn run_installer(
  config: &Config,
  options: &SetupOptions,
  web_root: &Path,
) -> Result<(), SetupError> {
  let script = web_root.join(consts::INSTALL_SCRIPT);

  let mut command = Command::new(&options.php_bin);
  command.arg(&script).arg("install").current_dir(&options.project_dir);
  for (name, value) in &config.options {
    command.arg(format!("--{name}")).arg(value);
  }

  info!(script = %script.display(), "running application installer");
  let status = command.status().await.map_err(SetupError::InstallerSpawn)?;

  if !status.success() {
    return Err(SetupError::InstallerFailed { code: status.code() });
  }
  Ok(())
}
