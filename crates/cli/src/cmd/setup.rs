//! Implementation of the `ocdev setup` command.
//!
//! Provisions a throwaway local instance: working directory from the
//! vendored tree, database reset, then the application's own installer.

use anyhow::{Context, Result};

use ocdev_lib::config::Config;
use ocdev_lib::setup::{DbOutcome, DbResetPolicy, SetupOptions, setup};

use crate::output::{print_stat, print_success, print_warning};

/// Execute the setup command.
///
/// `keep_going` selects the original best-effort behavior: a failed
/// database reset is reported but the installer still runs.
pub fn cmd_setup(config: &Config, keep_going: bool) -> Result<()> {
  let options = SetupOptions {
    db_policy: if keep_going {
      DbResetPolicy::BestEffort
    } else {
      DbResetPolicy::FailFast
    },
    ..SetupOptions::default()
  };

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  let result = rt.block_on(setup(config, &options)).context("Setup failed")?;

  print_success("Local instance provisioned");
  print_stat("Working dir", &result.web_root.display().to_string());
  print_stat("Files mirrored", &result.files_mirrored.to_string());
  match result.db {
    DbOutcome::Reset => print_stat("Database", "reset"),
    DbOutcome::Failed(err) => {
      print_warning(&format!("Database reset failed (continued): {err}"));
    }
  }

  Ok(())
}
