//! Implementation of the `ocdev run` command.

use std::path::PathBuf;

use anyhow::{Context, Result};

use ocdev_lib::config::Config;
use ocdev_lib::consts;
use ocdev_lib::serve::{ServeOptions, serve};

use crate::output::print_info;

/// Execute the run command: serve the working directory until terminated.
pub fn cmd_run(config: &Config) -> Result<()> {
  let options = ServeOptions {
    root: PathBuf::from(consts::WEB_ROOT),
    port: config.server_port,
  };

  print_info(&format!(
    "Serving {} at {}:{}/",
    consts::WEB_ROOT, config.server_url, config.server_port
  ));

  let rt = tokio::runtime::Runtime::new().context("Failed to create async runtime")?;
  rt.block_on(serve(&options)).context("Dev server failed")?;

  Ok(())
}
