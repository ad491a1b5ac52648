//! ocdev - build and deployment harness for an OpenCart module.
//!
//! Configuration comes from the environment (plus a project-local `.env`);
//! it is validated eagerly, before any subcommand runs, and every missing
//! variable is named in the failure message.

mod cmd;
mod output;

use clap::{Parser, Subcommand};
use ocdev_lib::config::Config;
use tracing_subscriber::EnvFilter;

use crate::output::print_error;

/// Build and deployment harness for an OpenCart module.
#[derive(Parser)]
#[command(name = "ocdev")]
#[command(author, version, about, long_about = None)]
struct Cli {
  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Provision a local instance: mirror the application, reset the
  /// database, run the installer
  Setup {
    /// Report a failed database reset but continue into installation
    #[arg(long)]
    keep_going: bool,
  },

  /// Serve the working directory over HTTP on the configured port
  Run,

  /// Copy the module source into the working directory once
  Deploy,

  /// Deploy, then re-deploy on every source or manifest change
  Watch,

  /// Build the distributable module archive
  Package,
}

fn main() -> anyhow::Result<()> {
  // Initialize logging
  tracing_subscriber::fmt()
    .with_env_filter(EnvFilter::from_default_env())
    .without_time()
    .init();

  let cli = Cli::parse();

  // .env is optional; real environment variables win.
  dotenvy::dotenv().ok();

  let config = match Config::from_env() {
    Ok(config) => config,
    Err(err) => {
      print_error(&err.to_string());
      print_error("See .env.sample");
      std::process::exit(1);
    }
  };
  tracing::debug!(port = config.server_port, url = %config.server_url, "configuration loaded");

  match cli.command {
    Commands::Setup { keep_going } => cmd::cmd_setup(&config, keep_going),
    Commands::Run => cmd::cmd_run(&config),
    Commands::Deploy => cmd::cmd_deploy(),
    Commands::Watch => cmd::cmd_watch(),
    Commands::Package => cmd::cmd_package(),
  }
}
