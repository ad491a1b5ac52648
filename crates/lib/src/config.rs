//! Environment-driven configuration.
//!
//! Every `OC_`-prefixed environment variable becomes an installer option
//! (prefix stripped, name lowercased); `SERVER_PORT` and `SERVER_URL`
//! override the dev-server settings. The derived `http_server` value is
//! injected back into the option map so it reaches the installer like any
//! other option.
//!
//! Construction is an explicit fallible step rather than a process-aborting
//! side effect, so callers (and tests) handle the error case without spawning
//! a real process.

use std::collections::BTreeMap;
use std::env;

use thiserror::Error;

use crate::consts::{DEFAULT_SERVER_PORT, DEFAULT_SERVER_URL, ENV_PREFIX};

/// Options that must be present and non-empty before any operation runs.
pub const REQUIRED_OPTIONS: [&str; 3] = ["db_username", "password", "email"];

/// Errors produced while building a [`Config`] from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
  /// One or more required options are absent or empty. Carries the
  /// namespaced variable names (`OC_DB_USERNAME`, ...) for reporting.
  #[error("missing required configuration: {}", missing.join(", "))]
  MissingOptions { missing: Vec<String> },

  /// `SERVER_PORT` was set but is not a valid port number.
  #[error("invalid SERVER_PORT value: {value}")]
  InvalidPort { value: String },
}

/// Validated configuration, immutable after construction.
#[derive(Debug, Clone)]
pub struct Config {
  /// Installer options keyed by lowercased, prefix-stripped name.
  /// Includes the derived `http_server` entry.
  pub options: BTreeMap<String, String>,

  /// Port the dev server binds to.
  pub server_port: u16,

  /// Base URL the installed application is reached under.
  pub server_url: String,
}

impl Config {
  /// Build a configuration from the current process environment.
  pub fn from_env() -> Result<Self, ConfigError> {
    Self::from_vars(env::vars())
  }

  /// Build a configuration from an arbitrary environment snapshot.
  ///
  /// # Errors
  ///
  /// Returns [`ConfigError::MissingOptions`] naming every required option
  /// that is absent or empty, or [`ConfigError::InvalidPort`] if
  /// `SERVER_PORT` does not parse. Validation failure must stop all
  /// subsequent operations.
  pub fn from_vars(
    vars: impl IntoIterator<Item = (String, String)>,
  ) -> Result<Self, ConfigError> {
    let mut options = BTreeMap::new();
    let mut server_port = DEFAULT_SERVER_PORT;
    let mut server_url = DEFAULT_SERVER_URL.to_string();

    for (key, value) in vars {
      if let Some(name) = key.strip_prefix(ENV_PREFIX) {
        options.insert(name.to_lowercase(), value);
      } else if key == "SERVER_PORT" {
        server_port = value
          .parse()
          .map_err(|_| ConfigError::InvalidPort { value: value.clone() })?;
      } else if key == "SERVER_URL" {
        server_url = value;
      }
    }

    options.insert(
      "http_server".to_string(),
      format!("{server_url}:{server_port}/"),
    );

    let missing: Vec<String> = REQUIRED_OPTIONS
      .iter()
      .filter(|name| options.get(**name).map(|v| v.is_empty()).unwrap_or(true))
      .map(|name| format!("{ENV_PREFIX}{}", name.to_uppercase()))
      .collect();

    if !missing.is_empty() {
      return Err(ConfigError::MissingOptions { missing });
    }

    Ok(Config { options, server_port, server_url })
  }

  /// Look up an installer option by its lowercased name.
  pub fn option(&self, name: &str) -> Option<&str> {
    self.options.get(name).map(String::as_str)
  }
}
