//! Database reset for the local instance.
//!
//! Connects with no database selected and unconditionally drops and
//! recreates the target database, leaving it empty for the installer.

use sqlx::mysql::{MySqlConnectOptions, MySqlConnection};
use sqlx::{Connection, Executor};
use thiserror::Error;
use tracing::info;

use crate::config::Config;

/// Errors that can occur while resetting the database.
#[derive(Debug, Error)]
pub enum DbError {
  /// A connection or database-name option is absent from the configuration.
  #[error("missing database option: {name}")]
  MissingOption { name: String },

  /// The connection or an SQL statement failed.
  #[error("database error: {0}")]
  Sql(#[from] sqlx::Error),
}

/// Connection settings extracted from the configuration.
#[derive(Debug, Clone)]
pub struct DbSettings {
  pub hostname: String,
  pub username: String,
  pub password: String,
  pub database: String,
}

impl DbSettings {
  /// Pull connection settings out of the installer options.
  ///
  /// `db_password` defaults to empty; the other settings are required here
  /// even though only `db_username` is part of the global required set.
  pub fn from_config(config: &Config) -> Result<Self, DbError> {
    let get = |name: &str| {
      config
        .option(name)
        .map(str::to_string)
        .ok_or_else(|| DbError::MissingOption { name: name.to_string() })
    };

    Ok(DbSettings {
      hostname: get("db_hostname")?,
      username: get("db_username")?,
      password: config.option("db_password").unwrap_or_default().to_string(),
      database: get("db_database")?,
    })
  }
}

/// Drop the target database if present, then create it empty.
pub async fn reset(settings: &DbSettings) -> Result<(), DbError> {
  let options = MySqlConnectOptions::new()
    .host(&settings.hostname)
    .username(&settings.username)
    .password(&settings.password);

  info!(host = %settings.hostname, database = %settings.database, "resetting database");

  let mut conn = MySqlConnection::connect_with(&options).await?;
  conn
    .execute(format!("DROP DATABASE IF EXISTS `{}`", settings.database).as_str())
    .await?;
  conn
    .execute(format!("CREATE DATABASE `{}`", settings.database).as_str())
    .await?;
  conn.close().await?;

  Ok(())
}
