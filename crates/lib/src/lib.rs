//! ocdev-lib: operations for the OpenCart module development harness.
//!
//! This crate provides the building blocks behind the `ocdev` binary:
//! - `config`: environment-driven configuration with eager validation
//! - `setup`: provision a throwaway local instance (filesystem + database + installer)
//! - `serve`: static dev server over the working directory
//! - `deploy` / `watch`: one-shot and continuous source synchronization
//! - `package`: distributable `.ocmod.zip` archive builder

pub mod config;
pub mod consts;
pub mod db;
pub mod deploy;
pub mod fsutil;
pub mod package;
pub mod serve;
pub mod setup;
pub mod watch;
