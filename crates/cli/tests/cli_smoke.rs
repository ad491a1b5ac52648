//! CLI smoke tests for ocdev.
//!
//! These tests verify that all CLI commands run without panicking, return
//! appropriate exit codes, and that configuration validation fires before
//! any subcommand does work.

use assert_cmd::Command;
use assert_cmd::cargo::cargo_bin_cmd;
use predicates::prelude::*;
use tempfile::TempDir;

/// Get a Command for the ocdev binary, isolated from the caller's
/// environment and rooted in `dir` (so no stray `.env` is picked up).
fn ocdev_cmd(dir: &TempDir) -> Command {
  let mut cmd = cargo_bin_cmd!("ocdev");
  cmd.current_dir(dir.path());
  for name in ["OC_DB_USERNAME", "OC_PASSWORD", "OC_EMAIL", "SERVER_PORT", "SERVER_URL"] {
    cmd.env_remove(name);
  }
  cmd
}

/// Same, with the three required variables set.
fn configured_cmd(dir: &TempDir) -> Command {
  let mut cmd = ocdev_cmd(dir);
  cmd
    .env("OC_DB_USERNAME", "root")
    .env("OC_PASSWORD", "admin")
    .env("OC_EMAIL", "admin@example.com");
  cmd
}

/// Create a module source tree (`src/upload` + `src/install.xml`) under the
/// given project directory.
fn write_module_source(dir: &TempDir) {
  let upload = dir.path().join("src/upload/admin");
  std::fs::create_dir_all(&upload).unwrap();
  std::fs::write(upload.join("module.php"), "<?php").unwrap();
  std::fs::write(dir.path().join("src/install.xml"), "<modification/>").unwrap();
}

// =============================================================================
// Help & Version
// =============================================================================

#[test]
fn help_flag_works() {
  let temp = TempDir::new().unwrap();

  ocdev_cmd(&temp)
    .arg("--help")
    .assert()
    .success()
    .stdout(predicate::str::contains("Usage"));
}

#[test]
fn version_flag_works() {
  let temp = TempDir::new().unwrap();

  ocdev_cmd(&temp)
    .arg("--version")
    .assert()
    .success()
    .stdout(predicate::str::contains("ocdev"));
}

#[test]
fn subcommand_help_works() {
  let temp = TempDir::new().unwrap();

  for cmd in &["setup", "run", "deploy", "watch", "package"] {
    ocdev_cmd(&temp)
      .arg(cmd)
      .arg("--help")
      .assert()
      .success()
      .stdout(predicate::str::contains("Usage"));
  }
}

// =============================================================================
// Configuration validation
// =============================================================================

#[test]
fn missing_configuration_names_every_variable() {
  let temp = TempDir::new().unwrap();

  ocdev_cmd(&temp)
    .arg("deploy")
    .assert()
    .failure()
    .stderr(predicate::str::contains("OC_DB_USERNAME"))
    .stderr(predicate::str::contains("OC_PASSWORD"))
    .stderr(predicate::str::contains("OC_EMAIL"))
    .stderr(predicate::str::contains(".env.sample"));
}

#[test]
fn partially_missing_configuration_names_only_the_gaps() {
  let temp = TempDir::new().unwrap();

  ocdev_cmd(&temp)
    .arg("deploy")
    .env("OC_DB_USERNAME", "root")
    .assert()
    .failure()
    .stderr(predicate::str::contains("OC_PASSWORD"))
    .stderr(predicate::str::contains("OC_EMAIL"))
    .stderr(predicate::str::contains("OC_DB_USERNAME").not());
}

#[test]
fn dotenv_file_supplies_configuration() {
  let temp = TempDir::new().unwrap();
  write_module_source(&temp);
  std::fs::write(
    temp.path().join(".env"),
    "OC_DB_USERNAME=root\nOC_PASSWORD=admin\nOC_EMAIL=admin@example.com\n",
  )
  .unwrap();

  ocdev_cmd(&temp).arg("deploy").assert().success();
}

#[test]
fn invalid_server_port_is_rejected() {
  let temp = TempDir::new().unwrap();

  configured_cmd(&temp)
    .arg("deploy")
    .env("SERVER_PORT", "not-a-port")
    .assert()
    .failure()
    .stderr(predicate::str::contains("SERVER_PORT"));
}

// =============================================================================
// deploy
// =============================================================================

#[test]
fn deploy_copies_module_source() {
  let temp = TempDir::new().unwrap();
  write_module_source(&temp);

  configured_cmd(&temp)
    .arg("deploy")
    .assert()
    .success()
    .stdout(predicate::str::contains("Deployed 2 file(s)"));

  assert!(temp.path().join("www/admin/module.php").exists());
  assert!(temp.path().join("www/system/install.ocmod.xml").exists());
}

#[test]
fn deploy_without_module_source_fails() {
  let temp = TempDir::new().unwrap();

  configured_cmd(&temp)
    .arg("deploy")
    .assert()
    .failure()
    .stderr(predicate::str::contains("module source tree not found"));
}

// =============================================================================
// package
// =============================================================================

#[test]
fn package_builds_archive() {
  let temp = TempDir::new().unwrap();
  write_module_source(&temp);

  configured_cmd(&temp)
    .arg("package")
    .assert()
    .success()
    .stdout(predicate::str::contains("Archive built"))
    .stdout(predicate::str::contains("build.ocmod.zip"));

  assert!(temp.path().join("dist/build.ocmod.zip").exists());
}

#[test]
fn package_twice_succeeds() {
  let temp = TempDir::new().unwrap();
  write_module_source(&temp);

  configured_cmd(&temp).arg("package").assert().success();
  configured_cmd(&temp).arg("package").assert().success();
}

#[test]
fn package_without_module_source_fails() {
  let temp = TempDir::new().unwrap();

  configured_cmd(&temp)
    .arg("package")
    .assert()
    .failure()
    .stderr(predicate::str::contains("module source tree not found"));
}

// =============================================================================
// run
// =============================================================================

#[test]
fn run_without_working_directory_fails() {
  let temp = TempDir::new().unwrap();

  configured_cmd(&temp)
    .arg("run")
    .assert()
    .failure()
    .stderr(predicate::str::contains("working directory not found"));
}

// =============================================================================
// setup
// =============================================================================

#[test]
fn setup_without_vendored_tree_fails() {
  let temp = TempDir::new().unwrap();

  configured_cmd(&temp)
    .arg("setup")
    .assert()
    .failure()
    .stderr(predicate::str::contains("vendored application tree not found"));
}
