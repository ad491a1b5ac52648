//! Shared filesystem helpers.
//!
//! All helpers return `io::Result`; operation modules wrap failures into
//! their own error types.

use std::fs;
use std::io;
use std::path::Path;

use walkdir::WalkDir;

/// Recursively copy `src` into `dest`, overwriting existing files.
///
/// Destination files that have no counterpart in the source are left in
/// place, so a mirror onto a live tree only ever adds or replaces.
/// Returns the number of files copied.
pub fn mirror(src: &Path, dest: &Path) -> io::Result<usize> {
  let mut copied = 0;

  for entry in WalkDir::new(src) {
    let entry = entry.map_err(io::Error::from)?;
    let rel = match entry.path().strip_prefix(src) {
      Ok(rel) => rel,
      Err(_) => continue,
    };
    let target = dest.join(rel);

    if entry.file_type().is_dir() {
      fs::create_dir_all(&target)?;
    } else {
      if let Some(parent) = target.parent() {
        fs::create_dir_all(parent)?;
      }
      fs::copy(entry.path(), &target)?;
      copied += 1;
    }
  }

  Ok(copied)
}

/// Copy a single file on top of a mirrored tree, creating parent
/// directories as needed.
pub fn overlay(src: &Path, dest: &Path) -> io::Result<()> {
  if let Some(parent) = dest.parent() {
    fs::create_dir_all(parent)?;
  }
  fs::copy(src, dest)?;
  Ok(())
}

/// Remove a directory tree if it exists.
pub fn remove_dir_if_exists(path: &Path) -> io::Result<()> {
  if path.exists() {
    fs::remove_dir_all(path)?;
  }
  Ok(())
}

/// Recursively set permissions on every entry under `path`.
#[cfg(unix)]
pub fn chmod_recursive(path: &Path, mode: u32) -> io::Result<()> {
  use std::os::unix::fs::PermissionsExt;

  for entry in WalkDir::new(path) {
    let entry = entry.map_err(io::Error::from)?;
    fs::set_permissions(entry.path(), fs::Permissions::from_mode(mode))?;
  }
  Ok(())
}

/// Permission bits are a Unix concern; a no-op elsewhere.
#[cfg(not(unix))]
pub fn chmod_recursive(_path: &Path, _mode: u32) -> io::Result<()> {
  Ok(())
}
