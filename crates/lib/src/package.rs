//! Distributable archive packaging.
//!
//! Recreates the output directory and writes the whole module source tree
//! into a fresh zip, parents before children, with entry paths relative to
//! the source root and forward-slash separators on every host. Entries are
//! walked in file-name order, so two runs over an unchanged tree emit
//! identical entry lists.

use std::fs::{self, File};
use std::io;
use std::path::{Path, PathBuf};

use thiserror::Error;
use tracing::info;
use walkdir::WalkDir;
use zip::ZipWriter;
use zip::write::SimpleFileOptions;

use crate::consts;
use crate::fsutil;

/// Options for a packaging run.
#[derive(Debug, Clone)]
pub struct PackageOptions {
  /// Module source tree to archive.
  pub source_dir: PathBuf,

  /// Output directory, deleted and recreated on every run.
  pub out_dir: PathBuf,

  /// File name of the archive inside the output directory.
  pub archive_name: String,
}

impl PackageOptions {
  /// Standard layout relative to a project directory.
  pub fn for_project(project_dir: &Path) -> Self {
    PackageOptions {
      source_dir: project_dir.join(consts::MODULE_SRC_DIR),
      out_dir: project_dir.join(consts::DIST_DIR),
      archive_name: consts::ARCHIVE_NAME.to_string(),
    }
  }
}

/// Result of a packaging run.
#[derive(Debug)]
pub struct PackageResult {
  /// Path of the produced archive.
  pub archive: PathBuf,

  /// File entries written.
  pub files: usize,

  /// Directory entries written.
  pub dirs: usize,

  /// Size of the archive on disk.
  pub bytes: u64,
}

/// Errors that can occur during packaging.
#[derive(Debug, Error)]
pub enum PackageError {
  /// The module source tree is absent.
  #[error("module source tree not found: {path}")]
  SourceMissing { path: String },

  /// The archive file could not be opened for creation. Fatal.
  #[error("could not create archive {path}: {source}")]
  CreateArchive {
    path: String,
    #[source]
    source: io::Error,
  },

  /// Walking the source tree failed.
  #[error("walk error: {0}")]
  Walk(#[from] walkdir::Error),

  /// Writing an entry failed.
  #[error("zip error: {0}")]
  Zip(#[from] zip::result::ZipError),

  /// A filesystem step failed.
  #[error("io error: {0}")]
  Io(#[from] io::Error),
}

/// Build the distributable archive from the module source tree.
pub fn package(options: &PackageOptions) -> Result<PackageResult, PackageError> {
  if !options.source_dir.is_dir() {
    return Err(PackageError::SourceMissing {
      path: options.source_dir.display().to_string(),
    });
  }

  fsutil::remove_dir_if_exists(&options.out_dir)?;
  fs::create_dir_all(&options.out_dir)?;

  let archive_path = options.out_dir.join(&options.archive_name);
  let file = File::create(&archive_path).map_err(|source| PackageError::CreateArchive {
    path: archive_path.display().to_string(),
    source,
  })?;

  let mut zip = ZipWriter::new(file);
  let entry_options = SimpleFileOptions::default();
  let mut files = 0;
  let mut dirs = 0;

  for entry in WalkDir::new(&options.source_dir).min_depth(1).sort_by_file_name() {
    let entry = entry?;
    let rel = entry.path().strip_prefix(&options.source_dir).unwrap_or(entry.path());
    let name = entry_name(rel);

    if entry.file_type().is_dir() {
      zip.add_directory(name.as_str(), entry_options)?;
      dirs += 1;
    } else if entry.file_type().is_file() {
      zip.start_file(name.as_str(), entry_options)?;
      let mut reader = File::open(entry.path())?;
      io::copy(&mut reader, &mut zip)?;
      files += 1;
    }
  }

  let file = zip.finish()?;
  let bytes = file.metadata()?.len();

  info!(archive = %archive_path.display(), files, dirs, bytes, "packaged module");
  Ok(PackageResult { archive: archive_path, files, dirs, bytes })
}

/// Archive entry name: the relative path joined with forward slashes,
/// whatever the host separator is.
fn entry_name(rel: &Path) -> String {
  rel
    .iter()
    .map(|part| part.to_string_lossy())
    .collect::<Vec<_>>()
    .join("/")
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::TempDir;
  use zip::ZipArchive;

  fn fake_module(temp: &TempDir) -> PathBuf {
    let project = temp.path().to_path_buf();
    let src = project.join(consts::MODULE_SRC_DIR);
    fs::create_dir_all(src.join("upload/admin")).unwrap();
    fs::create_dir_all(src.join("empty")).unwrap();
    fs::write(src.join("install.xml"), "<modification/>").unwrap();
    fs::write(src.join("upload/admin/module.php"), "<?php").unwrap();
    project
  }

  fn entry_names(archive: &Path) -> Vec<String> {
    let mut zip = ZipArchive::new(File::open(archive).unwrap()).unwrap();
    (0..zip.len())
      .map(|i| zip.by_index(i).unwrap().name().to_string())
      .collect()
  }

  #[test]
  fn archive_mirrors_source_tree_with_forward_slashes() {
    let temp = TempDir::new().unwrap();
    let project = fake_module(&temp);

    let result = package(&PackageOptions::for_project(&project)).unwrap();

    let mut names = entry_names(&result.archive);
    names.sort();
    assert_eq!(
      names,
      vec![
        "empty/",
        "install.xml",
        "upload/",
        "upload/admin/",
        "upload/admin/module.php",
      ]
    );
    assert_eq!(result.files, 2);
    assert_eq!(result.dirs, 3);
  }

  #[test]
  fn archive_round_trips_file_content() {
    use std::io::Read;

    let temp = TempDir::new().unwrap();
    let project = fake_module(&temp);

    let result = package(&PackageOptions::for_project(&project)).unwrap();

    let mut zip = ZipArchive::new(File::open(&result.archive).unwrap()).unwrap();
    let mut entry = zip.by_name("install.xml").unwrap();
    let mut content = String::new();
    entry.read_to_string(&mut content).unwrap();
    assert_eq!(content, "<modification/>");
  }

  #[test]
  fn packaging_is_idempotent() {
    let temp = TempDir::new().unwrap();
    let project = fake_module(&temp);
    let options = PackageOptions::for_project(&project);

    let first = package(&options).unwrap();
    let first_names = entry_names(&first.archive);

    let second = package(&options).unwrap();
    let second_names = entry_names(&second.archive);

    assert_eq!(first_names, second_names);
  }

  #[test]
  fn stale_output_directory_is_recreated() {
    let temp = TempDir::new().unwrap();
    let project = fake_module(&temp);
    let options = PackageOptions::for_project(&project);
    let stale = options.out_dir.join("old-build.zip");
    fs::create_dir_all(&options.out_dir).unwrap();
    fs::write(&stale, "stale").unwrap();

    package(&options).unwrap();

    assert!(!stale.exists());
    assert!(options.out_dir.join(consts::ARCHIVE_NAME).exists());
  }

  #[test]
  fn missing_source_is_reported() {
    let temp = TempDir::new().unwrap();

    let err = package(&PackageOptions::for_project(temp.path())).unwrap_err();

    assert!(matches!(err, PackageError::SourceMissing { .. }));
  }
}
