//! Fixed project layout and environment conventions.
//!
//! All paths are relative to the project directory (where the `.env` file and
//! `composer.json` live). Operation option structs default from these and
//! accept overrides, which the tests lean on.

/// Marker prefix for environment variables forwarded to the installer.
pub const ENV_PREFIX: &str = "OC_";

/// Default port for the dev server.
pub const DEFAULT_SERVER_PORT: u16 = 80;

/// Default base URL for the dev server.
pub const DEFAULT_SERVER_URL: &str = "http://localhost";

/// Working directory the application is installed into and served from.
pub const WEB_ROOT: &str = "www";

/// Vendored application tree mirrored into the working directory.
pub const VENDOR_UPLOAD_DIR: &str = "vendor/opencart/opencart/upload";

/// Test-support files overlaid after the mirror, as
/// (path under the project directory, path under the working directory).
pub const TEST_OVERLAYS: [(&str, &str); 2] = [
  (
    "vendor/beyondit/opencart-test-suite/src/upload/system/config/test-config.php",
    "system/config/test-config.php",
  ),
  (
    "vendor/beyondit/opencart-test-suite/src/upload/catalog/controller/startup/test_startup.php",
    "catalog/controller/startup/test_startup.php",
  ),
];

/// Installer directory under the working directory, removed after a
/// successful install.
pub const INSTALL_DIR: &str = "install";

/// The application's own CLI installer, under the working directory.
pub const INSTALL_SCRIPT: &str = "install/cli_install.php";

/// Interpreter used to run the installer.
pub const PHP_BIN: &str = "php";

/// Module source tree that gets packaged.
pub const MODULE_SRC_DIR: &str = "src";

/// Module files deployed into the working directory.
pub const MODULE_UPLOAD_DIR: &str = "src/upload";

/// Module metadata file, overlaid into the working directory on deploy.
pub const MODULE_MANIFEST: &str = "src/install.xml";

/// Destination of the metadata overlay, under the working directory.
pub const MANIFEST_DEST: &str = "system/install.ocmod.xml";

/// Dependency manifest watched for changes in continuous mode.
pub const COMPOSER_MANIFEST: &str = "composer.json";

/// Dependency manager invoked when the manifest changes.
pub const COMPOSER_BIN: &str = "composer";

/// Output directory for distributable archives, recreated on every run.
pub const DIST_DIR: &str = "dist";

/// Name of the distributable archive.
pub const ARCHIVE_NAME: &str = "build.ocmod.zip";
