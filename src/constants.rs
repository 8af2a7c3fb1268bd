//! Global constants used throughout the launcher.
//!
//! This module contains timeout durations, file names, and other values that
//! are shared across the release, download, and launch code paths. Keeping
//! them in one place makes the magic numbers discoverable.

use std::time::Duration;

/// Display name of the managed client, used in user-facing labels.
pub const PRODUCT_NAME: &str = "Woodlanders";

/// Release feed queried for the latest published client.
pub const DEFAULT_FEED_URL: &str =
    "https://api.github.com/repos/gcclinux/Woodlanders/releases/latest";

/// File name of the release asset the launcher prefers.
///
/// The installed artifact is stored under this name as well.
pub const DEFAULT_ASSET_NAME: &str = "woodlanders-client.jar";

/// Extension used when no asset matches [`DEFAULT_ASSET_NAME`] exactly.
pub const ASSET_EXTENSION: &str = ".jar";

/// Suffix of the optional checksum asset published next to the client.
pub const CHECKSUM_SUFFIX: &str = ".sha256";

/// Name of the persisted version record inside the base directory.
pub const METADATA_FILE_NAME: &str = "version.json";

/// Directory name used under the platform configuration root.
pub const APP_DIR_NAME: &str = "woodlanders";

/// Default Java runtime used to start the client.
pub const DEFAULT_JAVA_COMMAND: &str = "java";

/// Media type requested from the GitHub releases API.
pub const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// Timeout for the single "latest release" request (20 seconds).
pub const RELEASE_REQUEST_TIMEOUT: Duration = Duration::from_secs(20);

/// Timeout for establishing any HTTP connection (15 seconds).
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(15);

/// Overall timeout for streaming a release asset to disk (5 minutes).
pub const DOWNLOAD_TIMEOUT: Duration = Duration::from_secs(300);

/// Chunk size used when hashing files (8 KiB).
pub const HASH_BUFFER_SIZE: usize = 8 * 1024;

/// User agent sent with every request.
pub fn user_agent() -> String {
    format!("jarlaunch/{}", env!("CARGO_PKG_VERSION"))
}
